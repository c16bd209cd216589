//! # Picking and Occlusion
//!
//! Ray casting against the boxes of the warehouse scene. Used two ways:
//!
//! 1. **Mouse picking**: convert a screen position to a world ray and find the
//!    pallet it hits first
//! 2. **Occlusion queries**: the camera planner casts rays from candidate
//!    vantage points toward a target to find an unobstructed view
//!
//! ## Usage
//!
//! ```no_run
//! use rackyard::picking::{Aabb, OcclusionQuery, RackOcclusion, Ray};
//! use cgmath::Vector3;
//!
//! let mut scene = RackOcclusion::new();
//! scene.push_obstacle(Aabb::new(Vector3::new(-1.0, 0.0, -1.0), Vector3::new(1.0, 2.0, 1.0)));
//! let ray = Ray::new(Vector3::new(0.0, 1.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
//! assert!(scene.first_hit(&ray).is_some());
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::camera::{CameraPose, Projection};
use crate::records::BoxRef;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `from` through `to`.
    pub fn between(from: Vector3<f32>, to: Vector3<f32>) -> Self {
        Self::new(from, to - from)
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vector3<f32>, size: Vector3<f32>) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Test ray-AABB intersection
    /// Returns the distance to intersection point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

/// Anything a ray can be cast into.
pub trait OcclusionQuery {
    /// Distance along `ray` to the first surface hit.
    fn first_hit(&self, ray: &Ray) -> Option<f32>;
}

/// A scene with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScene;

impl OcclusionQuery for EmptyScene {
    fn first_hit(&self, _ray: &Ray) -> Option<f32> {
        None
    }
}

/// Result of an object picking operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    pub target: BoxRef,
    /// Distance from camera to intersection point
    pub distance: f32,
    /// World space intersection point
    pub intersection_point: Vector3<f32>,
}

/// Pallet and rack boxes of the current scene.
///
/// Obstacles (pillars) block rays but cannot be picked.
#[derive(Debug, Clone, Default)]
pub struct RackOcclusion {
    boxes: Vec<(Aabb, Option<BoxRef>)>,
}

impl RackOcclusion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pallet(&mut self, bounds: Aabb, target: BoxRef) {
        self.boxes.push((bounds, Some(target)));
    }

    pub fn push_obstacle(&mut self, bounds: Aabb) {
        self.boxes.push((bounds, None));
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    fn closest(&self, ray: &Ray) -> Option<(f32, Option<BoxRef>)> {
        self.boxes
            .iter()
            .filter_map(|(bounds, target)| bounds.intersect_ray(ray).map(|t| (t, *target)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }

    /// The pallet hit first by `ray`, unless an obstacle is in front of it.
    pub fn pick(&self, ray: &Ray) -> Option<PickResult> {
        let (distance, target) = self.closest(ray)?;
        target.map(|target| PickResult {
            target,
            distance,
            intersection_point: ray.point_at(distance),
        })
    }
}

impl OcclusionQuery for RackOcclusion {
    fn first_hit(&self, ray: &Ray) -> Option<f32> {
        self.closest(ray).map(|(t, _)| t)
    }
}

/// Convert screen coordinates to a world-space ray
pub fn screen_to_ray(
    screen_pos: (f32, f32),
    screen_size: (f32, f32),
    pose: &CameraPose,
    projection: &Projection,
) -> Ray {
    let (mouse_x, mouse_y) = screen_pos;
    let (screen_width, screen_height) = screen_size;

    // Normalized device coordinates (-1 to 1)
    let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
    let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height; // Flip Y axis

    let view_proj_matrix = projection.matrix() * pose.view_matrix();
    let inv_view_proj = view_proj_matrix
        .invert()
        .unwrap_or(Matrix4::from_scale(1.0));

    let unproject = |ndc_z: f32| {
        let world = inv_view_proj * Vector4::new(ndc_x, ndc_y, ndc_z, 1.0);
        if world.w.abs() > f32::EPSILON {
            Vector3::new(world.x / world.w, world.y / world.w, world.z / world.w)
        } else {
            Vector3::zero()
        }
    };

    let near_3d = unproject(-1.0);
    let far_3d = unproject(1.0);
    Ray::new(near_3d, far_3d - near_3d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GridCoordinate;

    fn unit_box(center: Vector3<f32>) -> Aabb {
        Aabb::from_center_size(center, Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(4.0));

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());

        let behind = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&behind).is_none());
    }

    #[test]
    fn test_pick_returns_nearest_pallet() {
        let mut scene = RackOcclusion::new();
        let near = BoxRef::main(GridCoordinate::new(0, 0, 0));
        let far = BoxRef::main(GridCoordinate::new(0, 0, 1));
        scene.push_pallet(unit_box(Vector3::new(0.0, 0.0, 6.0)), far);
        scene.push_pallet(unit_box(Vector3::new(0.0, 0.0, 2.0)), near);

        let ray = Ray::new(Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = scene.pick(&ray).unwrap();
        assert_eq!(hit.target, near);
        assert!((hit.distance - 4.5).abs() < 1e-5);
    }

    #[test]
    fn test_obstacle_blocks_pick() {
        let mut scene = RackOcclusion::new();
        scene.push_pallet(
            unit_box(Vector3::new(0.0, 0.0, 6.0)),
            BoxRef::main(GridCoordinate::ORIGIN),
        );
        scene.push_obstacle(unit_box(Vector3::new(0.0, 0.0, 2.0)));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(scene.pick(&ray).is_none());
        assert!((scene.first_hit(&ray).unwrap() - 4.5).abs() < 1e-5);
    }

    #[test]
    fn test_screen_center_ray_points_at_look_at() {
        let pose = CameraPose::new(Vector3::new(0.0, 5.0, 10.0), Vector3::new(0.0, 0.0, 0.0));
        let ray = screen_to_ray((400.0, 300.0), (800.0, 600.0), &pose, &Projection::default());
        let expected = (pose.look_at - pose.eye).normalize();
        assert!((ray.direction - expected).magnitude() < 1e-3);
    }
}
