use cgmath::{InnerSpace, Vector2};

use super::CameraPose;
use crate::layout::Footprint;

/// Lowest allowed camera height above the floor.
pub const MIN_CAMERA_HEIGHT: f32 = 0.5;

/// Keeps the camera above the floor and inside the floor circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBounds {
    pub min_height: f32,
    /// Maximum horizontal distance of the eye from the world origin.
    pub radius: f32,
}

impl CameraBounds {
    pub fn for_footprint(footprint: &Footprint) -> Self {
        Self {
            min_height: MIN_CAMERA_HEIGHT,
            radius: footprint.floor_radius(),
        }
    }

    pub fn contains(&self, pose: &CameraPose) -> bool {
        pose.eye.y >= self.min_height
            && Vector2::new(pose.eye.x, pose.eye.z).magnitude() <= self.radius
    }

    /// Clamps the height and, past the radius, scales eye and look-at back
    /// toward the origin so the eye lands on the boundary circle.
    pub fn constrain(&self, pose: CameraPose) -> CameraPose {
        let mut pose = pose;
        pose.eye.y = pose.eye.y.max(self.min_height);

        let radial = Vector2::new(pose.eye.x, pose.eye.z).magnitude();
        if radial > self.radius && radial > 0.0 {
            let scale = self.radius / radial;
            pose.eye.x *= scale;
            pose.eye.z *= scale;
            pose.look_at.x *= scale;
            pose.look_at.z *= scale;
        }
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    fn bounds() -> CameraBounds {
        CameraBounds {
            min_height: 1.0,
            radius: 10.0,
        }
    }

    #[test]
    fn test_height_clamped() {
        let pose = CameraPose::new(Vector3::new(1.0, -3.0, 1.0), Vector3::new(0.0, 0.0, 0.0));
        let constrained = bounds().constrain(pose);
        assert_eq!(constrained.eye.y, 1.0);
        assert_eq!(constrained.look_at, pose.look_at);
    }

    #[test]
    fn test_outside_radius_slides_onto_circle() {
        let pose = CameraPose::new(Vector3::new(16.0, 5.0, 12.0), Vector3::new(8.0, 1.0, 6.0));
        let constrained = bounds().constrain(pose);
        let radial = Vector2::new(constrained.eye.x, constrained.eye.z).magnitude();
        assert!((radial - 10.0).abs() < 1e-4);
        // Direction from the origin and height are preserved.
        assert!((constrained.eye.x / constrained.eye.z - 16.0 / 12.0).abs() < 1e-4);
        assert_eq!(constrained.eye.y, 5.0);
        assert!((constrained.look_at.x - 4.0).abs() < 1e-4);
        assert!((constrained.look_at.z - 3.0).abs() < 1e-4);
        assert!(bounds().contains(&CameraPose::new(
            constrained.eye * 0.999,
            constrained.look_at
        )));
    }

    #[test]
    fn test_inside_untouched() {
        let pose = CameraPose::new(Vector3::new(3.0, 2.0, -4.0), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds().constrain(pose), pose);
        assert!(bounds().contains(&pose));
    }
}
