//! Pure layout geometry.
//!
//! Every world position in the scene is derived here from a
//! [`GridCoordinate`] and the current [`LayoutParameters`]. Nothing is cached
//! across parameter sets except inside [`LayoutGeometry`], which is rebuilt
//! whole whenever the parameters change.

use cgmath::Vector3;

use super::params::{Archetype, GridCoordinate, LayoutParameters};
use crate::error::LayoutError;

/// Floor radius as a fraction of the larger footprint side.
pub const FLOOR_RADIUS_FACTOR: f32 = 0.95;

/// Space left between neighbouring pallets along a row.
pub const PALLET_CLEARANCE: f32 = 0.25;
/// Pallet depth across the row.
pub const PALLET_DEPTH: f32 = 1.0;
/// Pallet height as a fraction of the level spacing.
pub const PALLET_HEIGHT_RATIO: f32 = 0.8;

/// Floor size and the offset of the floor centroid from the rack centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f32,
    pub depth: f32,
    pub offset_x: f32,
    pub offset_z: f32,
}

impl Footprint {
    /// Camera boundary radius around the world origin.
    pub fn floor_radius(&self) -> f32 {
        self.width.max(self.depth) * FLOOR_RADIUS_FACTOR
    }
}

fn pair_count(params: &LayoutParameters) -> f32 {
    params.shelves_z.div_ceil(2) as f32
}

pub fn footprint(params: &LayoutParameters) -> Footprint {
    let width = params.max_row_length() as f32 * params.gap_x
        + params.width_offset_start
        + params.width_offset_end;

    let rack_depth = match params.archetype {
        Archetype::Drive => params.shelves_z as f32 * params.gap_z,
        Archetype::BackToBack => pair_count(params) * (params.gap_z + params.back_gap),
    };
    let depth = rack_depth + params.depth_offset_start + params.depth_offset_end;

    Footprint {
        width,
        depth,
        offset_x: (params.width_offset_end - params.width_offset_start) / 2.0,
        offset_z: (params.depth_offset_end - params.depth_offset_start) / 2.0,
    }
}

/// Uncentered z of row `z`.
///
/// Back-to-back: even rows are the front member of a pair at the pair start,
/// odd rows sit `gap_z` behind their partner.
pub fn row_z_position(z: u32, params: &LayoutParameters) -> f32 {
    match params.archetype {
        Archetype::Drive => z as f32 * params.gap_z,
        Archetype::BackToBack => {
            let partner_offset = if z % 2 == 0 { 0.0 } else { params.gap_z };
            partner_offset + (z / 2) as f32 * (params.back_gap + params.gap_z)
        }
    }
}

pub fn shelves_center_x(params: &LayoutParameters) -> f32 {
    (params.max_row_length() as f32 - 1.0) * params.gap_x / 2.0
}

pub fn shelves_center_z(params: &LayoutParameters) -> f32 {
    match params.archetype {
        Archetype::Drive => (params.shelves_z as f32 - 1.0) * params.gap_z / 2.0,
        Archetype::BackToBack => pair_count(params) * (params.gap_z + params.back_gap) / 2.0,
    }
}

fn centered_position(
    coord: GridCoordinate,
    params: &LayoutParameters,
    center_x: f32,
    center_z: f32,
) -> Vector3<f32> {
    Vector3::new(
        coord.x as f32 * params.gap_x - center_x,
        coord.y as f32 * params.gap_y,
        row_z_position(coord.z, params) - center_z,
    )
}

/// World position of a cell center.
///
/// `coord` must be inside the grid; use [`checked_cell_position`] when the
/// coordinate has not been validated against `params`.
pub fn cell_position(coord: GridCoordinate, params: &LayoutParameters) -> Vector3<f32> {
    debug_assert!(params.contains(coord), "cell {coord} outside layout");
    centered_position(
        coord,
        params,
        shelves_center_x(params),
        shelves_center_z(params),
    )
}

pub fn checked_cell_position(
    coord: GridCoordinate,
    params: &LayoutParameters,
) -> Result<Vector3<f32>, LayoutError> {
    if !params.contains(coord) {
        return Err(LayoutError::OutOfBounds { coord });
    }
    Ok(cell_position(coord, params))
}

/// Size of the box drawn for one pallet of the main grid.
pub fn pallet_size(params: &LayoutParameters) -> Vector3<f32> {
    Vector3::new(
        (params.gap_x - PALLET_CLEARANCE).max(0.05),
        (params.gap_y * PALLET_HEIGHT_RATIO).max(0.05),
        PALLET_DEPTH,
    )
}

/// A rack upright standing on the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pillar {
    /// Base position, `y == 0`.
    pub base: Vector3<f32>,
    pub height: f32,
    pub row: u32,
}

/// Uprights at every cell boundary of every row.
pub fn rack_pillars(params: &LayoutParameters) -> Vec<Pillar> {
    let center_x = shelves_center_x(params);
    let center_z = shelves_center_z(params);
    let height = params.shelves_y as f32 * params.gap_y;

    let capacity: usize = params
        .shelves_x_per_row
        .iter()
        .map(|&n| n as usize + 1)
        .sum();
    let mut pillars = Vec::with_capacity(capacity);
    for z in 0..params.shelves_z {
        let row_z = row_z_position(z, params) - center_z;
        for i in 0..=params.row_length(z) {
            pillars.push(Pillar {
                base: Vector3::new((i as f32 - 0.5) * params.gap_x - center_x, 0.0, row_z),
                height,
                row: z,
            });
        }
    }
    pillars
}

/// Derived geometry for one parameter set.
///
/// Holds the parameters it was computed from so the two can never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGeometry {
    params: LayoutParameters,
    footprint: Footprint,
    center_x: f32,
    center_z: f32,
}

impl LayoutGeometry {
    pub fn new(params: LayoutParameters) -> Self {
        Self {
            footprint: footprint(&params),
            center_x: shelves_center_x(&params),
            center_z: shelves_center_z(&params),
            params,
        }
    }

    pub fn params(&self) -> &LayoutParameters {
        &self.params
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub fn shelves_center(&self) -> (f32, f32) {
        (self.center_x, self.center_z)
    }

    pub fn cell_position(&self, coord: GridCoordinate) -> Vector3<f32> {
        debug_assert!(self.params.contains(coord), "cell {coord} outside layout");
        centered_position(coord, &self.params, self.center_x, self.center_z)
    }

    pub fn checked_cell_position(
        &self,
        coord: GridCoordinate,
    ) -> Result<Vector3<f32>, LayoutError> {
        if !self.params.contains(coord) {
            return Err(LayoutError::OutOfBounds { coord });
        }
        Ok(self.cell_position(coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const EPS: f32 = 1e-4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    fn reference_rows() -> Vec<u32> {
        vec![16, 24, 24, 24, 14, 24, 24, 24, 14, 24, 24, 16]
    }

    #[test]
    fn test_back_to_back_row_spacing() {
        let params = LayoutParameters {
            archetype: Archetype::BackToBack,
            shelves_z: 12,
            shelves_x_per_row: reference_rows(),
            gap_z: 9.0,
            back_gap: 1.5,
            ..Default::default()
        };
        let z0 = row_z_position(0, &params);
        let z1 = row_z_position(1, &params);
        let z2 = row_z_position(2, &params);
        assert_eq!(z1 - z0, 9.0);
        assert_eq!(z2 - z0, 10.5);
        assert_eq!(row_z_position(3, &params) - z2, 9.0);
    }

    #[test]
    fn test_drive_rows_evenly_spaced() {
        let params = LayoutParameters {
            archetype: Archetype::Drive,
            shelves_z: 4,
            shelves_x_per_row: vec![5; 4],
            gap_z: 3.0,
            ..Default::default()
        };
        for z in 0..4 {
            assert_eq!(row_z_position(z, &params), z as f32 * 3.0);
        }
        assert!(approx(shelves_center_z(&params), 4.5));
    }

    #[test]
    fn test_reference_warehouse_centering() {
        let params = LayoutParameters {
            shelves_z: 12,
            shelves_x_per_row: reference_rows(),
            gap_x: 1.51,
            ..Default::default()
        };
        assert!(approx(shelves_center_x(&params), 17.365));
        let origin = cell_position(GridCoordinate::ORIGIN, &params);
        assert!(approx(origin.x, -17.365));
        assert!(approx(origin.y, 0.0));
    }

    #[test]
    fn test_footprint_back_to_back() {
        let params = LayoutParameters {
            archetype: Archetype::BackToBack,
            shelves_z: 5,
            shelves_x_per_row: vec![10, 12, 8, 12, 4],
            gap_x: 2.0,
            gap_z: 8.0,
            back_gap: 2.0,
            width_offset_start: 1.0,
            width_offset_end: 5.0,
            depth_offset_start: 4.0,
            depth_offset_end: 2.0,
            ..Default::default()
        };
        let fp = footprint(&params);
        assert!(approx(fp.width, 12.0 * 2.0 + 6.0));
        assert!(approx(fp.depth, 3.0 * 10.0 + 6.0));
        assert!(approx(fp.offset_x, 2.0));
        assert!(approx(fp.offset_z, -1.0));
        assert!(approx(fp.floor_radius(), 36.0 * FLOOR_RADIUS_FACTOR));
    }

    #[test]
    fn test_footprint_drive() {
        let params = LayoutParameters {
            archetype: Archetype::Drive,
            shelves_z: 3,
            shelves_x_per_row: vec![2, 2, 2],
            gap_x: 1.0,
            gap_z: 4.0,
            width_offset_start: 0.0,
            width_offset_end: 0.0,
            depth_offset_start: 1.0,
            depth_offset_end: 1.0,
            ..Default::default()
        };
        let fp = footprint(&params);
        assert!(approx(fp.width, 2.0));
        assert!(approx(fp.depth, 14.0));
    }

    #[test]
    fn test_random_valid_parameters_have_positive_footprint() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let archetype = if rng.random_bool(0.5) {
                Archetype::BackToBack
            } else {
                Archetype::Drive
            };
            let shelves_z = rng.random_range(1..20);
            let params = LayoutParameters {
                archetype,
                shelves_y: rng.random_range(1..8),
                shelves_z,
                shelves_x_per_row: (0..shelves_z).map(|_| rng.random_range(1..40)).collect(),
                gap_x: rng.random_range(0.1..5.0),
                gap_y: rng.random_range(0.1..5.0),
                gap_z: rng.random_range(0.1..12.0),
                back_gap: rng.random_range(0.0..3.0),
                width_offset_start: rng.random_range(0.0..10.0),
                width_offset_end: rng.random_range(0.0..10.0),
                depth_offset_start: rng.random_range(0.0..10.0),
                depth_offset_end: rng.random_range(0.0..10.0),
            };
            assert!(params.validate().is_ok());
            let fp = footprint(&params);
            assert!(fp.width > 0.0 && fp.depth > 0.0);
        }
    }

    #[test]
    fn test_cell_position_is_pure() {
        let params = LayoutParameters::default();
        let before = params.clone();
        let coord = GridCoordinate::new(3, 2, 7);
        let a = cell_position(coord, &params);
        let b = cell_position(coord, &params);
        assert_eq!(a, b);
        assert_eq!(params, before);
        assert_eq!(LayoutGeometry::new(params).cell_position(coord), a);
    }

    #[test]
    fn test_checked_cell_position_rejects_short_row() {
        let params = LayoutParameters::default();
        // Row 0 holds 16 cells.
        let result = checked_cell_position(GridCoordinate::new(16, 0, 0), &params);
        assert_eq!(
            result,
            Err(LayoutError::OutOfBounds {
                coord: GridCoordinate::new(16, 0, 0)
            })
        );
        assert!(checked_cell_position(GridCoordinate::new(16, 0, 1), &params).is_ok());
    }

    #[test]
    fn test_pillars_bracket_every_cell() {
        let params = LayoutParameters {
            shelves_z: 2,
            shelves_x_per_row: vec![3, 2],
            ..Default::default()
        };
        let pillars = rack_pillars(&params);
        assert_eq!(pillars.len(), 4 + 3);
        let first_cell = cell_position(GridCoordinate::new(0, 0, 0), &params);
        assert!(approx(pillars[0].base.x, first_cell.x - params.gap_x / 2.0));
        assert!(approx(pillars[0].base.z, first_cell.z));
        assert!(approx(pillars[0].height, params.shelves_y as f32 * params.gap_y));
    }
}
