use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Integer address of one storage cell: `x` along the row, `y` the level,
/// `z` the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridCoordinate {
    pub const ORIGIN: GridCoordinate = GridCoordinate { x: 0, y: 0, z: 0 };

    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.x, self.y, self.z)
    }
}

/// Shelving layout family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Rows paired back to back around a narrow gap, pairs separated by aisles.
    #[serde(rename = "back-to-back")]
    BackToBack,
    /// Uniformly spaced independent rows.
    #[serde(rename = "drive")]
    Drive,
}

/// Structural parameters of one warehouse layout.
///
/// Treated as immutable for the duration of a computation; the store replaces
/// the whole struct on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParameters {
    pub archetype: Archetype,
    pub shelves_y: u32,
    pub shelves_z: u32,
    pub shelves_x_per_row: Vec<u32>,
    pub gap_x: f32,
    pub gap_y: f32,
    pub gap_z: f32,
    pub back_gap: f32,
    pub width_offset_start: f32,
    pub width_offset_end: f32,
    pub depth_offset_start: f32,
    pub depth_offset_end: f32,
}

impl Default for LayoutParameters {
    /// The reference back-to-back warehouse with twelve rows.
    fn default() -> Self {
        Self {
            archetype: Archetype::BackToBack,
            shelves_y: 4,
            shelves_z: 12,
            shelves_x_per_row: vec![16, 24, 24, 24, 14, 24, 24, 24, 14, 24, 24, 16],
            gap_x: 1.51,
            gap_y: 1.2,
            gap_z: 9.0,
            back_gap: 1.5,
            width_offset_start: 8.0,
            width_offset_end: 8.0,
            depth_offset_start: 10.0,
            depth_offset_end: 18.0,
        }
    }
}

impl LayoutParameters {
    /// Checks every structural invariant, including a positive footprint.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.shelves_x_per_row.len() != self.shelves_z as usize {
            return Err(LayoutError::RowCountMismatch {
                expected: self.shelves_z,
                actual: self.shelves_x_per_row.len(),
            });
        }

        for (name, value) in [
            ("gap_x", self.gap_x),
            ("gap_y", self.gap_y),
            ("gap_z", self.gap_z),
            ("back_gap", self.back_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::NegativeGap { name, value });
            }
        }

        let footprint = super::calculator::footprint(self);
        if !(footprint.width > 0.0 && footprint.depth > 0.0) {
            return Err(LayoutError::NonPositiveFootprint {
                width: footprint.width,
                depth: footprint.depth,
            });
        }

        Ok(())
    }

    /// Longest row, used to center the x axis.
    pub fn max_row_length(&self) -> u32 {
        self.shelves_x_per_row.iter().copied().max().unwrap_or(0)
    }

    /// Number of cells along row `z`, zero for rows outside the grid.
    pub fn row_length(&self, z: u32) -> u32 {
        self.shelves_x_per_row.get(z as usize).copied().unwrap_or(0)
    }

    /// Whether `coord` addresses a cell of this layout.
    pub fn contains(&self, coord: GridCoordinate) -> bool {
        coord.z < self.shelves_z && coord.y < self.shelves_y && coord.x < self.row_length(coord.z)
    }

    /// Every valid cell, row by row, level by level.
    pub fn cells(&self) -> impl Iterator<Item = GridCoordinate> + '_ {
        (0..self.shelves_z).flat_map(move |z| {
            let row_length = self.row_length(z);
            (0..self.shelves_y)
                .flat_map(move |y| (0..row_length).map(move |x| GridCoordinate::new(x, y, z)))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.shelves_x_per_row
            .iter()
            .map(|&len| len as usize * self.shelves_y as usize)
            .sum()
    }
}
