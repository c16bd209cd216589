//! Receiving and shipping zones anchored to the floor corners.
//!
//! Each area has its own local grid. Slots are numbered in a fixed order,
//! x fastest, then z, then y, and the x/z enumeration is mirrored per corner
//! so that numbers grow away from the shipping door line at the floor center.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use super::{calculator::Footprint, params::GridCoordinate};

/// Distance between a loading area and the floor border.
pub const LOADING_AREA_MARGIN: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl Corner {
    pub fn is_right(self) -> bool {
        matches!(self, Corner::FrontRight | Corner::BackRight)
    }

    /// Front is the +z side of the floor.
    pub fn is_front(self) -> bool {
        matches!(self, Corner::FrontLeft | Corner::FrontRight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingAreaConfig {
    pub position: Corner,
    pub boxes_x: u32,
    pub boxes_y: u32,
    pub boxes_z: u32,
    pub gap_x: f32,
    pub gap_y: f32,
    pub gap_z: f32,
    /// Clearance between neighbouring pallets inside a slot.
    pub inset: f32,
    /// Receiving area when true, shipping area otherwise.
    pub is_mal_kabul: bool,
}

/// One numbered slot of a loading area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingSlot {
    pub coord: GridCoordinate,
    pub number: u32,
}

impl LoadingAreaConfig {
    pub fn receiving(position: Corner) -> Self {
        Self {
            position,
            boxes_x: 4,
            boxes_y: 2,
            boxes_z: 3,
            gap_x: 1.4,
            gap_y: 1.2,
            gap_z: 1.4,
            inset: 0.2,
            is_mal_kabul: true,
        }
    }

    pub fn shipping(position: Corner) -> Self {
        Self {
            is_mal_kabul: false,
            ..Self::receiving(position)
        }
    }

    pub fn capacity(&self) -> usize {
        self.boxes_x as usize * self.boxes_y as usize * self.boxes_z as usize
    }

    pub fn contains(&self, coord: GridCoordinate) -> bool {
        coord.x < self.boxes_x && coord.y < self.boxes_y && coord.z < self.boxes_z
    }

    fn mirror_x(&self) -> bool {
        !self.position.is_right()
    }

    fn mirror_z(&self) -> bool {
        !self.position.is_front()
    }

    /// Size of the box drawn for one pallet of this area.
    pub fn pallet_size(&self) -> Vector3<f32> {
        Vector3::new(
            (self.gap_x - self.inset).max(0.05),
            (self.gap_y * super::calculator::PALLET_HEIGHT_RATIO).max(0.05),
            (self.gap_z - self.inset).max(0.05),
        )
    }

    /// World anchor of the area center at floor level.
    pub fn origin(&self, footprint: &Footprint) -> Vector3<f32> {
        let half_x = self.boxes_x as f32 * self.gap_x / 2.0;
        let half_z = self.boxes_z as f32 * self.gap_z / 2.0;

        let x = if self.position.is_right() {
            footprint.width / 2.0 - LOADING_AREA_MARGIN - half_x
        } else {
            -footprint.width / 2.0 + LOADING_AREA_MARGIN + half_x
        };
        let z = if self.position.is_front() {
            footprint.depth / 2.0 - LOADING_AREA_MARGIN - half_z
        } else {
            -footprint.depth / 2.0 + LOADING_AREA_MARGIN + half_z
        };

        Vector3::new(x + footprint.offset_x, 0.0, z + footprint.offset_z)
    }

    /// World position of a slot center.
    pub fn slot_position(&self, coord: GridCoordinate, footprint: &Footprint) -> Vector3<f32> {
        debug_assert!(self.contains(coord), "slot {coord} outside loading area");
        let origin = self.origin(footprint);
        origin
            + Vector3::new(
                (coord.x as f32 - (self.boxes_x as f32 - 1.0) / 2.0) * self.gap_x,
                coord.y as f32 * self.gap_y,
                (coord.z as f32 - (self.boxes_z as f32 - 1.0) / 2.0) * self.gap_z,
            )
    }

    /// All slots in fill order with their display numbers starting at 1.
    pub fn slots(&self) -> impl Iterator<Item = LoadingSlot> + '_ {
        let (bx, by, bz) = (self.boxes_x, self.boxes_y, self.boxes_z);
        (0..by)
            .flat_map(move |y| (0..bz).flat_map(move |iz| (0..bx).map(move |ix| (ix, y, iz))))
            .enumerate()
            .map(move |(i, (ix, y, iz))| LoadingSlot {
                coord: GridCoordinate::new(
                    if self.mirror_x() { bx - 1 - ix } else { ix },
                    y,
                    if self.mirror_z() { bz - 1 - iz } else { iz },
                ),
                number: i as u32 + 1,
            })
    }

    /// Display number of the slot at `coord`.
    pub fn display_number(&self, coord: GridCoordinate) -> Option<u32> {
        if !self.contains(coord) {
            return None;
        }
        let ix = if self.mirror_x() {
            self.boxes_x - 1 - coord.x
        } else {
            coord.x
        };
        let iz = if self.mirror_z() {
            self.boxes_z - 1 - coord.z
        } else {
            coord.z
        };
        Some(coord.y * self.boxes_x * self.boxes_z + iz * self.boxes_x + ix + 1)
    }
}
