//! Per-pallet instance data for an instanced cube renderer.

use bytemuck::{Pod, Zeroable};
use cgmath::Vector3;

use crate::records::{AreaScope, BoxRef};
use crate::store::{Selection, WarehouseStore};
use crate::visibility::VisibilityFilter;

pub const PALLET_COLOR: [f32; 4] = [0.76, 0.60, 0.42, 1.0];
pub const RECEIVING_COLOR: [f32; 4] = [0.38, 0.62, 0.85, 1.0];
pub const SHIPPING_COLOR: [f32; 4] = [0.45, 0.75, 0.45, 1.0];
pub const SELECTED_COLOR: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
pub const FOCUSED_COLOR: [f32; 4] = [1.0, 0.45, 0.1, 1.0];

/// Instance data for a single pallet box
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PalletInstance {
    /// Box center [x, y, z, 1]
    pub position: [f32; 4],
    /// Box size [x, y, z, 0]
    pub scale: [f32; 4],
    /// Color [r, g, b, a]
    pub color: [f32; 4],
}

impl PalletInstance {
    pub fn new(position: Vector3<f32>, size: Vector3<f32>, color: [f32; 4]) -> Self {
        Self {
            position: [position.x, position.y, position.z, 1.0],
            scale: [size.x, size.y, size.z, 0.0],
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    Selected,
    Focused,
}

pub fn highlight(target: BoxRef, selection: &Selection) -> Highlight {
    if selection.focused == Some(target) {
        Highlight::Focused
    } else if selection.selected == Some(target) {
        Highlight::Selected
    } else {
        Highlight::None
    }
}

fn base_color(store: &WarehouseStore, target: BoxRef) -> [f32; 4] {
    match target.scope {
        AreaScope::Main => PALLET_COLOR,
        AreaScope::LoadingArea(i) => match store.loading_areas().get(i) {
            Some(area) if area.config().is_mal_kabul => RECEIVING_COLOR,
            Some(_) => SHIPPING_COLOR,
            None => PALLET_COLOR,
        },
    }
}

/// Instances for every present pallet that passes `filter`.
pub fn build_instances(store: &WarehouseStore, filter: &VisibilityFilter) -> Vec<PalletInstance> {
    let selection = store.selection();
    store
        .placed_pallets()
        .filter(|pallet| filter.is_visible(pallet.bounds.center()))
        .map(|pallet| {
            let color = match highlight(pallet.target, &selection) {
                Highlight::Focused => FOCUSED_COLOR,
                Highlight::Selected => SELECTED_COLOR,
                Highlight::None => base_color(store, pallet.target),
            };
            let size = pallet.bounds.max - pallet.bounds.min;
            PalletInstance::new(pallet.bounds.center(), size, color)
        })
        .collect()
}
