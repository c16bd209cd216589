//! # Layout Module
//!
//! Converts the structural warehouse parameters into world positions for every
//! shelf cell, rack pillar and loading-area slot.
//!
//! ## Key Components
//!
//! - [`LayoutParameters`] - archetype, shelf counts, gaps and floor padding
//! - [`calculator`] - footprint, row placement and cell centering
//! - [`LoadingAreaConfig`] - corner-anchored receiving/shipping zones
//!
//! Positions are never stored; they are recomputed from the coordinate and the
//! parameters on demand, so geometry and content cannot drift apart.
//!
//! ```no_run
//! use rackyard::layout::{cell_position, GridCoordinate, LayoutParameters};
//!
//! let params = LayoutParameters::default();
//! let world = cell_position(GridCoordinate::new(0, 0, 0), &params);
//! ```

pub mod calculator;
pub mod loading_area;
pub mod params;

pub use calculator::{
    cell_position, checked_cell_position, footprint, pallet_size, rack_pillars, row_z_position,
    shelves_center_x, shelves_center_z, Footprint, LayoutGeometry, Pillar,
};
pub use loading_area::{Corner, LoadingAreaConfig, LoadingSlot};
pub use params::{Archetype, GridCoordinate, LayoutParameters};
