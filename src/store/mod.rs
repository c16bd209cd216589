//! # Store Module
//!
//! The explicit warehouse context. A [`WarehouseStore`] owns the layout
//! parameters, the regenerated record lists, loading areas, selection and
//! camera mode, and is the only writer of the derived [`LayoutGeometry`].
//!
//! ## Lifecycle
//!
//! 1. [`WarehouseStore::init`] validates a [`WarehouseConfig`]
//! 2. [`WarehouseStore::load`] awaits a [`WarehouseSource`] once, or again to retry
//! 3. [`WarehouseStore::switch_warehouse`] swaps the active record set
//! 4. [`WarehouseStore::teardown`] drops loaded data
//!
//! [`LayoutGeometry`]: crate::layout::LayoutGeometry

pub mod config;
pub mod source;
pub mod state;

pub use config::WarehouseConfig;
pub use source::{FailingSource, JsonFileSource, StaticSource, WarehouseSource};
pub use state::{LoadState, LoadingArea, PlacedPallet, Selection, WarehouseStore, PILLAR_WIDTH};
