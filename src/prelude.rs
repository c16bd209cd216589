//! # Rackyard Prelude
//!
//! Commonly used types for hosts embedding the engine.
//!
//! ```no_run
//! use rackyard::prelude::*;
//!
//! let mut session = rackyard::default();
//! let source = StaticSource::new(Vec::new());
//! pollster::block_on(session.load(&source));
//! let frame = session.frame(Instant::now(), 1.0 / 60.0);
//! ```

// Re-export session and store types
pub use crate::default;
pub use crate::session::{FrameOutput, WarehouseSession};
pub use crate::store::{
    JsonFileSource, LoadState, Selection, StaticSource, WarehouseConfig, WarehouseSource,
    WarehouseStore,
};

// Re-export layout and location types
pub use crate::layout::{
    Archetype, Corner, Footprint, GridCoordinate, LayoutParameters, LoadingAreaConfig,
};
pub use crate::location::{decode, encode, RawRecord, WarehouseId};
pub use crate::records::{AreaScope, BoxRef, PalletRecord, Provenance};

// Re-export camera types
pub use crate::camera::{CameraMode, CameraPose, NavInput, PlannerPhase};
pub use crate::render_data::PalletInstance;

// Re-export error types
pub use crate::error::{ConfigError, DataUnavailableError, FormatError, LayoutError};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};

pub use std::time::Instant;
