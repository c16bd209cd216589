//! Rackyard Warehouse Engine
//!
//! Layout, location decoding and camera navigation for 3D warehouse views.
//! Rendering is left to the host; the engine hands out camera uniforms and
//! pallet instances each frame.

pub mod camera;
pub mod error;
pub mod grid_index;
pub mod layout;
pub mod location;
pub mod picking;
pub mod prelude;
pub mod records;
pub mod render_data;
pub mod session;
pub mod store;
pub mod visibility;

// Re-export main types for convenience
pub use session::{FrameOutput, WarehouseSession};
pub use store::{WarehouseConfig, WarehouseStore};

/// Creates a session over the reference warehouse with no data loaded
pub fn default() -> WarehouseSession {
    WarehouseSession::new(WarehouseStore::default())
}
