//! # Location Module
//!
//! Maps external `SECTION-POSITION-LEVEL` codes onto grid coordinates and
//! assigns each record to its warehouse.
//!
//! - [`codec`] - decode/encode and warehouse assignment
//! - [`ingest`] - bulk conversion of raw records into [`PalletRecord`]s
//!
//! [`PalletRecord`]: crate::records::PalletRecord

pub mod codec;
pub mod ingest;

pub use codec::{assign_warehouse, decode, encode, try_decode, Decoded, Location, WarehouseId};
pub use ingest::{ingest, parse_records, RawRecord, WarehouseRecords};
