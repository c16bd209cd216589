//! Raw warehouse records -> per-warehouse pallet records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::codec::{decode, WarehouseId};
use crate::error::DataUnavailableError;
use crate::records::{PalletRecord, Provenance};

/// One record as delivered by the external warehouse system.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub location_code: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub provenance: Provenance,
}

/// Ingested records partitioned by warehouse.
pub type WarehouseRecords = BTreeMap<WarehouseId, Vec<PalletRecord>>;

/// Parses a JSON array of raw records.
pub fn parse_records(json: &str) -> Result<Vec<RawRecord>, DataUnavailableError> {
    Ok(serde_json::from_str(json)?)
}

/// Decodes and partitions `records`.
///
/// Malformed location codes are logged and placed at (0,0,0); no record is
/// dropped here. Both warehouses always have an entry.
pub fn ingest(records: Vec<RawRecord>) -> WarehouseRecords {
    let mut partitioned: WarehouseRecords = WarehouseId::ALL
        .iter()
        .map(|&id| (id, Vec::new()))
        .collect();

    let mut malformed = 0usize;
    for raw in records {
        let decoded = decode(&raw.location_code);
        if let Some(error) = &decoded.error {
            malformed += 1;
            log::warn!(
                "malformed location code `{}` ({error}), defaulting to {}",
                raw.location_code,
                decoded.coord
            );
        }

        let content = raw
            .content
            .or_else(|| raw.provenance.stock_code.clone())
            .unwrap_or_default();

        partitioned
            .entry(decoded.warehouse)
            .or_default()
            .push(PalletRecord {
                grid_coordinate: decoded.coord,
                content,
                present: true,
                provenance: Some(raw.provenance),
            });
    }

    log::info!(
        "ingested {} records for warehouse A, {} for warehouse B ({malformed} malformed)",
        partitioned[&WarehouseId::A].len(),
        partitioned[&WarehouseId::B].len(),
    );
    partitioned
}
