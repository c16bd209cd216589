//! Pallet records and the scopes that address them.

use serde::{Deserialize, Serialize};

use crate::layout::GridCoordinate;

/// Fields copied from the external warehouse system. Absent on records the
/// engine generates itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub pallet_id: Option<String>,
    pub customer: Option<String>,
    pub quantity: Option<f64>,
    pub expiry: Option<String>,
    pub weight: Option<f64>,
    pub status: Option<String>,
    pub stock_code: Option<String>,
    pub entry_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletRecord {
    pub grid_coordinate: GridCoordinate,
    pub content: String,
    pub present: bool,
    pub provenance: Option<Provenance>,
}

impl PalletRecord {
    /// Placeholder for a cell with nothing on it.
    pub fn empty(grid_coordinate: GridCoordinate) -> Self {
        Self {
            grid_coordinate,
            content: String::new(),
            present: false,
            provenance: None,
        }
    }
}

/// Which coordinate space a grid coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AreaScope {
    /// The racking grid.
    #[default]
    Main,
    /// Local grid of the loading area at this index.
    LoadingArea(usize),
}

/// A cell in a particular scope; the shape of both selection and focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxRef {
    pub coord: GridCoordinate,
    pub scope: AreaScope,
}

impl BoxRef {
    pub fn main(coord: GridCoordinate) -> Self {
        Self {
            coord,
            scope: AreaScope::Main,
        }
    }

    pub fn in_area(coord: GridCoordinate, area: usize) -> Self {
        Self {
            coord,
            scope: AreaScope::LoadingArea(area),
        }
    }
}
