//! Location code <-> grid coordinate mapping.
//!
//! A location code is `SECTION-POSITION-LEVEL`, e.g. `K-12-3`. Position and
//! level are 1-based; the section letter is the row, counted from the first
//! letter of the owning warehouse's alphabet range.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::layout::GridCoordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WarehouseId {
    A,
    B,
}

impl WarehouseId {
    pub const ALL: [WarehouseId; 2] = [WarehouseId::A, WarehouseId::B];

    /// Section letters owned by this warehouse.
    pub fn sections(self) -> RangeInclusive<char> {
        match self {
            WarehouseId::A => 'I'..='Z',
            WarehouseId::B => 'A'..='H',
        }
    }

    /// Letter of row 0.
    pub fn section_origin(self) -> char {
        *self.sections().start()
    }

    fn letter(self) -> char {
        match self {
            WarehouseId::A => 'A',
            WarehouseId::B => 'B',
        }
    }
}

impl fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

fn section_letter(code: &str) -> Option<char> {
    code.split('-')
        .next()
        .and_then(|section| section.trim().chars().next())
        .map(|c| c.to_ascii_uppercase())
}

/// Sections `A`..`H` belong to warehouse B, everything else to warehouse A.
pub fn assign_warehouse(code: &str) -> WarehouseId {
    match section_letter(code) {
        Some('A'..='H') => WarehouseId::B,
        _ => WarehouseId::A,
    }
}

/// A successfully decoded location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub warehouse: WarehouseId,
    pub coord: GridCoordinate,
}

/// Outcome of [`decode`]: always carries a usable coordinate, plus the error
/// when the fallback was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub warehouse: WarehouseId,
    pub coord: GridCoordinate,
    pub error: Option<FormatError>,
}

fn parse_index(code: &str, field: &'static str, value: &str) -> Result<u32, FormatError> {
    let one_based: u32 = value.trim().parse().map_err(|_| FormatError::NotAnInteger {
        code: code.to_string(),
        field,
        value: value.to_string(),
    })?;
    one_based.checked_sub(1).ok_or_else(|| FormatError::ZeroIndex {
        code: code.to_string(),
        field,
    })
}

pub fn try_decode(code: &str) -> Result<Location, FormatError> {
    let parts: Vec<&str> = code.split('-').collect();
    let [section, position, level] = parts.as_slice() else {
        return Err(FormatError::PartCount {
            code: code.to_string(),
            parts: parts.len(),
        });
    };

    let warehouse = assign_warehouse(code);
    let invalid_section = || FormatError::InvalidSection {
        code: code.to_string(),
        section: section.to_string(),
    };

    let mut letters = section.trim().chars();
    let letter = match (letters.next(), letters.next()) {
        (Some(c), None) => c.to_ascii_uppercase(),
        _ => return Err(invalid_section()),
    };
    if !warehouse.sections().contains(&letter) {
        return Err(invalid_section());
    }

    let x = parse_index(code, "position", position)?;
    let y = parse_index(code, "level", level)?;
    let z = letter as u32 - warehouse.section_origin() as u32;

    Ok(Location {
        warehouse,
        coord: GridCoordinate::new(x, y, z),
    })
}

/// Never fails: malformed codes map to (0,0,0) and report why.
pub fn decode(code: &str) -> Decoded {
    match try_decode(code) {
        Ok(location) => Decoded {
            warehouse: location.warehouse,
            coord: location.coord,
            error: None,
        },
        Err(error) => Decoded {
            warehouse: assign_warehouse(code),
            coord: GridCoordinate::ORIGIN,
            error: Some(error),
        },
    }
}

pub fn encode(warehouse: WarehouseId, coord: GridCoordinate) -> Result<String, FormatError> {
    let letter = char::from_u32(warehouse.section_origin() as u32 + coord.z)
        .filter(|c| warehouse.sections().contains(c))
        .ok_or(FormatError::RowOutOfRange {
            row: coord.z,
            warehouse: warehouse.letter(),
        })?;
    Ok(format!("{}-{}-{}", letter, coord.x + 1, coord.y + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_warehouse_b_origin() {
        let decoded = decode("A-1-1");
        assert_eq!(decoded.warehouse, WarehouseId::B);
        assert_eq!(decoded.coord, GridCoordinate::new(0, 0, 0));
        assert!(decoded.error.is_none());
    }

    #[test]
    fn test_decode_warehouse_a_origin() {
        let decoded = decode("I-1-1");
        assert_eq!(decoded.warehouse, WarehouseId::A);
        assert_eq!(decoded.coord, GridCoordinate::new(0, 0, 0));
    }

    #[test]
    fn test_decode_position_and_level() {
        assert_eq!(decode("A-2-3").coord, GridCoordinate::new(1, 2, 0));
        assert_eq!(decode("K-10-4").coord, GridCoordinate::new(9, 3, 2));
        assert_eq!(decode(" c - 5 - 2 ").coord, GridCoordinate::new(4, 1, 2));
    }

    #[test]
    fn test_malformed_code_falls_back() {
        let decoded = decode("A-1");
        assert_eq!(decoded.coord, GridCoordinate::ORIGIN);
        assert!(matches!(
            decoded.error,
            Some(FormatError::PartCount { parts: 2, .. })
        ));

        let decoded = decode("B-x-2");
        assert_eq!(decoded.coord, GridCoordinate::ORIGIN);
        assert!(matches!(
            decoded.error,
            Some(FormatError::NotAnInteger {
                field: "position",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_and_bad_sections() {
        assert!(matches!(
            try_decode("A-0-1"),
            Err(FormatError::ZeroIndex {
                field: "position",
                ..
            })
        ));
        assert!(matches!(
            try_decode("AB-1-1"),
            Err(FormatError::InvalidSection { .. })
        ));
        assert!(matches!(
            try_decode("7-1-1"),
            Err(FormatError::InvalidSection { .. })
        ));
    }

    #[test]
    fn test_assign_warehouse_boundaries() {
        assert_eq!(assign_warehouse("A-1-1"), WarehouseId::B);
        assert_eq!(assign_warehouse("H-1-1"), WarehouseId::B);
        assert_eq!(assign_warehouse("I-1-1"), WarehouseId::A);
        assert_eq!(assign_warehouse("Z-1-1"), WarehouseId::A);
        assert_eq!(assign_warehouse(""), WarehouseId::A);
    }

    #[test]
    fn test_encode_round_trips_well_formed_codes() {
        for code in ["A-1-1", "H-24-4", "I-1-1", "M-7-2", "Z-3-9"] {
            let location = try_decode(code).unwrap();
            assert_eq!(encode(location.warehouse, location.coord).unwrap(), code);
        }
    }

    #[test]
    fn test_encode_rejects_rows_past_section_range() {
        let result = encode(WarehouseId::B, GridCoordinate::new(0, 0, 8));
        assert_eq!(
            result,
            Err(FormatError::RowOutOfRange {
                row: 8,
                warehouse: 'B'
            })
        );
        assert!(encode(WarehouseId::A, GridCoordinate::new(0, 0, 17)).is_ok());
    }
}
