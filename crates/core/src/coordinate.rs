//! Warehouse coordinates and their canonical keys.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A 3D warehouse position: `x` aisle/column, `y` row, `z` level.
///
/// All components are positive (1-based).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    x: u32,
    y: u32,
    z: u32,
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    x: u32,
    y: u32,
    z: u32,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = DomainError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.x, raw.y, raw.z)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate { x: c.x, y: c.y, z: c.z }
    }
}

impl ValueObject for Coordinate {}

impl Coordinate {
    pub fn new(x: u32, y: u32, z: u32) -> DomainResult<Self> {
        if x == 0 || y == 0 || z == 0 {
            return Err(DomainError::validation(format!(
                "coordinates are 1-based, got ({x}, {y}, {z})"
            )));
        }
        Ok(Self { x, y, z })
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn z(&self) -> u32 {
        self.z
    }

    pub fn key(&self) -> CoordinateKey {
        CoordinateKey::of(self.x, self.y, self.z)
    }

    pub fn footprint(&self) -> Footprint {
        Footprint { x: self.x, y: self.y }
    }

    /// Human-readable bin label, e.g. `(1, 1, 1)` → `A-01-01`.
    ///
    /// The column letter sequence continues spreadsheet-style past `Z`
    /// (`27` → `AA`).
    pub fn bin_label(&self) -> String {
        format!("{}-{:02}-{:02}", column_letters(self.x), self.y, self.z)
    }
}

impl core::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

fn column_letters(mut n: u32) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Canonical hashable key of an `(x, y, z)` triple.
///
/// The three 32-bit components are packed into disjoint bit ranges of a
/// `u128`, so the mapping is injective and independent of call site.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinateKey(u128);

impl CoordinateKey {
    pub fn of(x: u32, y: u32, z: u32) -> Self {
        Self(((x as u128) << 64) | ((y as u128) << 32) | z as u128)
    }

    pub fn unpack(self) -> (u32, u32, u32) {
        (
            (self.0 >> 64) as u32,
            (self.0 >> 32) as u32,
            self.0 as u32,
        )
    }

    pub fn as_u128(self) -> u128 {
        self.0
    }
}

/// The `(x, y)` projection of a coordinate, shared by a vertical stack.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub x: u32,
    pub y: u32,
}

impl ValueObject for Footprint {}

impl Footprint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}
