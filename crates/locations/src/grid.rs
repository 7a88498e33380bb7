//! Dense grid materialization of a sparse location set.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use wms_core::{DomainError, WarehouseId};

use crate::index::LocationIndex;
use crate::location::StorageLocation;

/// Row ordering of a materialized grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Row 1 is the highest `y` (map view, read top to bottom).
    #[default]
    TopDown,
    /// Row 1 is `y = 1`.
    BottomUp,
}

impl FromStr for RowOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top_down" | "top-down" => Ok(RowOrder::TopDown),
            "bottom_up" | "bottom-up" => Ok(RowOrder::BottomUp),
            other => Err(DomainError::validation(format!(
                "orientation must be top_down or bottom_up, got {other:?}"
            ))),
        }
    }
}

/// One footprint of the grid; an empty stack means no location there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
    pub stack: Vec<StorageLocation>,
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Lowest level of the stack, the one a map shows first.
    pub fn primary(&self) -> Option<&StorageLocation> {
        self.stack.first()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub y: u32,
    pub cells: Vec<GridCell>,
}

/// Dense `width × height` grid of a warehouse's footprints.
///
/// Cells are snapshots: the grid does not track later status changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    warehouse_id: WarehouseId,
    width: u32,
    height: u32,
    row_order: RowOrder,
    rows: Vec<GridRow>,
}

impl Grid {
    /// Build the grid over `1..=max_x × 1..=max_y` of `index`.
    pub fn materialize(index: &LocationIndex, row_order: RowOrder) -> Self {
        let (width, height) = index.bounds();

        let ys: Box<dyn Iterator<Item = u32>> = match row_order {
            RowOrder::TopDown => Box::new((1..=height).rev()),
            RowOrder::BottomUp => Box::new(1..=height),
        };

        let rows = ys
            .map(|y| GridRow {
                y,
                cells: (1..=width)
                    .map(|x| GridCell {
                        x,
                        y,
                        stack: index.locations_at(x, y).into_iter().cloned().collect(),
                    })
                    .collect(),
            })
            .collect();

        tracing::debug!(
            warehouse_id = %index.warehouse_id(),
            width,
            height,
            "grid materialized"
        );

        Self {
            warehouse_id: index.warehouse_id().clone(),
            width,
            height,
            row_order,
            rows,
        }
    }

    pub fn warehouse_id(&self) -> &WarehouseId {
        &self.warehouse_id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row_order(&self) -> RowOrder {
        self.row_order
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Cell at warehouse coordinates `(x, y)`, independent of row order.
    pub fn cell(&self, x: u32, y: u32) -> Option<&GridCell> {
        if x == 0 || y == 0 || x > self.width || y > self.height {
            return None;
        }
        let row = match self.row_order {
            RowOrder::TopDown => self.height - y,
            RowOrder::BottomUp => y - 1,
        };
        self.rows.get(row as usize)?.cells.get((x - 1) as usize)
    }

    /// Number of cells holding at least one location.
    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| !c.is_empty())
            .count()
    }
}
