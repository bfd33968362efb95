use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_ROWS: u32 = 10;
pub const DEFAULT_COLS: u32 = 10;

/// Number of rows and columns of cards on one sheet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GridShape {
    rows: u32,
    cols: u32,
}

impl GridShape {
    pub fn new(rows: u32, cols: u32) -> Result<GridShape> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid { rows, cols });
        }
        Ok(GridShape { rows, cols })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn capacity(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// The position of the `index`-th image when slots are filled column
    /// first, then row, then page. Allocation and packing both go through
    /// here, so a card's recorded slot is always where its image ends up.
    pub fn position(&self, index: usize) -> Position {
        let capacity = self.capacity();
        let within_page = index % capacity;
        let cols = self.cols as usize;
        // both quotient and remainder are below rows and cols, so they fit
        Position {
            page: index / capacity,
            row: (within_page / cols) as u32,
            col: (within_page % cols) as u32,
        }
    }

    pub fn pages_for(&self, images: usize) -> usize {
        images.div_ceil(self.capacity())
    }
}

impl Default for GridShape {
    fn default() -> Self {
        GridShape {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

// field order gives the (page, row, col) ordering
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Position {
    pub page: usize,
    pub row: u32,
    pub col: u32,
}

/// A position on the sheets of one edition, written to the card records as
/// `"pngid": [edition, page, row, col]`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(from = "(String, usize, u32, u32)", into = "(String, usize, u32, u32)")]
pub struct Slot {
    pub edition: String,
    pub position: Position,
}

impl From<(String, usize, u32, u32)> for Slot {
    fn from((edition, page, row, col): (String, usize, u32, u32)) -> Self {
        Slot {
            edition,
            position: Position { page, row, col },
        }
    }
}

impl From<Slot> for (String, usize, u32, u32) {
    fn from(slot: Slot) -> Self {
        (
            slot.edition,
            slot.position.page,
            slot.position.row,
            slot.position.col,
        )
    }
}
