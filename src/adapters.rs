//! Example structure adapters.

use std::fmt;

use crate::types::{Arrange, Sequence};

/// Cell of a [`Grid`]: its position and current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Cell<T> {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
    /// Cell value.
    pub state: T,
}

/// Square two-dimensional matrix flattened row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a `size` x `size` grid filled with `fill`.
    pub fn new(size: usize, fill: T) -> Self {
        Self {
            size,
            cells: vec![fill; size * size],
        }
    }
}

impl<T> Grid<T> {
    /// Create a grid from rows. Returns `None` unless every row has
    /// exactly as many cells as there are rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the value at (`row`, `col`).
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// Set the value at (`row`, `col`). Returns `false` if out of bounds.
    pub fn set(&mut self, row: usize, col: usize, state: T) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = state;
                true
            }
            None => false,
        }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then_some(row * self.size + col)
    }
}

impl Grid<u8> {
    /// Toggle a binary cell between 0 and 1. Other values are left alone.
    pub fn flip(&mut self, row: usize, col: usize) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = match self.cells[i] {
                    0 => 1,
                    1 => 0,
                    other => other,
                };
                true
            }
            None => false,
        }
    }
}

impl<T: Clone> Arrange for Grid<T> {
    type Element = Cell<T>;

    fn arrange(&self) -> Sequence<Cell<T>> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, state)| Cell {
                row: i / self.size,
                col: i % self.size,
                state: state.clone(),
            })
            .collect()
    }
}

impl<T: fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            for state in row {
                write!(f, "{} ", state)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
