use serde::Serialize;

use crate::symbol::{InvalidSymbol, Symbol};

/// Row-major grid of tile symbols for one layer of a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Symbol>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("row {row} is {found} wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    #[error("background is {found} wide, foreground is {expected}")]
    LayerWidth { expected: usize, found: usize },
    #[error("background has {found} rows, foreground has {expected}")]
    LayerHeight { expected: usize, found: usize },
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filled(width: usize, height: usize, symbol: Symbol) -> Self {
        Self {
            rows: vec![vec![symbol; width]; height],
        }
    }

    pub fn from_rows(rows: Vec<Vec<Symbol>>) -> Self {
        Self { rows }
    }

    /// Build a grid from row strings, validating every character.
    pub fn from_strs<'a>(rows: impl IntoIterator<Item = &'a str>) -> Result<Self, InvalidSymbol> {
        let rows = rows
            .into_iter()
            .map(|row| row.chars().map(Symbol::new).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<Symbol>] {
        &self.rows
    }

    pub fn push_row(&mut self, row: Vec<Symbol>) {
        self.rows.push(row);
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the first row (0 for an empty grid).
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Check that every row has the same width; returns that width.
    pub fn check_uniform(&self) -> Result<usize, GridError> {
        let expected = self.width();
        match self.rows.iter().position(|r| r.len() != expected) {
            Some(row) => Err(GridError::Ragged {
                row,
                expected,
                found: self.rows[row].len(),
            }),
            None => Ok(expected),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Symbol> {
        self.rows.get(row)?.get(col).copied()
    }

    /// Overwrite one cell, returning the symbol it held.
    pub fn set(&mut self, row: usize, col: usize, symbol: Symbol) -> Result<Symbol, GridError> {
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(GridError::OutOfBounds { row, col })?;
        Ok(std::mem::replace(cell, symbol))
    }

    /// Replace every occurrence of `old` with `new`; returns how many cells changed.
    pub fn replace(&mut self, old: Symbol, new: Symbol) -> usize {
        if old == new {
            return 0;
        }
        let mut count = 0;
        for cell in self.rows.iter_mut().flatten() {
            if *cell == old {
                *cell = new;
                count += 1;
            }
        }
        count
    }

    pub fn fill(&mut self, symbol: Symbol) {
        for cell in self.rows.iter_mut().flatten() {
            *cell = symbol;
        }
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        self.symbols().filter(|s| *s == symbol).count()
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// A grid of the same shape holding only `symbol`.
    pub fn same_shape(&self, symbol: Symbol) -> Self {
        Self {
            rows: self.rows.iter().map(|r| vec![symbol; r.len()]).collect(),
        }
    }

    pub fn row_string(&self, row: usize) -> Option<String> {
        self.rows
            .get(row)
            .map(|r| r.iter().map(|s| s.as_char()).collect())
    }

    pub fn row_strings(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.iter().map(|s| s.as_char()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(c: char) -> Symbol {
        Symbol::new(c).expect("valid symbol")
    }

    #[test]
    fn from_strs_and_back() {
        let g = Grid::from_strs(["4111", "0006"]).expect("grid");
        assert_eq!(g.height(), 2);
        assert_eq!(g.width(), 4);
        assert_eq!(g.row_strings(), vec!["4111", "0006"]);
    }

    #[test]
    fn rejects_space() {
        assert_eq!(Grid::from_strs(["41 1"]), Err(InvalidSymbol(' ')));
    }

    #[test]
    fn ragged_rows_are_reported() {
        let g = Grid::from_strs(["000", "00", "000"]).expect("grid");
        assert_eq!(
            g.check_uniform(),
            Err(GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn uniform_width() {
        let g = Grid::filled(10, 8, Symbol::AIR);
        assert_eq!(g.check_uniform(), Ok(10));
        assert_eq!(Grid::new().check_uniform(), Ok(0));
    }

    #[test]
    fn replace_counts_changes() {
        let mut g = Grid::from_strs(["00X0", "XX00"]).expect("grid");
        assert_eq!(g.replace(sym('X'), Symbol::AIR), 3);
        assert_eq!(g.row_strings(), vec!["0000", "0000"]);
        assert_eq!(g.replace(sym('X'), Symbol::AIR), 0);
    }

    #[test]
    fn replace_with_itself_is_noop() {
        let mut g = Grid::from_strs(["11"]).expect("grid");
        assert_eq!(g.replace(sym('1'), sym('1')), 0);
    }

    #[test]
    fn set_and_get() {
        let mut g = Grid::filled(2, 2, Symbol::AIR);
        assert_eq!(g.set(1, 0, sym('a')), Ok(Symbol::AIR));
        assert_eq!(g.get(1, 0), Some(sym('a')));
        assert_eq!(
            g.set(2, 0, sym('a')),
            Err(GridError::OutOfBounds { row: 2, col: 0 })
        );
        assert_eq!(g.get(0, 5), None);
    }

    #[test]
    fn same_shape_keeps_ragged_rows() {
        let g = Grid::from_strs(["123", "4"]).expect("grid");
        assert_eq!(g.same_shape(Symbol::AIR).row_strings(), vec!["000", "0"]);
    }
}
