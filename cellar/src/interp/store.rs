//! Fixed-capacity cell store and its first-fit allocator
//!
//! The store is a deliberately small model of memory: a fixed sequence of
//! cells, a first-fit allocator, and no free operation. Once a cell has been
//! handed out it stays occupied for the rest of the run.

use super::error::{InterpResult, RuntimeError};
use super::value::{write_num, Value};
use crate::ast::Keyword;
use std::fmt;

/// Capacity used when nothing else is configured
pub const DEFAULT_CAPACITY: usize = 10;

/// One addressable unit of the store
///
/// Only scalar values can occupy a cell, so the cell carries its own
/// scalar payload instead of a full `Value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Never allocated
    Uninitialized,
    Num(f64),
    Bool(bool),
}

impl Cell {
    /// Initial content of a freshly allocated cell of the given type
    pub fn zero(ty: Keyword) -> Self {
        match ty {
            Keyword::Num => Cell::Num(0.0),
            Keyword::Bool => Cell::Bool(false),
        }
    }

    /// Scalar cell for a value, `None` for kinds that can never be stored
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Num(n) => Some(Cell::Num(*n)),
            Value::Bool(b) => Some(Cell::Bool(*b)),
            _ => None,
        }
    }

    pub fn to_value(self) -> Option<Value> {
        match self {
            Cell::Uninitialized => None,
            Cell::Num(n) => Some(Value::Num(n)),
            Cell::Bool(b) => Some(Value::Bool(b)),
        }
    }

    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Cell::Uninitialized)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Cell::Uninitialized => "uninitialized",
            Cell::Num(_) => "number",
            Cell::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Uninitialized => write!(f, "uninitialized"),
            Cell::Num(n) => write_num(f, *n),
            Cell::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Inclusive index range fixed when an allocation is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub low: usize,
    pub high: usize,
}

impl Bounds {
    pub fn new(low: usize, high: usize) -> Self {
        Bounds { low, high }
    }

    /// Number of cells covered
    pub fn size(&self) -> usize {
        self.high - self.low + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.low <= index && index <= self.high
    }
}

/// Sequential memory of fixed capacity
#[derive(Debug, Clone)]
pub struct Store {
    cells: Vec<Cell>,
}

impl Store {
    /// Create a store with every cell uninitialized
    pub fn new(capacity: usize) -> Self {
        Store {
            cells: vec![Cell::Uninitialized; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Number of cells still uninitialized
    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_uninitialized()).count()
    }

    /// Find the first run of `size` consecutive uninitialized cells.
    ///
    /// Scans left to right once. The caller must initialize the returned run
    /// before handing out a pointer into it.
    pub fn allocate(&self, size: usize) -> InterpResult<Bounds> {
        if size == 0 {
            return Err(RuntimeError::invalid_allocation_size(size));
        }
        if !self.cells.iter().any(Cell::is_uninitialized) {
            return Err(RuntimeError::store_full());
        }

        let last = self.cells.len() - 1;
        let mut low = 0;
        while low <= last {
            if !self.cells[low].is_uninitialized() {
                low += 1;
                continue;
            }
            let high = match low.checked_add(size - 1) {
                Some(high) if high <= last => high,
                _ => return Err(RuntimeError::capacity_exceeded(size)),
            };
            match (low..=high).find(|&i| !self.cells[i].is_uninitialized()) {
                Some(occupied) => low = occupied + 1,
                None => return Ok(Bounds::new(low, high)),
            }
        }
        Err(RuntimeError::capacity_exceeded(size))
    }

    /// Fill every cell in `bounds` with `cell`
    pub fn initialize(&mut self, bounds: Bounds, cell: Cell) {
        for slot in &mut self.cells[bounds.low..=bounds.high] {
            *slot = cell;
        }
    }

    /// Read the value held at `index`
    pub fn read(&self, index: usize) -> InterpResult<Value> {
        let cell = self.get(index).ok_or_else(|| self.outside(index))?;
        cell.to_value()
            .ok_or_else(|| RuntimeError::uninitialized_read(index))
    }

    /// Overwrite the cell at `index`, keeping its type
    pub fn write(&mut self, index: usize, value: &Value) -> InterpResult<()> {
        let current = self.get(index).ok_or_else(|| self.outside(index))?;
        if current.is_uninitialized() {
            return Err(RuntimeError::uninitialized_write(index));
        }
        match Cell::from_value(value) {
            Some(cell) if std::mem::discriminant(&cell) == std::mem::discriminant(&current) => {
                self.cells[index] = cell;
                Ok(())
            }
            _ => Err(RuntimeError::type_mismatch(
                &format!("assignment to cell {index}"),
                &format!("a {}", current.type_name()),
                value.type_name(),
            )),
        }
    }

    fn outside(&self, index: usize) -> RuntimeError {
        RuntimeError::out_of_bounds(format!(
            "index {index} is outside the store (0 to {})",
            self.capacity().saturating_sub(1)
        ))
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{i}: {cell}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;

    fn occupy(store: &mut Store, indices: &[usize]) {
        for &i in indices {
            store.initialize(Bounds::new(i, i), Cell::Num(1.0));
        }
    }

    #[test]
    fn test_new_store_is_uninitialized() {
        let store = Store::new(4);
        assert_eq!(store.capacity(), 4);
        assert_eq!(store.free_cells(), 4);
        assert!(store.cells().iter().all(Cell::is_uninitialized));
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(Store::default().capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_allocate_first_fit_from_zero() {
        let store = Store::new(10);
        assert_eq!(store.allocate(2).unwrap(), Bounds::new(0, 1));
    }

    #[test]
    fn test_allocate_does_not_initialize() {
        let store = Store::new(3);
        store.allocate(2).unwrap();
        assert_eq!(store.free_cells(), 3);
    }

    #[test]
    fn test_allocate_skips_occupied_prefix() {
        let mut store = Store::new(10);
        occupy(&mut store, &[0, 1, 2]);
        assert_eq!(store.allocate(3).unwrap(), Bounds::new(3, 5));
    }

    #[test]
    fn test_allocate_skips_too_small_gap() {
        let mut store = Store::new(10);
        // gap of one at index 1, first fitting run of two starts at 3
        occupy(&mut store, &[0, 2]);
        assert_eq!(store.allocate(2).unwrap(), Bounds::new(3, 4));
    }

    #[test]
    fn test_allocate_first_fit_not_best_fit() {
        let mut store = Store::new(10);
        // runs: [0..=2] of three, [4..=5] of two
        occupy(&mut store, &[3, 6, 7, 8, 9]);
        assert_eq!(store.allocate(2).unwrap(), Bounds::new(0, 1));
    }

    #[test]
    fn test_allocate_exact_tail() {
        let mut store = Store::new(5);
        occupy(&mut store, &[0, 1]);
        assert_eq!(store.allocate(3).unwrap(), Bounds::new(2, 4));
    }

    #[test]
    fn test_allocate_past_end_is_capacity_exceeded() {
        let mut store = Store::new(5);
        occupy(&mut store, &[0, 1, 2]);
        let err = store.allocate(3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    }

    #[test]
    fn test_allocate_larger_than_store() {
        let store = Store::new(10);
        let err = store.allocate(11).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    }

    #[test]
    fn test_allocate_full_store() {
        let mut store = Store::new(3);
        occupy(&mut store, &[0, 1, 2]);
        let err = store.allocate(1).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StoreFull);
    }

    #[test]
    fn test_allocate_zero_size() {
        let store = Store::new(3);
        let err = store.allocate(0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidAllocationSize);
    }

    #[test]
    fn test_allocate_huge_size_does_not_overflow() {
        let store = Store::new(3);
        let err = store.allocate(usize::MAX).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    }

    #[test]
    fn test_zero_capacity_store_is_full() {
        let store = Store::new(0);
        assert_eq!(store.allocate(1).unwrap_err().kind, ErrorKind::StoreFull);
    }

    #[test]
    fn test_initialize_and_read() {
        let mut store = Store::new(4);
        store.initialize(Bounds::new(1, 2), Cell::zero(Keyword::Bool));
        assert_eq!(store.read(1).unwrap(), Value::Bool(false));
        assert_eq!(store.read(2).unwrap(), Value::Bool(false));
        assert_eq!(store.read(0).unwrap_err().kind, ErrorKind::UninitializedRead);
    }

    #[test]
    fn test_read_outside_store() {
        let store = Store::new(2);
        assert_eq!(store.read(2).unwrap_err().kind, ErrorKind::OutOfBounds);
    }

    #[test]
    fn test_write_type_preserving() {
        let mut store = Store::new(2);
        store.initialize(Bounds::new(0, 0), Cell::zero(Keyword::Num));
        store.write(0, &Value::Num(3.0)).unwrap();
        assert_eq!(store.read(0).unwrap(), Value::Num(3.0));

        let err = store.write(0, &Value::Bool(true)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert_eq!(store.read(0).unwrap(), Value::Num(3.0));
    }

    #[test]
    fn test_write_rejects_non_scalar() {
        let mut store = Store::new(1);
        store.initialize(Bounds::new(0, 0), Cell::zero(Keyword::Num));
        let err = store.write(0, &Value::Keyword(Keyword::Num)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_write_uninitialized() {
        let mut store = Store::new(1);
        let err = store.write(0, &Value::Num(1.0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UninitializedWrite);
    }

    #[test]
    fn test_bounds_size_and_contains() {
        let b = Bounds::new(2, 4);
        assert_eq!(b.size(), 3);
        assert!(b.contains(2) && b.contains(4));
        assert!(!b.contains(1) && !b.contains(5));
    }

    #[test]
    fn test_store_display() {
        let mut store = Store::new(3);
        store.initialize(Bounds::new(1, 1), Cell::Bool(true));
        assert_eq!(store.to_string(), "0: uninitialized\n1: true\n2: uninitialized");
    }
}
