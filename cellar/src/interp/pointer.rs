//! Pointers and bounds enforcement
//!
//! A pointer carries its live index and the bounds of the allocation it was
//! born from. The bounds never change; arithmetic only moves the index and
//! every move is validated against both the store range and those bounds.

use super::error::{InterpResult, RuntimeError};
use super::store::Bounds;
use crate::ast::ArithOp;
use std::fmt;

/// Bounds-checked pointer into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    index: usize,
    bounds: Bounds,
}

impl Pointer {
    pub fn new(index: usize, bounds: Bounds) -> Self {
        Pointer { index, bounds }
    }

    /// Pointer to the first cell of a fresh allocation
    pub fn to_start(bounds: Bounds) -> Self {
        Pointer::new(bounds.low, bounds)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn in_bounds(&self) -> bool {
        self.bounds.contains(self.index)
    }

    /// Index to read or write through, provided it is inside the allocation
    pub fn checked_index(&self) -> InterpResult<usize> {
        if self.in_bounds() {
            Ok(self.index)
        } else {
            Err(RuntimeError::out_of_bounds(format!(
                "out of bounds access of pointer at index {} (bounds {} to {})",
                self.index, self.bounds.low, self.bounds.high
            )))
        }
    }

    /// Move the index by `op operand`, keeping the original bounds.
    ///
    /// The result must be an integer inside `[0, capacity - 1]` and inside
    /// the allocation's `[low, high]`. Plain f64 arithmetic applies, so
    /// dividing by zero lands at an infinity and fails the range check.
    pub fn offset(&self, op: ArithOp, operand: f64, capacity: usize) -> InterpResult<Pointer> {
        let raw = op.apply(self.index as f64, operand);
        if raw.is_nan() || (raw.is_finite() && raw.fract() != 0.0) {
            return Err(RuntimeError::non_integer_index(raw));
        }
        if raw < 0.0 || raw + 1.0 > capacity as f64 {
            return Err(RuntimeError::out_of_bounds(format!(
                "'pointer-arith' out of bounds: pointers must hold values between 0 and {} but {raw} was the value after pointer arithmetic",
                capacity.saturating_sub(1)
            )));
        }
        let index = raw as usize;
        if !self.bounds.contains(index) {
            return Err(RuntimeError::out_of_bounds(format!(
                "pointer out of bounds: index {index} is outside its allocation ({} to {})",
                self.bounds.low, self.bounds.high
            )));
        }
        Ok(Pointer::new(index, self.bounds))
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index: {} low-bound: {} up-bound: {}",
            self.index, self.bounds.low, self.bounds.high
        )
    }
}
