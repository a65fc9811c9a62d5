//! Fixed-point helpers.
//!
//! Helpers round toward zero unless named otherwise. Intermediate products are evaluated
//! in 256 bits.

use crate::ecosystem::Balance;
use sp_arithmetic::{helpers_128bit::multiply_by_rational_with_rounding, Rounding};

/// `a * b / c` rounded down. Returns zero when `c` is zero and saturates on overflow.
pub fn mul_div_floor(a: Balance, b: Balance, c: Balance) -> Balance {
  if c == 0 {
    return 0;
  }
  multiply_by_rational_with_rounding(a, b, c, Rounding::Down).unwrap_or(Balance::MAX)
}

/// `a * b / c` rounded up. Same zero and overflow handling as [`mul_div_floor`].
pub fn mul_div_ceil(a: Balance, b: Balance, c: Balance) -> Balance {
  if c == 0 {
    return 0;
  }
  multiply_by_rational_with_rounding(a, b, c, Rounding::Up).unwrap_or(Balance::MAX)
}
