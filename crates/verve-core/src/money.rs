//! # Money Type
//!
//! Integer-cents money representation.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Floating Point Money Is Broken                        │
//! │                                                                         │
//! │  0.1 + 0.2 == 0.30000000000000004   ← float arithmetic                 │
//! │  10 + 20 == 30 (cents)              ← integer arithmetic               │
//! │                                                                         │
//! │  Orders record real charges. A one-cent drift across thousands of      │
//! │  settlements is a reconciliation incident. All amounts in this         │
//! │  workspace are i64 cents, end to end.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// An amount of money in cents (smallest currency unit).
///
/// ## Example
/// ```rust
/// use verve_core::Money;
///
/// let price = Money::from_cents(2599); // $25.99
/// let total = price.multiply_quantity(3);
/// assert_eq!(total.cents(), 7797);
/// assert_eq!(total.to_string(), "77.97");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates money from cents.
    ///
    /// This is THE way to construct money. Never from floats.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates money from major and minor units (e.g., 25 dollars, 99 cents).
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        Money(major * 100 + minor)
    }

    /// Returns the amount in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major-unit part (dollars for USD-style currencies).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit part (0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the amount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the amount is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies by a quantity (for line totals).
    ///
    /// Saturates on overflow: a line total can never wrap negative.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Checked addition, `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    /// Formats as `major.minor` with two decimal places, no currency symbol.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{}.{:02}", -self.major(), self.minor())
        } else {
            write!(f, "{}.{:02}", self.major(), self.minor())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1099);
        assert_eq!(m.cents(), 1099);
        assert_eq!(m.major(), 10);
        assert_eq!(m.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(25, 99).cents(), 2599);
        assert_eq!(Money::from_major_minor(0, 5).cents(), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(234);
        assert_eq!((a + b).cents(), 1234);
        assert_eq!((a - b).cents(), 766);

        let mut c = a;
        c += b;
        assert_eq!(c.cents(), 1234);
    }

    #[test]
    fn test_multiply_quantity() {
        assert_eq!(Money::from_cents(2599).multiply_quantity(3).cents(), 7797);
        assert_eq!(Money::from_cents(100).multiply_quantity(0).cents(), 0);
        // saturates instead of wrapping
        assert_eq!(
            Money::from_cents(i64::MAX).multiply_quantity(2).cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(
            Money::from_cents(1).checked_add(Money::from_cents(2)),
            Some(Money::from_cents(3))
        );
        assert_eq!(
            Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)),
            None
        );
    }
}
