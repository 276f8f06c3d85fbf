//! Whole-number percentages and the cap arithmetic built on them
//!
//! A percentage is always stored as an integer 0-100. The division by 100
//! happens at each monetary computation below and nowhere else, so callers
//! never have to guess whether a value is a fraction or a percent.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// An integer percentage in the range 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);
    pub const FULL: Percentage = Percentage(100);

    /// Create a percentage, rejecting values above 100
    pub fn new(value: u8) -> Result<Self, PercentageError> {
        if value > 100 {
            return Err(PercentageError::OutOfRange(value as u32));
        }
        Ok(Self(value))
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `self / 100 × amount`, rounded to the nearest cent (half away from zero)
    pub fn of(&self, amount: Money) -> Money {
        let scaled = amount.cents() as i128 * self.0 as i128;
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        Money::from_cents(rounded as i64)
    }

    /// `self / 100 × amount`, truncated toward zero
    pub fn share_of(&self, amount: Money) -> Money {
        let scaled = amount.cents() as i128 * self.0 as i128;
        Money::from_cents((scaled / 100) as i64)
    }

    /// Whether `spent` stays within `self / 100 × income`
    ///
    /// Compared exactly in hundredths of a cent, so a cap with a fractional
    /// cent is neither rounded up nor down.
    pub fn allows(&self, spent: Money, income: Money) -> bool {
        spent.cents() as i128 * 100 <= income.cents() as i128 * self.0 as i128
    }
}

impl TryFrom<u8> for Percentage {
    type Error = PercentageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}%", self.0))
    }
}

/// Sum of percentages, widened so that totals above 100 are representable
pub fn total_of<I: IntoIterator<Item = Percentage>>(items: I) -> u32 {
    items.into_iter().map(|p| p.0 as u32).sum()
}

/// Error type for percentage construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PercentageError {
    OutOfRange(u32),
}

impl fmt::Display for PercentageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(v) => write!(f, "Percentage must be between 0 and 100 (got {})", v),
        }
    }
}

impl std::error::Error for PercentageError {}
