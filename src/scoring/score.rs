//! Score value type
//!
//! Scores are not fractions. A score of 5/10 is not the same as 1/2, and
//! adding two scores sums both components: `1/2 + 1/2 = 2/4`.

use std::fmt;
use std::ops::Add;

use crate::common::{Error, Result};

/// An accumulated `value` out of a `maximum`, with `0 <= value <= maximum`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    value: f64,
    maximum: f64,
}

impl Score {
    /// Create a score, rejecting negative values and values above the maximum
    pub fn new(value: f64, maximum: f64) -> Result<Self> {
        // Written so that NaN fails both comparisons
        if !(0.0 <= value && value <= maximum) {
            return Err(Error::invalid_score(value, maximum));
        }
        Ok(Self { value, maximum })
    }

    /// The empty score `0/0`
    pub fn zero() -> Self {
        Self {
            value: 0.0,
            maximum: 0.0,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Rescale to a new maximum, keeping the ratio `value / maximum`
    pub fn rescale(&self, maximum: f64) -> Result<Self> {
        if self.maximum == 0.0 {
            return Err(Error::DivisionByZero);
        }
        Self::new(self.value / self.maximum * maximum, maximum)
    }

    /// Same maximum, value dropped to zero
    pub fn zeroed(&self) -> Self {
        Self {
            value: 0.0,
            maximum: self.maximum,
        }
    }

    pub fn is_max_score(&self) -> bool {
        self.value == self.maximum
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Score {
    type Output = Score;

    /// `a/b + c/d = (a+c)/(b+d)`
    fn add(self, other: Score) -> Score {
        Score {
            value: self.value + other.value,
            maximum: self.maximum + other.maximum,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.maximum)
    }
}
