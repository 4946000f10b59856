//! Pure mapping from outcomes to display severity bands.
//!
//! The board visualizer and the quick-stats strip must color outcomes
//! identically, so both go through these two total functions. Thresholds
//! are fixed constants; they are never derived from observed data.

use serde::{Deserialize, Serialize};

use crate::constants::{
    RATIO_BIG_MIN, RATIO_EVEN_MIN, RATIO_MEDIUM_MIN, SEVERITY_BIG_MIN, SEVERITY_EVEN_MIN,
    SEVERITY_MEDIUM_MIN,
};

/// Ordered visual severity of an outcome, loss through jackpot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Loss,
    Even,
    Medium,
    Big,
    Jackpot,
}

impl Severity {
    /// Stable identifier usable as a style class suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loss => "loss",
            Self::Even => "even",
            Self::Medium => "medium",
            Self::Big => "big",
            Self::Jackpot => "jackpot",
        }
    }
}

/// Band for an absolute multiplier, given the row's maximum.
///
/// A hit at or above the row maximum is the jackpot band regardless of
/// its absolute value; the remaining cut points are the fixed 1x/2x/10x
/// thresholds used across the dashboard.
#[must_use]
pub fn severity_of_multiplier(multiplier: f64, row_max: f64) -> Severity {
    if row_max > 0.0 && multiplier >= row_max {
        Severity::Jackpot
    } else if multiplier >= SEVERITY_BIG_MIN {
        Severity::Big
    } else if multiplier >= SEVERITY_MEDIUM_MIN {
        Severity::Medium
    } else if multiplier >= SEVERITY_EVEN_MIN {
        Severity::Even
    } else {
        Severity::Loss
    }
}

/// Band for a relative height ratio in `[0, 1]` (multiplier / row max).
///
/// NaN maps to the loss band; nothing in the render path panics on bad
/// data.
#[must_use]
pub fn severity_of_ratio(ratio: f64) -> Severity {
    if ratio.is_nan() {
        return Severity::Loss;
    }
    if ratio >= 1.0 {
        Severity::Jackpot
    } else if ratio >= RATIO_BIG_MIN {
        Severity::Big
    } else if ratio >= RATIO_MEDIUM_MIN {
        Severity::Medium
    } else if ratio >= RATIO_EVEN_MIN {
        Severity::Even
    } else {
        Severity::Loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_bands_cover_the_line() {
        assert_eq!(severity_of_multiplier(0.4, 13.0), Severity::Loss);
        assert_eq!(severity_of_multiplier(1.0, 13.0), Severity::Even);
        assert_eq!(severity_of_multiplier(3.0, 13.0), Severity::Medium);
        assert_eq!(severity_of_multiplier(10.0, 13.0), Severity::Big);
        assert_eq!(severity_of_multiplier(13.0, 13.0), Severity::Jackpot);
        // Above-max still reads as jackpot.
        assert_eq!(severity_of_multiplier(29.0, 13.0), Severity::Jackpot);
    }

    #[test]
    fn jackpot_is_relative_to_the_row_maximum() {
        // 5.6 is the whole table's peak on a low-risk 8-row board.
        assert_eq!(severity_of_multiplier(5.6, 5.6), Severity::Jackpot);
        // The same value on a high-risk board is merely a medium win.
        assert_eq!(severity_of_multiplier(5.6, 29.0), Severity::Medium);
    }

    #[test]
    fn ratio_bands_are_total() {
        assert_eq!(severity_of_ratio(0.0), Severity::Loss);
        assert_eq!(severity_of_ratio(0.05), Severity::Even);
        assert_eq!(severity_of_ratio(0.2), Severity::Medium);
        assert_eq!(severity_of_ratio(0.5), Severity::Big);
        assert_eq!(severity_of_ratio(1.0), Severity::Jackpot);
        assert_eq!(severity_of_ratio(f64::NAN), Severity::Loss);
        assert_eq!(severity_of_ratio(f64::INFINITY), Severity::Jackpot);
    }

    #[test]
    fn bands_order_from_loss_to_jackpot() {
        assert!(Severity::Loss < Severity::Even);
        assert!(Severity::Even < Severity::Medium);
        assert!(Severity::Medium < Severity::Big);
        assert!(Severity::Big < Severity::Jackpot);
    }
}
