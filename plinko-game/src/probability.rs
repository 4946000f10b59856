//! Binomial landing model for the peg lattice.
//!
//! A ball that makes `rows` independent fair left/right choices terminates
//! in slot `k` with probability C(rows, k) / 2^rows. The coefficient is
//! built with the running product `coeff *= (rows - i) / (i + 1)` so every
//! intermediate value stays bounded through at least 16 rows; raw
//! factorials would overflow long before that.

use serde::{Deserialize, Serialize};

use crate::constants::{CENTER_REGION_NUM, EDGE_REGION_NUM, REGION_DEN};
use crate::numbers::usize_to_f64;

/// Probability of terminating in each of the `rows + 1` bottom slots.
#[must_use]
pub fn distribution(rows: u8) -> Vec<f64> {
    (0..=rows).map(|k| probability_of_slot(rows, k)).collect()
}

/// Probability of terminating in slot `k` for the given row count.
///
/// Agrees exactly with `distribution(rows)[k]`; both run the same
/// recurrence. Out-of-range slots have probability zero.
#[must_use]
pub fn probability_of_slot(rows: u8, k: u8) -> f64 {
    if k > rows {
        return 0.0;
    }
    let half = 0.5f64.powi(i32::from(rows));
    let mut coeff = 1.0;
    for i in 0..usize::from(k) {
        coeff *= usize_to_f64(usize::from(rows) - i) / usize_to_f64(i + 1);
    }
    coeff * half
}

/// Display band for a bottom slot, derived from its distance from center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRegion {
    /// Rare outer slots carrying the top multipliers.
    Edge,
    /// The band between edge and center.
    Shoulder,
    /// High-frequency slots around the middle of the board.
    Center,
}

/// Classify a slot into its display region.
///
/// Region widths follow the dashboard's 16-slot convention (outer three
/// slots per side are "edge", middle four are "center"), scaled to the
/// actual slot count so every row count classifies consistently.
#[must_use]
pub fn region_of_slot(rows: u8, k: u8) -> SlotRegion {
    let slots = usize::from(rows) + 1;
    // Integer rounding keeps band boundaries exact for every row count.
    let edge_width = ((slots * EDGE_REGION_NUM + REGION_DEN / 2) / REGION_DEN).max(1);
    let center_width = ((slots * CENTER_REGION_NUM + REGION_DEN / 2) / REGION_DEN).max(1);
    let position = usize::from(k);
    if position < edge_width || position + edge_width > slots - 1 {
        return SlotRegion::Edge;
    }
    // Center test in half-slot units: |k - rows/2| <= center_width/2.
    if (2 * usize::from(k)).abs_diff(usize::from(rows)) <= center_width {
        SlotRegion::Center
    } else {
        SlotRegion::Shoulder
    }
}
