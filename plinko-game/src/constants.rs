//! Centralized tuning constants for the Plinko simulation core.
//!
//! These values define the deterministic math and pacing defaults for the
//! board. Keeping them together ensures that game feel and economics can
//! only be adjusted via code changes reviewed in version control, with the
//! sole exception of the payout tables, which live in a versioned data
//! asset (`assets/data/payouts.json`).

// Board geometry -----------------------------------------------------------
pub(crate) const MIN_ROWS: u8 = 8;
pub(crate) const MAX_ROWS: u8 = 16;

// Session ledger -----------------------------------------------------------
pub(crate) const HISTORY_CAPACITY: usize = 50;

// Pacing (visual only, resolution is synchronous) --------------------------
pub(crate) const REVEAL_STEP_DELAY_MS: u64 = 180;
pub(crate) const AUTOPLAY_INTERVAL_MS: u64 = 600;

// Severity band thresholds (shared by every rendering surface) -------------
pub(crate) const SEVERITY_EVEN_MIN: f64 = 1.0;
pub(crate) const SEVERITY_MEDIUM_MIN: f64 = 2.0;
pub(crate) const SEVERITY_BIG_MIN: f64 = 10.0;
pub(crate) const RATIO_EVEN_MIN: f64 = 0.05;
pub(crate) const RATIO_MEDIUM_MIN: f64 = 0.20;
pub(crate) const RATIO_BIG_MIN: f64 = 0.50;

// Slot display regions -----------------------------------------------------
// Outer 3-of-16 and middle 4-of-16 slot fractions, generalized by row count.
pub(crate) const EDGE_REGION_NUM: usize = 3;
pub(crate) const CENTER_REGION_NUM: usize = 4;
pub(crate) const REGION_DEN: usize = 16;
