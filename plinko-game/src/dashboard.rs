//! Passthrough model of the analytics backend's statistics response.
//!
//! The simulation core never computes these aggregates; it deserializes
//! whatever the backend returns and hands it to the rendering layer
//! untouched. Field names mirror the backend's wire format exactly.
//! Fetching is a platform seam: hosts implement [`StatsBackend`] over
//! their HTTP stack, and a failed fetch is a display problem only, never
//! a simulation problem.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Aggregation window accepted by the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Period {
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "6h")]
    SixHours,
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl Period {
    pub const ALL: [Self; 5] = [
        Self::Hour,
        Self::SixHours,
        Self::Day,
        Self::Week,
        Self::Month,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "1h",
            Self::SixHours => "6h",
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request path for the dashboard endpoint, relative to the API base URL.
#[must_use]
pub fn stats_path(game_id: &str, period: Period) -> String {
    format!("/api/v2/{game_id}?period={period}")
}

/// Errors surfaced by a stats backend implementation.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Transport failure reported by the host's HTTP stack. Recovered
    /// locally as a user-visible message; the simulation is unaffected.
    #[error("stats backend unreachable: {0}")]
    Network(String),
    /// The response body was not the expected JSON shape.
    #[error("stats response malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Platform seam for fetching dashboard statistics.
pub trait StatsBackend {
    /// Fetch aggregate statistics for one aggregation window.
    ///
    /// # Errors
    ///
    /// Returns a [`DashboardError`] when the backend is unreachable or
    /// responds with an unexpected payload.
    fn fetch_statistics(&self, period: Period) -> Result<PlinkoStatistics, DashboardError>;
}

/// Statistics for a single bottom slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotStats {
    pub slot_id: u32,
    pub multiplier: f64,
    pub hit_count: u64,
    pub percentage: f64,
    #[serde(default)]
    pub theoretical_percentage: f64,
    #[serde(default)]
    pub deviation: f64,
}

/// Slot distribution analysis for one risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDistribution {
    pub total_drops: u64,
    pub risk_level: String,
    pub slots: Vec<SlotStats>,
    pub most_hit_slot: u32,
    #[serde(default)]
    pub least_hit_slot: u32,
    pub avg_multiplier: f64,
    pub edge_rate: f64,
    pub center_rate: f64,
    pub jackpot_rate: f64,
}

/// Comparison entry across risk levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskComparison {
    pub risk_level: String,
    #[serde(default)]
    pub total_drops: u64,
    pub avg_multiplier: f64,
    #[serde(default)]
    pub median_multiplier: f64,
    pub std_deviation: f64,
    pub rtp_actual: f64,
    #[serde(default)]
    pub rtp_theoretical: f64,
    pub loss_rate: f64,
    pub small_win_rate: f64,
    pub medium_win_rate: f64,
    pub big_win_rate: f64,
    #[serde(default)]
    pub jackpot_rate: f64,
    pub max_multiplier: f64,
}

/// Per-slot theoretical-versus-actual comparison row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotComparison {
    pub slot: u32,
    #[serde(default)]
    pub observed: u64,
    #[serde(default)]
    pub expected: f64,
    #[serde(default)]
    pub actual_pct: f64,
    #[serde(default)]
    pub theoretical_pct: f64,
    pub deviation: f64,
}

/// Fairness analysis for one risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    pub risk_level: String,
    pub is_fair: bool,
    pub chi_square_score: f64,
    pub deviation_score: f64,
    pub slot_comparisons: Vec<SlotComparison>,
    pub overperforming_slots: Vec<u32>,
    pub underperforming_slots: Vec<u32>,
}

/// Jackpot occurrence tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JackpotTracker {
    pub total_jackpots: u64,
    #[serde(default)]
    pub last_jackpot_time: Option<String>,
    pub drops_since_jackpot: u64,
    #[serde(default)]
    pub average_drops_between: Option<f64>,
    pub jackpot_probability: f64,
    #[serde(default)]
    pub current_drought: bool,
}

/// Complete statistics payload from the dashboard endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlinkoStatistics {
    #[serde(default)]
    pub game: String,
    pub period: Period,
    #[serde(default)]
    pub generated_at: Option<String>,
    pub slot_distributions: HashMap<String, SlotDistribution>,
    pub risk_comparisons: Vec<RiskComparison>,
    pub fairness_analysis: HashMap<String, FairnessReport>,
    pub jackpot_tracker: JackpotTracker,
    pub total_drops: u64,
    pub overall_avg_multiplier: f64,
    pub overall_rtp: f64,
}
