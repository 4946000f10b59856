//! Payout tables keyed by risk level and row count.
//!
//! The multiplier arrays are game economics and live in a versioned data
//! asset rather than code; changing them is a compatibility-sensitive
//! change. The catalog is loaded once, validated, and never mutated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_PAYOUT_DATA: &str = include_str!("../assets/data/payouts.json");

/// Named payout-table variant trading win frequency for payout variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Stable identifier matching the analytics backend's risk keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while loading or resolving payout tables.
#[derive(Debug, Error)]
pub enum PayoutError {
    /// The embedded payout asset failed to parse.
    #[error("payout data parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A table in the asset is structurally invalid.
    #[error("invalid payout table for {risk} at {rows} rows: {reason}")]
    InvalidTable {
        risk: RiskLevel,
        rows: u8,
        reason: String,
    },
    /// A risk level has no tables at all. This is a deployment defect,
    /// not a runtime condition.
    #[error("no payout tables configured for risk level {0}")]
    MissingRisk(RiskLevel),
}

/// One configured multiplier row in the payout asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutTable {
    pub risk: RiskLevel,
    pub rows: u8,
    pub multipliers: Vec<f64>,
}

/// Immutable collection of every configured payout table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutCatalog {
    #[serde(default)]
    pub version: u32,
    pub tables: Vec<PayoutTable>,
}

impl PayoutCatalog {
    /// Parse and validate a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or a table fails
    /// structural validation.
    pub fn from_json(json: &str) -> Result<Self, PayoutError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), PayoutError> {
        for table in &self.tables {
            let expected = usize::from(table.rows) + 1;
            if table.multipliers.len() != expected {
                return Err(PayoutError::InvalidTable {
                    risk: table.risk,
                    rows: table.rows,
                    reason: format!(
                        "expected {expected} multipliers, found {}",
                        table.multipliers.len()
                    ),
                });
            }
            if table.multipliers.iter().any(|m| !m.is_finite() || *m < 0.0) {
                return Err(PayoutError::InvalidTable {
                    risk: table.risk,
                    rows: table.rows,
                    reason: "multipliers must be finite and non-negative".to_string(),
                });
            }
        }
        for risk in RiskLevel::ALL {
            if !self.tables.iter().any(|t| t.risk == risk) {
                return Err(PayoutError::MissingRisk(risk));
            }
        }
        Ok(())
    }

    /// Resolve the multiplier table for a risk level and row count.
    ///
    /// Exact matches win; otherwise the table whose configured row count is
    /// numerically closest is used. When two candidates are equidistant the
    /// smaller row count wins, so resolution never depends on asset order.
    ///
    /// # Errors
    ///
    /// Returns [`PayoutError::MissingRisk`] when the risk level has no
    /// configured tables.
    pub fn resolve(&self, risk: RiskLevel, rows: u8) -> Result<&PayoutTable, PayoutError> {
        let mut best: Option<&PayoutTable> = None;
        for table in self.tables.iter().filter(|t| t.risk == risk) {
            match best {
                None => best = Some(table),
                Some(current) => {
                    let candidate = row_distance(table.rows, rows);
                    let incumbent = row_distance(current.rows, rows);
                    if candidate < incumbent
                        || (candidate == incumbent && table.rows < current.rows)
                    {
                        best = Some(table);
                    }
                }
            }
        }
        best.ok_or(PayoutError::MissingRisk(risk))
    }

    /// Highest multiplier configured for a risk level at a row count.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures from [`Self::resolve`].
    pub fn max_multiplier(&self, risk: RiskLevel, rows: u8) -> Result<f64, PayoutError> {
        let table = self.resolve(risk, rows)?;
        Ok(table.multipliers.iter().copied().fold(0.0, f64::max))
    }
}

const fn row_distance(candidate: u8, requested: u8) -> u8 {
    candidate.abs_diff(requested)
}

/// Process-wide payout catalog loaded from the embedded asset.
///
/// # Panics
///
/// Panics if the embedded asset is malformed, which is a build defect
/// caught by the tests below rather than a runtime condition.
#[must_use]
pub fn catalog() -> &'static PayoutCatalog {
    static CATALOG: OnceLock<PayoutCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        PayoutCatalog::from_json(DEFAULT_PAYOUT_DATA).expect("embedded payout asset is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses_and_validates() {
        let catalog = catalog();
        assert!(catalog.version >= 1);
        for risk in RiskLevel::ALL {
            let table = catalog.resolve(risk, 8).unwrap();
            assert_eq!(table.multipliers.len(), 9);
        }
    }

    #[test]
    fn every_board_row_count_has_an_exact_table() {
        for risk in RiskLevel::ALL {
            for rows in 8..=16u8 {
                let table = catalog().resolve(risk, rows).unwrap();
                assert_eq!(table.rows, rows);
                assert_eq!(table.multipliers.len(), usize::from(rows) + 1);
            }
        }
    }

    fn sparse_catalog() -> PayoutCatalog {
        // Tables at 8, 12 and 16 rows only, to exercise fallback.
        let tables = [8u8, 12, 16]
            .into_iter()
            .flat_map(|rows| {
                RiskLevel::ALL.map(|risk| PayoutTable {
                    risk,
                    rows,
                    multipliers: vec![1.0; usize::from(rows) + 1],
                })
            })
            .collect();
        PayoutCatalog { version: 1, tables }
    }

    #[test]
    fn unlisted_rows_fall_back_to_nearest() {
        let catalog = sparse_catalog();
        assert_eq!(catalog.resolve(RiskLevel::High, 15).unwrap().rows, 16);
        assert_eq!(catalog.resolve(RiskLevel::High, 9).unwrap().rows, 8);
        assert_eq!(catalog.resolve(RiskLevel::Low, 11).unwrap().rows, 12);
    }

    #[test]
    fn equidistant_rows_prefer_smaller() {
        let catalog = sparse_catalog();
        // 10 sits exactly between the configured 8 and 12.
        assert_eq!(catalog.resolve(RiskLevel::Medium, 10).unwrap().rows, 8);
        // 14 sits exactly between 12 and 16.
        assert_eq!(catalog.resolve(RiskLevel::Low, 14).unwrap().rows, 12);
    }

    #[test]
    fn missing_risk_is_rejected_at_load() {
        let json = r#"{"version":1,"tables":[
            {"risk":"low","rows":8,"multipliers":[1,1,1,1,1,1,1,1,1]}
        ]}"#;
        let err = PayoutCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, PayoutError::MissingRisk(RiskLevel::Medium)));
    }

    #[test]
    fn length_mismatch_is_rejected_at_load() {
        let json = r#"{"version":1,"tables":[
            {"risk":"low","rows":8,"multipliers":[1,2,3]}
        ]}"#;
        let err = PayoutCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, PayoutError::InvalidTable { rows: 8, .. }));
    }

    #[test]
    fn embedded_tables_are_symmetric() {
        for table in &catalog().tables {
            let n = table.multipliers.len();
            for i in 0..n / 2 {
                assert!(
                    (table.multipliers[i] - table.multipliers[n - 1 - i]).abs() < f64::EPSILON,
                    "{} rows={} asymmetric at {i}",
                    table.risk,
                    table.rows
                );
            }
        }
    }

    #[test]
    fn max_multiplier_tracks_table_peak() {
        let max = catalog().max_multiplier(RiskLevel::Medium, 8).unwrap();
        assert!((max - 13.0).abs() < f64::EPSILON);
    }
}
