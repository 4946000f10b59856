//! Drop simulator: one ball at a time through the peg lattice.
//!
//! The statistical outcome of a drop is computed synchronously at call
//! time; the Idle → InFlight → Resolved cycle only paces the user-visible
//! reveal. A second `drop` while a ball is in flight is rejected, not
//! queued, mirroring a physical board.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_ROWS;
use crate::path::{Direction, Path, PathStep, rights_in};
use crate::payout::{PayoutCatalog, PayoutError, RiskLevel};
use crate::rng::BitSource;

/// Lifecycle of the single ball a simulator instance manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlightPhase {
    #[default]
    Idle,
    InFlight,
    Resolved,
}

/// Errors raised while simulating a drop.
#[derive(Debug, Error)]
pub enum DropError {
    /// A ball is already in flight; the caller must wait for it to settle.
    #[error("a ball is already in flight")]
    BallInFlight,
    /// `resolve` was called with no ball in flight.
    #[error("no ball in flight to resolve")]
    NotInFlight,
    /// Row count outside what the lattice supports.
    #[error("row count {0} outside supported range (1..={MAX_ROWS})")]
    RowsOutOfRange(u8),
    /// Wager must be a positive, finite amount.
    #[error("wager {0} is not a positive finite amount")]
    InvalidWager(f64),
    #[error(transparent)]
    Payout(#[from] PayoutError),
    /// The resolved payout table does not cover this board's slots. This
    /// is a corrupt or mismatched table and must abort the drop; it is
    /// never clamped or defaulted.
    #[error(
        "payout table for {risk} resolved {resolved} multipliers for a board with {expected} slots"
    )]
    SlotMismatch {
        risk: RiskLevel,
        resolved: usize,
        expected: usize,
    },
}

/// Immutable record of one settled drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEvent {
    /// Terminal slot index in `0..=rows`, equal to the count of Right steps.
    pub slot: u8,
    pub rows: u8,
    pub risk: RiskLevel,
    pub multiplier: f64,
    pub wager: f64,
    /// `wager * multiplier - wager`.
    pub profit: f64,
    /// Host-supplied wall-clock milliseconds at drop time.
    pub at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
}

impl DropEvent {
    /// Amount returned to the player for this drop.
    #[must_use]
    pub fn payout(&self) -> f64 {
        self.wager * self.multiplier
    }
}

/// State machine driving individual ball drops.
#[derive(Debug, Default)]
pub struct DropSimulator {
    phase: FlightPhase,
    pending: Option<DropEvent>,
}

impl DropSimulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// The event computed for the ball currently in flight or resolved.
    #[must_use]
    pub const fn pending(&self) -> Option<&DropEvent> {
        self.pending.as_ref()
    }

    /// Simulate one drop and put the ball in flight.
    ///
    /// Draws exactly `rows` independent bits from `bits`; the terminal
    /// slot is the count of Right draws, which reproduces the binomial
    /// landing model exactly. The returned event is already final; only
    /// the reveal remains.
    ///
    /// # Errors
    ///
    /// Rejects reentrant calls with [`DropError::BallInFlight`], invalid
    /// inputs, payout resolution failures, and slot-count mismatches.
    pub fn drop(
        &mut self,
        rows: u8,
        risk: RiskLevel,
        wager: f64,
        at_ms: u64,
        catalog: &PayoutCatalog,
        bits: &mut dyn BitSource,
    ) -> Result<&DropEvent, DropError> {
        if self.phase != FlightPhase::Idle {
            return Err(DropError::BallInFlight);
        }
        let event = simulate_drop(rows, risk, wager, at_ms, catalog, bits)?;
        self.phase = FlightPhase::InFlight;
        Ok(self.pending.insert(event))
    }

    /// Mark the in-flight ball's reveal as finished.
    ///
    /// # Errors
    ///
    /// Returns [`DropError::NotInFlight`] when no ball is in flight.
    pub fn resolve(&mut self) -> Result<&DropEvent, DropError> {
        if self.phase != FlightPhase::InFlight {
            return Err(DropError::NotInFlight);
        }
        self.phase = FlightPhase::Resolved;
        Ok(self.pending.as_ref().expect("in-flight ball has an event"))
    }

    /// Acknowledge the resolved drop, returning the simulator to Idle.
    pub fn acknowledge(&mut self) -> Option<DropEvent> {
        if self.phase != FlightPhase::Resolved {
            return None;
        }
        self.phase = FlightPhase::Idle;
        self.pending.take()
    }

    /// Run `count` complete drops without reveal pacing.
    ///
    /// This is the statistics fast path used by auto-play: each drop still
    /// draws `rows` independent bits, it only skips the animation cycle.
    ///
    /// # Errors
    ///
    /// Rejected while a ball is in flight; individual drop failures abort
    /// the batch with no partial event emitted for the failing drop.
    pub fn auto_drop(
        &mut self,
        count: u32,
        rows: u8,
        risk: RiskLevel,
        wager: f64,
        at_ms: u64,
        catalog: &PayoutCatalog,
        bits: &mut dyn BitSource,
    ) -> Result<Vec<DropEvent>, DropError> {
        if self.phase != FlightPhase::Idle {
            return Err(DropError::BallInFlight);
        }
        let mut events = Vec::with_capacity(count as usize);
        for _ in 0..count {
            events.push(simulate_drop(rows, risk, wager, at_ms, catalog, bits)?);
        }
        Ok(events)
    }
}

/// Pure drop resolution shared by the paced and fast paths.
fn simulate_drop(
    rows: u8,
    risk: RiskLevel,
    wager: f64,
    at_ms: u64,
    catalog: &PayoutCatalog,
    bits: &mut dyn BitSource,
) -> Result<DropEvent, DropError> {
    if rows == 0 || rows > MAX_ROWS {
        return Err(DropError::RowsOutOfRange(rows));
    }
    if !wager.is_finite() || wager <= 0.0 {
        return Err(DropError::InvalidWager(wager));
    }

    let mut path = Path::new();
    for row in 0..rows {
        path.push(PathStep {
            row,
            direction: Direction::from_bit(bits.next_bit()),
        });
    }
    let slot = rights_in(&path);

    let table = catalog.resolve(risk, rows)?;
    let expected = usize::from(rows) + 1;
    if table.multipliers.len() != expected {
        return Err(DropError::SlotMismatch {
            risk,
            resolved: table.multipliers.len(),
            expected,
        });
    }
    let multiplier = table.multipliers[usize::from(slot)];

    Ok(DropEvent {
        slot,
        rows,
        risk,
        multiplier,
        wager,
        profit: wager * multiplier - wager,
        at_ms,
        path: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payout::{PayoutTable, catalog};
    use crate::rng::{ScriptedBits, SessionRng};

    fn bits_for(pattern: &[bool]) -> ScriptedBits {
        ScriptedBits::new(pattern.to_vec())
    }

    #[test]
    fn three_rights_out_of_eight_land_slot_three() {
        let mut sim = DropSimulator::new();
        let mut bits = bits_for(&[true, true, true, false, false, false, false, false]);
        let event = sim
            .drop(8, RiskLevel::Medium, 1.0, 0, catalog(), &mut bits)
            .unwrap();
        assert_eq!(event.slot, 3);
        assert!((event.multiplier - 0.7).abs() < f64::EPSILON);
        assert!((event.profit - (-0.3)).abs() < 1e-12);
    }

    #[test]
    fn slot_equals_right_count_and_stays_in_range() {
        let mut rng = SessionRng::from_user_seed(99);
        let mut sim = DropSimulator::new();
        for _ in 0..200 {
            let event = sim
                .drop(12, RiskLevel::Low, 1.0, 0, catalog(), &mut rng)
                .unwrap();
            assert!(event.slot <= event.rows);
            let path = event.path.clone().unwrap();
            assert_eq!(path.len(), 12);
            assert_eq!(rights_in(&path), event.slot);
            sim.resolve().unwrap();
            sim.acknowledge().unwrap();
        }
        assert_eq!(rng.draws(), 200 * 12);
    }

    #[test]
    fn reentrant_drop_is_rejected_not_queued() {
        let mut sim = DropSimulator::new();
        let mut bits = bits_for(&[false; 16]);
        sim.drop(8, RiskLevel::Low, 1.0, 0, catalog(), &mut bits)
            .unwrap();
        let err = sim
            .drop(8, RiskLevel::Low, 1.0, 0, catalog(), &mut bits)
            .unwrap_err();
        assert!(matches!(err, DropError::BallInFlight));
        // The in-flight ball is untouched by the rejected call.
        assert_eq!(sim.phase(), FlightPhase::InFlight);
        assert_eq!(sim.pending().unwrap().slot, 0);
    }

    #[test]
    fn lifecycle_walks_idle_inflight_resolved_idle() {
        let mut sim = DropSimulator::new();
        assert_eq!(sim.phase(), FlightPhase::Idle);
        assert!(sim.acknowledge().is_none());
        assert!(matches!(sim.resolve(), Err(DropError::NotInFlight)));

        let mut bits = bits_for(&[true; 8]);
        sim.drop(8, RiskLevel::High, 2.0, 7, catalog(), &mut bits)
            .unwrap();
        assert_eq!(sim.phase(), FlightPhase::InFlight);
        sim.resolve().unwrap();
        assert_eq!(sim.phase(), FlightPhase::Resolved);
        let event = sim.acknowledge().unwrap();
        assert_eq!(sim.phase(), FlightPhase::Idle);
        assert_eq!(event.slot, 8);
        assert_eq!(event.at_ms, 7);
        assert!((event.payout() - 2.0 * 29.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fixed_bit_sequence_reproduces_the_drop() {
        let script = [true, false, false, true, true, false, true, false];
        let run = |bits: &[bool]| {
            let mut sim = DropSimulator::new();
            let mut bits = bits_for(bits);
            let event = sim
                .drop(8, RiskLevel::Medium, 1.5, 42, catalog(), &mut bits)
                .unwrap()
                .clone();
            event
        };
        assert_eq!(run(&script), run(&script));
    }

    #[test]
    fn auto_drop_draws_full_entropy_per_drop() {
        let mut sim = DropSimulator::new();
        let mut rng = SessionRng::from_user_seed(5);
        let events = sim
            .auto_drop(25, 16, RiskLevel::High, 0.5, 0, catalog(), &mut rng)
            .unwrap();
        assert_eq!(events.len(), 25);
        assert_eq!(rng.draws(), 25 * 16);
        assert_eq!(sim.phase(), FlightPhase::Idle);
    }

    #[test]
    fn mismatched_table_aborts_the_drop() {
        // A sparse catalog resolves 10 rows to the 8-row table, which
        // cannot cover an 11-slot board.
        let catalog = PayoutCatalog {
            version: 1,
            tables: vec![PayoutTable {
                risk: RiskLevel::Medium,
                rows: 8,
                multipliers: vec![1.0; 9],
            }],
        };
        let mut sim = DropSimulator::new();
        let mut bits = bits_for(&[false; 10]);
        let err = sim
            .drop(10, RiskLevel::Medium, 1.0, 0, &catalog, &mut bits)
            .unwrap_err();
        assert!(matches!(
            err,
            DropError::SlotMismatch {
                resolved: 9,
                expected: 11,
                ..
            }
        ));
        assert_eq!(sim.phase(), FlightPhase::Idle);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let mut sim = DropSimulator::new();
        let mut bits = bits_for(&[false; 32]);
        assert!(matches!(
            sim.drop(0, RiskLevel::Low, 1.0, 0, catalog(), &mut bits),
            Err(DropError::RowsOutOfRange(0))
        ));
        assert!(matches!(
            sim.drop(17, RiskLevel::Low, 1.0, 0, catalog(), &mut bits),
            Err(DropError::RowsOutOfRange(17))
        ));
        assert!(matches!(
            sim.drop(8, RiskLevel::Low, 0.0, 0, catalog(), &mut bits),
            Err(DropError::InvalidWager(_))
        ));
        assert!(matches!(
            sim.drop(8, RiskLevel::Low, f64::NAN, 0, catalog(), &mut bits),
            Err(DropError::InvalidWager(_))
        ));
    }

    #[test]
    fn missing_risk_surfaces_as_configuration_error() {
        let catalog = PayoutCatalog {
            version: 1,
            tables: vec![PayoutTable {
                risk: RiskLevel::Low,
                rows: 8,
                multipliers: vec![1.0; 9],
            }],
        };
        let mut sim = DropSimulator::new();
        let mut bits = bits_for(&[false; 8]);
        let err = sim
            .drop(8, RiskLevel::High, 1.0, 0, &catalog, &mut bits)
            .unwrap_err();
        assert!(matches!(
            err,
            DropError::Payout(PayoutError::MissingRisk(RiskLevel::High))
        ));
    }
}
