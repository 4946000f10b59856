//! One player's simulation session.
//!
//! The session ties together selection state, the drop simulator, the
//! ledger, and the seeded bit stream, and applies fold + record in the
//! same tick as the drop that produced them. Everything user-visible
//! (board depth, risk, wager, mode) lives here as one explicit state
//! object, independent of any rendering framework.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{AUTOPLAY_INTERVAL_MS, MAX_ROWS, MIN_ROWS, REVEAL_STEP_DELAY_MS};
use crate::ledger::{SessionLedger, SessionStats};
use crate::payout::{PayoutCatalog, RiskLevel, catalog};
use crate::rng::SessionRng;
use crate::scheduler::{Repeat, Scheduler, TaskHandle};
use crate::simulator::{DropError, DropEvent, DropSimulator, FlightPhase};

/// How drops are being initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    #[default]
    Manual,
    Auto,
}

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Board selection cannot change while a ball is in flight.
    #[error("selection is locked while a ball is in flight")]
    SelectionLocked,
    /// Requested row count is outside the board's supported range.
    #[error("row count {0} outside supported range ({MIN_ROWS}..={MAX_ROWS})")]
    RowsUnsupported(u8),
    #[error(transparent)]
    Drop(#[from] DropError),
}

/// Live state for one simulation session.
pub struct PlinkoSession {
    catalog: &'static PayoutCatalog,
    simulator: DropSimulator,
    ledger: SessionLedger,
    rng: SessionRng,
    rows: u8,
    risk: RiskLevel,
    wager: f64,
    mode: PlayMode,
    autoplay: Option<TaskHandle>,
}

impl PlinkoSession {
    /// Create a session over the embedded payout catalog.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            catalog: catalog(),
            simulator: DropSimulator::new(),
            ledger: SessionLedger::new(),
            rng: SessionRng::from_user_seed(seed),
            rows: MIN_ROWS,
            risk: RiskLevel::Medium,
            wager: 1.0,
            mode: PlayMode::Manual,
            autoplay: None,
        }
    }

    #[must_use]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    #[must_use]
    pub const fn risk(&self) -> RiskLevel {
        self.risk
    }

    #[must_use]
    pub const fn wager(&self) -> f64 {
        self.wager
    }

    #[must_use]
    pub const fn mode(&self) -> PlayMode {
        self.mode
    }

    #[must_use]
    pub const fn phase(&self) -> FlightPhase {
        self.simulator.phase()
    }

    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        self.ledger.stats()
    }

    #[must_use]
    pub const fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    /// Multiplier strip for the current selection.
    ///
    /// # Errors
    ///
    /// Propagates payout resolution failures.
    pub fn current_multipliers(&self) -> Result<&[f64], SessionError> {
        let table = self.catalog.resolve(self.risk, self.rows).map_err(DropError::from)?;
        Ok(&table.multipliers)
    }

    /// Change board depth. Locked while a ball is in flight.
    ///
    /// # Errors
    ///
    /// [`SessionError::SelectionLocked`] mid-flight,
    /// [`SessionError::RowsUnsupported`] outside 8..=16.
    pub fn select_rows(&mut self, rows: u8) -> Result<(), SessionError> {
        self.ensure_unlocked()?;
        if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
            return Err(SessionError::RowsUnsupported(rows));
        }
        self.rows = rows;
        Ok(())
    }

    /// Change risk level. Locked while a ball is in flight.
    ///
    /// # Errors
    ///
    /// [`SessionError::SelectionLocked`] mid-flight.
    pub fn select_risk(&mut self, risk: RiskLevel) -> Result<(), SessionError> {
        self.ensure_unlocked()?;
        self.risk = risk;
        Ok(())
    }

    /// Set the per-drop wager. Takes effect from the next drop.
    pub fn set_wager(&mut self, wager: f64) {
        self.wager = wager;
    }

    fn ensure_unlocked(&self) -> Result<(), SessionError> {
        if self.simulator.phase() == FlightPhase::InFlight {
            return Err(SessionError::SelectionLocked);
        }
        Ok(())
    }

    /// Drop one ball and fold it into the ledger in the same tick.
    ///
    /// The returned event is final; the ball stays in flight until
    /// [`Self::finish_reveal`] so the host can pace the visual path.
    ///
    /// # Errors
    ///
    /// Rejected while a ball is already in flight, and on any simulator
    /// failure; a failed drop folds nothing.
    pub fn drop_ball(&mut self, now_ms: u64) -> Result<DropEvent, SessionError> {
        let event = self
            .simulator
            .drop(
                self.rows,
                self.risk,
                self.wager,
                now_ms,
                self.catalog,
                &mut self.rng,
            )?
            .clone();
        self.ledger.apply(event.clone());
        Ok(event)
    }

    /// Per-step reveal delays for the ball currently in flight.
    ///
    /// Purely presentational: the outcome is already folded.
    #[must_use]
    pub fn reveal_delays(&self) -> Vec<u64> {
        match self.simulator.pending() {
            Some(event) => (1..=u64::from(event.rows))
                .map(|step| step * REVEAL_STEP_DELAY_MS)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Complete the reveal, returning the simulator to Idle.
    ///
    /// # Errors
    ///
    /// [`DropError::NotInFlight`] when no ball is in flight.
    pub fn finish_reveal(&mut self) -> Result<DropEvent, SessionError> {
        self.simulator.resolve()?;
        Ok(self
            .simulator
            .acknowledge()
            .expect("resolved ball acknowledges"))
    }

    /// Statistics fast path: `count` complete drops, no reveal pacing,
    /// each folded into the ledger as it settles.
    ///
    /// # Errors
    ///
    /// Rejected mid-flight; a failing drop aborts the batch after the
    /// drops already settled (those stay folded, nothing partial).
    pub fn auto_drop(&mut self, count: u32, now_ms: u64) -> Result<Vec<DropEvent>, SessionError> {
        let events = self.simulator.auto_drop(
            count,
            self.rows,
            self.risk,
            self.wager,
            now_ms,
            self.catalog,
            &mut self.rng,
        )?;
        for event in &events {
            self.ledger.apply(event.clone());
        }
        Ok(events)
    }

    /// Start auto-play on a repeating schedule.
    ///
    /// Any previous auto-play task is cancelled first, so two timers can
    /// never double-drop.
    pub fn start_autoplay<S: Scheduler<Self>>(&mut self, scheduler: &mut S) -> TaskHandle {
        self.stop_autoplay();
        self.mode = PlayMode::Auto;
        let handle = scheduler.schedule_repeating(
            AUTOPLAY_INTERVAL_MS,
            Box::new(|session: &mut Self, now_ms| session.autoplay_tick(now_ms)),
        );
        self.autoplay = Some(handle.clone());
        handle
    }

    /// Stop auto-play, cancelling the scheduled task.
    pub fn stop_autoplay(&mut self) {
        if let Some(handle) = self.autoplay.take() {
            handle.cancel();
        }
        self.mode = PlayMode::Manual;
    }

    fn autoplay_tick(&mut self, now_ms: u64) -> Repeat {
        if self.mode != PlayMode::Auto {
            return Repeat::Done;
        }
        match self.auto_drop(1, now_ms) {
            Ok(_) => Repeat::Again,
            // Configuration failures are fatal to auto-play, not retried.
            Err(_) => {
                self.stop_autoplay();
                Repeat::Done
            }
        }
    }

    /// Reset ledger state; selection and the bit stream survive.
    pub fn reset(&mut self) {
        self.ledger.reset();
    }

    /// Explicit teardown: cancel any scheduled auto-play.
    pub fn teardown(&mut self) {
        self.stop_autoplay();
    }
}

impl Drop for PlinkoSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
