//! Session statistics ledger and bounded drop history.
//!
//! `SessionStats` running sums are the statistical source of truth; the
//! history buffer only feeds the recent-drops display and its slot hit
//! counts. Both are folded together, atomically per event, by
//! [`SessionLedger::apply`].

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::HISTORY_CAPACITY;
use crate::numbers::usize_to_f64;
use crate::simulator::DropEvent;

/// Aggregate counters for one simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionStats {
    pub total_drops: u64,
    pub total_wagered: f64,
    pub total_profit: f64,
}

impl SessionStats {
    /// Fold one settled drop into the running sums.
    pub fn fold(&mut self, event: &DropEvent) {
        self.total_drops += 1;
        self.total_wagered += event.wager;
        self.total_profit += event.profit;
    }

    /// Realized return-to-player as a percentage.
    ///
    /// Always recomputed from the two running sums rather than averaged
    /// incrementally, so repeated folds cannot drift. `None` until
    /// something has been wagered.
    #[must_use]
    pub fn realized_rtp(&self) -> Option<f64> {
        if self.total_wagered > 0.0 {
            Some((self.total_profit + self.total_wagered) / self.total_wagered * 100.0)
        } else {
            None
        }
    }

    /// Average multiplier realized across the session.
    #[must_use]
    pub fn avg_multiplier(&self) -> Option<f64> {
        self.realized_rtp().map(|rtp| rtp / 100.0)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Most-recent-first bounded buffer of settled drops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryBuffer {
    entries: VecDeque<DropEvent>,
    capacity: usize,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistoryBuffer {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Push a drop to the front, evicting the oldest entry past capacity.
    pub fn record(&mut self, event: DropEvent) {
        self.entries.push_front(event);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent drop first.
    pub fn iter(&self) -> impl Iterator<Item = &DropEvent> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&DropEvent> {
        self.entries.front()
    }

    /// Hit count per slot over the buffered window for a given board depth.
    ///
    /// Drops recorded at a different row count are skipped; the display
    /// only charts the currently selected board.
    #[must_use]
    pub fn slot_hits(&self, rows: u8) -> Vec<u32> {
        let mut hits = vec![0u32; usize::from(rows) + 1];
        for event in self.entries.iter().filter(|e| e.rows == rows) {
            if let Some(count) = hits.get_mut(usize::from(event.slot)) {
                *count += 1;
            }
        }
        hits
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Stats plus history, folded together per event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionLedger {
    stats: SessionStats,
    history: HistoryBuffer,
}

impl SessionLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the event into the aggregates and record it in history.
    ///
    /// The two updates always happen together; no caller can observe a
    /// folded-but-unrecorded event.
    pub fn apply(&mut self, event: DropEvent) {
        self.stats.fold(&event);
        self.history.record(event);
    }

    /// Return the ledger to its zero state.
    pub fn reset(&mut self) {
        self.stats.reset();
        self.history.clear();
    }

    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Fraction of buffered drops that lost money, for the quick strip.
    #[must_use]
    pub fn recent_loss_rate(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        let losses = self.history.iter().filter(|e| e.profit < 0.0).count();
        Some(usize_to_f64(losses) / usize_to_f64(self.history.len()))
    }
}
