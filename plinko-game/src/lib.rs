//! Plinko Drop Engine
//!
//! Platform-agnostic core for the Plinko ball-drop game: the binomial
//! landing model, the single-ball drop simulator, and the session
//! statistics ledger. This crate has no UI, no network I/O, no ambient
//! clock and no ambient randomness; hosts supply timestamps at the call
//! sites, implement [`StatsBackend`] over their HTTP stack for the
//! analytics dashboard, and drive pacing through the [`scheduler`] seam.

pub mod constants;
pub mod dashboard;
pub mod ledger;
pub mod numbers;
pub mod path;
pub mod payout;
pub mod presentation;
pub mod probability;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod simulator;

// Re-export commonly used types
pub use dashboard::{
    DashboardError, FairnessReport, JackpotTracker, Period, PlinkoStatistics, RiskComparison,
    SlotDistribution, SlotStats, StatsBackend, stats_path,
};
pub use ledger::{HistoryBuffer, SessionLedger, SessionStats};
pub use path::{Direction, Path, PathStep};
pub use payout::{PayoutCatalog, PayoutError, PayoutTable, RiskLevel, catalog};
pub use presentation::{Severity, severity_of_multiplier, severity_of_ratio};
pub use probability::{SlotRegion, distribution, probability_of_slot, region_of_slot};
pub use rng::{BitSource, ScriptedBits, SessionRng};
pub use scheduler::{ManualScheduler, Repeat, Scheduler, TaskHandle};
pub use session::{PlayMode, PlinkoSession, SessionError};
pub use simulator::{DropError, DropEvent, DropSimulator, FlightPhase};
