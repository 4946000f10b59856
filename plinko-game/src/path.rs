//! Path primitives describing a ball's route through the lattice.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Maximum path length stored inline without additional allocations.
pub type Path = SmallVec<[PathStep; 16]>;

/// Direction chosen at one peg row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::Right } else { Self::Left }
    }

    /// Horizontal contribution of this step: Right advances the slot index.
    #[must_use]
    pub const fn offset(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// One recorded peg decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    /// Zero-based peg row.
    pub row: u8,
    pub direction: Direction,
}

/// Count of rightward steps, which equals the terminal slot index.
#[must_use]
pub fn rights_in(path: &Path) -> u8 {
    path.iter().map(|step| step.direction.offset()).sum()
}
