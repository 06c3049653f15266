//! Short position memory used to stop blocks oscillating between cells.

use serde::{Deserialize, Serialize};
use zft_common::Position;

/// Number of positions an element remembers, the current one included.
pub const HISTORY_LEN: usize = 3;

/// Fixed-capacity ring buffer of the most recent positions of an element.
///
/// The newest entry is always the element's current position. Older entries
/// are overwritten once the buffer is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionHistory {
    slots: [Option<Position>; HISTORY_LEN],
    next: usize,
}

impl PositionHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pos` as the newest position.
    pub fn push(&mut self, pos: Position) {
        self.slots[self.next] = Some(pos);
        self.next = (self.next + 1) % HISTORY_LEN;
    }

    /// Returns `true` if `pos` is among the remembered positions.
    pub fn contains(&self, pos: Position) -> bool {
        self.slots.iter().any(|slot| *slot == Some(pos))
    }

    /// Returns the number of remembered positions.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns `true` if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
