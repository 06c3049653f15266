//! Zero-force-target placement.
//!
//! Pads are spread over the I/O ring, logic blocks over the interior, and
//! then each pass moves every logic block toward the weighted centre of its
//! neighbours, taking a free cell nearby or swapping with the occupant when
//! the target is taken.

pub mod cost;
mod engine;
pub mod grid;
mod initial;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use engine::{PlacedElement, RunSummary, Termination, ZftPlacer, NO_PROGRESS_LIMIT};
pub use grid::{grid_size, PlacementGrid};

/// How logic blocks are placed before the first pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitialPlacement {
    /// Uniformly random free interior cells.
    Random,
    /// Net by net in ascending crossing order, filling cells in scan order.
    #[default]
    NetOrder,
}

/// Rule for accepting a swap with the block occupying a target cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapPolicy {
    /// Swap, then keep the exchange only if the combined cost strictly dropped.
    #[default]
    Verified,
    /// Swap whenever the moving block costs more than the occupant.
    CostCompare,
}

/// Tuning knobs for [`ZftPlacer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacerOptions {
    /// Upper bound on optimization passes.
    pub iterations: u32,
    /// Radius of the window searched for a free cell around a taken target.
    pub area_swap_size: u32,
    /// Initial logic placement mode.
    pub initial: InitialPlacement,
    /// Swap acceptance rule.
    pub swap_policy: SwapPolicy,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Report every individual move and swap.
    pub verbose: bool,
}

impl Default for PlacerOptions {
    fn default() -> Self {
        Self {
            iterations: 600,
            area_swap_size: 8,
            initial: InitialPlacement::default(),
            swap_policy: SwapPolicy::default(),
            seed: None,
            verbose: false,
        }
    }
}

/// Cooperative cancellation flag shared between a placer and its controller.
///
/// The placer polls it at the start of every pass.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
