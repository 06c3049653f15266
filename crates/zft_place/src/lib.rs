//! Force-directed FPGA placement.
//!
//! This crate takes a parsed [`Netlist`] and an [`Architecture`] and places
//! every logic block and I/O pad on a square grid, minimizing the
//! bounding-box wirelength estimate with the zero-force-target method.
//!
//! # Pipeline
//!
//! 1. **Initial placement**: pads on random I/O sub-slots, logic blocks
//!    randomly or in net order
//! 2. **Refinement**: passes of zero-force moves and swaps until no block
//!    moves for five passes or the pass budget is spent
//! 3. **Extraction**: a flat placement list sorted by block number, written
//!    out by [`PlacementWriter`]
//!
//! # Usage
//!
//! ```
//! use zft_arch::Architecture;
//! use zft_diagnostics::DiagnosticSink;
//! use zft_netlist::parse_netlist;
//! use zft_place::{place, CancelToken, PlacerOptions};
//!
//! let text = ".input a\npinlist: a\n\n.clb b\npinlist: a\nsubblock: b 0\n";
//! let arch = Architecture::with_io_rate(1);
//! let sink = DiagnosticSink::new();
//! let netlist = parse_netlist(text, "tiny.net", &arch, &sink).unwrap();
//! let placed = place(netlist, &arch, PlacerOptions::default(), &CancelToken::new(), &sink).unwrap();
//! assert_eq!(placed.placements.len(), 2);
//! assert_eq!(placed.array_size, (1, 1));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod placement;
pub mod report;

pub use error::PlaceError;
pub use placement::{
    CancelToken, InitialPlacement, PlacedElement, PlacementGrid, PlacerOptions, RunSummary,
    SwapPolicy, Termination, ZftPlacer,
};
pub use report::{PlacementReport, PlacementWriter};

use zft_arch::Architecture;
use zft_diagnostics::DiagnosticSink;
use zft_netlist::Netlist;

/// Everything a finished placement run produces.
#[derive(Clone, Debug)]
pub struct Placement {
    /// Every element with its cell, sorted by block number.
    pub placements: Vec<PlacedElement>,
    /// Logic area as `(columns, rows)`.
    pub array_size: (u32, u32),
    /// How the run went.
    pub summary: RunSummary,
    /// The netlist with final positions.
    pub netlist: Netlist,
}

/// Places `netlist` from scratch and refines the result.
///
/// Runs on the calling thread; set `cancel` from another thread to stop
/// between passes.
pub fn place(
    netlist: Netlist,
    arch: &Architecture,
    options: PlacerOptions,
    cancel: &CancelToken,
    sink: &DiagnosticSink,
) -> Result<Placement, PlaceError> {
    let mut placer = ZftPlacer::new(netlist, arch, options, sink)?;
    let summary = placer.run(cancel)?;
    let placements = placer.placements();
    let array_size = placer.array_size();
    Ok(Placement {
        placements,
        array_size,
        summary,
        netlist: placer.into_netlist(),
    })
}
