//! Circuit netlist model and `.net` reader for the ZFT placer.
//!
//! A [`Netlist`] holds the [`CircuitElement`]s (logic blocks and I/O pads)
//! and the [`Net`]s between them in two arenas addressed by [`ElementId`] and
//! [`NetId`]. Element positions are only changed through
//! [`Netlist::set_position`] and [`Netlist::restore`], which also clear the
//! cost cache of every net touching the element.
//!
//! # Usage
//!
//! ```
//! use zft_arch::Architecture;
//! use zft_diagnostics::DiagnosticSink;
//! use zft_netlist::parse_netlist;
//!
//! let text = ".input a\npinlist: a\n\n.clb b\npinlist: a\nsubblock: b 0\n";
//! let sink = DiagnosticSink::new();
//! let netlist = parse_netlist(text, "tiny.net", &Architecture::with_io_rate(1), &sink).unwrap();
//! assert_eq!(netlist.element_count(), 2);
//! ```

#![warn(missing_docs)]

pub mod data;
pub mod error;
pub mod history;
pub mod ids;
pub mod parser;

pub use data::{
    CircuitElement, ElementKind, Net, NetClass, Netlist, PlacementSnapshot, Subblock,
};
pub use error::NetlistError;
pub use history::{PositionHistory, HISTORY_LEN};
pub use ids::{ElementId, NetId};
pub use parser::{load_netlist, parse_netlist};
