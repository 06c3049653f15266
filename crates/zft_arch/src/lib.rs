//! FPGA architecture parameters that affect placement.
//!
//! An [`Architecture`] describes the logic blocks and I/O ring of an
//! island-style FPGA: how many subblocks share a logic block, the LUT size
//! of each subblock, how many pads fit into one perimeter cell, and how the
//! pins of a logic block are classified.
//!
//! # Usage
//!
//! ```
//! use zft_arch::{parse_architecture, PinClass};
//!
//! let arch = parse_architecture("io_rat 2\ninpin class: 0 bottom\noutpin class: 1 top\n").unwrap();
//! assert_eq!(arch.io_rate, 2);
//! assert_eq!(arch.pin_class(1), PinClass::Output);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod parser;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::ArchError;
pub use parser::{load_architecture, parse_architecture};

/// Classification of a block pin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PinClass {
    /// A signal entering the block.
    Input,
    /// A signal driven by the block.
    Output,
    /// A globally routed signal such as a clock.
    Global,
}

impl fmt::Display for PinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinClass::Input => write!(f, "input"),
            PinClass::Output => write!(f, "output"),
            PinClass::Global => write!(f, "global"),
        }
    }
}

/// Placement-relevant architecture parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// Number of subblocks (BLEs) packed into one logic block.
    pub subblocks_per_clb: u32,
    /// Input count of the look-up table in each subblock.
    pub subblock_lut_size: u32,
    /// Number of I/O pads that share one perimeter cell.
    pub io_rate: u32,
    /// Class of each logic-block pin, indexed by pin number.
    pub pin_classes: Vec<PinClass>,
}

impl Architecture {
    /// Creates an architecture with the given I/O rate and no pin classes.
    pub fn with_io_rate(io_rate: u32) -> Self {
        Self {
            subblocks_per_clb: 1,
            subblock_lut_size: 4,
            io_rate,
            pin_classes: Vec::new(),
        }
    }

    /// Returns the class of logic-block pin `index`.
    ///
    /// Pins beyond the classification list, or all pins when no list was
    /// given, are treated as inputs.
    pub fn pin_class(&self, index: usize) -> PinClass {
        self.pin_classes
            .get(index)
            .copied()
            .unwrap_or(PinClass::Input)
    }
}
