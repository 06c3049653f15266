//! Reader for VPR-style `.arch` architecture descriptions.
//!
//! The format is line oriented. Only the keys that influence placement are
//! interpreted; everything else (switch boxes, segment definitions, timing)
//! is skipped.

use crate::error::ArchError;
use crate::{Architecture, PinClass};
use std::path::Path;

/// Reads and parses an architecture file.
pub fn load_architecture(path: &Path) -> Result<Architecture, ArchError> {
    let content = std::fs::read_to_string(path)?;
    parse_architecture(&content)
}

/// Parses architecture text.
///
/// Fails when a numeric key has a non-numeric value or when `io_rat` is
/// missing or zero, since pads could not be placed at all.
pub fn parse_architecture(content: &str) -> Result<Architecture, ArchError> {
    let mut arch = Architecture {
        subblocks_per_clb: 1,
        subblock_lut_size: 4,
        io_rate: 0,
        pin_classes: Vec::new(),
    };

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw);
        let mut tokens = line.split_whitespace();
        let Some(key) = tokens.next() else {
            continue;
        };
        match key {
            "io_rat" => arch.io_rate = read_number(key, tokens.next(), line_no)?,
            "subblocks_per_clb" => {
                arch.subblocks_per_clb = read_number(key, tokens.next(), line_no)?
            }
            "subblock_lut_size" => {
                arch.subblock_lut_size = read_number(key, tokens.next(), line_no)?
            }
            "inpin" => {
                let global = tokens.any(|t| t == "global");
                arch.pin_classes.push(if global {
                    PinClass::Global
                } else {
                    PinClass::Input
                });
            }
            "outpin" => arch.pin_classes.push(PinClass::Output),
            _ => {}
        }
    }

    if arch.io_rate == 0 {
        return Err(ArchError::InvalidIoRate);
    }
    Ok(arch)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn read_number(key: &str, value: Option<&str>, line: usize) -> Result<u32, ArchError> {
    let value = value.ok_or_else(|| ArchError::MissingValue {
        line,
        key: key.to_string(),
    })?;
    value.parse().map_err(|_| ArchError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}
