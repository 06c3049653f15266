//! Placement reports.
//!
//! [`PlacementWriter`] emits the VPR `.place` text format; a
//! [`PlacementReport`] serializes the same data as JSON.

use crate::placement::PlacedElement;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;

/// The data of a finished placement, ready for output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    /// Netlist the placement was computed for.
    pub netlist_file: String,
    /// Architecture the placement was computed for.
    pub architecture_file: String,
    /// Logic area columns.
    pub columns: u32,
    /// Logic area rows.
    pub rows: u32,
    /// Every element, sorted by block number.
    pub blocks: Vec<PlacedElement>,
}

impl PlacementReport {
    /// Bundles a placement with the files it came from.
    pub fn new(
        netlist_file: impl Into<String>,
        architecture_file: impl Into<String>,
        (columns, rows): (u32, u32),
        blocks: Vec<PlacedElement>,
    ) -> Self {
        Self {
            netlist_file: netlist_file.into(),
            architecture_file: architecture_file.into(),
            columns,
            rows,
            blocks,
        }
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Writer for the `.place` format.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlacementWriter;

impl PlacementWriter {
    /// Writes `report` to `out`.
    pub fn write<W: Write>(&self, report: &PlacementReport, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "Netlist file: {}  Architecture file: {}",
            report.netlist_file, report.architecture_file
        )?;
        writeln!(
            out,
            "Array size: {} x {} logic blocks",
            report.columns, report.rows
        )?;
        writeln!(out)?;
        writeln!(out, "{}", row("#block name", "x", "y", "subblk", "block number"))?;
        writeln!(out, "{}", row("#----------", "--", "--", "------", "------------"))?;
        for block in &report.blocks {
            writeln!(
                out,
                "{}",
                row(
                    &block.name,
                    &block.position.x.to_string(),
                    &block.position.y.to_string(),
                    &block.subblock.to_string(),
                    &format!("#{}", block.id.as_raw()),
                )
            )?;
        }
        Ok(())
    }

    /// Writes `report` to a new file at `path`.
    pub fn write_file(&self, report: &PlacementReport, path: &Path) -> io::Result<()> {
        let mut file = io::BufWriter::new(std::fs::File::create(path)?);
        self.write(report, &mut file)?;
        file.flush()
    }
}

fn row(name: &str, x: &str, y: &str, subblk: &str, number: &str) -> String {
    format!("{name:<15} {x:<7} {y:<7} {subblk:<7} {number}")
}
