//! Reader for VPR-style `.net` netlists.
//!
//! Blocks are separated by blank lines and `#` starts a comment:
//!
//! ```text
//! .global clk
//!
//! .input a
//! pinlist: a
//!
//! .clb blk_0
//! pinlist: a open open open n0 clk
//! subblock: blk_0 0 open open open 4 5
//!
//! .output out:n0
//! pinlist: n0
//! ```
//!
//! Block numbers follow file order. Pin `i` of a logic block is classified by
//! the architecture's pin class list; pads classify their single pin by
//! direction, and any net declared `.global` is classified global.

use crate::data::{ElementKind, Netlist, Subblock};
use crate::error::NetlistError;
use std::collections::HashSet;
use std::path::Path;
use zft_arch::{Architecture, PinClass};
use zft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, SourceLocation};

const TOO_MANY_SUBBLOCKS: DiagnosticCode = DiagnosticCode::new(Category::Netlist, 1);
const REPEATED_NET: DiagnosticCode = DiagnosticCode::new(Category::Netlist, 2);
const UNCONNECTED_BLOCK: DiagnosticCode = DiagnosticCode::new(Category::Netlist, 3);

/// Reads and parses a netlist file.
pub fn load_netlist(
    path: &Path,
    arch: &Architecture,
    sink: &DiagnosticSink,
) -> Result<Netlist, NetlistError> {
    let content = std::fs::read_to_string(path)?;
    parse_netlist(&content, &path.display().to_string(), arch, sink)
}

/// Parses netlist text.
///
/// `file` is only used to label diagnostics. Structural problems are
/// returned as errors; tolerated oddities are reported to `sink` as warnings.
pub fn parse_netlist(
    content: &str,
    file: &str,
    arch: &Architecture,
    sink: &DiagnosticSink,
) -> Result<Netlist, NetlistError> {
    let mut records = Vec::new();
    let mut globals = HashSet::new();
    for block in split_blocks(content) {
        match read_block(&block)? {
            Record::Global(nets) => globals.extend(nets),
            Record::Element(element) => records.push(element),
        }
    }

    let mut netlist = Netlist::new();
    for record in &records {
        if netlist.find_element(&record.name).is_some() {
            return Err(NetlistError::DuplicateBlock {
                line: record.line,
                name: record.name.clone(),
            });
        }
        let id = netlist.add_element(record.name.clone(), record.kind)?;

        for (index, pin) in record.pins.iter().enumerate() {
            let Some(net_name) = pin else {
                continue;
            };
            let is_global = globals.contains(net_name.as_str());
            let class = if is_global {
                PinClass::Global
            } else {
                match record.kind {
                    ElementKind::Input => PinClass::Output,
                    ElementKind::Output => PinClass::Input,
                    ElementKind::Clb => arch.pin_class(index),
                }
            };
            let net = netlist.net_by_name_or_insert(net_name);
            netlist.net_mut(net).is_global = is_global;
            if !netlist.connect(id, net, class)? {
                tracing::debug!(block = %record.name, net = %net_name, "ignoring repeated net");
                sink.emit(
                    Diagnostic::warning(
                        REPEATED_NET,
                        format!(
                            "net '{net_name}' is connected to block '{}' more than once",
                            record.name
                        ),
                    )
                    .at(SourceLocation::new(file, record.line + 1))
                    .with_note("the repeated pin is ignored"),
                );
            }
        }

        if record.subblocks.len() > arch.subblocks_per_clb as usize {
            sink.emit(
                Diagnostic::warning(
                    TOO_MANY_SUBBLOCKS,
                    format!(
                        "block '{}' has {} subblocks but the architecture allows {}",
                        record.name,
                        record.subblocks.len(),
                        arch.subblocks_per_clb
                    ),
                )
                .at(SourceLocation::new(file, record.line)),
            );
        }
        netlist.element_mut(id).subblocks = record.subblocks.clone();
    }

    warn_unconnected_blocks(&netlist, &records, file, sink);
    Ok(netlist)
}

/// Logic blocks without a neighbour on any input/output net have no
/// zero-force target and never move.
fn warn_unconnected_blocks(
    netlist: &Netlist,
    records: &[ElementRecord],
    file: &str,
    sink: &DiagnosticSink,
) {
    for (record, element) in records.iter().zip(&netlist.elements) {
        if !element.kind.is_logic() {
            continue;
        }
        let has_neighbour = element
            .pins
            .io_nets()
            .any(|net| netlist.net(net).pin_count() > 1);
        if !has_neighbour {
            sink.emit(
                Diagnostic::warning(
                    UNCONNECTED_BLOCK,
                    format!("block '{}' has no connections to other blocks", element.name),
                )
                .at(SourceLocation::new(file, record.line))
                .with_note("it keeps its initial position"),
            );
        }
    }
}

struct Line<'a> {
    number: usize,
    tokens: Vec<&'a str>,
}

struct ElementRecord {
    line: usize,
    kind: ElementKind,
    name: String,
    pins: Vec<Option<String>>,
    subblocks: Vec<Subblock>,
}

enum Record {
    Global(Vec<String>),
    Element(ElementRecord),
}

/// Groups non-comment lines into blank-line separated blocks.
fn split_blocks(content: &str) -> Vec<Vec<Line<'_>>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        if raw.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        let code = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let tokens: Vec<&str> = code.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        current.push(Line {
            number: index + 1,
            tokens,
        });
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn read_block(block: &[Line<'_>]) -> Result<Record, NetlistError> {
    let header = &block[0];
    let kind = match header.tokens[0] {
        ".global" => {
            let nets: Vec<String> = header.tokens[1..].iter().map(|s| s.to_string()).collect();
            if nets.is_empty() {
                return Err(NetlistError::MissingName {
                    line: header.number,
                });
            }
            if block.len() != 1 {
                return Err(NetlistError::LineCount {
                    line: header.number,
                    kind: ".global",
                    expected: "1",
                    found: block.len(),
                });
            }
            return Ok(Record::Global(nets));
        }
        ".input" => ElementKind::Input,
        ".output" => ElementKind::Output,
        ".clb" => ElementKind::Clb,
        other => {
            return Err(NetlistError::UnknownBlockType {
                line: header.number,
                keyword: other.to_string(),
            })
        }
    };

    let name = header
        .tokens
        .get(1)
        .ok_or(NetlistError::MissingName {
            line: header.number,
        })?
        .to_string();

    let line_count_ok = match kind {
        ElementKind::Clb => block.len() >= 3,
        _ => block.len() == 2,
    };
    if !line_count_ok {
        return Err(NetlistError::LineCount {
            line: header.number,
            kind: kind.keyword(),
            expected: if kind.is_logic() { "at least 3" } else { "2" },
            found: block.len(),
        });
    }

    let pins = read_pinlist(&block[1])?;
    let subblocks = block[2..]
        .iter()
        .map(read_subblock)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Record::Element(ElementRecord {
        line: header.number,
        kind,
        name,
        pins,
        subblocks,
    }))
}

fn expect_keyword(line: &Line<'_>, keyword: &'static str) -> Result<(), NetlistError> {
    if line.tokens[0].eq_ignore_ascii_case(keyword) {
        Ok(())
    } else {
        Err(NetlistError::ExpectedKeyword {
            line: line.number,
            expected: keyword,
            found: line.tokens[0].to_string(),
        })
    }
}

fn read_pinlist(line: &Line<'_>) -> Result<Vec<Option<String>>, NetlistError> {
    expect_keyword(line, "pinlist:")?;
    if line.tokens.len() < 2 {
        return Err(NetlistError::EmptyPinlist { line: line.number });
    }
    Ok(line.tokens[1..]
        .iter()
        .map(|&pin| (pin != "open").then(|| pin.to_string()))
        .collect())
}

fn read_subblock(line: &Line<'_>) -> Result<Subblock, NetlistError> {
    expect_keyword(line, "subblock:")?;
    if line.tokens.len() < 3 {
        return Err(NetlistError::EmptyPinlist { line: line.number });
    }
    Ok(Subblock {
        name: line.tokens[1].to_string(),
        pins: line.tokens[2..].iter().map(|s| s.to_string()).collect(),
    })
}
