//! The ZFT placer.
//!
//! Each pass visits the logic blocks in block order. A block's zero-force
//! target is the weight-averaged position of every other element on its
//! input and output nets, clamped to the interior. The block then moves to
//! the target if it is free, else to the nearest free cell within
//! `area_swap_size`, else tries a swap with the target's occupant. A block
//! never returns to one of its last few positions, which stops two blocks
//! from trading places forever.

use super::cost;
use super::grid::{grid_size, PlacementGrid};
use super::initial;
use super::{CancelToken, InitialPlacement, PlacerOptions, SwapPolicy};
use crate::error::PlaceError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use zft_arch::Architecture;
use zft_common::{InternalError, Position, ZftResult};
use zft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use zft_netlist::{ElementId, ElementKind, Netlist};

/// Consecutive passes without any move after which placement stops.
pub const NO_PROGRESS_LIMIT: u32 = 5;

const INITIAL_MODE: DiagnosticCode = DiagnosticCode::new(Category::Placement, 1);
const ARRAY_SIZE: DiagnosticCode = DiagnosticCode::new(Category::Placement, 2);
const BLOCK_MOVED: DiagnosticCode = DiagnosticCode::new(Category::Placement, 3);
const STABILIZED: DiagnosticCode = DiagnosticCode::new(Category::Placement, 4);
const SUMMARY: DiagnosticCode = DiagnosticCode::new(Category::Placement, 5);

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No block moved for [`NO_PROGRESS_LIMIT`] consecutive passes.
    Stabilized,
    /// The configured number of passes was used up.
    IterationLimit,
}

/// Outcome of a completed [`ZftPlacer::run`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Passes executed.
    pub iterations: u32,
    /// Moves and swaps performed over all passes.
    pub switches: u64,
    /// Why the run stopped.
    pub termination: Termination,
    /// Total wirelength cost after the last pass.
    pub final_cost: f64,
}

/// One element of the final placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedElement {
    /// Block number.
    pub id: ElementId,
    /// Block name.
    pub name: String,
    /// Logic block or pad.
    pub kind: ElementKind,
    /// Grid cell.
    pub position: Position,
    /// Index among the elements sharing the cell, `0` for logic blocks.
    pub subblock: u32,
}

/// A placement run over one netlist.
///
/// Construction performs the initial placement; [`run`](Self::run) refines it.
pub struct ZftPlacer<'s> {
    netlist: Netlist,
    grid: PlacementGrid,
    options: PlacerOptions,
    logic: Vec<ElementId>,
    pads: Vec<ElementId>,
    sink: &'s DiagnosticSink,
}

impl<'s> ZftPlacer<'s> {
    /// Sizes the grid for `netlist` and places every element on it.
    pub fn new(
        mut netlist: Netlist,
        arch: &Architecture,
        options: PlacerOptions,
        sink: &'s DiagnosticSink,
    ) -> Result<Self, PlaceError> {
        if arch.io_rate == 0 {
            return Err(InternalError::new("architecture I/O rate must be at least 1").into());
        }
        let (logic, pads): (Vec<ElementId>, Vec<ElementId>) = netlist
            .elements
            .iter()
            .map(|e| e.id)
            .partition(|&id| netlist.element(id).kind.is_logic());

        let size = grid_size(logic.len(), pads.len(), arch.io_rate);
        let mut grid = PlacementGrid::new(size, arch.io_rate);

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mode = match options.initial {
            InitialPlacement::Random => "Randomizing placements of all blocks",
            InitialPlacement::NetOrder => "Placing blocks by net crossing order",
        };
        sink.emit(Diagnostic::note(INITIAL_MODE, mode));
        sink.emit(Diagnostic::note(
            ARRAY_SIZE,
            format!(
                "The circuit will be mapped into a {0} x {0} array of clbs",
                grid.interior_size()
            ),
        ));
        tracing::debug!(
            size,
            logic = logic.len(),
            pads = pads.len(),
            io_rate = arch.io_rate,
            "initial placement"
        );

        initial::place_pads(&mut netlist, &mut grid, &pads, &mut rng)?;
        match options.initial {
            InitialPlacement::Random => {
                initial::place_logic_random(&mut netlist, &mut grid, &logic, &mut rng)?
            }
            InitialPlacement::NetOrder => {
                initial::place_logic_by_nets(&mut netlist, &mut grid, &logic)?
            }
        }
        netlist.refresh_weights();

        Ok(Self {
            netlist,
            grid,
            options,
            logic,
            pads,
            sink,
        })
    }

    /// Runs optimization passes until the placement settles, the pass budget
    /// is used up, or `cancel` is set.
    ///
    /// Cancellation is checked before every pass and leaves the placement as
    /// the last finished pass left it.
    pub fn run(&mut self, cancel: &CancelToken) -> Result<RunSummary, PlaceError> {
        let mut completed = 0;
        let mut switches_total = 0u64;
        let mut idle_passes = 0;
        let mut termination = Termination::IterationLimit;

        for _ in 0..self.options.iterations {
            if cancel.is_cancelled() {
                tracing::debug!(completed, "placement interrupted");
                return Err(PlaceError::Interrupted {
                    completed_iterations: completed,
                });
            }
            let switches = self.run_pass()?;
            completed += 1;
            switches_total += u64::from(switches);
            tracing::debug!(iteration = completed, switches, "pass finished");

            idle_passes = if switches == 0 { idle_passes + 1 } else { 0 };
            if idle_passes == NO_PROGRESS_LIMIT {
                self.sink.emit(Diagnostic::note(
                    STABILIZED,
                    format!(
                        "Breaking loop, because no changes occurred after {NO_PROGRESS_LIMIT} iterations"
                    ),
                ));
                termination = Termination::Stabilized;
                break;
            }
        }

        self.sink.emit(Diagnostic::note(
            SUMMARY,
            format!(
                "Placing ended after {completed} iterations. {switches_total} blocks were switched"
            ),
        ));
        Ok(RunSummary {
            iterations: completed,
            switches: switches_total,
            termination,
            final_cost: self.total_cost()?,
        })
    }

    /// Runs one pass over all logic blocks and returns the number of moves.
    pub fn run_pass(&mut self) -> ZftResult<u32> {
        let mut switches = 0;
        for i in 0..self.logic.len() {
            if self.step(self.logic[i])? {
                switches += 1;
            }
        }
        Ok(switches)
    }

    /// Makes one placement decision for `block`. Returns whether it moved.
    fn step(&mut self, block: ElementId) -> ZftResult<bool> {
        if !self.has_neighbours(block) {
            return Ok(false);
        }
        let current = self.position_of(block)?;
        let target = self.grid.clamp_to_interior(self.zero_force_target(block)?);
        if target == current {
            return Ok(false);
        }

        let Some(occupant) = self.grid.occupant(target) else {
            return self.relocate(block, target);
        };
        if let Some(free) = self.grid.nearest_free(target, self.options.area_swap_size) {
            if self.relocate(block, free)? {
                return Ok(true);
            }
        }
        self.try_swap(block, occupant)
    }

    /// Returns `true` if some other element shares an input or output net with `block`.
    fn has_neighbours(&self, block: ElementId) -> bool {
        self.netlist
            .element(block)
            .pins
            .io_nets()
            .any(|net| self.netlist.net(net).pads().iter().any(|&pad| pad != block))
    }

    fn position_of(&self, id: ElementId) -> ZftResult<Position> {
        self.netlist
            .element(id)
            .position()
            .ok_or_else(|| InternalError::new(format!("block {id} has no position")))
    }

    /// Computes the zero-force target of `block`.
    ///
    /// Every other element on each input or output net of `block` pulls with
    /// its weight; the result is the integer weighted mean of their positions.
    /// An element on several of those nets pulls once per net.
    pub fn zero_force_target(&self, block: ElementId) -> ZftResult<Position> {
        let mut force_x = 0u64;
        let mut force_y = 0u64;
        let mut total_weight = 0u64;
        for net in self.netlist.element(block).pins.io_nets() {
            for &other in self.netlist.net(net).pads() {
                if other == block {
                    continue;
                }
                let weight = u64::from(self.netlist.element(other).weight);
                let pos = self.position_of(other)?;
                force_x += weight * u64::from(pos.x);
                force_y += weight * u64::from(pos.y);
                total_weight += weight;
            }
        }
        if total_weight == 0 {
            return Err(InternalError::new(format!(
                "block {block} has no neighbours to compute a target from"
            )));
        }
        Ok(Position::new(
            (force_x / total_weight) as u32,
            (force_y / total_weight) as u32,
        ))
    }

    /// Moves `block` into the free interior cell `to` unless it was there recently.
    fn relocate(&mut self, block: ElementId, to: Position) -> ZftResult<bool> {
        let element = self.netlist.element(block);
        if !element.kind.is_logic() {
            return Err(InternalError::new(format!(
                "only logic blocks can move, but {} is a pad",
                element.name
            )));
        }
        if element.knows_position(to) {
            return Ok(false);
        }
        let from = self.position_of(block)?;
        self.grid.move_logic(block, from, to)?;
        self.netlist.set_position(block, to);
        self.notify_move(block, to);
        Ok(true)
    }

    /// Tries to exchange `block` with `occupant` under the configured policy.
    fn try_swap(&mut self, block: ElementId, occupant: ElementId) -> ZftResult<bool> {
        let (a, b) = (self.netlist.element(block), self.netlist.element(occupant));
        if !a.kind.is_logic() || !b.kind.is_logic() {
            return Err(InternalError::new(format!(
                "only logic blocks can swap, not '{}' ({}) and '{}' ({})",
                a.name, a.kind, b.name, b.kind
            )));
        }
        let pos_a = self.position_of(block)?;
        let pos_b = self.position_of(occupant)?;
        if a.knows_position(pos_b) || b.knows_position(pos_a) {
            return Ok(false);
        }

        match self.options.swap_policy {
            SwapPolicy::Verified => {
                let before = cost::element_cost(&mut self.netlist, block)?
                    + cost::element_cost(&mut self.netlist, occupant)?;
                let saved_a = self.netlist.snapshot(block);
                let saved_b = self.netlist.snapshot(occupant);
                self.exchange(block, occupant, pos_a, pos_b)?;
                let after = cost::element_cost(&mut self.netlist, block)?
                    + cost::element_cost(&mut self.netlist, occupant)?;
                tracing::trace!(%block, %occupant, before, after, "swap evaluated");
                if after < before {
                    self.notify_move(block, pos_b);
                    Ok(true)
                } else {
                    self.grid.swap_logic(pos_a, pos_b)?;
                    self.netlist.restore(block, saved_a);
                    self.netlist.restore(occupant, saved_b);
                    Ok(false)
                }
            }
            SwapPolicy::CostCompare => {
                let mine = cost::element_cost(&mut self.netlist, block)?;
                let theirs = cost::element_cost(&mut self.netlist, occupant)?;
                if mine > theirs {
                    self.exchange(block, occupant, pos_a, pos_b)?;
                    self.notify_move(block, pos_b);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    fn exchange(
        &mut self,
        a: ElementId,
        b: ElementId,
        pos_a: Position,
        pos_b: Position,
    ) -> ZftResult<()> {
        self.grid.swap_logic(pos_a, pos_b)?;
        self.netlist.set_position(a, pos_b);
        self.netlist.set_position(b, pos_a);
        Ok(())
    }

    fn notify_move(&self, block: ElementId, to: Position) {
        if self.options.verbose {
            let name = &self.netlist.element(block).name;
            self.sink.emit(Diagnostic::note(
                BLOCK_MOVED,
                format!("{name} has switched position at {to}"),
            ));
        }
    }

    /// Returns every element with its cell and sub-slot, sorted by block number.
    ///
    /// A sub-slot index is the element's rank among the occupants of its
    /// cell in slot order.
    pub fn placements(&self) -> Vec<PlacedElement> {
        let mut placed = Vec::with_capacity(self.netlist.element_count());
        let mut cell = None;
        let mut rank = 0;
        for (pos, _, id) in self.grid.occupied() {
            if cell != Some(pos) {
                cell = Some(pos);
                rank = 0;
            }
            let element = self.netlist.element(id);
            placed.push(PlacedElement {
                id,
                name: element.name.clone(),
                kind: element.kind,
                position: pos,
                subblock: rank,
            });
            rank += 1;
        }
        placed.sort_by_key(|p| p.id);
        placed
    }

    /// Size of the logic area as `(columns, rows)`.
    pub fn array_size(&self) -> (u32, u32) {
        let side = self.grid.interior_size();
        (side, side)
    }

    /// Total wirelength cost of the current placement.
    pub fn total_cost(&mut self) -> ZftResult<f64> {
        cost::total_cost(&mut self.netlist)
    }

    /// The netlist with current positions.
    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    /// The placement grid.
    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    /// Logic blocks in pass order.
    pub fn logic_elements(&self) -> &[ElementId] {
        &self.logic
    }

    /// I/O pads in block order.
    pub fn io_elements(&self) -> &[ElementId] {
        &self.pads
    }

    /// Consumes the placer and returns the placed netlist.
    pub fn into_netlist(self) -> Netlist {
        self.netlist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zft_arch::PinClass;
    use zft_diagnostics::Severity;

    fn options(seed: u64) -> PlacerOptions {
        PlacerOptions {
            initial: InitialPlacement::Random,
            seed: Some(seed),
            ..PlacerOptions::default()
        }
    }

    /// A chain pad_in -> c0 -> c1 -> c2 -> pad_out.
    fn chain() -> Netlist {
        let mut nl = Netlist::new();
        let pin = nl.add_element("in", ElementKind::Input).unwrap();
        let blocks: Vec<_> = (0..3)
            .map(|i| nl.add_element(format!("c{i}"), ElementKind::Clb).unwrap())
            .collect();
        let pout = nl.add_element("out", ElementKind::Output).unwrap();

        let mut prev = pin;
        for (i, &block) in blocks.iter().enumerate() {
            let net = nl.net_by_name_or_insert(&format!("n{i}"));
            nl.connect(prev, net, PinClass::Output).unwrap();
            nl.connect(block, net, PinClass::Input).unwrap();
            prev = block;
        }
        let last = nl.net_by_name_or_insert("n3");
        nl.connect(prev, last, PinClass::Output).unwrap();
        nl.connect(pout, last, PinClass::Input).unwrap();
        nl
    }

    #[test]
    fn construction_places_everything() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let placer = ZftPlacer::new(chain(), &arch, options(1), &sink).unwrap();
        assert!(placer.netlist().is_fully_placed());
        assert_eq!(placer.grid().size(), 4);
        assert_eq!(placer.array_size(), (2, 2));
        assert_eq!(placer.logic_elements().len(), 3);
        assert_eq!(placer.io_elements().len(), 2);

        let codes: Vec<_> = sink.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![INITIAL_MODE, ARRAY_SIZE]);
        assert!(sink
            .diagnostics()
            .iter()
            .all(|d| d.severity == Severity::Note));
    }

    #[test]
    fn weights_are_computed_after_placement() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let placer = ZftPlacer::new(chain(), &arch, options(1), &sink).unwrap();
        let nl = placer.netlist();
        // Middle blocks have two 2-pin nets: 1 + 1 + 1.
        assert_eq!(nl.element(nl.find_element("c1").unwrap()).weight, 3);
        assert_eq!(nl.element(nl.find_element("in").unwrap()).weight, 2);
    }

    #[test]
    fn zero_force_target_is_weighted_mean() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let placer = ZftPlacer::new(chain(), &arch, options(5), &sink).unwrap();
        let nl = placer.netlist();
        let c1 = nl.find_element("c1").unwrap();
        let p0 = nl.element(nl.find_element("c0").unwrap()).position().unwrap();
        let p2 = nl.element(nl.find_element("c2").unwrap()).position().unwrap();
        // Both neighbours weigh 3.
        let expected = Position::new((p0.x + p2.x) / 2, (p0.y + p2.y) / 2);
        assert_eq!(placer.zero_force_target(c1).unwrap(), expected);
    }

    #[test]
    fn isolated_block_has_no_target() {
        let mut nl = Netlist::new();
        let lonely = nl.add_element("lonely", ElementKind::Clb).unwrap();
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let mut placer = ZftPlacer::new(nl, &arch, options(2), &sink).unwrap();
        assert!(placer.zero_force_target(lonely).is_err());
        // Passes skip it instead of failing.
        assert_eq!(placer.run_pass().unwrap(), 0);
    }

    #[test]
    fn zero_io_rate_is_rejected() {
        let sink = DiagnosticSink::new();
        let mut arch = Architecture::with_io_rate(1);
        arch.io_rate = 0;
        let err = ZftPlacer::new(chain(), &arch, options(1), &sink).err().unwrap();
        assert!(matches!(err, PlaceError::Internal(_)));
    }

    /// Two logic blocks sharing one net, placed at (1,1) and (1,2) by net order.
    fn pair() -> Netlist {
        let mut nl = Netlist::new();
        let a = nl.add_element("a", ElementKind::Clb).unwrap();
        let b = nl.add_element("b", ElementKind::Clb).unwrap();
        let n = nl.net_by_name_or_insert("n");
        nl.connect(a, n, PinClass::Output).unwrap();
        nl.connect(b, n, PinClass::Input).unwrap();
        nl
    }

    #[test]
    fn run_reports_summary() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let opts = PlacerOptions {
            initial: InitialPlacement::NetOrder,
            ..options(9)
        };
        let mut placer = ZftPlacer::new(pair(), &arch, opts, &sink).unwrap();
        let summary = placer.run(&CancelToken::new()).unwrap();
        // Both blocks move in the first pass, then five idle passes follow.
        assert_eq!(summary.termination, Termination::Stabilized);
        assert_eq!(summary.iterations, 1 + NO_PROGRESS_LIMIT);
        assert_eq!(summary.switches, 2);
        assert_eq!(summary.final_cost, placer.total_cost().unwrap());

        let codes: Vec<_> = sink.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![INITIAL_MODE, ARRAY_SIZE, STABILIZED, SUMMARY]);
    }

    /// Eight logic blocks in a ring of 3-pin nets, with two pads.
    fn ring() -> Netlist {
        let mut nl = Netlist::new();
        let blocks: Vec<_> = (0..8)
            .map(|i| nl.add_element(format!("r{i}"), ElementKind::Clb).unwrap())
            .collect();
        let pin = nl.add_element("in", ElementKind::Input).unwrap();
        let pout = nl.add_element("out", ElementKind::Output).unwrap();
        for (i, &driver) in blocks.iter().enumerate() {
            let net = nl.net_by_name_or_insert(&format!("r{i}"));
            nl.connect(driver, net, PinClass::Output).unwrap();
            nl.connect(blocks[(i + 1) % 8], net, PinClass::Input).unwrap();
            nl.connect(blocks[(i + 2) % 8], net, PinClass::Input).unwrap();
        }
        let net = nl.net_by_name_or_insert("pin");
        nl.connect(pin, net, PinClass::Output).unwrap();
        nl.connect(blocks[0], net, PinClass::Input).unwrap();
        let r4 = nl.find_net("r4").unwrap();
        nl.connect(pout, r4, PinClass::Input).unwrap();
        nl
    }

    #[test]
    fn no_block_ever_returns_to_a_remembered_cell() {
        let arch = Architecture::with_io_rate(1);
        for policy in [SwapPolicy::Verified, SwapPolicy::CostCompare] {
            for seed in 0..20 {
                let sink = DiagnosticSink::new();
                let opts = PlacerOptions {
                    swap_policy: policy,
                    ..options(seed)
                };
                let mut placer = ZftPlacer::new(ring(), &arch, opts, &sink).unwrap();
                let logic = placer.logic_elements().to_vec();
                for _ in 0..100 {
                    for &acting in &logic {
                        let before: Vec<_> = logic
                            .iter()
                            .map(|&id| placer.netlist().snapshot(id))
                            .collect();
                        placer.step(acting).unwrap();
                        for (&id, old) in logic.iter().zip(&before) {
                            let now = placer.netlist().element(id).position();
                            if now != old.position {
                                let now = now.unwrap();
                                assert!(
                                    !old.history.contains(now),
                                    "seed {seed}: {id} went back to {now}"
                                );
                                assert_eq!(placer.grid().occupant(now), Some(id));
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn verbose_reports_moves() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let opts = PlacerOptions {
            verbose: true,
            ..options(4)
        };
        let mut placer = ZftPlacer::new(chain(), &arch, opts, &sink).unwrap();
        let summary = placer.run(&CancelToken::new()).unwrap();
        let moves = sink
            .diagnostics()
            .iter()
            .filter(|d| d.code == BLOCK_MOVED)
            .count() as u64;
        assert_eq!(moves, summary.switches);
    }

    #[test]
    fn cancelled_before_first_pass() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let mut placer = ZftPlacer::new(chain(), &arch, options(3), &sink).unwrap();
        let before = placer.placements();
        let token = CancelToken::new();
        token.cancel();
        let err = placer.run(&token).unwrap_err();
        assert!(matches!(
            err,
            PlaceError::Interrupted {
                completed_iterations: 0
            }
        ));
        assert_eq!(placer.placements(), before);
    }

    fn block(placer: &ZftPlacer<'_>, name: &str) -> (ElementId, Position) {
        let nl = placer.netlist();
        let id = nl.find_element(name).unwrap();
        (id, nl.element(id).position().unwrap())
    }

    #[test]
    fn relocate_refuses_recent_position() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let mut placer = ZftPlacer::new(chain(), &arch, options(6), &sink).unwrap();
        let (c0, start) = block(&placer, "c0");
        let free = placer.grid().nearest_free(start, 8).unwrap();

        assert!(placer.relocate(c0, free).unwrap());
        assert_eq!(placer.grid().occupant(start), None);
        assert!(!placer.relocate(c0, start).unwrap());
        assert_eq!(placer.netlist().element(c0).position(), Some(free));
    }

    #[test]
    fn swap_refuses_recent_position() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let mut placer = ZftPlacer::new(chain(), &arch, options(6), &sink).unwrap();
        let (c0, p0) = block(&placer, "c0");
        let (c1, _) = block(&placer, "c1");
        let free = placer.grid().nearest_free(p0, 8).unwrap();

        assert!(placer.relocate(c0, free).unwrap());
        assert!(placer.relocate(c1, p0).unwrap());
        // c0 was at p0 two moves ago.
        assert!(!placer.try_swap(c0, c1).unwrap());
        assert_eq!(placer.grid().occupant(p0), Some(c1));
        assert_eq!(placer.grid().occupant(free), Some(c0));
    }

    #[test]
    fn rejected_swap_restores_state() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let mut placer = ZftPlacer::new(chain(), &arch, options(12), &sink).unwrap();
        let (c0, p0) = block(&placer, "c0");
        let (c2, p2) = block(&placer, "c2");
        let before = (
            placer.netlist().snapshot(c0),
            placer.netlist().snapshot(c2),
            placer.total_cost().unwrap(),
        );
        if !placer.try_swap(c0, c2).unwrap() {
            let after = (
                placer.netlist().snapshot(c0),
                placer.netlist().snapshot(c2),
                placer.total_cost().unwrap(),
            );
            assert_eq!(before, after);
            assert_eq!(placer.grid().occupant(p0), Some(c0));
            assert_eq!(placer.grid().occupant(p2), Some(c2));
        } else {
            assert!(placer.total_cost().unwrap() <= before.2);
            assert_eq!(placer.grid().occupant(p0), Some(c2));
        }
    }

    #[test]
    fn swap_with_pad_is_an_error() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let mut placer = ZftPlacer::new(chain(), &arch, options(1), &sink).unwrap();
        let (c0, _) = block(&placer, "c0");
        let (pad, _) = block(&placer, "in");
        assert!(placer.try_swap(c0, pad).is_err());
        assert!(placer.relocate(pad, Position::new(1, 1)).is_err());
    }

    #[test]
    fn placements_cover_all_elements_in_order() {
        let sink = DiagnosticSink::new();
        let arch = Architecture::with_io_rate(1);
        let mut placer = ZftPlacer::new(chain(), &arch, options(8), &sink).unwrap();
        placer.run(&CancelToken::new()).unwrap();
        let placed = placer.placements();
        let ids: Vec<u32> = placed.iter().map(|p| p.id.as_raw()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        for p in &placed {
            assert_eq!(p.subblock, 0);
            assert_eq!(Some(p.position), placer.netlist().element(p.id).position());
        }
    }
}
