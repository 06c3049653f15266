//! Core netlist data structures.
//!
//! Defines the circuit seen by the placer: circuit elements (logic blocks and
//! I/O pads), the nets that connect them, and each element's classification
//! of its nets. The [`Netlist`] owns everything in two arenas and is the
//! single place where element positions change, so that moving an element
//! and invalidating the cost cache of its nets always happen together.

use crate::history::PositionHistory;
use crate::ids::{ElementId, NetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use zft_arch::PinClass;
use zft_common::{InternalError, Position, ZftResult};

/// The kind of a circuit element, deciding where it may be placed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ElementKind {
    /// An input pad on the perimeter.
    Input,
    /// An output pad on the perimeter.
    Output,
    /// A configurable logic block in the interior.
    Clb,
}

impl ElementKind {
    /// Returns `true` for logic blocks.
    pub fn is_logic(self) -> bool {
        self == ElementKind::Clb
    }

    /// The netlist keyword that introduces a block of this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            ElementKind::Input => ".input",
            ElementKind::Output => ".output",
            ElementKind::Clb => ".clb",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A hyperedge connecting circuit elements.
///
/// Keeps its pads in insertion order and caches its last computed cost. The
/// cache is cleared by [`Netlist::set_position`] whenever one of the pads
/// moves.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Net {
    /// The unique ID of this net.
    pub id: NetId,
    /// Net name as written in the netlist.
    pub name: String,
    /// Whether the net was declared global (e.g. a clock).
    pub is_global: bool,
    pads: Vec<ElementId>,
    #[serde(skip)]
    cached_cost: Option<f64>,
}

impl Net {
    /// Creates an unconnected net.
    pub fn new(id: NetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_global: false,
            pads: Vec::new(),
            cached_cost: None,
        }
    }

    /// Connects `pad` to this net.
    ///
    /// A pad may appear on a net only once; a second registration is an
    /// invariant violation.
    pub fn add_pad(&mut self, pad: ElementId) -> ZftResult<()> {
        if self.pads.contains(&pad) {
            return Err(InternalError::new(format!(
                "element #{pad} is already connected to net '{}'",
                self.name
            )));
        }
        self.pads.push(pad);
        self.cached_cost = None;
        Ok(())
    }

    /// The connected elements in insertion order.
    pub fn pads(&self) -> &[ElementId] {
        &self.pads
    }

    /// Number of connected elements.
    pub fn pin_count(&self) -> usize {
        self.pads.len()
    }

    /// The cached cost, if it is still valid.
    pub fn cached_cost(&self) -> Option<f64> {
        self.cached_cost
    }

    /// Stores a freshly computed cost.
    pub fn store_cost(&mut self, cost: f64) {
        self.cached_cost = Some(cost);
    }

    /// Drops the cached cost.
    pub fn invalidate_cost(&mut self) {
        self.cached_cost = None;
    }
}

/// The nets touching one element, grouped by pin class in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetClass {
    inputs: Vec<NetId>,
    outputs: Vec<NetId>,
    globals: Vec<NetId>,
}

impl NetClass {
    /// Creates an empty classification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `net` under `class`.
    pub fn add(&mut self, net: NetId, class: PinClass) {
        match class {
            PinClass::Input => self.inputs.push(net),
            PinClass::Output => self.outputs.push(net),
            PinClass::Global => self.globals.push(net),
        }
    }

    /// Input-class nets.
    pub fn inputs(&self) -> &[NetId] {
        &self.inputs
    }

    /// Output-class nets.
    pub fn outputs(&self) -> &[NetId] {
        &self.outputs
    }

    /// Global-class nets.
    pub fn globals(&self) -> &[NetId] {
        &self.globals
    }

    /// Input and output nets: the nets that carry cost and pulling force.
    pub fn io_nets(&self) -> impl Iterator<Item = NetId> + '_ {
        self.inputs.iter().chain(&self.outputs).copied()
    }

    /// Every net, globals included.
    pub fn all_nets(&self) -> impl Iterator<Item = NetId> + '_ {
        self.io_nets().chain(self.globals.iter().copied())
    }

    /// Returns `true` if `net` is recorded under any class.
    pub fn contains(&self, net: NetId) -> bool {
        self.all_nets().any(|n| n == net)
    }

    /// Total number of recorded nets.
    pub fn len(&self) -> usize {
        self.inputs.len() + self.outputs.len() + self.globals.len()
    }

    /// Returns `true` if no nets are recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One subblock (basic logic element) packed into a logic block.
///
/// Carried through from the netlist; placement does not look inside.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subblock {
    /// Subblock name.
    pub name: String,
    /// Pin references as written, `open` included.
    pub pins: Vec<String>,
}

/// A placeable unit: a logic block or an I/O pad.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CircuitElement {
    /// Block number, assigned in netlist order.
    pub id: ElementId,
    /// Unique block name.
    pub name: String,
    /// Logic block or pad.
    pub kind: ElementKind,
    /// The element's nets by pin class.
    pub pins: NetClass,
    /// Packed subblocks (logic blocks only).
    pub subblocks: Vec<Subblock>,
    /// Fan-out weight scaling this element's pull on its neighbours.
    pub weight: u32,
    position: Option<Position>,
    history: PositionHistory,
}

impl CircuitElement {
    /// Creates an unplaced, unconnected element with weight 1.
    pub fn new(id: ElementId, name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            pins: NetClass::new(),
            subblocks: Vec::new(),
            weight: 1,
            position: None,
            history: PositionHistory::new(),
        }
    }

    /// The current position, `None` before initial placement.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// The recently visited positions.
    pub fn history(&self) -> &PositionHistory {
        &self.history
    }

    /// Returns `true` if `pos` is one of the last few positions of this element.
    pub fn knows_position(&self, pos: Position) -> bool {
        self.history.contains(pos)
    }
}

/// Saved placement state of one element, used to undo a tentative move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementSnapshot {
    /// Position at the time of the snapshot.
    pub position: Option<Position>,
    /// History at the time of the snapshot.
    pub history: PositionHistory,
}

/// The netlist handed to the placer.
#[derive(Debug, Clone, Default)]
pub struct Netlist {
    /// All elements, indexed by block number.
    pub elements: Vec<CircuitElement>,
    /// All nets, in order of first appearance.
    pub nets: Vec<Net>,
    /// Element name to ID.
    element_by_name: HashMap<String, ElementId>,
    /// Net name to ID.
    net_by_name: HashMap<String, NetId>,
}

impl Netlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element; its block number is the next free index.
    pub fn add_element(&mut self, name: impl Into<String>, kind: ElementKind) -> ZftResult<ElementId> {
        let name = name.into();
        if self.element_by_name.contains_key(&name) {
            return Err(InternalError::new(format!("duplicate block name '{name}'")));
        }
        let id = ElementId::from_raw(self.elements.len() as u32);
        self.element_by_name.insert(name.clone(), id);
        self.elements.push(CircuitElement::new(id, name, kind));
        Ok(id)
    }

    /// Returns the net with the given name, creating it on first use.
    pub fn net_by_name_or_insert(&mut self, name: &str) -> NetId {
        if let Some(&id) = self.net_by_name.get(name) {
            return id;
        }
        let id = NetId::from_raw(self.nets.len() as u32);
        self.net_by_name.insert(name.to_string(), id);
        self.nets.push(Net::new(id, name));
        id
    }

    /// Connects `element` to `net` under `class`.
    ///
    /// Returns `Ok(false)` without changing anything if the element already
    /// lists the net on another pin.
    pub fn connect(&mut self, element: ElementId, net: NetId, class: PinClass) -> ZftResult<bool> {
        if self.element(element).pins.contains(net) {
            return Ok(false);
        }
        self.net_mut(net).add_pad(element)?;
        self.element_mut(element).pins.add(net, class);
        Ok(true)
    }

    /// Returns the element with the given ID.
    pub fn element(&self, id: ElementId) -> &CircuitElement {
        &self.elements[id.index()]
    }

    /// Returns a mutable reference to the element with the given ID.
    ///
    /// Positions are not reachable through this; use [`set_position`](Self::set_position).
    pub fn element_mut(&mut self, id: ElementId) -> &mut CircuitElement {
        &mut self.elements[id.index()]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.index()]
    }

    /// Returns a mutable reference to the net with the given ID.
    pub fn net_mut(&mut self, id: NetId) -> &mut Net {
        &mut self.nets[id.index()]
    }

    /// Looks an element up by block name.
    pub fn find_element(&self, name: &str) -> Option<ElementId> {
        self.element_by_name.get(name).copied()
    }

    /// Looks a net up by name.
    pub fn find_net(&self, name: &str) -> Option<NetId> {
        self.net_by_name.get(name).copied()
    }

    /// Returns the number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Moves `id` to `pos`.
    ///
    /// Records the position in the element's history and invalidates the
    /// cached cost of every net on the element, globals included.
    pub fn set_position(&mut self, id: ElementId, pos: Position) {
        let element = &mut self.elements[id.index()];
        element.position = Some(pos);
        element.history.push(pos);
        self.invalidate_nets_of(id);
    }

    /// Captures the position and history of `id`.
    pub fn snapshot(&self, id: ElementId) -> PlacementSnapshot {
        let element = self.element(id);
        PlacementSnapshot {
            position: element.position,
            history: element.history,
        }
    }

    /// Puts `id` back into a previously captured state.
    pub fn restore(&mut self, id: ElementId, snapshot: PlacementSnapshot) {
        let element = &mut self.elements[id.index()];
        element.position = snapshot.position;
        element.history = snapshot.history;
        self.invalidate_nets_of(id);
    }

    fn invalidate_nets_of(&mut self, id: ElementId) {
        let Self { elements, nets, .. } = self;
        for net in elements[id.index()].pins.all_nets() {
            nets[net.index()].invalidate_cost();
        }
    }

    /// Recomputes every element's weight as one plus its total fan-out.
    ///
    /// Global nets count here even though they carry no cost.
    pub fn refresh_weights(&mut self) {
        let Self { elements, nets, .. } = self;
        for element in elements.iter_mut() {
            let fanout: usize = element
                .pins
                .all_nets()
                .map(|net| nets[net.index()].pin_count().saturating_sub(1))
                .sum();
            element.weight = 1 + fanout as u32;
        }
    }

    /// Returns whether every element has a position.
    pub fn is_fully_placed(&self) -> bool {
        self.elements.iter().all(|e| e.position.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blocks_one_net() -> (Netlist, ElementId, ElementId, NetId) {
        let mut nl = Netlist::new();
        let a = nl.add_element("a", ElementKind::Clb).unwrap();
        let b = nl.add_element("b", ElementKind::Clb).unwrap();
        let n = nl.net_by_name_or_insert("n");
        nl.connect(a, n, PinClass::Output).unwrap();
        nl.connect(b, n, PinClass::Input).unwrap();
        (nl, a, b, n)
    }

    #[test]
    fn empty_netlist() {
        let nl = Netlist::new();
        assert_eq!(nl.element_count(), 0);
        assert_eq!(nl.net_count(), 0);
        assert!(nl.is_fully_placed());
    }

    #[test]
    fn block_numbers_are_dense() {
        let mut nl = Netlist::new();
        let a = nl.add_element("a", ElementKind::Input).unwrap();
        let b = nl.add_element("b", ElementKind::Clb).unwrap();
        assert_eq!(a.as_raw(), 0);
        assert_eq!(b.as_raw(), 1);
        assert_eq!(nl.find_element("b"), Some(b));
    }

    #[test]
    fn duplicate_element_name_rejected() {
        let mut nl = Netlist::new();
        nl.add_element("a", ElementKind::Clb).unwrap();
        assert!(nl.add_element("a", ElementKind::Clb).is_err());
    }

    #[test]
    fn nets_created_once() {
        let mut nl = Netlist::new();
        let n1 = nl.net_by_name_or_insert("clk");
        let n2 = nl.net_by_name_or_insert("clk");
        assert_eq!(n1, n2);
        assert_eq!(nl.net_count(), 1);
    }

    #[test]
    fn duplicate_pad_is_error() {
        let mut net = Net::new(NetId::from_raw(0), "n");
        let pad = ElementId::from_raw(3);
        net.add_pad(pad).unwrap();
        let err = net.add_pad(pad).unwrap_err();
        assert!(err.message.contains("already connected"));
        assert_eq!(net.pin_count(), 1);
    }

    #[test]
    fn connect_skips_repeated_net_on_same_element() {
        let (mut nl, a, _, n) = two_blocks_one_net();
        assert!(!nl.connect(a, n, PinClass::Input).unwrap());
        assert_eq!(nl.net(n).pin_count(), 2);
        assert_eq!(nl.element(a).pins.len(), 1);
    }

    #[test]
    fn net_class_groups() {
        let mut class = NetClass::new();
        class.add(NetId::from_raw(0), PinClass::Input);
        class.add(NetId::from_raw(1), PinClass::Global);
        class.add(NetId::from_raw(2), PinClass::Output);
        let io: Vec<_> = class.io_nets().map(|n| n.as_raw()).collect();
        let all: Vec<_> = class.all_nets().map(|n| n.as_raw()).collect();
        assert_eq!(io, vec![0, 2]);
        assert_eq!(all, vec![0, 2, 1]);
        assert!(class.contains(NetId::from_raw(1)));
    }

    #[test]
    fn set_position_records_history_and_invalidates() {
        let (mut nl, a, _, n) = two_blocks_one_net();
        nl.net_mut(n).store_cost(4.0);
        nl.set_position(a, Position::new(1, 1));
        assert_eq!(nl.element(a).position(), Some(Position::new(1, 1)));
        assert!(nl.element(a).knows_position(Position::new(1, 1)));
        assert_eq!(nl.net(n).cached_cost(), None);
    }

    #[test]
    fn global_nets_invalidated_too() {
        let mut nl = Netlist::new();
        let a = nl.add_element("a", ElementKind::Clb).unwrap();
        let clk = nl.net_by_name_or_insert("clk");
        nl.connect(a, clk, PinClass::Global).unwrap();
        nl.net_mut(clk).store_cost(1.0);
        nl.set_position(a, Position::new(2, 2));
        assert_eq!(nl.net(clk).cached_cost(), None);
    }

    #[test]
    fn restore_undoes_move() {
        let (mut nl, a, _, _) = two_blocks_one_net();
        nl.set_position(a, Position::new(1, 1));
        let snap = nl.snapshot(a);
        nl.set_position(a, Position::new(2, 2));
        nl.restore(a, snap);
        assert_eq!(nl.element(a).position(), Some(Position::new(1, 1)));
        assert!(!nl.element(a).knows_position(Position::new(2, 2)));
    }

    #[test]
    fn weights_count_fanout_including_globals() {
        let mut nl = Netlist::new();
        let a = nl.add_element("a", ElementKind::Clb).unwrap();
        let b = nl.add_element("b", ElementKind::Clb).unwrap();
        let c = nl.add_element("c", ElementKind::Clb).unwrap();
        let n = nl.net_by_name_or_insert("n");
        let clk = nl.net_by_name_or_insert("clk");
        for e in [a, b, c] {
            nl.connect(e, n, PinClass::Input).unwrap();
        }
        nl.connect(a, clk, PinClass::Global).unwrap();
        nl.connect(b, clk, PinClass::Global).unwrap();
        nl.refresh_weights();
        // a: 1 + (3-1) + (2-1)
        assert_eq!(nl.element(a).weight, 4);
        assert_eq!(nl.element(c).weight, 3);
    }

    #[test]
    fn element_kind_keywords() {
        assert_eq!(ElementKind::Clb.to_string(), ".clb");
        assert!(!ElementKind::Input.is_logic());
        assert!(ElementKind::Clb.is_logic());
    }
}
