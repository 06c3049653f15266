//! The placement array.
//!
//! An `S × S` grid of cells, each with `io_rate` sub-slots. The outer ring
//! (minus its four corners) holds I/O pads in any of its sub-slots; the
//! interior holds at most one logic block per cell, always in sub-slot 0.
//! Cells store element IDs; the element itself records its position.

use zft_common::{InternalError, Position, ZftResult};
use zft_netlist::ElementId;

/// The grid of element slots owned by a placer.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    size: u32,
    io_rate: u32,
    slots: Vec<Option<ElementId>>,
}

/// Returns the grid side length needed for `logic` blocks and `io` pads.
///
/// The result is the larger of `ceil(sqrt(logic)) + 2` and
/// `ceil(io / (4 · io_rate)) + 2`.
pub fn grid_size(logic: usize, io: usize, io_rate: u32) -> u32 {
    let io_rate = io_rate.max(1) as usize;
    let logic_side = ceil_sqrt(logic) + 2;
    let io_side = io.div_ceil(4 * io_rate) + 2;
    logic_side.max(io_side) as u32
}

fn ceil_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt().ceil() as usize;
    while root * root < n {
        root += 1;
    }
    while root > 0 && (root - 1) * (root - 1) >= n {
        root -= 1;
    }
    root
}

impl PlacementGrid {
    /// Creates an empty grid with side `size` and `io_rate` sub-slots per cell.
    pub fn new(size: u32, io_rate: u32) -> Self {
        let io_rate = io_rate.max(1);
        let cells = (size as usize) * (size as usize) * (io_rate as usize);
        Self {
            size,
            io_rate,
            slots: vec![None; cells],
        }
    }

    /// Side length `S` including the I/O ring.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of sub-slots per cell.
    pub fn io_rate(&self) -> u32 {
        self.io_rate
    }

    /// Side length of the logic area, `S − 2`.
    pub fn interior_size(&self) -> u32 {
        self.size.saturating_sub(2)
    }

    fn index(&self, pos: Position, slot: u32) -> usize {
        ((pos.x as usize * self.size as usize) + pos.y as usize) * self.io_rate as usize
            + slot as usize
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    /// Returns `true` if `pos` is a logic cell.
    pub fn is_interior(&self, pos: Position) -> bool {
        let last = self.size.saturating_sub(1);
        (1..last).contains(&pos.x) && (1..last).contains(&pos.y)
    }

    /// Returns `true` if `pos` is an I/O cell: on the outer ring, not a corner.
    pub fn is_pad_site(&self, pos: Position) -> bool {
        if !self.in_bounds(pos) || self.is_interior(pos) {
            return false;
        }
        let last = self.size - 1;
        let edge_x = pos.x == 0 || pos.x == last;
        let edge_y = pos.y == 0 || pos.y == last;
        !(edge_x && edge_y)
    }

    /// Returns the logic block in the cell at `pos`, if any.
    ///
    /// For perimeter cells this is whatever occupies sub-slot 0.
    pub fn occupant(&self, pos: Position) -> Option<ElementId> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.slots[self.index(pos, 0)]
    }

    /// Puts a logic block into an empty interior cell.
    pub fn place_logic(&mut self, id: ElementId, pos: Position) -> ZftResult<()> {
        if !self.is_interior(pos) {
            return Err(InternalError::new(format!(
                "logic block {id} cannot be placed outside the interior at {pos}"
            )));
        }
        let index = self.index(pos, 0);
        if let Some(other) = self.slots[index] {
            return Err(InternalError::new(format!(
                "cell {pos} is already occupied by block {other}"
            )));
        }
        self.slots[index] = Some(id);
        Ok(())
    }

    /// Moves the logic block at `from` into the empty interior cell `to`.
    pub fn move_logic(&mut self, id: ElementId, from: Position, to: Position) -> ZftResult<()> {
        let from_index = self.index(from, 0);
        if self.slots[from_index] != Some(id) {
            return Err(InternalError::new(format!(
                "block {id} is not recorded at {from}"
            )));
        }
        self.place_logic(id, to)?;
        self.slots[from_index] = None;
        Ok(())
    }

    /// Exchanges the logic blocks in two interior cells.
    pub fn swap_logic(&mut self, a: Position, b: Position) -> ZftResult<()> {
        if !self.is_interior(a) || !self.is_interior(b) {
            return Err(InternalError::new(format!(
                "cannot swap {a} and {b}: both cells must be interior"
            )));
        }
        let (ia, ib) = (self.index(a, 0), self.index(b, 0));
        self.slots.swap(ia, ib);
        Ok(())
    }

    /// Puts an I/O pad into the first free sub-slot of the pad cell `pos`.
    ///
    /// Returns the sub-slot used.
    pub fn place_pad(&mut self, id: ElementId, pos: Position) -> ZftResult<u32> {
        if !self.is_pad_site(pos) {
            return Err(InternalError::new(format!(
                "pad {id} cannot be placed at {pos}, which is not an I/O cell"
            )));
        }
        let start = self.index(pos, 0);
        for slot in 0..self.io_rate {
            let entry = &mut self.slots[start + slot as usize];
            if entry.is_none() {
                *entry = Some(id);
                return Ok(slot);
            }
        }
        Err(InternalError::new(format!(
            "pad {id} cannot be placed at {pos}: all {} sub-slots are taken",
            self.io_rate
        )))
    }

    /// Lists every pad cell once per sub-slot.
    ///
    /// Order: sub-slot round, then `x`, then `y`. Columns `0` and `S − 1`
    /// contribute every `y`; other columns only `y = 0` and `y = S − 1`.
    pub fn pad_sites(&self) -> Vec<Position> {
        let size = self.size;
        let mut sites = Vec::new();
        if size < 3 {
            return sites;
        }
        for _ in 0..self.io_rate {
            for x in 0..size {
                let mut y = 0;
                while y < size {
                    let pos = Position::new(x, y);
                    if self.is_pad_site(pos) {
                        sites.push(pos);
                    }
                    y += if x == 0 || x == size - 1 { 1 } else { size - 1 };
                }
            }
        }
        sites
    }

    /// Lists every interior cell in x-major, y-minor order.
    pub fn interior_sites(&self) -> Vec<Position> {
        let last = self.size.saturating_sub(1);
        (1..last)
            .flat_map(|x| (1..last).map(move |y| Position::new(x, y)))
            .collect()
    }

    /// Clamps `pos` onto the interior.
    pub fn clamp_to_interior(&self, pos: Position) -> Position {
        let hi = self.size.saturating_sub(2).max(1);
        Position::new(pos.x.clamp(1, hi), pos.y.clamp(1, hi))
    }

    /// Finds the empty interior cell nearest to `center` within `radius`.
    ///
    /// The window `[center − radius, center + radius]` is clamped to the
    /// interior. Distance is Euclidean; ties go to the first cell in
    /// x-major scan order.
    pub fn nearest_free(&self, center: Position, radius: u32) -> Option<Position> {
        if self.size < 3 {
            return None;
        }
        let hi = self.size - 2;
        let x0 = center.x.saturating_sub(radius).max(1);
        let y0 = center.y.saturating_sub(radius).max(1);
        let x1 = center.x.saturating_add(radius).min(hi);
        let y1 = center.y.saturating_add(radius).min(hi);

        let mut best: Option<(f64, Position)> = None;
        for x in x0..=x1 {
            for y in y0..=y1 {
                let pos = Position::new(x, y);
                if self.occupant(pos).is_some() {
                    continue;
                }
                let d = pos.distance(center);
                if best.map_or(true, |(best_d, _)| d < best_d) {
                    best = Some((d, pos));
                }
            }
        }
        best.map(|(_, pos)| pos)
    }

    /// Iterates over occupied slots in scan order as `(position, slot, id)`.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, u32, ElementId)> + '_ {
        let per_column = self.size as usize * self.io_rate as usize;
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            let id = (*slot)?;
            let x = (i / per_column) as u32;
            let y = ((i % per_column) / self.io_rate as usize) as u32;
            let z = (i % self.io_rate as usize) as u32;
            Some((Position::new(x, y), z, id))
        })
    }
}
