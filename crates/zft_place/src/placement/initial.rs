//! Initial placement.
//!
//! Pads always go to random I/O sub-slots. Logic blocks go either to random
//! interior cells or, in net order, to interior cells in scan order so that
//! blocks sharing small nets start out next to each other.

use super::cost::crossings;
use super::grid::PlacementGrid;
use rand::Rng;
use zft_common::{InternalError, Position, ZftResult};
use zft_netlist::{ElementId, NetId, Netlist};

/// Places every pad in `pads` on a random free pad sub-slot.
pub(crate) fn place_pads(
    netlist: &mut Netlist,
    grid: &mut PlacementGrid,
    pads: &[ElementId],
    rng: &mut impl Rng,
) -> ZftResult<()> {
    let mut free = grid.pad_sites();
    for &pad in pads {
        let pos = take_random(&mut free, rng)
            .ok_or_else(|| InternalError::new(format!("no free I/O slot left for pad {pad}")))?;
        grid.place_pad(pad, pos)?;
        netlist.set_position(pad, pos);
    }
    Ok(())
}

/// Places every block in `logic` on a random free interior cell.
pub(crate) fn place_logic_random(
    netlist: &mut Netlist,
    grid: &mut PlacementGrid,
    logic: &[ElementId],
    rng: &mut impl Rng,
) -> ZftResult<()> {
    let mut free = grid.interior_sites();
    for &block in logic {
        let pos = take_random(&mut free, rng)
            .ok_or_else(|| InternalError::new(format!("no free cell left for block {block}")))?;
        place_block(netlist, grid, block, pos)?;
    }
    Ok(())
}

/// Places logic blocks net by net, cheapest nets first.
///
/// Nets are taken in ascending crossing-factor order (stable, so equal
/// factors keep file order). Each unplaced logic block on a net takes the
/// next free interior cell in scan order. Blocks on no net fill the cells
/// that remain.
pub(crate) fn place_logic_by_nets(
    netlist: &mut Netlist,
    grid: &mut PlacementGrid,
    logic: &[ElementId],
) -> ZftResult<()> {
    let mut order: Vec<NetId> = netlist.nets.iter().map(|net| net.id).collect();
    order.sort_by(|&a, &b| {
        let ca = crossings(netlist.net(a).pin_count());
        let cb = crossings(netlist.net(b).pin_count());
        ca.total_cmp(&cb)
    });

    let mut free = grid.interior_sites().into_iter();
    for net in order {
        let pads: Vec<ElementId> = netlist.net(net).pads().to_vec();
        for pad in pads {
            let element = netlist.element(pad);
            if element.kind.is_logic() && element.position().is_none() {
                let pos = next_cell(&mut free, pad)?;
                place_block(netlist, grid, pad, pos)?;
            }
        }
    }

    for &block in logic {
        if netlist.element(block).position().is_none() {
            let pos = next_cell(&mut free, block)?;
            place_block(netlist, grid, block, pos)?;
        }
    }
    Ok(())
}

fn next_cell(free: &mut impl Iterator<Item = Position>, block: ElementId) -> ZftResult<Position> {
    free.next()
        .ok_or_else(|| InternalError::new(format!("no free cell left for block {block}")))
}

fn place_block(
    netlist: &mut Netlist,
    grid: &mut PlacementGrid,
    block: ElementId,
    pos: Position,
) -> ZftResult<()> {
    grid.place_logic(block, pos)?;
    netlist.set_position(block, pos);
    Ok(())
}

/// Removes and returns a uniformly chosen entry of `free`.
fn take_random(free: &mut Vec<Position>, rng: &mut impl Rng) -> Option<Position> {
    if free.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..free.len());
    Some(free.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use zft_arch::PinClass;
    use zft_netlist::ElementKind;

    fn netlist_with(logic: usize, pads: usize) -> (Netlist, Vec<ElementId>, Vec<ElementId>) {
        let mut nl = Netlist::new();
        let logic_ids: Vec<_> = (0..logic)
            .map(|i| nl.add_element(format!("clb_{i}"), ElementKind::Clb).unwrap())
            .collect();
        let pad_ids: Vec<_> = (0..pads)
            .map(|i| nl.add_element(format!("pad_{i}"), ElementKind::Input).unwrap())
            .collect();
        (nl, logic_ids, pad_ids)
    }

    #[test]
    fn pads_land_on_distinct_slots() {
        let (mut nl, _, pads) = netlist_with(0, 12);
        let mut grid = PlacementGrid::new(4, 2);
        let mut rng = StdRng::seed_from_u64(7);
        place_pads(&mut nl, &mut grid, &pads, &mut rng).unwrap();

        let slots: HashSet<_> = grid.occupied().map(|(pos, z, _)| (pos, z)).collect();
        assert_eq!(slots.len(), 12);
        for &pad in &pads {
            assert!(grid.is_pad_site(nl.element(pad).position().unwrap()));
        }
    }

    #[test]
    fn too_many_pads_is_an_error() {
        let (mut nl, _, pads) = netlist_with(0, 5);
        let mut grid = PlacementGrid::new(3, 1);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(place_pads(&mut nl, &mut grid, &pads, &mut rng).is_err());
    }

    #[test]
    fn random_logic_fills_distinct_cells() {
        let (mut nl, logic, _) = netlist_with(9, 0);
        let mut grid = PlacementGrid::new(5, 1);
        let mut rng = StdRng::seed_from_u64(3);
        place_logic_random(&mut nl, &mut grid, &logic, &mut rng).unwrap();
        let cells: HashSet<_> = logic
            .iter()
            .map(|&id| nl.element(id).position().unwrap())
            .collect();
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|&p| grid.is_interior(p)));
    }

    #[test]
    fn same_seed_same_layout() {
        let layout = |seed| {
            let (mut nl, logic, _) = netlist_with(6, 0);
            let mut grid = PlacementGrid::new(5, 1);
            let mut rng = StdRng::seed_from_u64(seed);
            place_logic_random(&mut nl, &mut grid, &logic, &mut rng).unwrap();
            logic
                .iter()
                .map(|&id| nl.element(id).position().unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(layout(11), layout(11));
    }

    #[test]
    fn net_order_places_small_nets_first() {
        let (mut nl, logic, _) = netlist_with(4, 0);
        // "wide" has four pins, "pair" has two: pair's blocks go first.
        let wide = nl.net_by_name_or_insert("wide");
        for &id in &logic {
            nl.connect(id, wide, PinClass::Input).unwrap();
        }
        let pair = nl.net_by_name_or_insert("pair");
        nl.connect(logic[3], pair, PinClass::Output).unwrap();
        nl.connect(logic[2], pair, PinClass::Input).unwrap();

        let mut grid = PlacementGrid::new(4, 1);
        place_logic_by_nets(&mut nl, &mut grid, &logic).unwrap();

        let pos = |i: usize| nl.element(logic[i]).position().unwrap();
        assert_eq!(pos(3), Position::new(1, 1));
        assert_eq!(pos(2), Position::new(1, 2));
        assert_eq!(pos(0), Position::new(2, 1));
        assert_eq!(pos(1), Position::new(2, 2));
    }

    #[test]
    fn net_order_places_unconnected_blocks_last() {
        let (mut nl, logic, _) = netlist_with(3, 0);
        let n = nl.net_by_name_or_insert("n");
        nl.connect(logic[2], n, PinClass::Output).unwrap();
        nl.connect(logic[1], n, PinClass::Input).unwrap();

        let mut grid = PlacementGrid::new(4, 1);
        place_logic_by_nets(&mut nl, &mut grid, &logic).unwrap();
        assert_eq!(nl.element(logic[2]).position(), Some(Position::new(1, 1)));
        assert_eq!(nl.element(logic[1]).position(), Some(Position::new(1, 2)));
        assert_eq!(nl.element(logic[0]).position(), Some(Position::new(2, 1)));
    }

    #[test]
    fn net_order_skips_pads() {
        let (mut nl, logic, pads) = netlist_with(1, 1);
        let n = nl.net_by_name_or_insert("n");
        nl.connect(pads[0], n, PinClass::Output).unwrap();
        nl.connect(logic[0], n, PinClass::Input).unwrap();
        let mut grid = PlacementGrid::new(3, 1);
        place_logic_by_nets(&mut nl, &mut grid, &logic).unwrap();
        assert_eq!(nl.element(pads[0]).position(), None);
        assert_eq!(nl.element(logic[0]).position(), Some(Position::new(1, 1)));
    }
}
