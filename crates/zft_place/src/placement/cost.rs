//! Bounding-box wirelength cost.
//!
//! A net costs `(width + height) · crossings(pins)` where width and height
//! span its pads inclusively (`max − min + 1`). The crossing factor corrects
//! the half-perimeter estimate for nets with many pins. Costs are cached on
//! the net and dropped by [`Netlist::set_position`].

use zft_common::{InternalError, ZftResult};
use zft_netlist::{ElementId, NetId, Netlist};

/// Expected wiring crossings per bounding box, indexed by pin count − 1.
pub const CROSSINGS: [f64; 50] = [
    1.0, 1.0, 1.0, 1.0828, 1.1536, 1.2206, 1.2823, 1.3385, 1.3991, 1.4493, 1.4974, 1.5455, 1.5937,
    1.6418, 1.6899, 1.7304, 1.7709, 1.8114, 1.8519, 1.8924, 1.9288, 1.9652, 2.0015, 2.0379, 2.0743,
    2.1061, 2.1379, 2.1698, 2.2016, 2.2334, 2.2646, 2.2958, 2.3271, 2.3583, 2.3895, 2.4187, 2.4479,
    2.4772, 2.5064, 2.5356, 2.5610, 2.5864, 2.6117, 2.6371, 2.6625, 2.6887, 2.7148, 2.7410, 2.7671,
    2.7933,
];

/// Growth of the crossing factor per pin beyond the table.
const CROSSINGS_SLOPE: f64 = 0.02616;

/// Returns the crossing factor for a net with `pins` pins.
pub fn crossings(pins: usize) -> f64 {
    match pins {
        0 => CROSSINGS[0],
        n if n <= CROSSINGS.len() => CROSSINGS[n - 1],
        n => CROSSINGS[CROSSINGS.len() - 1] + CROSSINGS_SLOPE * (n - CROSSINGS.len()) as f64,
    }
}

/// Computes the cost of `net` from the current pad positions, ignoring the cache.
///
/// A net without pads costs nothing. Every pad must be placed.
pub fn bounding_box_cost(netlist: &Netlist, net: NetId) -> ZftResult<f64> {
    let net = netlist.net(net);
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for &pad in net.pads() {
        let pos = netlist.element(pad).position().ok_or_else(|| {
            InternalError::new(format!(
                "net '{}' references unplaced block {pad}",
                net.name
            ))
        })?;
        bounds = Some(match bounds {
            None => (pos.x, pos.x, pos.y, pos.y),
            Some((x0, x1, y0, y1)) => (x0.min(pos.x), x1.max(pos.x), y0.min(pos.y), y1.max(pos.y)),
        });
    }
    let Some((x0, x1, y0, y1)) = bounds else {
        return Ok(0.0);
    };
    let factor = crossings(net.pin_count());
    let width = f64::from(x1 - x0 + 1);
    let height = f64::from(y1 - y0 + 1);
    Ok(width * factor + height * factor)
}

/// Returns the cost of `net`, computing and caching it if needed.
pub fn net_cost(netlist: &mut Netlist, net: NetId) -> ZftResult<f64> {
    if let Some(cost) = netlist.net(net).cached_cost() {
        return Ok(cost);
    }
    let cost = bounding_box_cost(netlist, net)?;
    tracing::trace!(net = %netlist.net(net).name, cost, "net cost recomputed");
    netlist.net_mut(net).store_cost(cost);
    Ok(cost)
}

/// Sums the cost of the input and output nets of `element`.
///
/// Global nets are not part of the wirelength estimate.
pub fn element_cost(netlist: &mut Netlist, element: ElementId) -> ZftResult<f64> {
    let nets: Vec<NetId> = netlist.element(element).pins.io_nets().collect();
    let mut total = 0.0;
    for net in nets {
        total += net_cost(netlist, net)?;
    }
    Ok(total)
}

/// Sums the cost of every net that is an input or output net of some element,
/// each net counted once.
pub fn total_cost(netlist: &mut Netlist) -> ZftResult<f64> {
    let mut counted = vec![false; netlist.net_count()];
    let mut nets = Vec::new();
    for element in &netlist.elements {
        for net in element.pins.io_nets() {
            if !counted[net.index()] {
                counted[net.index()] = true;
                nets.push(net);
            }
        }
    }
    let mut total = 0.0;
    for net in nets {
        total += net_cost(netlist, net)?;
    }
    Ok(total)
}
