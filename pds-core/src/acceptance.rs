//! Distance test against already accepted neighbours.

use crate::{config::AcceptanceRule, grid::AccelerationGrid, types::Point};

/// Decides whether `candidate` keeps its distance from every accepted point.
///
/// Looks at the block of cells around the candidate's cell selected by
/// `rule` (3×3 for [`AcceptanceRule::Reference`], 5×5 for
/// [`AcceptanceRule::Canonical`]) and rejects the candidate if any stored
/// point is strictly closer than `rule.threshold(min_distance)`.
///
/// The candidate's own cell is part of the block, so this test alone also
/// rejects candidates landing in an occupied cell.
///
/// ### Returns
/// `true` if no stored neighbour is too close.
pub fn accepts(
    candidate: Point,
    grid: &AccelerationGrid,
    rule: AcceptanceRule,
    min_distance: f32,
) -> bool {
    let threshold = rule.threshold(min_distance);
    let t2 = threshold * threshold;
    let cell = grid.cell_coords(candidate);

    grid.neighbours(cell, rule.cell_radius())
        .all(|q| q.distance_squared(candidate) >= t2)
}
