//! Per-tick move selection on top of a precomputed tour.
//!
//! The agent follows the tour by default. It may cut across to a neighbour
//! further along the tour when that brings it strictly closer to the target
//! and the body stays ordered afterwards (see [`is_ordered`]).

use tracing::trace;

use crate::cycle::Tour;
use crate::error::NavigationError;
use crate::grid::Direction;
use crate::Coords;

/// Body share of the grid from which shortcuts are no longer considered.
pub const DEFAULT_FILL_LIMIT: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortcutPolicy {
    /// First qualifying neighbour in `Direction::ALL` order.
    #[default]
    FirstImproving,
    /// Qualifying neighbour that leaves the fewest tour steps to the target.
    Greedy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigator {
    pub fill_limit: f64,
    pub policy: ShortcutPolicy,
}

impl Default for Navigator {
    fn default() -> Self {
        Navigator { fill_limit: DEFAULT_FILL_LIMIT, policy: ShortcutPolicy::default() }
    }
}

impl Navigator {
    pub fn new(fill_limit: f64, policy: ShortcutPolicy) -> Self {
        Navigator { fill_limit, policy }
    }

    pub fn shortcuts_enabled(&self, tour: &Tour, body_len: usize) -> bool {
        (body_len as f64) < tour.len() as f64 * self.fill_limit
    }

    /// Picks the move for this tick. `body` is head first; `target` is the food, if any.
    pub fn next_direction(
        &self,
        tour: &Tour,
        body: &[Coords],
        target: Option<Coords>,
    ) -> Result<Direction, NavigationError> {
        let head = *body.first().ok_or(NavigationError::EmptyBody)?;
        let head_index = tour.position(head).ok_or(NavigationError::HeadOffTour(head))?;

        if let Some(target) = target {
            if self.shortcuts_enabled(tour, body.len()) {
                if let Some(dir) = self.shortcut(tour, body, head, head_index, target) {
                    return Ok(dir);
                }
            }
        }

        Ok(default_move(tour, body, head, head_index))
    }

    fn shortcut(
        &self,
        tour: &Tour,
        body: &[Coords],
        head: Coords,
        head_index: usize,
        target: Coords,
    ) -> Option<Direction> {
        let target_index = tour.position(target)?;
        let current = tour.distance(head_index, target_index);
        let grid = tour.grid();

        let mut best: Option<(Direction, usize)> = None;
        let mut extended = Vec::with_capacity(body.len() + 1);

        for (dir, next) in grid.neighbours(head) {
            if body.contains(&next) {
                continue;
            }
            let remaining = match tour.position(next) {
                Some(i) => tour.distance(i, target_index),
                None => continue,
            };
            if remaining >= current {
                continue;
            }

            extended.clear();
            extended.push(next);
            extended.extend_from_slice(body);
            if !is_ordered(tour, &extended) {
                continue;
            }

            match self.policy {
                ShortcutPolicy::FirstImproving => {
                    trace!(?dir, remaining, current, "shortcut");
                    return Some(dir);
                }
                ShortcutPolicy::Greedy => {
                    if best.map_or(true, |(_, seen)| remaining < seen) {
                        best = Some((dir, remaining));
                    }
                }
            }
        }

        if let Some((dir, remaining)) = best {
            trace!(?dir, remaining, current, "shortcut");
        }
        best.map(|(dir, _)| dir)
    }
}

/// [`Navigator::next_direction`] with the default fill limit and policy.
pub fn next_direction(
    tour: &Tour,
    body: &[Coords],
    target: Option<Coords>,
) -> Result<Direction, NavigationError> {
    Navigator::default().next_direction(tour, body, target)
}

/// True when the body, read tail to head, climbs monotonically along the tour
/// (modulo wraparound). An ordered body can always keep following the tour:
/// every cell between the head and the tail, going forward, is free.
pub fn is_ordered(tour: &Tour, body: &[Coords]) -> bool {
    let tail = match body.last().and_then(|&pos| tour.position(pos)) {
        Some(i) => i,
        None => return body.is_empty(),
    };

    let mut previous = usize::MAX;
    for &segment in body {
        let offset = match tour.position(segment) {
            Some(i) => tour.distance(tail, i),
            None => return false,
        };
        if offset >= previous {
            return false;
        }
        previous = offset;
    }

    true
}

fn default_move(tour: &Tour, body: &[Coords], head: Coords, head_index: usize) -> Direction {
    let next = tour.cell_at(head_index + 1);
    let along_tour = Direction::between(head, next);

    if !blocks(body, next) {
        if let Some(dir) = along_tour {
            return dir;
        }
    }

    let grid = tour.grid();
    let open = grid
        .neighbours(head)
        .find(|(_, pos)| !body.contains(pos))
        .or_else(|| grid.neighbours(head).find(|(_, pos)| !blocks(body, *pos)))
        .map(|(dir, _)| dir);

    // Boxed in: keep to the tour and let the caller register the crash.
    open.or(along_tour).unwrap_or(Direction::Up)
}

// The tail vacates on the tick the head moves, so it does not block.
fn blocks(body: &[Coords], pos: Coords) -> bool {
    match body.split_last() {
        Some((_, rest)) => rest.contains(&pos),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Direction::*, Grid};

    // 0:(0,0) 1:(1,0) 2:(2,0) 3:(3,0)
    // 15:(0,1) 6:(1,1) 5:(2,1) 4:(3,1)
    // 14:(0,2) 7:(1,2) 8:(2,2) 9:(3,2)
    // 13:(0,3) 12:(1,3) 11:(2,3) 10:(3,3)
    fn comb() -> Tour {
        let cells = vec![
            (0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (2, 1), (1, 1), (1, 2),
            (2, 2), (3, 2), (3, 3), (2, 3), (1, 3), (0, 3), (0, 2), (0, 1),
        ];
        Tour::from_cells(Grid::new(4, 4), cells).unwrap()
    }

    #[test]
    fn ordered_square_body() {
        let tour = Tour::from_cells(Grid::new(2, 2), vec![(0, 0), (1, 0), (1, 1), (0, 1)]).unwrap();
        assert!(is_ordered(&tour, &[(0, 0), (0, 1)]));
        assert!(is_ordered(&tour, &[(1, 1), (1, 0), (0, 0)]));
        assert!(!is_ordered(&tour, &[(0, 1), (0, 0), (1, 0)]));
        assert!(!is_ordered(&tour, &[(1, 0), (1, 1), (0, 0)]));
    }

    #[test]
    fn single_segment_and_empty_bodies_are_ordered() {
        let tour = comb();
        assert!(is_ordered(&tour, &[(2, 2)]));
        assert!(is_ordered(&tour, &[]));
        assert!(!is_ordered(&tour, &[(9, 9)]));
    }

    #[test]
    fn takes_the_cut_through_the_comb() {
        let tour = comb();
        // Head at index 1, food at index 7: dropping down to index 6 skips four cells.
        let dir = next_direction(&tour, &[(1, 0), (0, 0)], Some((1, 2))).unwrap();
        assert_eq!(dir, Down);
    }

    #[test]
    fn no_target_means_no_cut() {
        let tour = comb();
        let dir = next_direction(&tour, &[(1, 0), (0, 0)], None).unwrap();
        assert_eq!(dir, Right);
    }

    #[test]
    fn refuses_cuts_that_would_disorder_the_body() {
        let tour = comb();
        // Tail (2,0)=2 lies between the head (1,0)=1 and the cut (1,1)=6.
        let dir = next_direction(&tour, &[(1, 0), (2, 0)], Some((1, 2))).unwrap();
        assert_eq!(dir, Right);
    }

    #[test]
    fn greedy_policy_prefers_the_longest_jump() {
        let tour = comb();
        let body = [(0, 2), (0, 3)];
        // Head (0,2)=14, food (2,2)=8: Up gains one step, Right lands next to the food.
        assert_eq!(next_direction(&tour, &body, Some((2, 2))).unwrap(), Up);

        let greedy = Navigator::new(DEFAULT_FILL_LIMIT, ShortcutPolicy::Greedy);
        assert_eq!(greedy.next_direction(&tour, &body, Some((2, 2))).unwrap(), Right);
    }

    #[test]
    fn falls_back_when_the_tour_is_blocked() {
        let tour = comb();
        // Next on the tour from (1,0) is (2,0), which is mid-body here.
        let body = [(1, 0), (1, 1), (2, 1), (2, 0), (3, 0)];
        let dir = next_direction(&tour, &body, None).unwrap();
        assert_eq!(dir, Left);
    }

    #[test]
    fn tail_does_not_block_the_tour() {
        let tour = comb();
        let body = [(1, 0), (1, 1), (2, 1), (2, 0)];
        let dir = next_direction(&tour, &body, None).unwrap();
        assert_eq!(dir, Right);
    }

    #[test]
    fn only_the_tail_is_free() {
        let tour = comb();
        // Both neighbours of (0,0) are body; (0,1) is the tail and moves away.
        let body = [(0, 0), (1, 0), (1, 1), (0, 1)];
        assert_eq!(next_direction(&tour, &body, None).unwrap(), Down);
    }

    #[test]
    fn boxed_in_keeps_to_the_tour() {
        let tour = comb();
        let body = [(0, 0), (1, 0), (1, 1), (0, 1), (0, 2)];
        assert_eq!(next_direction(&tour, &body, None).unwrap(), Right);
    }

    #[test]
    fn reports_invalid_bodies() {
        let tour = comb();
        assert_eq!(next_direction(&tour, &[], None), Err(NavigationError::EmptyBody));
        assert_eq!(
            next_direction(&tour, &[(7, 7)], None),
            Err(NavigationError::HeadOffTour((7, 7)))
        );
    }
}
