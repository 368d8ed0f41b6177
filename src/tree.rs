//! Randomised spanning tree over the coarse (half resolution) grid.
//!
//! Every coarse node stands for a 2x2 block of fine cells. The tree is grown
//! with Prim's algorithm where every weight is replaced by a uniform random
//! pick, both when choosing the frontier node and when choosing which visited
//! neighbour it attaches to.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::error::TourError;
use crate::grid::{Direction, DirectionSet, Grid};
use crate::Coords;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanningTree {
    coarse: Grid,
    links: Vec<DirectionSet>,
}

impl SpanningTree {
    /// Grows a tree covering the coarse version of `fine`.
    pub fn grow<R: Rng + ?Sized>(fine: Grid, rng: &mut R) -> Result<Self, TourError> {
        if !fine.is_even() || fine.width() < 2 || fine.height() < 2 {
            return Err(TourError::InvalidDimensions {
                width: fine.width(),
                height: fine.height(),
                min: 2,
            });
        }

        let coarse = Grid::new(fine.width() / 2, fine.height() / 2);
        let total = coarse.area();
        let mut links = vec![DirectionSet::default(); total];
        let mut visited = vec![false; total];
        let mut in_frontier = vec![false; total];

        let start = (
            rng.gen_range(0..coarse.width()),
            rng.gen_range(0..coarse.height()),
        );
        visited[coarse.index_of(start)] = true;
        let mut visited_count = 1;

        let mut frontier: Vec<Coords> = Vec::new();
        for (_, next) in coarse.neighbours(start) {
            in_frontier[coarse.index_of(next)] = true;
            frontier.push(next);
        }

        let mut available = Vec::with_capacity(4);
        while visited_count < total {
            let picked = rng.gen_range(0..frontier.len());
            let node = frontier.swap_remove(picked);
            let slot = coarse.index_of(node);
            in_frontier[slot] = false;

            available.clear();
            for (dir, next) in coarse.neighbours(node) {
                let next_slot = coarse.index_of(next);
                if visited[next_slot] {
                    available.push((dir, next));
                } else if !in_frontier[next_slot] {
                    in_frontier[next_slot] = true;
                    frontier.push(next);
                }
            }

            debug_assert!(!available.is_empty(), "frontier node {:?} has no visited neighbour", node);
            if let Some(&(dir, parent)) = available.choose(rng) {
                links[slot].insert(dir);
                links[coarse.index_of(parent)].insert(dir.opposite());
                trace!(?node, ?parent, "tree edge");
            }

            visited[slot] = true;
            visited_count += 1;
        }

        Ok(SpanningTree { coarse, links })
    }

    pub fn coarse_grid(&self) -> Grid {
        self.coarse
    }

    /// Directions through which `node` is joined to its tree neighbours.
    pub fn links(&self, node: Coords) -> DirectionSet {
        if !self.coarse.contains(node) {
            return DirectionSet::default();
        }
        self.links[self.coarse.index_of(node)]
    }

    /// Each undirected edge exactly once, as `(node, right or lower neighbour)`.
    pub fn edges(&self) -> impl Iterator<Item = (Coords, Coords)> + '_ {
        self.coarse.cells().flat_map(move |node| {
            let set = self.links(node);
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter(move |dir| set.contains(*dir))
                .filter_map(move |dir| self.coarse.step(node, dir).map(|next| (node, next)))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.links.iter().map(|set| set.len()).sum::<usize>() / 2
    }
}
