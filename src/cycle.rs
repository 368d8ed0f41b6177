//! Hamiltonian cycle over the fine grid, traced around a coarse spanning tree.

use rand::Rng;
use tracing::debug;

use crate::error::TourError;
use crate::grid::{Direction, Grid};
use crate::tree::SpanningTree;
use crate::Coords;

/// Smallest side `build_tour` accepts.
pub const MIN_SIDE: u16 = 4;

/// A closed walk visiting every cell once. `cells[0]` is where it was started
/// and the last cell is adjacent to it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    grid: Grid,
    cells: Vec<Coords>,
    // grid slot -> tour index
    positions: Vec<usize>,
}

impl Tour {
    /// Traces the cycle implied by `tree`, starting at `head`. The result is
    /// oriented so that stepping forward from `head` never lands on `second`.
    pub fn from_tree(tree: &SpanningTree, head: Coords, second: Coords) -> Result<Self, TourError> {
        let coarse = tree.coarse_grid();
        let grid = Grid::new(coarse.width() * 2, coarse.height() * 2);

        for pos in [head, second] {
            if !grid.contains(pos) {
                return Err(TourError::OutOfBounds(pos));
            }
        }
        if Direction::between(head, second).is_none() {
            return Err(TourError::DetachedStart { head, second });
        }

        let total = grid.area();
        let mut cells = Vec::with_capacity(total);
        let mut placed = vec![false; total];
        cells.push(head);
        placed[grid.index_of(head)] = true;

        while cells.len() < total {
            let current = cells[cells.len() - 1];
            let next = grid
                .neighbours(current)
                .filter(|(_, next)| !placed[grid.index_of(*next)])
                .find(|(dir, next)| may_step(tree, current, *next, *dir))
                .map(|(_, next)| next);

            match next {
                Some(next) => {
                    placed[grid.index_of(next)] = true;
                    cells.push(next);
                }
                None => return Err(TourError::Stalled { at: current, placed: cells.len() }),
            }
        }

        if cells[1] == second {
            cells[1..].reverse();
        }

        debug!(width = grid.width(), height = grid.height(), ?head, "tour traced");
        Tour::from_cells(grid, cells)
    }

    /// Wraps an explicit cell order, checking that it is a Hamiltonian cycle of `grid`.
    pub fn from_cells(grid: Grid, cells: Vec<Coords>) -> Result<Self, TourError> {
        if cells.len() != grid.area() {
            return Err(TourError::WrongLength { expected: grid.area(), actual: cells.len() });
        }

        let mut positions = vec![usize::MAX; grid.area()];
        for (i, &pos) in cells.iter().enumerate() {
            if !grid.contains(pos) {
                return Err(TourError::OutOfBounds(pos));
            }
            let slot = &mut positions[grid.index_of(pos)];
            if *slot != usize::MAX {
                return Err(TourError::Duplicate(pos));
            }
            *slot = i;
        }

        for (i, &from) in cells.iter().enumerate() {
            let to = cells[(i + 1) % cells.len()];
            if Direction::between(from, to).is_none() {
                return Err(TourError::Broken { from, to });
            }
        }

        Ok(Tour { grid, cells, positions })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn cells(&self) -> &[Coords] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn position(&self, pos: Coords) -> Option<usize> {
        if !self.grid.contains(pos) {
            return None;
        }
        Some(self.positions[self.grid.index_of(pos)])
    }

    pub fn cell_at(&self, index: usize) -> Coords {
        self.cells[index % self.cells.len()]
    }

    pub fn successor(&self, pos: Coords) -> Option<Coords> {
        self.position(pos).map(|i| self.cell_at(i + 1))
    }

    /// Steps needed to walk forward from tour index `from` to tour index `to`.
    pub fn distance(&self, from: usize, to: usize) -> usize {
        let len = self.cells.len();
        (to % len + len - from % len) % len
    }
}

/// Builds a fresh random tour for a `width` x `height` grid, starting at `head`
/// and heading away from `second`.
pub fn build_tour<R: Rng + ?Sized>(
    width: u16,
    height: u16,
    head: Coords,
    second: Coords,
    rng: &mut R,
) -> Result<Tour, TourError> {
    let grid = Grid::new(width, height);
    if !grid.is_even() || width < MIN_SIDE || height < MIN_SIDE {
        return Err(TourError::InvalidDimensions { width, height, min: MIN_SIDE });
    }

    let tree = SpanningTree::grow(grid, rng)?;
    Tour::from_tree(&tree, head, second)
}

fn may_step(tree: &SpanningTree, from: Coords, to: Coords, dir: Direction) -> bool {
    let block = (from.0 / 2, from.1 / 2);
    let links = tree.links(block);

    if block != (to.0 / 2, to.1 / 2) {
        return links.contains(dir);
    }

    let (sub_x, sub_y) = (from.0 % 2, from.1 % 2);
    if dir.is_vertical() {
        !((links.contains(Direction::Left) && sub_x == 0) || (links.contains(Direction::Right) && sub_x == 1))
    } else {
        !((links.contains(Direction::Up) && sub_y == 0) || (links.contains(Direction::Down) && sub_y == 1))
    }
}
