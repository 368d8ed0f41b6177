use crate::grid::{Direction::{*, self}, Grid};
use crate::Coords;
use MoveResult::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved,
    Crashed
}

/// The occupied-cell sequence, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Coords>,
    direction: Direction,
}

impl Snake {
    /// Lays out `size` cells in a straight line ending at `head`, facing `direction`.
    /// Returns `None` if the line would leave `grid`.
    pub fn new(head: Coords, size: u16, direction: Direction, grid: Grid) -> Option<Self> {
        if !grid.contains(head) {
            return None;
        }

        let back = direction.opposite();
        let mut body = vec![head];

        for _ in 1..size {
            let last = body[body.len() - 1];
            body.push(grid.step(last, back)?);
        }

        Some(Snake { body, direction })
    }

    pub fn body(&self) -> &[Coords] {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Advances the head one cell. When `grows` is set the tail stays put.
    /// A crash leaves the body untouched.
    pub fn move_step(&mut self, direction: Direction, grid: Grid, grows: bool) -> MoveResult {
        let new_head = match grid.step(self.head(), direction) {
            Some(pos) => pos,
            None => return Crashed,
        };

        // The tail only stays in the way if it is not about to move.
        let solid = if grows { &self.body[..] } else { &self.body[..self.body.len() - 1] };
        if solid.contains(&new_head) {
            return Crashed;
        }

        self.direction = direction;
        self.body.insert(0, new_head);
        if !grows {
            self.body.pop();
        }

        Moved
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
