use crate::Coords;
use Direction::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Neighbour priority used everywhere a choice between directions is made.
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }

    /// The direction of a single cardinal step from `from` to `to`, if there is one.
    pub fn between(from: Coords, to: Coords) -> Option<Direction> {
        let dx = to.0 as i32 - from.0 as i32;
        let dy = to.1 as i32 - from.1 as i32;
        Direction::ALL.iter().copied().find(|dir| dir.delta() == (dx, dy))
    }

    fn bit(self) -> u8 {
        match self {
            Up => 1,
            Down => 1 << 1,
            Left => 1 << 2,
            Right => 1 << 3,
        }
    }
}

/// Small bitset of directions, one per spanning-tree node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    pub fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |dir| self.contains(*dir))
    }
}

/// Rectangular playing field. Cells are addressed `(x, y)` with the origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
}

impl Grid {
    pub const fn new(width: u16, height: u16) -> Self {
        Grid { width, height }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_even(&self) -> bool {
        self.width % 2 == 0 && self.height % 2 == 0
    }

    pub fn contains(&self, pos: Coords) -> bool {
        pos.0 < self.width && pos.1 < self.height
    }

    /// Row-major slot of `pos`. Only meaningful for cells inside the grid.
    pub fn index_of(&self, pos: Coords) -> usize {
        pos.1 as usize * self.width as usize + pos.0 as usize
    }

    pub fn cells(&self) -> impl Iterator<Item = Coords> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    pub fn step(&self, pos: Coords, dir: Direction) -> Option<Coords> {
        let (dx, dy) = dir.delta();
        let x = pos.0 as i32 + dx;
        let y = pos.1 as i32 + dy;

        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }

        Some((x as u16, y as u16))
    }

    /// On-grid neighbours of `pos` in `Direction::ALL` order.
    pub fn neighbours(&self, pos: Coords) -> impl Iterator<Item = (Direction, Coords)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.step(pos, dir).map(|next| (dir, next)))
    }
}
