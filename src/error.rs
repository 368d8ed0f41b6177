use thiserror::Error;

use crate::Coords;

/// Errors raised while building a spanning tree or a tour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    #[error("grid {width}x{height} must have even sides of at least {min}")]
    InvalidDimensions { width: u16, height: u16, min: u16 },
    #[error("cell {0:?} lies outside the grid")]
    OutOfBounds(Coords),
    #[error("start cells {head:?} and {second:?} are not cardinally adjacent")]
    DetachedStart { head: Coords, second: Coords },
    #[error("cycle construction stalled at {at:?} after {placed} cells")]
    Stalled { at: Coords, placed: usize },
    #[error("tour holds {actual} cells but the grid has {expected}")]
    WrongLength { expected: usize, actual: usize },
    #[error("cell {0:?} appears more than once in the tour")]
    Duplicate(Coords),
    #[error("tour steps from {from:?} to {to:?} are not adjacent")]
    Broken { from: Coords, to: Coords },
}

/// Errors raised when asking for the next move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("occupied-cell sequence is empty")]
    EmptyBody,
    #[error("head {0:?} is not on the tour")]
    HeadOffTour(Coords),
}

/// Errors raised by the session loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("initial length {length} does not fit a grid {width} cells wide")]
    InvalidLength { length: u16, width: u16 },
    #[error(transparent)]
    Tour(#[from] TourError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}
