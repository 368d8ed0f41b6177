//! Autopilot for snake: a Hamiltonian cycle over the grid, traced around a
//! random spanning tree, plus a navigator that follows it and takes safe
//! shortcuts toward the food.

pub mod cycle;
pub mod error;
pub mod game;
pub mod grid;
pub mod navigator;
pub mod session;
pub mod snake;
pub mod term;
pub mod tree;

pub type Coords = (u16, u16);

pub use cycle::{build_tour, Tour};
pub use error::{NavigationError, SessionError, TourError};
pub use grid::{Direction, DirectionSet, Grid};
pub use navigator::{is_ordered, next_direction, Navigator, ShortcutPolicy};
pub use session::{Phase, Session, SessionConfig, TickOutcome};
pub use tree::SpanningTree;
