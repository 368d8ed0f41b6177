//! State owned by the game loop: the body, the food, the tour for this round
//! and whether the round is still going. The navigator only ever sees
//! read-only snapshots of it.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::cycle::{build_tour, Tour};
use crate::error::SessionError;
use crate::grid::{Direction, Grid};
use crate::navigator::Navigator;
use crate::snake::{MoveResult, Snake};
use crate::Coords;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub width: u16,
    pub height: u16,
    pub initial_length: u16,
    pub navigator: Navigator,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig { width: 18, height: 18, initial_length: 3, navigator: Navigator::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Spawned, waiting for the first key press.
    Frozen,
    Running,
    Dead,
    /// The body covers every cell.
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Moved { direction: Direction, ate: bool },
    Crashed,
    Won,
}

pub struct Session {
    config: SessionConfig,
    grid: Grid,
    rng: ChaCha8Rng,
    tour: Tour,
    snake: Snake,
    food: Option<Coords>,
    phase: Phase,
    score: u32,
    ticks: u64,
    round: u32,
}

impl Session {
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self, SessionError> {
        let grid = Grid::new(config.width, config.height);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (snake, tour) = spawn(&config, grid, &mut rng)?;

        let mut session = Session {
            config,
            grid,
            rng,
            tour,
            snake,
            food: None,
            phase: Phase::Frozen,
            score: 0,
            ticks: 0,
            round: 1,
        };
        session.food = session.spawn_food();

        info!(seed, width = grid.width(), height = grid.height(), "session created");
        Ok(session)
    }

    /// Starts a new round on a fresh tour.
    pub fn respawn(&mut self) -> Result<(), SessionError> {
        let (snake, tour) = spawn(&self.config, self.grid, &mut self.rng)?;
        self.snake = snake;
        self.tour = tour;
        self.food = self.spawn_food();
        self.phase = Phase::Frozen;
        self.score = 0;
        self.ticks = 0;
        self.round += 1;

        info!(round = self.round, "respawned");
        Ok(())
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Frozen {
            self.phase = Phase::Running;
        }
    }

    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        if self.phase != Phase::Running {
            return Ok(TickOutcome::Idle);
        }

        let direction = self.config.navigator.next_direction(&self.tour, self.snake.body(), self.food)?;
        let grows = match (self.grid.step(self.snake.head(), direction), self.food) {
            (Some(next), Some(food)) => next == food,
            _ => false,
        };
        self.ticks += 1;

        match self.snake.move_step(direction, self.grid, grows) {
            MoveResult::Crashed => {
                self.phase = Phase::Dead;
                warn!(round = self.round, score = self.score, ticks = self.ticks, ?direction, "crashed");
                Ok(TickOutcome::Crashed)
            }
            MoveResult::Moved if grows => {
                self.score += 1;
                self.food = self.spawn_food();

                if self.food.is_none() {
                    self.phase = Phase::Won;
                    info!(round = self.round, score = self.score, ticks = self.ticks, "grid filled");
                    return Ok(TickOutcome::Won);
                }

                debug!(score = self.score, ticks = self.ticks, "food eaten");
                Ok(TickOutcome::Moved { direction, ate: true })
            }
            MoveResult::Moved => Ok(TickOutcome::Moved { direction, ate: false }),
        }
    }

    /// Runs the round until it ends or `max_ticks` moves have been made.
    pub fn play_out(&mut self, max_ticks: u64) -> Result<Phase, SessionError> {
        self.start();
        while self.phase == Phase::Running && self.ticks < max_ticks {
            self.tick()?;
        }
        Ok(self.phase)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Coords> {
        self.food
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    fn spawn_food(&mut self) -> Option<Coords> {
        let mut occupied = vec![false; self.grid.area()];
        for pos in self.snake.body() {
            occupied[self.grid.index_of(*pos)] = true;
        }

        let grid = self.grid;
        let choices: Vec<Coords> = grid.cells().filter(|pos| !occupied[grid.index_of(*pos)]).collect();
        choices.choose(&mut self.rng).copied()
    }
}

fn spawn(config: &SessionConfig, grid: Grid, rng: &mut ChaCha8Rng) -> Result<(Snake, Tour), SessionError> {
    let length = config.initial_length;
    let invalid = SessionError::InvalidLength { length, width: config.width };
    if length < 2 {
        return Err(invalid);
    }

    let head = (length - 1, config.height / 2);
    let snake = Snake::new(head, length, Direction::Right, grid).ok_or(invalid)?;
    let tour = build_tour(config.width, config.height, head, snake.body()[1], rng)?;

    Ok((snake, tour))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TourError;

    #[test]
    fn spawns_frozen_with_food_off_the_body() {
        let session = Session::new(SessionConfig::default(), 11).unwrap();
        assert_eq!(session.phase(), Phase::Frozen);
        assert_eq!(session.snake().body(), &[(2, 9), (1, 9), (0, 9)][..]);

        let food = session.food().unwrap();
        assert!(!session.snake().body().contains(&food));
        assert_eq!(session.tour().cells()[0], (2, 9));
    }

    #[test]
    fn frozen_sessions_do_not_move() {
        let mut session = Session::new(SessionConfig::default(), 11).unwrap();
        assert_eq!(session.tick().unwrap(), TickOutcome::Idle);
        session.start();
        assert!(matches!(session.tick().unwrap(), TickOutcome::Moved { .. }));
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn rejects_bad_configs() {
        let short = SessionConfig { initial_length: 1, ..SessionConfig::default() };
        assert!(matches!(
            Session::new(short, 0),
            Err(SessionError::InvalidLength { length: 1, .. })
        ));

        let long = SessionConfig { width: 4, height: 4, initial_length: 5, ..SessionConfig::default() };
        assert!(matches!(Session::new(long, 0), Err(SessionError::InvalidLength { .. })));

        let odd = SessionConfig { width: 7, ..SessionConfig::default() };
        assert!(matches!(
            Session::new(odd, 0),
            Err(SessionError::Tour(TourError::InvalidDimensions { .. }))
        ));
    }

    #[test]
    fn respawn_resets_the_round() {
        let config = SessionConfig { width: 6, height: 6, ..SessionConfig::default() };
        let mut session = Session::new(config, 5).unwrap();
        session.play_out(50).unwrap();
        assert!(session.ticks() > 0);

        session.respawn().unwrap();
        assert_eq!(session.phase(), Phase::Frozen);
        assert_eq!(session.ticks(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.round(), 2);
        assert_eq!(session.snake().len(), 3);
    }
}
