use std::{thread::sleep, time::{Duration, Instant}};

use crate::session::{Phase, Session, TickOutcome};
use crate::term::{self, Frame, TermManager, Tile};

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

const POLL_INTERVAL_MS: u64 = 5;
const MIN_TICK_MS: u64 = 1;
const MAX_TICK_MS: u64 = 2000;

/// Interactive front end: draws the session and steps it on a timer. The
/// autopilot picks every move; keys only control pacing and restarts.
pub struct SnakeGame {
    session: Session,
    term: TermManager,
    tick: Duration,
    paused: bool,
}

impl SnakeGame {
    pub fn new(session: Session, tick: Duration) -> Self {
        SnakeGame { session, term: TermManager::new(), tick, paused: false }
    }

    pub fn initialize(&mut self) -> Result<()> {
        let (need_w, need_h) = term::required_size(self.session.grid());
        let (w, h) = self.term.size().context("reading terminal size")?;
        if w < need_w || h < need_h {
            bail!("terminal is {}x{}, the board needs {}x{}", w, h, need_w, need_h);
        }

        self.term.setup().context("preparing terminal")?;
        Ok(())
    }

    /// Runs until the user quits with Ctrl+C.
    pub fn play(&mut self) -> Result<()> {
        let mut last_step = Instant::now();

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                if is_ctrl_c(&key_ev) {
                    info!(round = self.session.round(), score = self.session.score(), "quit");
                    return Ok(());
                }
                self.handle_key(key_ev.code)?;
            }

            if !self.paused && self.session.phase() == Phase::Running && last_step.elapsed() >= self.tick {
                last_step = Instant::now();
                if let TickOutcome::Crashed = self.session.tick()? {
                    debug!(ticks = self.session.ticks(), "round over");
                }
            }

            self.draw()?;
        }
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore().context("restoring terminal")?;
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Up => self.set_tick(self.tick / 2),
            KeyCode::Down => self.set_tick(self.tick * 2),
            KeyCode::Esc if self.session.phase() == Phase::Running => self.paused = !self.paused,
            _ => {}
        }

        match self.session.phase() {
            Phase::Frozen => self.session.start(),
            Phase::Dead | Phase::Won => {
                self.session.respawn()?;
                self.paused = false;
            }
            Phase::Running => {}
        }

        Ok(())
    }

    fn set_tick(&mut self, tick: Duration) {
        let ms = (tick.as_millis() as u64).clamp(MIN_TICK_MS, MAX_TICK_MS);
        self.tick = Duration::from_millis(ms);
        debug!(tick_ms = ms, "speed changed");
    }

    fn draw(&mut self) -> Result<()> {
        let session = &self.session;
        let mut frame = Frame::new(session.grid());

        if let Some(food) = session.food() {
            frame.set(food, Tile::Food);
        }

        let snake = session.snake();
        let dead = session.phase() == Phase::Dead;
        for (i, pos) in snake.body().iter().enumerate() {
            let tile = match (dead, i) {
                (true, _) => Tile::Dead,
                (false, 0) => Tile::Head(snake.head_char()),
                _ => Tile::Body,
            };
            frame.set(*pos, tile);
        }

        let status = format!(
            "round {}  score {}  length {}/{}  tick {}ms",
            session.round(),
            session.score(),
            snake.len(),
            session.tour().len(),
            self.tick.as_millis()
        );

        let score_line = format!("Score: {}", session.score());
        let message: Option<Vec<&str>> = match session.phase() {
            Phase::Frozen => Some(vec!["Autopilot snake", "Up/Down to change speed", "Esc to pause", "CTRL+C to quit", "", "Press any key to begin"]),
            Phase::Dead => Some(vec!["Game over!", &score_line, "", "Press any key to play again,", "or CTRL+C to quit."]),
            Phase::Won => Some(vec!["Grid filled!", &score_line, "", "Press any key to play again,", "or CTRL+C to quit."]),
            Phase::Running if self.paused => Some(vec!["Paused", "Press Esc to resume", "or Ctrl+C to quit"]),
            Phase::Running => None,
        };

        self.term.render(&frame, &status, message.as_deref())?;
        Ok(())
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
