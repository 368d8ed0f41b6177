use crate::{Coords, Grid};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, terminal, Result};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

const LIGHT_GREEN: Color = Color::Rgb { r: 137, g: 200, b: 80 };
const DARK_GREEN: Color = Color::Rgb { r: 123, g: 181, b: 70 };
const BLUE: Color = Color::Rgb { r: 47, g: 174, b: 232 };
const RED: Color = Color::Rgb { r: 217, g: 42, b: 42 };
const GRAY: Color = Color::Rgb { r: 155, g: 155, b: 155 };

// Every grid cell is two terminal columns wide so the board looks square.
const CELL_WIDTH: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Body,
    Head(char),
    Food,
    Dead,
}

/// One picture of the board, built fresh by the game loop every tick.
pub struct Frame {
    grid: Grid,
    tiles: Vec<Tile>,
}

impl Frame {
    pub fn new(grid: Grid) -> Self {
        Frame { grid, tiles: vec![Tile::Empty; grid.area()] }
    }

    pub fn set(&mut self, pos: Coords, tile: Tile) {
        if self.grid.contains(pos) {
            self.tiles[self.grid.index_of(pos)] = tile;
        }
    }

    pub fn tile(&self, pos: Coords) -> Tile {
        self.tiles[self.grid.index_of(pos)]
    }
}

/// Terminal columns and rows needed to show `grid` with its border and status line.
pub fn required_size(grid: Grid) -> Coords {
    (grid.width() * CELL_WIDTH + 2, grid.height() + 3)
}

pub struct TermManager {
    stdout: Stdout,
    active: bool,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout(), active: false }
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()?;
        self.active = true;
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn size(&self) -> Result<Coords> {
        terminal::size()
    }

    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    /// Draws the border, every cell, the status line and an optional centred message.
    pub fn render(&mut self, frame: &Frame, status: &str, message: Option<&[&str]>) -> Result<()> {
        let grid = frame.grid;
        let (cols, rows) = required_size(grid);
        let bottom = rows - 2;

        queue!(self.stdout, ResetColor)?;
        for x in 0..cols {
            let ch = if x == 0 || x == cols - 1 { '+' } else { '-' };
            queue!(self.stdout, cursor::MoveTo(x, 0), Print(ch), cursor::MoveTo(x, bottom), Print(ch))?;
        }
        for y in 1..bottom {
            queue!(self.stdout, cursor::MoveTo(0, y), Print('|'), cursor::MoveTo(cols - 1, y), Print('|'))?;
        }

        for pos in grid.cells() {
            self.draw_tile(pos, frame.tile(pos))?;
        }

        queue!(
            self.stdout,
            ResetColor,
            cursor::MoveTo(0, rows - 1),
            terminal::Clear(ClearType::CurrentLine),
            Print(status)
        )?;

        if let Some(lines) = message {
            self.draw_message(cols, bottom, lines)?;
        }

        self.stdout.flush()?;
        Ok(())
    }

    fn draw_tile(&mut self, pos: Coords, tile: Tile) -> Result<()> {
        let background = if (pos.0 + pos.1) % 2 == 1 { DARK_GREEN } else { LIGHT_GREEN };
        let (bg, text) = match tile {
            Tile::Empty => (background, String::from("  ")),
            Tile::Body => (BLUE, String::from("  ")),
            Tile::Head(ch) => (BLUE, format!("{} ", ch)),
            Tile::Food => (RED, String::from("  ")),
            Tile::Dead => (GRAY, String::from("XX")),
        };

        queue!(
            self.stdout,
            cursor::MoveTo(1 + pos.0 * CELL_WIDTH, 1 + pos.1),
            SetBackgroundColor(bg),
            SetForegroundColor(Color::Black),
            Print(text)
        )
    }

    fn draw_message(&mut self, cols: u16, rows: u16, lines: &[&str]) -> Result<()> {
        let width = lines.iter().map(|line| line.len()).max().unwrap_or(0) + 2;
        let height = lines.len() + 2;
        let left = (cols as usize).saturating_sub(width) / 2;
        let top = (rows as usize).saturating_sub(height) / 2;

        queue!(self.stdout, ResetColor)?;
        for row in 0..height {
            let text = match row.checked_sub(1).and_then(|i| lines.get(i)) {
                Some(line) => format!("{: ^width$}", line, width = width),
                None => " ".repeat(width),
            };
            queue!(self.stdout, cursor::MoveTo(left as u16, (top + row) as u16), Print(text))?;
        }

        Ok(())
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_ignores_cells_off_the_board() {
        let mut frame = Frame::new(Grid::new(4, 4));
        frame.set((1, 2), Tile::Food);
        frame.set((9, 9), Tile::Body);
        assert_eq!(frame.tile((1, 2)), Tile::Food);
        assert_eq!(frame.tile((0, 0)), Tile::Empty);
    }

    #[test]
    fn board_size_includes_border_and_status() {
        assert_eq!(required_size(Grid::new(18, 18)), (38, 21));
    }
}
