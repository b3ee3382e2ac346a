use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Colors, Print, ResetColor, SetColors};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::engine::{self, CELL_WIDTH, SIZE};
use crate::game::Game;
use crate::input::{self, Command, SwipeTracker};
use crate::render::{self, Theme};
use crate::store::PrefStore;

pub type DriverResult<T> = std::result::Result<T, DriverError>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal rows taken by one tile.
const TILE_HEIGHT: u16 = 3;
/// First screen row of the board.
const BOARD_TOP: u16 = 2;

/// A game plus the presentation state around it (theme, in-flight swipe).
///
/// Input is handled synchronously: one event, at most one move.
pub struct Session<R, S> {
    game: Game<R, S>,
    theme: Theme,
    swipe: SwipeTracker,
}

impl<R: Rng, S: PrefStore> Session<R, S> {
    /// Wrap `game`, restoring the saved theme.
    pub fn new(game: Game<R, S>) -> Self {
        let dark = game.store().load_dark_mode().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load theme; using light");
            false
        });
        Self { game, theme: Theme::from_dark_mode(dark), swipe: SwipeTracker::default() }
    }

    pub fn game(&self) -> &Game<R, S> { &self.game }

    pub fn theme(&self) -> Theme { self.theme }

    /// Apply one command. Returns false once the session should end.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Move(dir) => {
                let before = self.game.status();
                let result = self.game.apply(dir);
                let after = self.game.status();
                if result.moved && after != before {
                    info!(status = ?after, score = self.game.score(), "game status changed");
                }
            }
            Command::NewGame => self.game.new_game(),
            Command::ToggleTheme => {
                self.theme = self.theme.toggled();
                if let Err(e) = self.game.store_mut().save_dark_mode(self.theme.is_dark()) {
                    warn!(error = %e, "failed to save theme");
                }
            }
            Command::Quit => return false,
        }
        true
    }

    /// Translate a terminal event into a command, if it maps to one.
    pub fn command_for_event(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Key(key) => input::command_for_key(*key),
            Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
                self.swipe.press(*column, *row);
                None
            }
            Event::Mouse(MouseEvent { kind: MouseEventKind::Up(MouseButton::Left), column, row, .. }) => {
                self.swipe.release(*column, *row).map(Command::Move)
            }
            _ => None,
        }
    }

    /// Plain-text rendering of the current screen.
    pub fn frame(&self) -> String {
        render::frame(self.game.state(), self.theme, self.game.status())
    }

    fn draw(&self, out: &mut impl Write) -> DriverResult<()> {
        let (fg, bg) = self.theme.base_colors();
        let state = self.game.state();
        queue!(
            out,
            SetColors(Colors::new(fg, bg)),
            Clear(ClearType::All),
            MoveTo(0, 0),
            Print(format!("Score: {}    Best: {}", state.score, state.best_score)),
        )?;
        let blank = " ".repeat(CELL_WIDTH);
        for (r, row) in state.grid.rows().iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                let (tile_fg, tile_bg) = render::tile_colors(value, self.theme);
                let x = (c * (CELL_WIDTH + 1)) as u16;
                let y = BOARD_TOP + r as u16 * (TILE_HEIGHT + 1);
                queue!(
                    out,
                    SetColors(Colors::new(tile_fg, tile_bg)),
                    MoveTo(x, y),
                    Print(&blank),
                    MoveTo(x, y + 1),
                    Print(engine::format_tile(value)),
                    MoveTo(x, y + 2),
                    Print(&blank),
                )?;
            }
        }
        let mut y = BOARD_TOP + SIZE as u16 * (TILE_HEIGHT + 1);
        queue!(out, SetColors(Colors::new(fg, bg)))?;
        if let Some(msg) = render::notification(self.game.status()) {
            queue!(out, MoveTo(0, y), Print(msg))?;
            y += 1;
        }
        queue!(out, MoveTo(0, y), Print(render::key_hints(self.theme)), ResetColor)?;
        out.flush()?;
        Ok(())
    }
}

/// Owns a [`Session`] and manages raw mode, the alternate screen and mouse
/// capture around its event loop.
pub struct TerminalDriver<R, S> {
    session: Session<R, S>,
}

impl<R: Rng, S: PrefStore> TerminalDriver<R, S> {
    pub fn new(session: Session<R, S>) -> Self {
        Self { session }
    }

    pub fn run(mut self) -> DriverResult<Session<R, S>> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner(&mut stdout);
        self.exit(&mut stdout);
        result.map(|_| self.session)
    }

    fn run_inner(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        self.session.draw(stdout)?;
        loop {
            let event = event::read()?;
            if let Some(command) = self.session.command_for_event(&event) {
                if !self.session.handle(command) {
                    return Ok(());
                }
                self.session.draw(stdout)?;
            } else if matches!(event, Event::Resize(..)) {
                self.session.draw(stdout)?;
            }
        }
    }

    fn enter(&self, stdout: &mut impl Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| DriverError::Terminal(err.to_string()))?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl Write) {
        execute!(stdout, ResetColor, Show, DisableMouseCapture, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}
