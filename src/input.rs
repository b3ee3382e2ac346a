//! Maps raw terminal input (keys, mouse drags) onto game commands.
//!
//! Nothing here touches game state; the driver feeds the resulting
//! [`Command`]s to the controller.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::engine::Direction;

/// What a single input event asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    NewGame,
    ToggleTheme,
    Quit,
}

/// Arrow keys, WASD and vi-style hjkl.
pub fn direction_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(Direction::Right),
        _ => None,
    }
}

pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('n') => Some(Command::NewGame),
        KeyCode::Char('t') => Some(Command::ToggleTheme),
        code => direction_for_key(code).map(Command::Move),
    }
}

/// Command for one line of typed input.
///
/// Whole words (`left`, `new`, `quit`, ...) are matched first; otherwise the
/// line must be a single key. Longer unknown words map to nothing rather
/// than to their first letter.
pub fn command_for_word(word: &str) -> Option<Command> {
    let word = word.trim().to_ascii_lowercase();
    match word.as_str() {
        "up" => return Some(Command::Move(Direction::Up)),
        "down" => return Some(Command::Move(Direction::Down)),
        "left" => return Some(Command::Move(Direction::Left)),
        "right" => return Some(Command::Move(Direction::Right)),
        "new" => return Some(Command::NewGame),
        "theme" => return Some(Command::ToggleTheme),
        "quit" | "exit" => return Some(Command::Quit),
        _ => {}
    }
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => command_for_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)),
        _ => None,
    }
}

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Direction of a swipe from its start-to-end displacement.
///
/// The dominant axis wins; ties go to the vertical axis. Screen coordinates
/// grow downwards, so a positive `dy` is a downward swipe.
pub fn swipe_direction(dx: f64, dy: f64) -> Option<Direction> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

/// Tracks a press-drag-release gesture.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn press(&mut self, column: u16, row: u16) { self.start = Some((column, row)); }

    /// Finish the gesture, comparing displacements in screen proportions.
    /// Without a recorded press there is no swipe.
    pub fn release(&mut self, column: u16, row: u16) -> Option<Direction> {
        let (c0, r0) = self.start.take()?;
        let dx = f64::from(column) - f64::from(c0);
        let dy = (f64::from(row) - f64::from(r0)) * CELL_ASPECT;
        swipe_direction(dx, dy)
    }
}
