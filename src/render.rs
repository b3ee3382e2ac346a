//! Turning game state into something a terminal can show.

use crossterm::style::Color;

use crate::engine::{GameStatus, Tile, CELL_WIDTH, SIZE};
use crate::game::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark: bool) -> Self { if dark { Theme::Dark } else { Theme::Light } }

    pub fn is_dark(self) -> bool { self == Theme::Dark }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label for the key hint that switches away from this theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Toggle Dark Mode",
            Theme::Dark => "Toggle Light Mode",
        }
    }

    /// (foreground, background) for the area around the board.
    pub fn base_colors(self) -> (Color, Color) {
        match self {
            Theme::Light => (Color::Rgb { r: 0x77, g: 0x6e, b: 0x65 }, Color::Rgb { r: 0xfa, g: 0xf8, b: 0xef }),
            Theme::Dark => (Color::Rgb { r: 0xf9, g: 0xf6, b: 0xf2 }, Color::Rgb { r: 0x1f, g: 0x1f, b: 0x1f }),
        }
    }
}

/// (foreground, background) for a tile value.
pub fn tile_colors(value: Tile, theme: Theme) -> (Color, Color) {
    let rgb = |hex: u32| Color::Rgb { r: (hex >> 16) as u8, g: (hex >> 8) as u8, b: hex as u8 };
    let bg = match (theme, value) {
        (Theme::Light, 0) => 0xcdc1b4,
        (Theme::Dark, 0) => 0x3c3a32,
        (_, 2) => 0xeee4da,
        (_, 4) => 0xede0c8,
        (_, 8) => 0xf2b179,
        (_, 16) => 0xf59563,
        (_, 32) => 0xf67c5f,
        (_, 64) => 0xf65e3b,
        (_, 128) => 0xedcf72,
        (_, 256) => 0xedcc61,
        (_, 512) => 0xedc850,
        (_, 1024) => 0xedc53f,
        (_, 2048) => 0xedc22e,
        _ => 0x3c3a32,
    };
    let fg = if value <= 4 { 0x776e65 } else { 0xf9f6f2 };
    (rgb(fg), rgb(bg))
}

/// Win/loss banner for `status`, if any.
pub fn notification(status: GameStatus) -> Option<&'static str> {
    match status {
        GameStatus::Won => Some("Congratulations! You won!"),
        GameStatus::Lost => Some("Game over!"),
        GameStatus::Ongoing => None,
    }
}

/// Plain-text frame: score header, board, status and key hints.
pub fn frame(state: &GameState, theme: Theme, status: GameStatus) -> String {
    let rule = "-".repeat(SIZE * CELL_WIDTH + SIZE - 1);
    let mut out = format!("Score: {}    Best: {}\n{rule}\n{}{rule}\n", state.score, state.best_score, state.grid);
    if let Some(msg) = notification(status) {
        out.push_str(msg);
        out.push('\n');
    }
    out.push_str(&key_hints(theme));
    out.push('\n');
    out
}

pub fn key_hints(theme: Theme) -> String {
    format!("arrows/wasd: move  n: new game  t: {}  q: quit", theme.toggle_label())
}
