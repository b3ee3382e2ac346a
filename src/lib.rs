//! slide-2048: a 2048 sliding-tile game engine with a terminal front end
//!
//! This crate provides:
//! - A `Copy` 4x4 `Grid` with the board transition (`transition`, `play`), tile
//!   spawning and win/loss evaluation (`engine` module)
//! - A `Game` controller that owns score, best score and the injected RNG (`game` module)
//! - Best-score and theme persistence behind the `PrefStore` trait (`store` module)
//! - Key/swipe mapping, text rendering and a crossterm driver (`input`, `render`, `tui`)
//!
//! Quick start:
//! ```
//! use slide_2048::engine::{self, Direction, GameStatus};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic start with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = engine::initialize(&mut rng);
//! assert_eq!(g0.count_empty(), 14);
//!
//! // The slide itself is pure; `play` adds the spawned tile
//! let slid = engine::transition(g0, Direction::Left);
//! let played = engine::play(g0, Direction::Left, &mut rng);
//! assert_eq!(slid.moved, played.moved);
//! assert_eq!(engine::evaluate_status(played.grid), GameStatus::Ongoing);
//! ```
//!
pub mod config;
pub mod engine;
pub mod game;
pub mod input;
pub mod render;
pub mod store;
pub mod tui;
