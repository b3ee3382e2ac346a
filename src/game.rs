//! Game controller: the one owner of the running game's state.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::engine::{self, Direction, GameStatus, Grid, MoveResult, Score};
use crate::store::PrefStore;

/// Everything the front end needs to draw a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub grid: Grid,
    pub score: Score,
    pub best_score: Score,
}

/// Owns the state, the random source and the preference store.
///
/// ```
/// use slide_2048::engine::{Direction, GameStatus};
/// use slide_2048::game::Game;
/// use slide_2048::store::MemoryStore;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut game = Game::new(StdRng::seed_from_u64(7), MemoryStore::new());
/// assert_eq!(game.score(), 0);
/// for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
///     game.apply(dir);
/// }
/// assert!(game.best_score() >= game.score());
/// assert_ne!(game.status(), GameStatus::Won);
/// ```
pub struct Game<R, S> {
    state: GameState,
    rng: R,
    store: S,
}

impl<R: Rng, S: PrefStore> Game<R, S> {
    /// Start a game, loading the best score from `store` (0 if unreadable).
    pub fn new(rng: R, store: S) -> Self {
        let mut game = Game {
            state: GameState { grid: Grid::EMPTY, score: 0, best_score: 0 },
            rng,
            store,
        };
        game.new_game();
        game
    }

    /// Discard the current game and deal a fresh grid.
    pub fn new_game(&mut self) {
        self.state.grid = engine::initialize(&mut self.rng);
        self.state.score = 0;
        self.state.best_score = self.load_best_score().max(self.state.best_score);
        info!(best_score = self.state.best_score, "new game");
    }

    /// Slide in `direction`, spawn a tile if anything moved and account the score.
    ///
    /// A move that changes nothing leaves the state untouched.
    pub fn apply(&mut self, direction: Direction) -> MoveResult {
        let result = engine::play(self.state.grid, direction, &mut self.rng);
        if !result.moved {
            debug!(?direction, "move blocked");
            return result;
        }
        self.state.grid = result.grid;
        self.state.score += result.score_delta;
        debug!(?direction, gained = result.score_delta, score = self.state.score, "moved");
        if self.state.score > self.state.best_score {
            self.state.best_score = self.state.score;
            if let Err(e) = self.store.save_best_score(self.state.best_score) {
                warn!(error = %e, "failed to save best score");
            }
        }
        result
    }

    pub fn status(&self) -> GameStatus { engine::evaluate_status(self.state.grid) }

    pub fn state(&self) -> &GameState { &self.state }

    pub fn grid(&self) -> Grid { self.state.grid }

    pub fn score(&self) -> Score { self.state.score }

    pub fn best_score(&self) -> Score { self.state.best_score }

    pub fn store(&self) -> &S { &self.store }

    pub fn store_mut(&mut self) -> &mut S { &mut self.store }

    fn load_best_score(&self) -> Score {
        self.store.load_best_score().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load best score; starting from 0");
            0
        })
    }
}
