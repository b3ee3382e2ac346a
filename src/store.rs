//! Durable preferences: the best score and the dark-mode flag.
//!
//! The game only ever needs two values, so a store is a tiny key-value
//! surface behind [`PrefStore`]. Writes are last-write-wins with no
//! transactional guarantee.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::Score;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed preferences: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence seam consumed by the game controller and the front end.
pub trait PrefStore {
    /// Best score seen so far, 0 if none was ever saved.
    fn load_best_score(&self) -> Result<Score, StoreError>;
    fn save_best_score(&mut self, score: Score) -> Result<(), StoreError>;
    fn load_dark_mode(&self) -> Result<bool, StoreError>;
    fn save_dark_mode(&mut self, dark: bool) -> Result<(), StoreError>;
}

/// On-disk document layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
    #[serde(default)]
    pub best_score: Score,
    #[serde(default)]
    pub dark_mode: bool,
}

/// Volatile store, handy for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub prefs: Prefs,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_best_score(best_score: Score) -> Self {
        Self { prefs: Prefs { best_score, ..Prefs::default() } }
    }
}

impl PrefStore for MemoryStore {
    fn load_best_score(&self) -> Result<Score, StoreError> { Ok(self.prefs.best_score) }

    fn save_best_score(&mut self, score: Score) -> Result<(), StoreError> {
        self.prefs.best_score = score;
        Ok(())
    }

    fn load_dark_mode(&self) -> Result<bool, StoreError> { Ok(self.prefs.dark_mode) }

    fn save_dark_mode(&mut self, dark: bool) -> Result<(), StoreError> {
        self.prefs.dark_mode = dark;
        Ok(())
    }
}

/// JSON file holding a single [`Prefs`] document.
///
/// A missing file reads as defaults. Every save reads the current document,
/// patches one field and rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    pub fn read(&self) -> Result<Prefs, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Prefs::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Prefs::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn write(&self, prefs: &Prefs) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(prefs)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Prefs)) -> Result<(), StoreError> {
        let mut prefs = base_for_update(self.read())?;
        f(&mut prefs);
        self.write(&prefs)
    }
}

/// Document a save should patch. A corrupt document is replaced; an I/O
/// failure aborts the save so the other field is not reset.
fn base_for_update(current: Result<Prefs, StoreError>) -> Result<Prefs, StoreError> {
    match current {
        Ok(prefs) => Ok(prefs),
        Err(StoreError::Json(_)) => Ok(Prefs::default()),
        Err(e) => Err(e),
    }
}

impl PrefStore for FileStore {
    fn load_best_score(&self) -> Result<Score, StoreError> { Ok(self.read()?.best_score) }

    fn save_best_score(&mut self, score: Score) -> Result<(), StoreError> {
        self.update(|p| p.best_score = score)
    }

    fn load_dark_mode(&self) -> Result<bool, StoreError> { Ok(self.read()?.dark_mode) }

    fn save_dark_mode(&mut self, dark: bool) -> Result<(), StoreError> {
        self.update(|p| p.dark_mode = dark)
    }
}
