use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{debug, error, info, warn};
use serde_json::{Map, Value};

/// Key the best score is stored under.
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

pub trait ScoreStore {
    /// # Errors
    ///
    /// Fails if the backing storage exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<u64>>;

    /// # Errors
    ///
    /// Fails if the backing storage cannot be written.
    fn save(&mut self, score: u64) -> Result<()>;
}

/// Keeps the score in memory only. Used by tests and by `play --no-save`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: Option<u64>,
}

impl MemoryStore {
    #[must_use]
    pub const fn with_score(score: u64) -> Self {
        Self { value: Some(score) }
    }

    #[must_use]
    pub const fn value(&self) -> Option<u64> {
        self.value
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u64>> {
        Ok(self.value)
    }

    fn save(&mut self, score: u64) -> Result<()> {
        self.value = Some(score);
        Ok(())
    }
}

/// A JSON object on disk used as a tiny key-value store.
///
/// Other keys in the file are left alone when the score is saved.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(Map::new());
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| {
                    format!("failed to read {}", self.path.display())
                })
            }
        };

        if text.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&text).wrap_err_with(|| {
            format!("{} is not valid json", self.path.display())
        })? {
            Value::Object(entries) => Ok(entries),
            other => Err(eyre!(
                "{} should hold a json object, found {other}",
                self.path.display()
            )),
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u64>> {
        let entries = self.read_entries()?;
        match entries.get(HIGH_SCORE_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
                eyre!("{HIGH_SCORE_KEY} is not a whole number: {n}")
            }),
            // scores saved as strings are still accepted
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .wrap_err_with(|| format!("{HIGH_SCORE_KEY} = {s:?}")),
            Some(other) => {
                Err(eyre!("{HIGH_SCORE_KEY} has an unexpected value: {other}"))
            }
        }
    }

    fn save(&mut self, score: u64) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            warn!("discarding unreadable score file: {e:#}");
            Map::new()
        });
        entries.insert(HIGH_SCORE_KEY.to_owned(), Value::from(score));

        let json = serde_json::to_string_pretty(&Value::Object(entries))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)
            .wrap_err_with(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path).wrap_err_with(|| {
            format!("failed to replace {}", self.path.display())
        })?;

        debug!("saved high score {score} to {}", self.path.display());
        Ok(())
    }
}

/// The best score seen so far and where it is persisted.
#[derive(Debug)]
pub struct HighScore<S> {
    store: S,
    best:  u64,
}

impl<S: ScoreStore> HighScore<S> {
    /// Loads the stored best score. An unreadable store counts as no score.
    pub fn load(store: S) -> Self {
        let best = match store.load() {
            Ok(best) => best.unwrap_or(0),
            Err(e) => {
                warn!("could not load the high score, starting at 0: {e:#}");
                0
            }
        };
        debug!("high score loaded: {best}");
        Self { store, best }
    }

    pub const fn best(&self) -> u64 {
        self.best
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Persists `score` if it beats the best so far. Returns whether it did.
    pub fn record(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }

        info!("new high score {score} (was {})", self.best);
        self.best = score;
        if let Err(e) = self.store.save(score) {
            error!("failed to save high score {score}: {e:#}");
        }
        true
    }
}
