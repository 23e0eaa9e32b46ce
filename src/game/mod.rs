pub mod engine;
pub mod food;
pub mod highscore;
pub mod models;
pub mod session;
pub mod types;

pub use engine::GameEngine;
pub use highscore::{HighScore, JsonFileStore, MemoryStore, ScoreStore};
pub use models::{GameState, Phase, Snapshot, TickOutcome};
pub use session::{Command, GameHandle};
pub use types::{Difficulty, Direction, Position};
