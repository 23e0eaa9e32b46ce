use std::path::PathBuf;

use clap::{value_parser, Parser};

use crate::game::{engine::DEFAULT_GRID_SIZE, types::Difficulty};

pub const DEFAULT_PORT: u16 = 8082;

/// Serves the game's static files over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct ServeConfig {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory whose files are served.
    #[arg(long, env = "SNAKE_ROOT", default_value = "public")]
    pub root: PathBuf,
}

/// Plays snake in the terminal.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct PlayConfig {
    /// easy (200 ms), medium (150 ms) or hard (100 ms) per tick.
    #[arg(
        long,
        short,
        env = "SNAKE_DIFFICULTY",
        default_value_t = Difficulty::Medium
    )]
    pub difficulty: Difficulty,

    /// Cells along each side of the board.
    #[arg(
        long,
        default_value_t = DEFAULT_GRID_SIZE,
        value_parser = value_parser!(i32).range(2..=64)
    )]
    pub grid_size: i32,

    /// File the high score is kept in.
    #[arg(long, env = "SNAKE_SCORES", default_value = "tilesnake-scores.json")]
    pub scores: PathBuf,

    /// Keep the high score for this run only.
    #[arg(long)]
    pub no_save: bool,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    pub seed: Option<u64>,
}
