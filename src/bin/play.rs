use std::{io, time::Duration};

use clap::Parser;
use color_eyre::Result;
use crossterm::event;
use log::info;
use tilesnake::{
    config::PlayConfig,
    game::{
        session::{self, GameHandle},
        GameEngine,
        HighScore,
        JsonFileStore,
        MemoryStore,
        ScoreStore,
    },
    terminal::{input, render, TerminalGuard},
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    let config = PlayConfig::parse();
    let engine = match config.seed {
        Some(seed) => {
            GameEngine::seeded(config.grid_size, config.difficulty, seed)
        }
        None => GameEngine::from_entropy(config.grid_size, config.difficulty),
    };

    let best = if config.no_save {
        play(engine, HighScore::load(MemoryStore::default())).await?
    } else {
        play(engine, HighScore::load(JsonFileStore::new(&config.scores)))
            .await?
    };

    println!("best score: {best}");
    Ok(())
}

async fn play<S>(engine: GameEngine, high_score: HighScore<S>) -> Result<u64>
where
    S: ScoreStore + Send + 'static,
{
    let guard = TerminalGuard::enter()?;
    let (handle, session) = session::spawn(engine, high_score);

    let reader = tokio::task::spawn_blocking({
        let handle = handle.clone();
        move || input::forward(&handle, next_event)
    });

    let rendered = render_frames(&handle).await;

    // a failed draw still has to shut the session down cleanly
    handle.quit();
    drop(handle);
    let high_score = session.await?;
    reader.await??;
    drop(guard);
    rendered?;

    info!("leaving with best score {}", high_score.best());
    Ok(high_score.best())
}

/// Redraws on every published snapshot until the session ends.
async fn render_frames(handle: &GameHandle) -> io::Result<()> {
    let mut snapshots = handle.subscribe();
    let mut out = io::stdout();

    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        render::draw(&mut out, &snapshot)?;
        if snapshots.changed().await.is_err() {
            return Ok(());
        }
    }
}

/// Waits up to `timeout` for the next terminal event.
fn next_event(timeout: Duration) -> io::Result<Option<event::Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}
