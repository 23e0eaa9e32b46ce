//! Drives a [`GameEngine`] from a periodic timer and a command queue.
//!
//! Commands and ticks are serialised onto one task, so the engine never sees
//! concurrent mutation. A direction request lands in the engine as soon as it
//! is dequeued and is picked up by the tick after that.

use std::future;

use log::{debug, info, trace};
use rand::Rng;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{self, Interval, MissedTickBehavior},
};

use super::{
    engine::GameEngine,
    highscore::{HighScore, ScoreStore},
    models::{Snapshot, TickOutcome},
    types::{Difficulty, Direction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Direction(Direction),
    Start,
    Pause,
    TogglePause,
    Reset,
    Restart,
    SetDifficulty(Difficulty),
    Quit,
}

/// Cheap, cloneable way to talk to a running session.
#[derive(Debug, Clone)]
pub struct GameHandle {
    commands:  mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl GameHandle {
    /// Queues a command. Returns `false` once the session has ended.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn request_direction(&self, direction: Direction) -> bool {
        self.send(Command::Direction(direction))
    }

    pub fn start(&self) -> bool {
        self.send(Command::Start)
    }

    pub fn pause(&self) -> bool {
        self.send(Command::Pause)
    }

    pub fn reset(&self) -> bool {
        self.send(Command::Reset)
    }

    pub fn set_difficulty(&self, difficulty: Difficulty) -> bool {
        self.send(Command::SetDifficulty(difficulty))
    }

    pub fn quit(&self) -> bool {
        self.send(Command::Quit)
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }
}

struct Session<R, S> {
    engine:     GameEngine<R>,
    high_score: HighScore<S>,
    ticker:     Option<Interval>,
    commands:   mpsc::UnboundedReceiver<Command>,
    snapshots:  watch::Sender<Snapshot>,
    outcome:    Option<TickOutcome>,
}

/// Moves the engine onto its own task and returns a handle to it.
///
/// The task finishes on [`Command::Quit`] or when every handle is dropped,
/// handing the high score back so callers can inspect the store.
pub fn spawn<R, S>(
    engine: GameEngine<R>,
    high_score: HighScore<S>,
) -> (GameHandle, JoinHandle<HighScore<S>>)
where
    R: Rng + Send + 'static,
    S: ScoreStore + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot {
        state:      engine.snapshot(),
        high_score: high_score.best(),
        outcome:    None,
    });

    let session = Session {
        engine,
        high_score,
        ticker: None,
        commands: command_rx,
        snapshots: snapshot_tx,
        outcome: None,
    };

    let task = tokio::spawn(session.run());

    (
        GameHandle {
            commands:  command_tx,
            snapshots: snapshot_rx,
        },
        task,
    )
}

/// Waits for the next tick, or forever if the timer is disarmed.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending().await,
    }
}

impl<R: Rng, S: ScoreStore> Session<R, S> {
    async fn run(mut self) -> HighScore<S> {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Quit) | None => break,
                    Some(command) => self.apply(command),
                },
                () = next_tick(&mut self.ticker) => self.on_tick(),
            }
            self.publish();
        }

        info!(
            "session finished, score {} (best {})",
            self.engine.score(),
            self.high_score.best()
        );
        self.high_score
    }

    fn apply(&mut self, command: Command) {
        trace!("applying {command:?}");
        match command {
            Command::Direction(direction) => {
                self.engine.request_direction(direction);
            }
            Command::Start => {
                self.engine.start();
            }
            Command::Pause => {
                self.engine.pause();
            }
            Command::TogglePause => {
                if !self.engine.pause() {
                    self.engine.start();
                }
            }
            Command::Reset => {
                self.engine.reset();
                self.outcome = None;
            }
            Command::Restart => {
                self.engine.restart();
                self.outcome = None;
            }
            Command::SetDifficulty(difficulty) => {
                if self.engine.set_difficulty(difficulty) {
                    // rearm at the new interval
                    self.ticker = None;
                }
            }
            Command::Quit => {}
        }
        self.sync_timer();
    }

    fn on_tick(&mut self) {
        let outcome = self.engine.tick();
        trace!("tick: {outcome:?}");

        match outcome {
            TickOutcome::Ate { score } => {
                self.high_score.record(score);
            }
            TickOutcome::GameOver { final_score, .. }
            | TickOutcome::BoardFull { final_score } => {
                self.high_score.record(final_score);
            }
            TickOutcome::Idle | TickOutcome::Moved => {}
        }

        self.outcome = Some(outcome);
        self.sync_timer();
    }

    /// Arms the timer while the engine runs and drops it otherwise.
    fn sync_timer(&mut self) {
        if !self.engine.running() {
            if self.ticker.take().is_some() {
                debug!("tick disarmed");
            }
            return;
        }

        if self.ticker.is_none() {
            let period = self.engine.difficulty().tick_interval();
            let mut ticker =
                time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.ticker = Some(ticker);
            debug!("tick armed every {} ms", period.as_millis());
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(Snapshot {
            state:      self.engine.snapshot(),
            high_score: self.high_score.best(),
            outcome:    self.outcome,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::game::{
        engine::DEFAULT_GRID_SIZE,
        highscore::MemoryStore,
        models::Phase,
        types::Position,
    };

    fn start_session(
        best: u64,
    ) -> (GameHandle, JoinHandle<HighScore<MemoryStore>>) {
        spawn(
            GameEngine::seeded(DEFAULT_GRID_SIZE, Difficulty::Medium, 11),
            HighScore::load(MemoryStore::with_score(best)),
        )
    }

    async fn wait(ms: u64) {
        time::sleep(Duration::from_millis(ms)).await;
    }

    fn head(handle: &GameHandle) -> Position {
        handle.snapshot().state.head().unwrap()
    }

    /// Steers towards `target` one tick at a time, horizontal leg first so
    /// the snake never reverses. Expects to be called 10 ms past a tick.
    async fn steer_to(handle: &GameHandle, target: Position) {
        for _ in 0..2 * DEFAULT_GRID_SIZE {
            let at = head(handle);
            if at == target {
                return;
            }

            let direction = if at.x < target.x {
                Direction::Right
            } else if at.x > target.x {
                Direction::Left
            } else if at.y < target.y {
                Direction::Down
            } else {
                Direction::Up
            };
            handle.request_direction(direction);
            wait(150).await;
        }
        panic!("snake never reached {target}");
    }

    #[tokio::test(start_paused = true)]
    async fn eating_and_dying_raise_the_high_score() {
        let (handle, task) = start_session(5);
        handle.start();
        wait(10).await;

        let food = handle.snapshot().state.food.unwrap();
        steer_to(&handle, food).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.outcome, Some(TickOutcome::Ate { score: 10 }));
        assert_eq!(snapshot.high_score, 10);

        // carry straight on until the wall
        wait(150 * 21).await;
        let snapshot = handle.snapshot();
        let Some(TickOutcome::GameOver { final_score, .. }) = snapshot.outcome
        else {
            panic!("expected a game over, got {:?}", snapshot.outcome);
        };
        assert!(final_score >= 10);
        assert_eq!(snapshot.high_score, final_score);

        handle.quit();
        let high_score = task.await.unwrap();
        assert_eq!(high_score.best(), final_score);
        assert_eq!(high_score.store().value(), Some(final_score));
    }

    #[tokio::test(start_paused = true)]
    async fn lower_scores_leave_the_record_alone() {
        let (handle, task) = start_session(500);
        handle.start();
        wait(10).await;

        let food = handle.snapshot().state.food.unwrap();
        steer_to(&handle, food).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.state.score, 10);
        assert_eq!(snapshot.high_score, 500);

        handle.quit();
        assert_eq!(task.await.unwrap().store().value(), Some(500));
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_follow_the_difficulty_interval() {
        let (handle, _task) = start_session(0);
        handle.start();
        handle.request_direction(Direction::Right);

        wait(140).await;
        assert_eq!(head(&handle), Position::new(10, 10));

        wait(20).await;
        assert_eq!(head(&handle), Position::new(11, 10));

        wait(150).await;
        assert_eq!(head(&handle), Position::new(12, 10));
    }

    #[tokio::test(start_paused = true)]
    async fn paused_session_does_not_tick() {
        let (handle, _task) = start_session(0);
        handle.start();
        handle.request_direction(Direction::Down);
        wait(160).await;
        handle.pause();
        wait(1000).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.state.phase, Phase::Paused);
        assert_eq!(snapshot.state.head(), Some(Position::new(10, 11)));

        handle.send(Command::TogglePause);
        wait(160).await;
        assert!(handle.snapshot().state.running);
        assert_eq!(head(&handle), Position::new(10, 12));
    }

    #[tokio::test(start_paused = true)]
    async fn harder_difficulty_rearms_without_resetting() {
        let (handle, _task) = start_session(0);
        handle.start();
        handle.request_direction(Direction::Right);
        wait(160).await;
        assert_eq!(head(&handle), Position::new(11, 10));
        let before = handle.snapshot().state;

        handle.set_difficulty(Difficulty::Hard);
        wait(1).await;
        let after = handle.snapshot().state;
        assert_eq!(after.tick_interval_ms, 100);
        assert_eq!(after.snake, before.snake);
        assert_eq!(after.score, before.score);
        assert!(after.running);

        // medium would not tick again until 150 ms after the rearm
        wait(105).await;
        assert_eq!(head(&handle), Position::new(12, 10));
    }

    #[tokio::test(start_paused = true)]
    async fn game_over_stops_the_timer() {
        let (handle, _task) = start_session(0);
        handle.start();
        handle.request_direction(Direction::Up);

        // ten rows to the wall, the eleventh tick hits it
        wait(150 * 11 + 10).await;
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.state.phase, Phase::GameOver);
        assert!(!snapshot.state.running);
        assert!(matches!(
            snapshot.outcome,
            Some(TickOutcome::GameOver { .. })
        ));

        handle.start();
        wait(1000).await;
        assert_eq!(handle.snapshot().state.phase, Phase::GameOver);

        handle.send(Command::Restart);
        wait(1).await;
        let snapshot = handle.snapshot();
        assert!(snapshot.state.running);
        assert_eq!(snapshot.state.score, 0);
        assert_eq!(snapshot.outcome, None);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_hands_back_the_high_score() {
        let (handle, task) = start_session(50);
        assert_eq!(handle.snapshot().high_score, 50);

        handle.quit();
        let high_score = task.await.unwrap();
        assert_eq!(high_score.best(), 50);
        assert!(!handle.start());
    }
}
