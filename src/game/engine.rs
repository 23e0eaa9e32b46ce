use std::collections::VecDeque;

use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{
    food::place_food,
    models::{Collision, GameState, Phase, TickOutcome},
    types::{Difficulty, Direction, Position},
};

/// Points awarded per food eaten.
pub const FOOD_SCORE: u64 = 10;

/// Canvas of 400px split into 20px tiles.
pub const DEFAULT_GRID_SIZE: i32 = 20;

/// Owns the authoritative game state and the per-tick update rule.
///
/// The engine knows nothing about timers. Whoever drives it (see
/// [`crate::game::session`]) arms a periodic tick while [`Self::running`]
/// holds and calls [`Self::tick`] on every interval.
#[derive(Debug, Clone)]
pub struct GameEngine<R = StdRng> {
    grid_size:         i32,
    snake:             VecDeque<Position>,
    direction:         Option<Direction>,
    pending_direction: Option<Direction>,
    food:              Option<Position>,
    score:             u64,
    phase:             Phase,
    difficulty:        Difficulty,
    rng:               R,
}

impl GameEngine<StdRng> {
    #[must_use]
    pub fn from_entropy(grid_size: i32, difficulty: Difficulty) -> Self {
        Self::new(grid_size, difficulty, StdRng::from_os_rng())
    }

    #[must_use]
    pub fn seeded(grid_size: i32, difficulty: Difficulty, seed: u64) -> Self {
        Self::new(grid_size, difficulty, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    /// # Panics
    ///
    /// Panics if `grid_size` is not positive.
    pub fn new(grid_size: i32, difficulty: Difficulty, rng: R) -> Self {
        assert!(grid_size > 0, "the board needs at least one cell");

        let mut engine = Self {
            grid_size,
            snake: VecDeque::new(),
            direction: None,
            pending_direction: None,
            food: None,
            score: 0,
            phase: Phase::Ready,
            difficulty,
            rng,
        };
        engine.reset();
        engine
    }

    pub const fn running(&self) -> bool {
        matches!(self.phase, Phase::Running)
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn score(&self) -> u64 {
        self.score
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub const fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub const fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn head(&self) -> Position {
        self.snake
            .front()
            .copied()
            .unwrap_or_else(|| self.center())
    }

    pub const fn tick_interval_ms(&self) -> u64 {
        self.difficulty.tick_interval_ms()
    }

    /// Returns whether the engine went from stopped to running.
    ///
    /// A finished game stays finished until it is reset.
    pub fn start(&mut self) -> bool {
        if self.running() || self.phase.is_terminal() {
            return false;
        }

        self.phase = Phase::Running;
        info!("game started at {} difficulty", self.difficulty);
        true
    }

    /// Returns whether the engine went from running to paused.
    pub fn pause(&mut self) -> bool {
        if self.running() {
            self.phase = Phase::Paused;
            debug!("game paused with score {}", self.score);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.snake.clear();
        self.snake.push_back(self.center());
        self.direction = None;
        self.pending_direction = None;
        self.score = 0;
        self.phase = Phase::Ready;
        self.food = place_food(&mut self.rng, self.grid_size, &self.snake);
        debug!("game reset, food at {:?}", self.food);
    }

    pub fn restart(&mut self) -> bool {
        self.reset();
        self.start()
    }

    /// Returns whether the level actually changed.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.difficulty == difficulty {
            return false;
        }

        info!("difficulty {} -> {}", self.difficulty, difficulty);
        self.difficulty = difficulty;
        true
    }

    /// Queues a turn for the next tick. Returns `false` if it was dropped for
    /// reversing onto the snake's own neck.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.direction.map(Direction::opposite) == Some(direction) {
            debug!("ignoring reversal to {direction}");
            return false;
        }

        self.pending_direction = Some(direction);
        true
    }

    /// Advances the game one step.
    ///
    /// Only a running engine moves. Ticks that arrive while ready, paused or
    /// finished are `Idle` and leave the state alone.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running() {
            return TickOutcome::Idle;
        }

        self.direction = self.pending_direction;
        let Some(direction) = self.direction else {
            return TickOutcome::Idle;
        };

        let new_head = self.head().neighbour(direction);

        if !new_head.within(self.grid_size) {
            return self.game_over(Collision::Wall, new_head);
        }

        if self.snake.contains(&new_head) {
            return self.game_over(Collision::Body, new_head);
        }

        self.snake.push_front(new_head);

        if self.food != Some(new_head) {
            self.snake.pop_back();
            return TickOutcome::Moved;
        }

        self.score += FOOD_SCORE;
        self.food = place_food(&mut self.rng, self.grid_size, &self.snake);
        debug!(
            "ate food at {new_head}, score {}, length {}",
            self.score,
            self.snake.len()
        );

        if self.food.is_none() {
            info!("board full with score {}", self.score);
            self.phase = Phase::BoardFull;
            return TickOutcome::BoardFull {
                final_score: self.score,
            };
        }

        TickOutcome::Ate { score: self.score }
    }

    pub fn snapshot(&self) -> GameState {
        GameState {
            grid_size:         self.grid_size,
            snake:             self.snake.clone(),
            direction:         self.direction,
            pending_direction: self.pending_direction,
            food:              self.food,
            score:             self.score,
            running:           self.running(),
            phase:             self.phase,
            difficulty:        self.difficulty,
            tick_interval_ms:  self.tick_interval_ms(),
        }
    }

    const fn center(&self) -> Position {
        Position {
            x: self.grid_size / 2,
            y: self.grid_size / 2,
        }
    }

    fn game_over(
        &mut self,
        collision: Collision,
        new_head: Position,
    ) -> TickOutcome {
        info!(
            "game over: {collision:?} collision at {new_head}, final score {}",
            self.score
        );
        self.phase = Phase::GameOver;
        TickOutcome::GameOver {
            collision,
            final_score: self.score,
        }
    }
}
