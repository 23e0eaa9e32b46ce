use std::{collections::VecDeque, fmt};

use serde::Serialize;

use crate::game::types::{Difficulty, Direction, Position};

#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Ready,
    Running,
    Paused,
    GameOver,
    BoardFull,
}

impl Phase {
    /// Terminal phases wait for a reset before they can run again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::BoardFull)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::GameOver => "game over",
            Self::BoardFull => "board full",
        })
    }
}

#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TickOutcome {
    /// No direction yet, or the game has already ended.
    Idle,
    Moved,
    Ate {
        score: u64,
    },
    GameOver {
        collision:   Collision,
        final_score: u64,
    },
    BoardFull {
        final_score: u64,
    },
}

impl TickOutcome {
    #[must_use]
    pub const fn final_score(self) -> Option<u64> {
        match self {
            Self::GameOver { final_score, .. } | Self::BoardFull { final_score } => {
                Some(final_score)
            }
            _ => None,
        }
    }
}

/// Read-only copy of everything a renderer needs after a tick.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub grid_size:         i32,
    pub snake:             VecDeque<Position>,
    pub direction:         Option<Direction>,
    pub pending_direction: Option<Direction>,
    pub food:              Option<Position>,
    pub score:             u64,
    pub running:           bool,
    pub phase:             Phase,
    pub difficulty:        Difficulty,
    pub tick_interval_ms:  u64,
}

impl GameState {
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.snake.front().copied()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.grid_size {
            for x in 0..self.grid_size {
                let c = Position { x, y };
                if self.head() == Some(c) {
                    write!(f, "@")?;
                } else if self.snake.contains(&c) {
                    write!(f, "#")?;
                } else if self.food == Some(c) {
                    write!(f, "*")?;
                } else {
                    write!(f, ".")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// What the session publishes after every command and tick.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state:      GameState,
    pub high_score: u64,
    pub outcome:    Option<TickOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_state() -> GameState {
        GameState {
            grid_size:         4,
            snake:             VecDeque::from([
                Position::new(1, 1),
                Position::new(0, 1),
            ]),
            direction:         Some(Direction::Right),
            pending_direction: Some(Direction::Right),
            food:              Some(Position::new(3, 2)),
            score:             10,
            running:           true,
            phase:             Phase::Running,
            difficulty:        Difficulty::Medium,
            tick_interval_ms:  150,
        }
    }

    #[test]
    fn display_draws_the_board() {
        assert_eq!(small_state().to_string(), "....\n#@..\n...*\n....\n");
    }

    #[test]
    fn outcomes_serialize_with_a_tag() {
        let json = serde_json::to_value(TickOutcome::GameOver {
            collision:   Collision::Wall,
            final_score: 30,
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "outcome": "game_over",
                "collision": "wall",
                "final_score": 30,
            })
        );
    }

    #[test]
    fn only_end_states_carry_a_final_score() {
        assert_eq!(TickOutcome::Ate { score: 20 }.final_score(), None);
        assert_eq!(
            TickOutcome::BoardFull { final_score: 3990 }.final_score(),
            Some(3990)
        );
    }
}
