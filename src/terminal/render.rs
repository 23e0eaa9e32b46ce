use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::game::{
    models::{Phase, Snapshot, TickOutcome},
    types::Position,
};

const HEAD: &str = "██";
const BODY: &str = "▓▓";
const FOOD: &str = "()";
const EMPTY: &str = "  ";

const HELP: &str = "arrows/wasd steer · space pause · enter restart · r \
                    reset · 1/2/3 difficulty · q quit";

/// Draws a whole frame: the board, a status line and a help line.
///
/// Every row is rewritten in full so no clearing is needed between frames.
///
/// # Errors
///
/// Fails if writing to `out` fails.
pub fn draw(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    let state = &snapshot.state;
    let size = state.grid_size;
    let inner = usize::try_from(size).unwrap_or(0) * EMPTY.len();
    let head = state.head();

    queue!(
        out,
        MoveTo(0, 0),
        ResetColor,
        Print(format!("┌{}┐", "─".repeat(inner)))
    )?;

    for y in 0..size {
        queue!(out, MoveTo(0, row(y + 1)), ResetColor, Print("│"))?;
        for x in 0..size {
            let cell = Position { x, y };
            let (glyph, color) = if head == Some(cell) {
                (HEAD, Color::Green)
            } else if state.snake.contains(&cell) {
                (BODY, Color::DarkGreen)
            } else if state.food == Some(cell) {
                (FOOD, Color::Red)
            } else {
                (EMPTY, Color::Reset)
            };
            queue!(out, SetForegroundColor(color), Print(glyph))?;
        }
        queue!(out, ResetColor, Print("│"))?;
    }

    queue!(
        out,
        MoveTo(0, row(size + 1)),
        Print(format!("└{}┘", "─".repeat(inner))),
        MoveTo(0, row(size + 2)),
        Print(status_line(snapshot)),
        Clear(ClearType::UntilNewLine),
        MoveTo(0, row(size + 3)),
        SetForegroundColor(Color::DarkGrey),
        Print(HELP),
        ResetColor,
        Clear(ClearType::UntilNewLine),
    )?;

    if let Some(banner) = banner(snapshot) {
        let width = u16::try_from(banner.chars().count()).unwrap_or(0);
        let board_width = u16::try_from(inner + 2).unwrap_or(0);
        let column = board_width.saturating_sub(width) / 2;
        queue!(
            out,
            MoveTo(column, row(size / 2 + 1)),
            SetForegroundColor(Color::Yellow),
            Print(banner),
            ResetColor,
        )?;
    }

    out.flush()
}

#[must_use]
pub fn status_line(snapshot: &Snapshot) -> String {
    format!(
        "Score: {}  Best: {}  Difficulty: {}  [{}]",
        snapshot.state.score,
        snapshot.high_score,
        snapshot.state.difficulty,
        snapshot.state.phase
    )
}

fn banner(snapshot: &Snapshot) -> Option<String> {
    match snapshot.state.phase {
        Phase::Running => None,
        Phase::Ready => Some(" press space to start ".to_owned()),
        Phase::Paused => Some(" paused ".to_owned()),
        Phase::GameOver | Phase::BoardFull => {
            let score = snapshot
                .outcome
                .and_then(TickOutcome::final_score)
                .unwrap_or(snapshot.state.score);
            let title = if snapshot.state.phase == Phase::BoardFull {
                "YOU WIN"
            } else {
                "GAME OVER"
            };
            Some(format!(" {title}! final score {score} "))
        }
    }
}

fn row(y: i32) -> u16 {
    u16::try_from(y).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{engine::GameEngine, models::Collision, types::Difficulty};

    fn snapshot(score_bonus: bool) -> Snapshot {
        let engine = GameEngine::seeded(6, Difficulty::Hard, 5);
        let mut state = engine.snapshot();
        if score_bonus {
            state.score = 40;
        }
        Snapshot {
            state,
            high_score: 90,
            outcome: None,
        }
    }

    fn render(snapshot: &Snapshot) -> String {
        let mut out = Vec::new();
        draw(&mut out, snapshot).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn frame_shows_board_and_status() {
        let frame = render(&snapshot(true));

        assert!(frame.contains("┌────────────┐"));
        assert!(frame.contains(HEAD));
        assert!(frame.contains(FOOD));
        assert!(frame.contains("Score: 40  Best: 90  Difficulty: hard  [ready]"));
        assert!(frame.contains("press space to start"));
    }

    #[test]
    fn game_over_banner_shows_the_final_score() {
        let mut snapshot = snapshot(true);
        snapshot.state.phase = Phase::GameOver;
        snapshot.outcome = Some(TickOutcome::GameOver {
            collision:   Collision::Wall,
            final_score: 40,
        });

        assert!(render(&snapshot).contains("GAME OVER! final score 40"));
    }

    #[test]
    fn running_game_has_no_banner() {
        let mut snapshot = snapshot(false);
        snapshot.state.phase = Phase::Running;
        snapshot.state.running = true;

        assert_eq!(banner(&snapshot), None);
        assert!(status_line(&snapshot).ends_with("[running]"));
    }
}
