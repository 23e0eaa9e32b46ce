use std::{io, time::Duration};

use crossterm::event::{
    Event,
    KeyCode,
    KeyEvent,
    KeyEventKind,
    KeyModifiers,
    MouseButton,
    MouseEvent,
    MouseEventKind,
};

use crate::game::{
    session::{Command, GameHandle},
    types::{Difficulty, Direction},
};

/// Shortest drag, in board cells, that counts as a swipe.
pub const SWIPE_MIN_CELLS: i32 = 2;

/// Board cells are drawn two terminal columns wide.
const COLUMNS_PER_CELL: i32 = 2;

/// How long one wait for a terminal event may block.
pub const INPUT_POLL: Duration = Duration::from_millis(50);

/// Turns terminal events into session commands.
///
/// Steering is only accepted while the game runs. Everything else works in
/// any phase.
#[derive(Debug, Default)]
pub struct InputMapper {
    drag_start: Option<(u16, u16)>,
}

impl InputMapper {
    pub fn map(&mut self, event: &Event, running: bool) -> Option<Command> {
        match event {
            Event::Key(key) => command_for_key(key, running),
            Event::Mouse(mouse) => self.swipe(mouse, running),
            _ => None,
        }
    }

    fn swipe(&mut self, mouse: &MouseEvent, running: bool) -> Option<Command> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_start = Some((mouse.column, mouse.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (column, row) = self.drag_start.take()?;
                if !running {
                    return None;
                }
                let dx = (i32::from(mouse.column) - i32::from(column))
                    / COLUMNS_PER_CELL;
                let dy = i32::from(mouse.row) - i32::from(row);
                Direction::from_swipe(dx, dy, SWIPE_MIN_CELLS)
                    .map(Command::Direction)
            }
            _ => None,
        }
    }
}

/// Feeds events from `next_event` to the session until it goes away or the
/// player quits.
///
/// `next_event` waits up to the given timeout and yields `None` when nothing
/// arrived. The session is told to quit on the way out, errors included.
///
/// # Errors
///
/// Returns the first error `next_event` reports.
pub fn forward<F>(handle: &GameHandle, mut next_event: F) -> io::Result<()>
where
    F: FnMut(Duration) -> io::Result<Option<Event>>,
{
    let mut mapper = InputMapper::default();
    let snapshots = handle.subscribe();

    let forwarded = loop {
        if snapshots.has_changed().is_err() {
            break Ok(());
        }
        let event = match next_event(INPUT_POLL) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => break Err(e),
        };

        let running = snapshots.borrow().state.running;
        let Some(command) = mapper.map(&event, running) else {
            continue;
        };
        if !handle.send(command) || command == Command::Quit {
            break Ok(());
        }
    };

    handle.quit();
    forwarded
}

#[must_use]
pub fn command_for_key(key: &KeyEvent, running: bool) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c'))
            .then_some(Command::Quit);
    }

    let steer = |direction| running.then_some(Command::Direction(direction));

    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => steer(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => steer(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => steer(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => steer(Direction::Right),
        KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char('r' | 'R') => Some(Command::Reset),
        KeyCode::Enter => Some(Command::Restart),
        KeyCode::Char('1') => Some(Command::SetDifficulty(Difficulty::Easy)),
        KeyCode::Char('2') => Some(Command::SetDifficulty(Difficulty::Medium)),
        KeyCode::Char('3') => Some(Command::SetDifficulty(Difficulty::Hard)),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
