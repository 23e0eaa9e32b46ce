use std::{fmt, slice::Iter, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn iter() -> Iter<'static, Self> {
        static DIRECTIONS: [Direction; 4] = [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ];
        DIRECTIONS.iter()
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Unit step on the board. Row 0 is the top row, so `Up` is `-1` on y.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }

    /// Gets the dominant direction of a drag from one point to another.
    ///
    /// Drags shorter than `min_distance` on both axes give `None`. An exactly
    /// diagonal drag resolves to the vertical direction.
    #[must_use]
    pub fn from_swipe(dx: i32, dy: i32, min_distance: i32) -> Option<Self> {
        if dx.abs() < min_distance && dy.abs() < min_distance {
            return None;
        }

        if dx.abs() > dy.abs() {
            Some(if dx > 0 { Self::Right } else { Self::Left })
        } else {
            Some(if dy > 0 { Self::Down } else { Self::Up })
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Left => "Left",
                Self::Right => "Right",
                Self::Up => "Up",
                Self::Down => "Down",
            }
        )
    }
}

#[derive(
    Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, Default,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn neighbour(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    #[must_use]
    pub const fn within(self, grid_size: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < grid_size && self.y < grid_size
    }
}

/// Named tick-interval presets.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn tick_interval_ms(self) -> u64 {
        match self {
            Self::Easy => 200,
            Self::Medium => 150,
            Self::Hard => 100,
        }
    }

    #[must_use]
    pub const fn tick_interval(self) -> Duration {
        Duration::from_millis(self.tick_interval_ms())
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown difficulty \"{}\" (expected easy, medium or hard)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownDifficulty(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_direction_reverses_to_its_opposite_delta() {
        for &d in Direction::iter() {
            let (dx, dy) = d.delta();
            let (ox, oy) = d.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0), "{d}");
            assert_eq!(dx.abs() + dy.abs(), 1, "{d} must be a unit step");
        }
    }

    #[test]
    fn up_moves_towards_row_zero() {
        assert_eq!(
            Position::new(10, 10).neighbour(Direction::Up),
            Position::new(10, 9)
        );
    }

    #[test]
    fn within_checks_both_axes() {
        assert!(Position::new(0, 19).within(20));
        assert!(!Position::new(20, 0).within(20));
        assert!(!Position::new(3, -1).within(20));
    }

    #[test]
    fn short_swipes_are_ignored() {
        assert_eq!(Direction::from_swipe(1, -1, 2), None);
        assert_eq!(Direction::from_swipe(-3, 1, 2), Some(Direction::Left));
        assert_eq!(Direction::from_swipe(2, 5, 2), Some(Direction::Down));
        assert_eq!(Direction::from_swipe(4, -4, 2), Some(Direction::Up));
    }

    #[test]
    fn difficulty_table() {
        assert_eq!(Difficulty::Easy.tick_interval_ms(), 200);
        assert_eq!(Difficulty::Medium.tick_interval_ms(), 150);
        assert_eq!(Difficulty::Hard.tick_interval_ms(), 100);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }
}
