use std::collections::VecDeque;

use itertools::iproduct;
use log::debug;
use rand::{seq::IteratorRandom, Rng};

use crate::game::types::Position;

/// Rejection sampling gives up after this many draws per cell on the board
/// and falls back to scanning for free cells.
const DRAWS_PER_CELL: usize = 4;

/// Picks a uniformly random cell that no snake segment occupies.
///
/// Returns `None` when the snake covers the whole board.
pub fn place_food<R: Rng>(
    rng: &mut R,
    grid_size: i32,
    snake: &VecDeque<Position>,
) -> Option<Position> {
    let side = usize::try_from(grid_size).ok().filter(|&side| side > 0)?;
    let area = side * side;
    if snake.len() >= area {
        return None;
    }

    for _ in 0..area * DRAWS_PER_CELL {
        let candidate = Position {
            x: rng.random_range(0..grid_size),
            y: rng.random_range(0..grid_size),
        };
        if !snake.contains(&candidate) {
            return Some(candidate);
        }
    }

    debug!(
        "no free cell after {} draws with {}/{} cells taken, scanning",
        area * DRAWS_PER_CELL,
        snake.len(),
        area
    );

    iproduct!(0..grid_size, 0..grid_size)
        .map(|(y, x)| Position { x, y })
        .filter(|c| !snake.contains(c))
        .choose(rng)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    /// Every cell of the board in row order, minus `keep_free`.
    fn board_without(grid_size: i32, keep_free: &[Position]) -> VecDeque<Position> {
        iproduct!(0..grid_size, 0..grid_size)
            .map(|(y, x)| Position { x, y })
            .filter(|c| !keep_free.contains(c))
            .collect()
    }

    #[test]
    fn food_never_lands_on_the_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake: VecDeque<_> = (0..15).map(|x| Position { x, y: 4 }).collect();

        for _ in 0..500 {
            let food = place_food(&mut rng, 20, &snake).unwrap();
            assert!(food.within(20));
            assert!(!snake.contains(&food), "food placed on {food}");
        }
    }

    #[test]
    fn nearly_full_board_finds_the_last_cell() {
        let last = Position::new(5, 2);
        let snake = board_without(8, &[last]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(place_food(&mut rng, 8, &snake), Some(last));
    }

    #[test]
    fn full_board_has_no_food() {
        let snake = board_without(3, &[]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(place_food(&mut rng, 3, &snake), None);
    }
}
