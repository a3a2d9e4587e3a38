//! Column gravity after removals, and refill from above the board.

use crate::anim::{Motion, Point};
use crate::grid::{CELL_SIZE, Cell, Grid, Token, cell_origin, random_color};
use rand::Rng;

/// Drop every token in `col` down over the empty cells below it.
///
/// Scans bottom to top keeping a count of empty cells seen so far; each token is
/// relocated down by that count and its fall target set to the new cell.
/// Returns the count, which is also the number of empty cells now at the top.
pub fn compact_column(grid: &mut Grid, col: usize) -> usize {
    let mut empty = 0;
    for row in (0..grid.size()).rev() {
        if grid.get(row, col).is_empty() {
            empty += 1;
        } else if empty > 0 {
            let mut cell = grid.take(row, col);
            if let Some(token) = cell.token_mut() {
                token.relocate(row + empty, col);
            }
            grid.set(row + empty, col, cell);
        }
    }
    empty
}

/// Fill rows `0..count` of `col` with fresh random tokens that start stacked
/// above the board: the token for row `i` starts `count - i` cells above the
/// top edge, so upper tokens fall from higher up.
pub fn refill_column<R: Rng + ?Sized>(
    grid: &mut Grid,
    col: usize,
    count: usize,
    rng: &mut R,
    colors: u8,
) {
    for row in 0..count {
        let mut token = Token::new(random_color(rng, colors), row, col);
        let start = Point::new(token.motion.target.x, -((count - row) as f32) * CELL_SIZE);
        token.motion = Motion::from_to(start, cell_origin(row, col));
        grid.set(row, col, Cell::Occupied(token));
    }
}

/// Compact and refill every column. Returns how many tokens were spawned.
pub fn apply<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, colors: u8) -> usize {
    let mut spawned = 0;
    for col in 0..grid.size() {
        let vacated = compact_column(grid, col);
        refill_column(grid, col, vacated, rng, colors);
        spawned += vacated;
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GRID_SIZE;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_compact_moves_tokens_over_scattered_gaps() {
        // column 0: A _ B _ _ C D E
        let mut g = Grid::from_fn(GRID_SIZE, |r, c| match (r, c) {
            (1 | 3 | 4, 0) => None,
            (0, 0) => Some(0),
            (2, 0) => Some(1),
            (5, 0) => Some(2),
            (6, 0) => Some(3),
            (7, 0) => Some(4),
            _ => Some(5),
        });
        assert_eq!(compact_column(&mut g, 0), 3);
        let col: Vec<_> = (0..GRID_SIZE).map(|r| g.color(r, 0)).collect();
        assert_eq!(col, vec![None, None, None, Some(0), Some(1), Some(2), Some(3), Some(4)]);
        let a = g.token(3, 0).unwrap();
        assert_eq!((a.row, a.col), (3, 0));
        assert_eq!(a.motion.target, cell_origin(3, 0));
        assert_eq!(a.motion.current, cell_origin(0, 0));
    }

    #[test]
    fn test_full_column_untouched() {
        let mut g = Grid::from_fn(GRID_SIZE, |r, _| Some((r % 6) as u8));
        let before = g.clone();
        assert_eq!(compact_column(&mut g, 3), 0);
        assert_eq!(g, before);
    }

    #[test]
    fn test_refill_stacks_above_board() {
        let mut g = Grid::empty(GRID_SIZE);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        refill_column(&mut g, 2, 3, &mut rng, 6);
        let ys: Vec<f32> = (0..3).map(|r| g.token(r, 2).unwrap().motion.current.y).collect();
        assert_eq!(ys, vec![-3.0 * CELL_SIZE, -2.0 * CELL_SIZE, -CELL_SIZE]);
        for r in 0..3 {
            let t = g.token(r, 2).unwrap();
            assert_eq!(t.motion.target, cell_origin(r, 2));
            assert_eq!(t.motion.current.x, cell_origin(r, 2).x);
            assert!(t.color < 6);
        }
        assert!(g.get(3, 2).is_empty());
    }
}
