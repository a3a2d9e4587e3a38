//! Match detection: runs of three or more, and the "any move left?" probe.

use crate::grid::{Grid, Position};
use std::collections::BTreeSet;

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;

/// Right, down, left, up.
const NEIGHBOURS_4: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// True if the token at (row, col) is part of a horizontal or vertical run of at
/// least [`MIN_RUN`] with its current neighbours. An empty cell never matches.
pub fn would_match(grid: &Grid, row: usize, col: usize) -> bool {
    let Some(color) = grid.color(row, col) else {
        return false;
    };
    let n = grid.size();
    let same = |r: usize, c: usize| grid.color(r, c) == Some(color);

    let left = (0..col).rev().take_while(|&c| same(row, c)).count();
    let right = (col + 1..n).take_while(|&c| same(row, c)).count();
    if 1 + left + right >= MIN_RUN {
        return true;
    }

    let up = (0..row).rev().take_while(|&r| same(r, col)).count();
    let down = (row + 1..n).take_while(|&r| same(r, col)).count();
    1 + up + down >= MIN_RUN
}

/// Every cell that belongs to a maximal run of [`MIN_RUN`] or more identical
/// colours, rows and columns scanned independently and unioned.
pub fn find_matches(grid: &Grid) -> BTreeSet<Position> {
    let n = grid.size();
    let mut matches = BTreeSet::new();
    for row in 0..n {
        collect_runs(n, |i| grid.color(row, i), |i| (row, i), &mut matches);
    }
    for col in 0..n {
        collect_runs(n, |i| grid.color(i, col), |i| (i, col), &mut matches);
    }
    matches
}

/// Scan one line of `len` cells; `color_at(i)` reads cell i, `pos_of(i)` names it.
fn collect_runs(
    len: usize,
    color_at: impl Fn(usize) -> Option<u8>,
    pos_of: impl Fn(usize) -> Position,
    out: &mut BTreeSet<Position>,
) {
    let mut start = 0;
    while start < len {
        let Some(color) = color_at(start) else {
            start += 1;
            continue;
        };
        let mut end = start + 1;
        while end < len && color_at(end) == Some(color) {
            end += 1;
        }
        if end - start >= MIN_RUN {
            out.extend((start..end).map(&pos_of));
        }
        start = end;
    }
}

/// First adjacent swap (row-major, then right/down/left/up) that would produce a
/// match. The grid is swapped and swapped back in place, so on return it is
/// exactly as it was.
pub fn find_valid_move(grid: &mut Grid) -> Option<(Position, Position)> {
    let n = grid.size() as isize;
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            if grid.get(row, col).is_empty() {
                continue;
            }
            for (dr, dc) in NEIGHBOURS_4 {
                let (nr, nc) = (row as isize + dr, col as isize + dc);
                if nr < 0 || nc < 0 || nr >= n || nc >= n {
                    continue;
                }
                let other = (nr as usize, nc as usize);
                if grid.get(other.0, other.1).is_empty() {
                    continue;
                }
                grid.swap((row, col), other);
                let productive = !find_matches(grid).is_empty();
                grid.swap((row, col), other);
                if productive {
                    return Some(((row, col), other));
                }
            }
        }
    }
    None
}

/// Whether any single adjacent swap on the board produces a match.
pub fn has_any_valid_move(grid: &mut Grid) -> bool {
    find_valid_move(grid).is_some()
}
