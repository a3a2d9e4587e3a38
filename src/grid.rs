//! Grid: N×N cells of candy tokens, with logical coordinates and animation payload.

use crate::anim::{Motion, OPAQUE, Point};
use crate::matcher;
use rand::Rng;

/// Board side length (cells).
pub const GRID_SIZE: usize = 8;

/// Size of one cell in layout units. Token positions and targets are multiples of this.
pub const CELL_SIZE: f32 = 70.0;

/// Most color classes a board can use (the theme carries six candy colours).
pub const MAX_COLORS: u8 = 6;

/// (row, col). Row-major ordering, so sets of positions iterate top-left first.
pub type Position = (usize, usize);

/// Resting point of cell (row, col) in layout units.
#[inline]
pub fn cell_origin(row: usize, col: usize) -> Point {
    Point::new(col as f32 * CELL_SIZE, row as f32 * CELL_SIZE)
}

/// Rows and columns differ by exactly one step on exactly one axis.
#[inline]
pub fn is_adjacent(a: Position, b: Position) -> bool {
    (a.0.abs_diff(b.0) == 1 && a.1 == b.1) || (a.1.abs_diff(b.1) == 1 && a.0 == b.0)
}

/// Uniform color class in `0..colors`.
#[inline]
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, colors: u8) -> u8 {
    rng.gen_range(0..colors)
}

/// One candy. `row`/`col` are authoritative; `motion` may lag behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub color: u8,
    pub row: usize,
    pub col: usize,
    pub motion: Motion,
    pub opacity: u8,
}

impl Token {
    /// Token resting on its own cell.
    pub fn new(color: u8, row: usize, col: usize) -> Self {
        Self {
            color,
            row,
            col,
            motion: Motion::at(cell_origin(row, col)),
            opacity: OPAQUE,
        }
    }

    /// Move the logical coordinates and aim the animation at the new cell.
    pub fn relocate(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
        self.motion.retarget(cell_origin(row, col));
    }
}

/// Single cell: empty, or owning a token.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Token),
}

impl Cell {
    pub fn token(&self) -> Option<&Token> {
        match self {
            Self::Occupied(t) => Some(t),
            Self::Empty => None,
        }
    }

    pub fn token_mut(&mut self) -> Option<&mut Token> {
        match self {
            Self::Occupied(t) => Some(t),
            Self::Empty => None,
        }
    }

    pub fn color(&self) -> Option<u8> {
        self.token().map(|t| t.color)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Board of cells. Row 0 is the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    /// cells[row * size + col]
    cells: Vec<Cell>,
}

impl Grid {
    /// All cells empty.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Grid with a token of `f(row, col)` colour wherever `f` returns `Some`.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> Option<u8>) -> Self {
        let mut grid = Self::empty(size);
        for row in 0..size {
            for col in 0..size {
                if let Some(color) = f(row, col) {
                    grid.set(row, col, Cell::Occupied(Token::new(color, row, col)));
                }
            }
        }
        grid
    }

    /// Fully populated grid containing no run of three.
    ///
    /// Cells are filled row-major; each one re-rolls its colour until it does not
    /// complete a run with the already placed neighbours to its left and above.
    /// Needs `colors >= 3`, otherwise a cell can be blocked on both axes.
    pub fn random<R: Rng + ?Sized>(size: usize, colors: u8, rng: &mut R) -> Self {
        assert!(colors >= 3, "need at least 3 colours for a match-free board, got {colors}");
        let mut grid = Self::empty(size);
        for row in 0..size {
            for col in 0..size {
                loop {
                    let color = random_color(rng, colors);
                    grid.set(row, col, Cell::Occupied(Token::new(color, row, col)));
                    if !matcher::would_match(&grid, row, col) {
                        break;
                    }
                }
            }
        }
        grid
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) outside {0}x{0} grid",
            self.size
        );
        row * self.size + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        &self.cells[self.idx(row, col)]
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        let i = self.idx(row, col);
        &mut self.cells[i]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        let i = self.idx(row, col);
        self.cells[i] = cell;
    }

    /// Remove and return the cell's content, leaving it empty.
    pub fn take(&mut self, row: usize, col: usize) -> Cell {
        std::mem::take(self.get_mut(row, col))
    }

    #[inline]
    pub fn color(&self, row: usize, col: usize) -> Option<u8> {
        self.get(row, col).color()
    }

    pub fn token(&self, row: usize, col: usize) -> Option<&Token> {
        self.get(row, col).token()
    }

    pub fn token_mut(&mut self, row: usize, col: usize) -> Option<&mut Token> {
        self.get_mut(row, col).token_mut()
    }

    /// Exchange two cells and rewrite the logical coordinates of the tokens they hold.
    /// Animation targets are left alone; callers decide whether the swap is visible.
    pub fn swap(&mut self, a: Position, b: Position) {
        let (ia, ib) = (self.idx(a.0, a.1), self.idx(b.0, b.1));
        self.cells.swap(ia, ib);
        for (row, col) in [a, b] {
            if let Some(t) = self.token_mut(row, col) {
                t.row = row;
                t.col = col;
            }
        }
    }

    /// Every token on the board, row-major.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.cells.iter().filter_map(Cell::token)
    }

    pub fn tokens_mut(&mut self) -> impl Iterator<Item = &mut Token> {
        self.cells.iter_mut().filter_map(Cell::token_mut)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Colours only, row by row; handy for logging and comparisons.
    pub fn colors(&self) -> Vec<Vec<Option<u8>>> {
        (0..self.size)
            .map(|row| (0..self.size).map(|col| self.color(row, col)).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency() {
        assert!(is_adjacent((3, 3), (3, 4)));
        assert!(is_adjacent((3, 3), (2, 3)));
        assert!(!is_adjacent((3, 3), (4, 4)));
        assert!(!is_adjacent((3, 3), (3, 3)));
        assert!(!is_adjacent((3, 3), (3, 5)));
    }

    #[test]
    fn test_swap_updates_logical_coordinates() {
        let mut g = Grid::from_fn(GRID_SIZE, |r, c| Some(((r + c) % 6) as u8));
        let before = g.token(0, 1).cloned();
        g.swap((0, 1), (0, 2));
        let moved = g.token(0, 2).unwrap();
        assert_eq!(Some(moved.color), before.map(|t| t.color));
        assert_eq!((moved.row, moved.col), (0, 2));
        // target is untouched by a logical swap
        assert_eq!(moved.motion.target, cell_origin(0, 1));
    }

    #[test]
    fn test_take_empties_cell() {
        let mut g = Grid::from_fn(GRID_SIZE, |_, _| Some(0));
        assert!(matches!(g.take(4, 4), Cell::Occupied(_)));
        assert!(g.get(4, 4).is_empty());
        assert!(!g.is_full());
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let g = Grid::empty(GRID_SIZE);
        let _ = g.get(0, GRID_SIZE);
    }
}
