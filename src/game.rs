//! Game state: board, selection, phase machine (swap, clear, fall, cascade), score.

use crate::anim::fade;
use crate::config::{ConfigError, GameConfig};
use crate::grid::{GRID_SIZE, Grid, Position, cell_origin, is_adjacent};
use crate::{gravity, matcher};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Score for each cell in a resolved match set.
pub const POINTS_PER_CELL: u32 = 10;

/// What the board is doing. Only `Idle` accepts player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Two tokens moving into each other's cells.
    Swapping,
    /// Matched tokens fading out.
    Disappearing,
    /// Survivors dropping and refills falling in.
    Falling,
    /// A swap that matched nothing, returning to where it came from.
    SwappingBack,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Swapping => "swapping",
            Self::Disappearing => "clearing",
            Self::Falling => "falling",
            Self::SwappingBack => "swapping back",
        }
    }
}

/// Where and how visible a token is, in layout units (see [`crate::grid::CELL_SIZE`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenVisual {
    pub x: f32,
    pub y: f32,
    pub opacity: u8,
}

/// Counters shown next to the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Swaps attempted, productive or not.
    pub moves: u32,
    /// Match sets resolved since the last swap (1 = no cascade).
    pub cascade: u32,
    /// Deepest cascade this game.
    pub best_cascade: u32,
}

/// The engine. One instance per board; driven by `activate_cell`, `tick` and `reset`.
#[derive(Debug)]
pub struct GameState {
    config: GameConfig,
    rng: ChaCha8Rng,
    seed: u64,
    grid: Grid,
    phase: Phase,
    selection: Option<Position>,
    /// The two cells of the swap in flight (Swapping / SwappingBack).
    swap_pair: Option<(Position, Position)>,
    /// Cells fading out (Disappearing). Removal is by coordinate.
    fading: BTreeSet<Position>,
    score: u32,
    game_over: bool,
    stats: Stats,
}

impl GameState {
    /// New game on a random match-free board.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = Grid::random(GRID_SIZE, config.colors, &mut rng);
        info!(seed, colors = config.colors, "new game");
        Ok(Self::assemble(config, rng, seed, grid))
    }

    /// New game on a given board. Refills still come from the configured seed.
    pub fn with_grid(config: GameConfig, grid: Grid) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Ok(Self::assemble(config, rng, seed, grid))
    }

    fn assemble(config: GameConfig, rng: ChaCha8Rng, seed: u64, grid: Grid) -> Self {
        Self {
            config,
            rng,
            seed,
            grid,
            phase: Phase::Idle,
            selection: None,
            swap_pair: None,
            fading: BTreeSet::new(),
            score: 0,
            game_over: false,
            stats: Stats::default(),
        }
    }

    /// Fresh board and zeroed state; overrides whatever phase is in flight.
    /// The RNG stream continues, so a seeded session replays the same sequence of boards.
    pub fn reset(&mut self) {
        self.grid = Grid::random(GRID_SIZE, self.config.colors, &mut self.rng);
        self.phase = Phase::Idle;
        self.selection = None;
        self.swap_pair = None;
        self.fading.clear();
        self.score = 0;
        self.game_over = false;
        self.stats = Stats::default();
        info!("game reset");
    }

    /// Player gesture on a cell. Ignored unless idle and not game over.
    ///
    /// Panics if (row, col) is off the board; callers map input to cells first.
    pub fn activate_cell(&mut self, row: usize, col: usize) {
        let n = self.grid.size();
        assert!(row < n && col < n, "activate_cell({row}, {col}) outside {n}x{n} board");
        if self.phase != Phase::Idle || self.game_over {
            return;
        }
        let pos = (row, col);
        match self.selection {
            None => self.selection = Some(pos),
            Some(sel) if sel == pos => self.selection = None,
            Some(sel) if is_adjacent(sel, pos) => {
                self.selection = None;
                self.start_swap(sel, pos);
            }
            Some(_) => self.selection = Some(pos),
        }
    }

    fn start_swap(&mut self, a: Position, b: Position) {
        self.grid.swap(a, b);
        self.aim_home(a);
        self.aim_home(b);
        self.swap_pair = Some((a, b));
        self.stats.moves += 1;
        self.stats.cascade = 0;
        self.phase = Phase::Swapping;
        debug!(?a, ?b, "swap");
    }

    /// Point the token at `pos` at its own cell.
    fn aim_home(&mut self, (row, col): Position) {
        if let Some(t) = self.grid.token_mut(row, col) {
            t.motion.retarget(cell_origin(row, col));
        }
    }

    fn pair_arrived(&self, (a, b): (Position, Position)) -> bool {
        [a, b]
            .iter()
            .all(|&(r, c)| self.grid.token(r, c).is_none_or(|t| t.motion.arrived()))
    }

    fn advance_pair(&mut self, (a, b): (Position, Position)) {
        let rate = self.config.swap_rate;
        for (r, c) in [a, b] {
            if let Some(t) = self.grid.token_mut(r, c) {
                t.motion.advance(rate);
            }
        }
    }

    /// One time step: advance animations of the current phase, or move to the next phase.
    pub fn tick(&mut self) {
        match self.phase {
            Phase::Idle => {}
            Phase::Swapping => self.tick_swapping(),
            Phase::SwappingBack => self.tick_swapping_back(),
            Phase::Disappearing => self.tick_disappearing(),
            Phase::Falling => self.tick_falling(),
        }
    }

    fn tick_swapping(&mut self) {
        let Some(pair) = self.swap_pair else {
            self.phase = Phase::Idle;
            return;
        };
        if !self.pair_arrived(pair) {
            self.advance_pair(pair);
            return;
        }
        let matches = matcher::find_matches(&self.grid);
        if matches.is_empty() {
            let (a, b) = pair;
            self.grid.swap(a, b);
            self.aim_home(a);
            self.aim_home(b);
            self.phase = Phase::SwappingBack;
            debug!(?a, ?b, "no match, swapping back");
        } else {
            self.swap_pair = None;
            self.begin_clear(matches);
        }
    }

    fn tick_swapping_back(&mut self) {
        let Some(pair) = self.swap_pair else {
            self.settle();
            return;
        };
        if self.pair_arrived(pair) {
            self.swap_pair = None;
            self.settle();
        } else {
            self.advance_pair(pair);
        }
    }

    fn tick_disappearing(&mut self) {
        let step = self.config.fade_step;
        let mut all_faded = true;
        for &(r, c) in &self.fading {
            if let Some(t) = self.grid.token_mut(r, c) {
                if t.opacity > 0 {
                    t.opacity = fade(t.opacity, step);
                    all_faded = false;
                }
            }
        }
        if !all_faded {
            return;
        }
        for (r, c) in std::mem::take(&mut self.fading) {
            self.grid.take(r, c);
        }
        let spawned = gravity::apply(&mut self.grid, &mut self.rng, self.config.colors);
        debug!(spawned, "gravity");
        self.phase = Phase::Falling;
    }

    fn tick_falling(&mut self) {
        let rate = self.config.fall_rate;
        let mut all_arrived = true;
        for t in self.grid.tokens_mut() {
            if !t.motion.arrived() {
                t.motion.advance(rate);
                all_arrived = false;
            }
        }
        if !all_arrived {
            return;
        }
        let matches = matcher::find_matches(&self.grid);
        if matches.is_empty() {
            self.settle();
        } else {
            self.begin_clear(matches);
        }
    }

    /// Score a match set and start fading it out.
    fn begin_clear(&mut self, matches: BTreeSet<Position>) {
        let gained = POINTS_PER_CELL * matches.len() as u32;
        self.score += gained;
        self.stats.cascade += 1;
        self.stats.best_cascade = self.stats.best_cascade.max(self.stats.cascade);
        debug!(cells = matches.len(), gained, cascade = self.stats.cascade, "match");
        self.fading = matches;
        self.phase = Phase::Disappearing;
    }

    /// Back to idle; latch game over if the board has no productive swap left.
    fn settle(&mut self) {
        self.phase = Phase::Idle;
        if !self.game_over && !matcher::has_any_valid_move(&mut self.grid) {
            self.game_over = true;
            info!(score = self.score, moves = self.stats.moves, "no valid moves left, game over");
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Colour class at a cell, if occupied.
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        self.grid.color(row, col)
    }

    pub fn token_visual(&self, row: usize, col: usize) -> Option<TokenVisual> {
        self.grid.token(row, col).map(|t| TokenVisual {
            x: t.motion.current.x,
            y: t.motion.current.y,
            opacity: t.opacity,
        })
    }

    pub fn selection(&self) -> Option<Position> {
        self.selection
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// A productive swap, when idle. Probes a copy of the board.
    pub fn hint(&self) -> Option<(Position, Position)> {
        if self.phase != Phase::Idle || self.game_over {
            return None;
        }
        let mut probe = self.grid.clone();
        matcher::find_valid_move(&mut probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> GameConfig {
        GameConfig {
            seed: Some(42),
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_selection_rules() {
        let mut g = GameState::new(seeded()).unwrap();
        g.activate_cell(2, 2);
        assert_eq!(g.selection(), Some((2, 2)));
        g.activate_cell(2, 2);
        assert_eq!(g.selection(), None);
        g.activate_cell(2, 2);
        g.activate_cell(5, 5);
        assert_eq!(g.selection(), Some((5, 5)));
        assert_eq!(g.phase(), Phase::Idle);
        g.activate_cell(5, 6);
        assert_eq!(g.selection(), None);
        assert_eq!(g.phase(), Phase::Swapping);
        assert_eq!(g.stats().moves, 1);
    }

    #[test]
    fn test_input_ignored_while_animating() {
        let mut g = GameState::new(seeded()).unwrap();
        g.activate_cell(0, 0);
        g.activate_cell(0, 1);
        assert_eq!(g.phase(), Phase::Swapping);
        g.activate_cell(4, 4);
        assert_eq!(g.selection(), None);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let cfg = GameConfig { colors: 9, ..seeded() };
        assert_eq!(GameState::new(cfg).err(), Some(ConfigError::ColorCount(9)));
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = GameState::new(seeded()).unwrap();
        let b = GameState::new(seeded()).unwrap();
        assert_eq!(a.grid().colors(), b.grid().colors());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    #[should_panic]
    fn test_activate_out_of_bounds_panics() {
        let mut g = GameState::new(seeded()).unwrap();
        g.activate_cell(GRID_SIZE, 0);
    }
}
