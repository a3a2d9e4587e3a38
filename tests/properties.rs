use candytui::grid::{Cell, GRID_SIZE, Grid, cell_origin};
use candytui::matcher::{find_matches, has_any_valid_move};
use candytui::{GameConfig, GameState, Phase, gravity};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const MAX_TICKS: usize = 20_000;

fn random_grid(seed: u64, colors: u8) -> Grid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Grid::random(GRID_SIZE, colors, &mut rng)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_board_is_full_and_match_free(seed in any::<u64>(), colors in 3u8..=6) {
        let grid = random_grid(seed, colors);
        prop_assert!(grid.is_full());
        prop_assert!(find_matches(&grid).is_empty());
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                let t = grid.token(r, c).unwrap();
                prop_assert_eq!((t.row, t.col), (r, c));
                prop_assert!(t.color < colors);
            }
        }
    }

    #[test]
    fn move_probe_leaves_board_untouched(seed in any::<u64>(), colors in 3u8..=6) {
        let mut grid = random_grid(seed, colors);
        let before = grid.clone();
        has_any_valid_move(&mut grid);
        prop_assert_eq!(grid, before);
    }

    #[test]
    fn gravity_keeps_column_order_and_fills(
        seed in any::<u64>(),
        holes in prop::collection::vec(any::<bool>(), GRID_SIZE * GRID_SIZE),
    ) {
        let mut grid = random_grid(seed, 6);
        let mut survivors = vec![Vec::new(); GRID_SIZE];
        let mut removed = 0;
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                if holes[r * GRID_SIZE + c] {
                    grid.set(r, c, Cell::Empty);
                    removed += 1;
                } else {
                    survivors[c].push(grid.color(r, c).unwrap());
                }
            }
        }

        for c in 0..GRID_SIZE {
            let vacated = gravity::compact_column(&mut grid, c);
            prop_assert_eq!(vacated, GRID_SIZE - survivors[c].len());
            // no gap below an occupied cell
            let first = (0..GRID_SIZE).find(|&r| !grid.get(r, c).is_empty()).unwrap_or(GRID_SIZE);
            prop_assert!((first..GRID_SIZE).all(|r| !grid.get(r, c).is_empty()));
            let column: Vec<u8> = (first..GRID_SIZE).filter_map(|r| grid.color(r, c)).collect();
            prop_assert_eq!(&column, &survivors[c]);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x5eed);
        let mut spawned = 0;
        for c in 0..GRID_SIZE {
            let vacated = GRID_SIZE - survivors[c].len();
            gravity::refill_column(&mut grid, c, vacated, &mut rng, 6);
            spawned += vacated;
        }
        prop_assert_eq!(spawned, removed);
        prop_assert!(grid.is_full());
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                let t = grid.token(r, c).unwrap();
                prop_assert_eq!((t.row, t.col), (r, c));
                prop_assert_eq!(t.motion.target, cell_origin(r, c));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn random_play_keeps_board_consistent(
        seed in any::<u64>(),
        colors in 4u8..=6,
        taps in prop::collection::vec((0..GRID_SIZE, 0..GRID_SIZE), 1..24),
    ) {
        let config = GameConfig { seed: Some(seed), colors, ..GameConfig::default() };
        let mut state = GameState::new(config).unwrap();
        let mut last_score = 0;

        for (row, col) in taps {
            state.activate_cell(row, col);
            let mut ticks = 0;
            while state.phase() != Phase::Idle {
                state.tick();
                ticks += 1;
                prop_assert!(ticks < MAX_TICKS, "stuck in {:?}", state.phase());
                prop_assert!(state.score() >= last_score);
                last_score = state.score();
            }
            prop_assert_eq!(state.score() % 10, 0);
            prop_assert!(state.grid().is_full());
            prop_assert!(find_matches(state.grid()).is_empty());
            if state.is_game_over() {
                break;
            }
        }
    }
}
