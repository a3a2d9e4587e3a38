//! App: terminal init, main loop, tick and input handling.

use crate::input::{Action, cell_at, key_to_action, move_cursor};
use crate::theme::Theme;
use crate::ui;
use anyhow::Result;
use candytui::{GRID_SIZE, GameConfig, GameState, Position};
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::{Position as ScreenPosition, Rect};
use std::time::{Duration, Instant};
use tachyonfx::Effect;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverOption {
    Restart,
    Quit,
}

impl GameOverOption {
    fn toggled(self) -> Self {
        match self {
            Self::Restart => Self::Quit,
            Self::Quit => Self::Restart,
        }
    }
}

/// Whether the loop keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct App {
    theme: Theme,
    state: GameState,
    screen: Screen,
    /// Keyboard cursor on the board.
    cursor: Position,
    /// Swap suggested by the last hint request; cleared by the next gesture.
    hint: Option<(Position, Position)>,
    game_over_selected: GameOverOption,
    /// TachyonFX dim effect for the game over screen (created when it first shows).
    overlay_effect: Option<Effect>,
    /// Last time we processed the overlay effect (for delta).
    overlay_effect_process_time: Option<Instant>,
    frame_interval: Duration,
    /// Terminal area from the last draw; mouse positions are mapped against it.
    area: Rect,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme, frame_rate: f64) -> Result<Self> {
        let state = GameState::new(config)?;
        Ok(Self {
            theme,
            state,
            screen: Screen::Playing,
            cursor: (GRID_SIZE / 2, GRID_SIZE / 2),
            hint: None,
            game_over_selected: GameOverOption::Restart,
            overlay_effect: None,
            overlay_effect_process_time: None,
            frame_interval: Duration::from_secs_f64(1.0 / frame_rate.max(1.0)),
            area: Rect::default(),
        })
    }

    fn reset_game(&mut self) {
        self.state.reset();
        self.screen = Screen::Playing;
        self.hint = None;
        self.game_over_selected = GameOverOption::Restart;
        self.overlay_effect = None;
        self.overlay_effect_process_time = None;
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();

            // One engine step per frame, before drawing what it produced.
            self.state.tick();
            if self.screen == Screen::Playing && self.state.is_game_over() {
                info!(score = self.state.score(), "showing game over");
                self.screen = Screen::GameOver;
                self.game_over_selected = GameOverOption::Restart;
            }

            terminal.draw(|f| {
                self.area = f.area();
                ui::draw(
                    f,
                    self.screen,
                    &self.state,
                    &self.theme,
                    self.cursor,
                    self.hint,
                    self.game_over_selected,
                    &mut self.overlay_effect,
                    &mut self.overlay_effect_process_time,
                    now,
                );
            })?;

            let timeout = self.frame_interval.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if self.handle_event(event::read()?) == Flow::Exit {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            // Ignore repeats and releases.
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_action(key_to_action(key)),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => self.handle_click(column, row),
            _ => Flow::Continue,
        }
    }

    fn handle_action(&mut self, action: Action) -> Flow {
        match self.screen {
            Screen::Playing => match action {
                Action::Quit => return Flow::Exit,
                Action::Up | Action::Down | Action::Left | Action::Right => {
                    self.cursor = move_cursor(self.cursor, action, GRID_SIZE);
                }
                Action::Activate => self.activate(self.cursor),
                Action::Hint => {
                    self.hint = self.state.hint();
                    debug!(hint = ?self.hint, "hint requested");
                }
                Action::Restart | Action::None => {}
            },
            Screen::GameOver => match action {
                Action::Quit => return Flow::Exit,
                Action::Restart => self.reset_game(),
                Action::Left | Action::Right => {
                    self.game_over_selected = self.game_over_selected.toggled();
                }
                Action::Activate => return self.confirm_game_over(self.game_over_selected),
                _ => {}
            },
        }
        Flow::Continue
    }

    fn handle_click(&mut self, column: u16, row: u16) -> Flow {
        match self.screen {
            Screen::Playing => {
                let geom = ui::board_geometry(self.area);
                if let Some(pos) = cell_at(&geom, column, row) {
                    self.cursor = pos;
                    self.activate(pos);
                }
            }
            Screen::GameOver => {
                let (restart, quit) = ui::game_over_buttons(self.area);
                let at = ScreenPosition::new(column, row);
                if restart.contains(at) {
                    return self.confirm_game_over(GameOverOption::Restart);
                }
                if quit.contains(at) {
                    return self.confirm_game_over(GameOverOption::Quit);
                }
            }
        }
        Flow::Continue
    }

    fn activate(&mut self, (row, col): Position) {
        self.hint = None;
        self.state.activate_cell(row, col);
    }

    fn confirm_game_over(&mut self, option: GameOverOption) -> Flow {
        match option {
            GameOverOption::Restart => {
                self.reset_game();
                Flow::Continue
            }
            GameOverOption::Quit => Flow::Exit,
        }
    }
}
