//! Layout and drawing: board, animated candies, sidebar, game over overlay.

use crate::app::{GameOverOption, Screen};
use crate::theme::Theme;
use candytui::grid::CELL_SIZE;
use candytui::{GRID_SIZE, GameState, Position};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal columns / rows per board cell.
const CELL_W: u16 = 4;
const CELL_H: u16 = 2;
/// Candy glyph, one string per terminal row of a cell.
const CANDY_GLYPH: [&str; CELL_H as usize] = ["▗██▖", "▝██▘"];

const SIDEBAR_WIDTH: u16 = 26;

/// Duration of the game-over dim (TachyonFX fade) in ms.
const GAME_OVER_FADE_MS: u32 = 600;
/// How much of the overlay colour is black (out of 255).
const OVERLAY_ALPHA: u8 = 180;

const POPUP_W: u16 = 40;
const POPUP_H: u16 = 12;
const BUTTON_W: u16 = 14;
const BUTTON_H: u16 = 3;

/// Where the board's cells sit on screen. Cell (r, c) covers
/// columns `x + c*cell_w ..` and rows `y + r*cell_h ..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub x: u16,
    pub y: u16,
    pub cell_w: u16,
    pub cell_h: u16,
    pub size: usize,
}

impl BoardGeometry {
    fn width(&self) -> u16 {
        self.cell_w * self.size as u16
    }

    fn height(&self) -> u16 {
        self.cell_h * self.size as u16
    }

    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width(), self.height())
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= i32::from(self.x)
            && y >= i32::from(self.y)
            && x < i32::from(self.x + self.width())
            && y < i32::from(self.y + self.height())
    }
}

/// Board (with border) and sidebar, centred in `area`.
fn layout(area: Rect) -> (Rect, Rect) {
    let bw = CELL_W * GRID_SIZE as u16 + 2;
    let bh = CELL_H * GRID_SIZE as u16 + 2;
    let total_w = bw + SIDEBAR_WIDTH;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(bh) / 2;
    let board = Rect::new(x, y, bw, bh).intersection(area);
    let sidebar = Rect::new(x + bw, y, SIDEBAR_WIDTH, bh).intersection(area);
    (board, sidebar)
}

/// Board cell placement for a terminal of size `area`; matches what [`draw`] renders.
pub fn board_geometry(area: Rect) -> BoardGeometry {
    let (board, _) = layout(area);
    BoardGeometry {
        x: board.x + 1,
        y: board.y + 1,
        cell_w: CELL_W,
        cell_h: CELL_H,
        size: GRID_SIZE,
    }
}

fn popup_rect(area: Rect) -> Rect {
    Rect::new(
        area.x + area.width.saturating_sub(POPUP_W) / 2,
        area.y + area.height.saturating_sub(POPUP_H) / 2,
        POPUP_W.min(area.width),
        POPUP_H.min(area.height),
    )
}

/// Restart and Quit button rects on the game over popup.
pub fn game_over_buttons(area: Rect) -> (Rect, Rect) {
    let popup = popup_rect(area);
    let gap = 2;
    let start_x = popup.x + popup.width.saturating_sub(BUTTON_W * 2 + gap) / 2;
    let y = popup.y + popup.height.saturating_sub(BUTTON_H + 1);
    (
        Rect::new(start_x, y, BUTTON_W, BUTTON_H).intersection(area),
        Rect::new(start_x + BUTTON_W + gap, y, BUTTON_W, BUTTON_H).intersection(area),
    )
}

fn rgb(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Red => (255, 0, 0),
        Color::Green => (0, 255, 0),
        Color::Yellow => (255, 255, 0),
        Color::Blue => (0, 0, 255),
        Color::Magenta => (255, 0, 255),
        Color::Cyan => (0, 255, 255),
        Color::Gray => (128, 128, 128),
        Color::DarkGray => (64, 64, 64),
        Color::White => (255, 255, 255),
        _ => (128, 128, 128),
    }
}

/// `fg` over `bg` with `alpha` (255 = only fg).
pub fn blend(fg: Color, bg: Color, alpha: u8) -> Color {
    let (fr, fg_, fb) = rgb(fg);
    let (br, bg_, bb) = rgb(bg);
    let a = u16::from(alpha);
    let mix = |f: u8, b: u8| ((u16::from(f) * a + u16::from(b) * (255 - a)) / 255) as u8;
    Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
}

/// Draw the current screen. Game over dims everything with a TachyonFX fade,
/// then shows the result popup; `overlay_effect` / `overlay_process_time` carry the
/// effect between frames.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    state: &GameState,
    theme: &Theme,
    cursor: Position,
    hint: Option<(Position, Position)>,
    game_over_selected: GameOverOption,
    overlay_effect: &mut Option<Effect>,
    overlay_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    draw_game(frame, state, theme, cursor, hint, screen == Screen::Playing, area);
    if screen == Screen::GameOver {
        apply_game_over_effect(frame, theme, area, overlay_effect, overlay_process_time, now);
        draw_game_over(frame, state, theme, game_over_selected, area);
    }
}

fn draw_game(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    cursor: Position,
    hint: Option<(Position, Position)>,
    show_cursor: bool,
    area: Rect,
) {
    let (board_area, sidebar_area) = layout(area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" candytui ", Style::default().fg(theme.title)));
    frame.render_widget(block, board_area);

    let geom = board_geometry(area);
    let buf = frame.buffer_mut();
    draw_cells(buf, state, theme, &geom, show_cursor.then_some(cursor), hint);
    draw_candies(buf, state, theme, &geom);
    draw_sidebar(frame, state, theme, sidebar_area);
}

/// Cell backgrounds: checkerboard, with hint, cursor and selection highlights on top.
fn draw_cells(
    buf: &mut Buffer,
    state: &GameState,
    theme: &Theme,
    geom: &BoardGeometry,
    cursor: Option<Position>,
    hint: Option<(Position, Position)>,
) {
    let area = buf.area;
    let checker = blend(theme.div_line, theme.bg, 96);
    for row in 0..geom.size {
        for col in 0..geom.size {
            let pos = (row, col);
            let bg = if state.selection() == Some(pos) {
                theme.title
            } else if cursor == Some(pos) {
                theme.selected_bg
            } else if hint.is_some_and(|(a, b)| a == pos || b == pos) {
                theme.inactive_fg
            } else if (row + col) % 2 == 0 {
                theme.bg
            } else {
                checker
            };
            let x0 = geom.x + col as u16 * geom.cell_w;
            let y0 = geom.y + row as u16 * geom.cell_h;
            for y in y0..y0 + geom.cell_h {
                for x in x0..x0 + geom.cell_w {
                    if x < area.right() && y < area.bottom() {
                        buf[(x, y)].set_symbol(" ").set_style(Style::default().bg(bg));
                    }
                }
            }
        }
    }
}

/// Candies at their animated positions, faded by opacity, clipped to the board.
fn draw_candies(buf: &mut Buffer, state: &GameState, theme: &Theme, geom: &BoardGeometry) {
    let area = buf.area;
    for row in 0..geom.size {
        for col in 0..geom.size {
            let (Some(color), Some(v)) = (state.cell(row, col), state.token_visual(row, col))
            else {
                continue;
            };
            let tx = (f32::from(geom.x) + v.x / CELL_SIZE * f32::from(geom.cell_w)).round() as i32;
            let ty = (f32::from(geom.y) + v.y / CELL_SIZE * f32::from(geom.cell_h)).round() as i32;
            let base = theme.candy_color(color);
            for (dy, line) in CANDY_GLYPH.iter().enumerate() {
                for (dx, symbol) in line.chars().enumerate() {
                    let (x, y) = (tx + dx as i32, ty + dy as i32);
                    if !geom.contains(x, y) {
                        continue;
                    }
                    let (x, y) = (x as u16, y as u16);
                    if x >= area.right() || y >= area.bottom() {
                        continue;
                    }
                    let cell = &mut buf[(x, y)];
                    let fg = blend(base, cell.bg, v.opacity);
                    cell.set_char(symbol).set_fg(fg);
                }
            }
        }
    }
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let label = Style::default().fg(theme.inactive_fg);
    let value = Style::default().fg(theme.main_fg).add_modifier(Modifier::BOLD);
    let stats = state.stats();
    let lines = vec![
        Line::from(Span::styled("SCORE", label)),
        Line::from(Span::styled(
            state.score().to_string(),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::styled("Moves  ", label), Span::styled(stats.moves.to_string(), value)]),
        Line::from(vec![
            Span::styled("Chain  ", label),
            Span::styled(format!("{} (best {})", stats.cascade, stats.best_cascade), value),
        ]),
        Line::from(vec![Span::styled("Phase  ", label), Span::styled(state.phase().label(), value)]),
        Line::from(vec![Span::styled("Seed   ", label), Span::styled(state.seed().to_string(), value)]),
        Line::from(""),
        colour_strip(state, theme),
        Line::from(""),
        Line::from(Span::styled("←↓↑→/hjkl  move", label)),
        Line::from(Span::styled("Enter/Space select", label)),
        Line::from(Span::styled("click      select", label)),
        Line::from(Span::styled("?          hint", label)),
        Line::from(Span::styled("q/Esc      quit", label)),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line))
        .style(Style::default().bg(theme.bg));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One block per colour class in play.
fn colour_strip<'a>(state: &GameState, theme: &Theme) -> Line<'a> {
    let spans: Vec<Span<'a>> = (0..state.config().colors)
        .map(|i| Span::styled("██ ", Style::default().fg(theme.candy_color(i))))
        .collect();
    Line::from(spans)
}

/// Create or advance the game-over dim; once it has finished, keep the area dimmed.
fn apply_game_over_effect(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    overlay_effect: &mut Option<Effect>,
    overlay_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let overlay = blend(Color::Black, theme.bg, OVERLAY_ALPHA);
    let delta = overlay_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    *overlay_process_time = Some(now);

    let effect = overlay_effect.get_or_insert_with(|| {
        fx::fade_to(overlay, overlay, (GAME_OVER_FADE_MS, Interpolation::QuadOut)).with_area(area)
    });
    if effect.done() {
        let buf = frame.buffer_mut();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                buf[(x, y)].set_fg(overlay).set_bg(overlay);
            }
        }
    } else {
        frame.render_effect(effect, area, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_game_over(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    selected: GameOverOption,
    area: Rect,
) {
    let popup = popup_rect(area);
    frame.render_widget(Clear, popup);
    let bold = |c: Color| Style::default().fg(c).add_modifier(Modifier::BOLD);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER!", bold(theme.main_fg))),
        Line::from(Span::styled("No more valid moves!", Style::default().fg(theme.main_fg))),
        Line::from(""),
        Line::from(Span::styled(format!("Final Score: {}", state.score()), bold(theme.title))),
        Line::from(Span::styled(
            format!("Best chain: {}", state.stats().best_cascade),
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .style(Style::default().bg(theme.bg));
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        popup,
    );

    let (restart, quit) = game_over_buttons(area);
    draw_button(frame, restart, "Restart", theme.candy_color(1), selected == GameOverOption::Restart, theme);
    draw_button(frame, quit, "Quit", theme.candy_color(0), selected == GameOverOption::Quit, theme);
}

fn draw_button(frame: &mut Frame, rect: Rect, label: &str, accent: Color, focused: bool, theme: &Theme) {
    let (fg, bg) = if focused {
        (theme.bg, accent)
    } else {
        (accent, theme.bg)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent).bg(bg))
        .style(Style::default().bg(bg));
    let text = Paragraph::new(Line::from(Span::styled(
        label.to_string(),
        Style::default().fg(fg).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(text, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        let fg = Color::Rgb(200, 100, 0);
        let bg = Color::Rgb(0, 0, 0);
        assert_eq!(blend(fg, bg, 255), fg);
        assert_eq!(blend(fg, bg, 0), bg);
        assert_eq!(blend(fg, bg, 128), Color::Rgb(100, 50, 0));
    }

    #[test]
    fn test_geometry_inside_board_border() {
        let area = Rect::new(0, 0, 100, 40);
        let (board, sidebar) = layout(area);
        let g = board_geometry(area);
        assert_eq!((g.x, g.y), (board.x + 1, board.y + 1));
        assert_eq!(g.rect().right(), board.right() - 1);
        assert_eq!(g.rect().bottom(), board.bottom() - 1);
        assert_eq!(sidebar.x, board.right());
    }

    #[test]
    fn test_buttons_side_by_side_inside_popup() {
        let area = Rect::new(0, 0, 100, 40);
        let (restart, quit) = game_over_buttons(area);
        let popup = popup_rect(area);
        assert_eq!(restart.y, quit.y);
        assert!(restart.right() <= quit.x);
        assert!(popup.contains(restart.as_position()) && quit.bottom() <= popup.bottom());
    }
}
