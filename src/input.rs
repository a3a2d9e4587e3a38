//! Key bindings (normal and vim-style) and mouse → board cell mapping.

use crate::ui::BoardGeometry;
use candytui::Position;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    /// Activate the cell under the cursor (or the focused button at game over).
    Activate,
    Hint,
    Restart,
    Quit,
    None,
}

/// Map key event to action. Supports both arrows and vim keys (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
        KeyCode::Char('?') => Action::Hint,
        KeyCode::Char('r' | 'R') => Action::Restart,
        _ => Action::None,
    }
}

/// Board cell under a terminal position:
/// `col = (x - offset_x) / cell_w`, `row = (y - offset_y) / cell_h`, both in `[0, N)`.
pub fn cell_at(geom: &BoardGeometry, column: u16, row: u16) -> Option<Position> {
    let dx = column.checked_sub(geom.x)?;
    let dy = row.checked_sub(geom.y)?;
    let (c, r) = ((dx / geom.cell_w) as usize, (dy / geom.cell_h) as usize);
    (r < geom.size && c < geom.size).then_some((r, c))
}

/// Cursor moved one cell, clamped to the board.
pub fn move_cursor((row, col): Position, action: Action, size: usize) -> Position {
    let last = size.saturating_sub(1);
    match action {
        Action::Up => (row.saturating_sub(1), col),
        Action::Down => ((row + 1).min(last), col),
        Action::Left => (row, col.saturating_sub(1)),
        Action::Right => (row, (col + 1).min(last)),
        _ => (row, col),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn geom() -> BoardGeometry {
        BoardGeometry {
            x: 10,
            y: 5,
            cell_w: 4,
            cell_h: 2,
            size: 8,
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_to_action(press(KeyCode::Char('h'))), Action::Left);
        assert_eq!(key_to_action(press(KeyCode::Up)), Action::Up);
        assert_eq!(key_to_action(press(KeyCode::Char(' '))), Action::Activate);
        assert_eq!(key_to_action(press(KeyCode::Esc)), Action::Quit);
        assert_eq!(key_to_action(press(KeyCode::Char('x'))), Action::None);
        let alt_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT);
        assert_eq!(key_to_action(alt_q), Action::None);
    }

    #[test]
    fn test_cell_at_maps_and_rejects() {
        let g = geom();
        assert_eq!(cell_at(&g, 10, 5), Some((0, 0)));
        assert_eq!(cell_at(&g, 13, 6), Some((0, 0)));
        assert_eq!(cell_at(&g, 14, 7), Some((1, 1)));
        assert_eq!(cell_at(&g, 41, 20), Some((7, 7)));
        assert_eq!(cell_at(&g, 42, 20), None);
        assert_eq!(cell_at(&g, 9, 5), None);
        assert_eq!(cell_at(&g, 10, 21), None);
    }

    #[test]
    fn test_cursor_clamps() {
        assert_eq!(move_cursor((0, 0), Action::Up, 8), (0, 0));
        assert_eq!(move_cursor((0, 0), Action::Left, 8), (0, 0));
        assert_eq!(move_cursor((7, 7), Action::Down, 8), (7, 7));
        assert_eq!(move_cursor((3, 3), Action::Right, 8), (3, 4));
    }
}
