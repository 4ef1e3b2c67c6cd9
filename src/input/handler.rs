use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::game::Direction;

/// Terminal rows are roughly twice as tall as columns are wide
const ROW_ASPECT: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    TogglePause,
    Restart,
    CycleMode,
    CycleSkin,
    ToggleSound,
    ToggleVibration,
    ToggleSettings,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Turn(Direction::Up),
            KeyCode::Down => KeyAction::Turn(Direction::Down),
            KeyCode::Left => KeyAction::Turn(Direction::Left),
            KeyCode::Right => KeyAction::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => KeyAction::Restart,
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char('o') | KeyCode::Char('O') | KeyCode::Tab => KeyAction::ToggleSettings,

            // Settings
            KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::CycleMode,
            KeyCode::Char('k') | KeyCode::Char('K') => KeyAction::CycleSkin,
            KeyCode::Char('n') | KeyCode::Char('N') => KeyAction::ToggleSound,
            KeyCode::Char('v') | KeyCode::Char('V') => KeyAction::ToggleVibration,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a drag by its dominant axis
///
/// Returns `None` when the drag is shorter than `min_distance`.
pub fn swipe_direction(dx: f32, dy: f32, min_distance: f32) -> Option<Direction> {
    let distance = (dx * dx + dy * dy).sqrt();
    if distance < min_distance {
        return None;
    }

    if dx.abs() > dy.abs() {
        Some(if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// Turns a mouse press/release pair into a swipe
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
    min_distance: f32,
}

impl SwipeTracker {
    pub fn new(min_distance: f32) -> Self {
        Self {
            start: None,
            min_distance,
        }
    }

    /// Feed a mouse event; yields a direction when a swipe completes
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some((event.column, event.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (start_column, start_row) = self.start.take()?;
                let dx = f32::from(event.column) - f32::from(start_column);
                let dy = (f32::from(event.row) - f32::from(start_row)) * ROW_ASPECT;
                swipe_direction(dx, dy, self.min_distance)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(up), KeyAction::Turn(Direction::Up));

        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(down), KeyAction::Turn(Direction::Down));

        let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(left), KeyAction::Turn(Direction::Left));

        let right = KeyEvent::new(KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(right), KeyAction::Turn(Direction::Right));
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        let w = KeyEvent::new(KeyCode::Char('w'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(w), KeyAction::Turn(Direction::Up));

        let a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(a), KeyAction::Turn(Direction::Left));

        let s = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(s), KeyAction::Turn(Direction::Down));

        let d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE);
        assert_eq!(handler.handle_key_event(d), KeyAction::Turn(Direction::Right));
    }

    #[test]
    fn test_control_keys() {
        let handler = InputHandler::new();
        let cases = [
            (KeyCode::Char('q'), KeyAction::Quit),
            (KeyCode::Esc, KeyAction::Quit),
            (KeyCode::Char('r'), KeyAction::Restart),
            (KeyCode::Enter, KeyAction::Restart),
            (KeyCode::Char(' '), KeyAction::TogglePause),
            (KeyCode::Char('p'), KeyAction::TogglePause),
            (KeyCode::Tab, KeyAction::ToggleSettings),
            (KeyCode::Char('m'), KeyAction::CycleMode),
            (KeyCode::Char('k'), KeyAction::CycleSkin),
            (KeyCode::Char('n'), KeyAction::ToggleSound),
            (KeyCode::Char('v'), KeyAction::ToggleVibration),
            (KeyCode::Char('x'), KeyAction::None),
        ];

        for (code, expected) in cases {
            let key = KeyEvent::new(code, KeyModifiers::NONE);
            assert_eq!(handler.handle_key_event(key), expected, "{code:?}");
        }
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_swipe_threshold() {
        assert_eq!(swipe_direction(2.0, 0.0, 3.0), None);
        assert_eq!(swipe_direction(3.0, 0.0, 3.0), Some(Direction::Right));
        assert_eq!(swipe_direction(2.0, 2.5, 3.0), Some(Direction::Down));
    }

    #[test]
    fn test_swipe_dominant_axis() {
        assert_eq!(swipe_direction(-10.0, 4.0, 3.0), Some(Direction::Left));
        assert_eq!(swipe_direction(4.0, -10.0, 3.0), Some(Direction::Up));
        // Ties go vertical
        assert_eq!(swipe_direction(5.0, 5.0, 3.0), Some(Direction::Down));
    }

    #[test]
    fn test_mouse_drag_becomes_swipe() {
        let mut tracker = SwipeTracker::new(3.0);

        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10)),
            None
        );
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 8)),
            Some(Direction::Up)
        );

        // A release without a press is ignored
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 20, 8)),
            None
        );
    }

    #[test]
    fn test_rows_count_double() {
        let mut tracker = SwipeTracker::new(3.0);

        tracker.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        // Three columns right, two rows down: the vertical drag wins
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 13, 12)),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_short_drag_and_cancel() {
        let mut tracker = SwipeTracker::new(3.0);

        tracker.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 11, 10)),
            None
        );

        tracker.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        tracker.cancel();
        assert_eq!(
            tracker.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 20, 10)),
            None
        );
    }
}
