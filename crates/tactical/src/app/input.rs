//! Window input folded into per-frame tactical key flags.

use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::coord::Facing;
use crate::interaction::KeyFlags;

#[derive(Debug, Clone, Copy, Default)]
struct ButtonState {
    down: bool,
    pressed: bool,
    released: bool,
}

impl ButtonState {
    fn set(&mut self, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.down {
                    self.pressed = true;
                }
                self.down = true;
            }
            ElementState::Released => {
                if self.down {
                    self.released = true;
                }
                self.down = false;
            }
        }
    }

    /// A press and release landing in the same frame are reported on
    /// consecutive frames.
    fn take(&mut self, press: KeyFlags, held: KeyFlags, release: KeyFlags, up: KeyFlags) -> KeyFlags {
        if self.pressed {
            self.pressed = false;
            return press;
        }
        if self.released {
            self.released = false;
            return release | up;
        }
        if self.down {
            held
        } else {
            up
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ScrollKeys {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl ScrollKeys {
    fn facing(&self) -> Option<Facing> {
        let dx = i32::from(self.right) - i32::from(self.left);
        let dy = i32::from(self.down) - i32::from(self.up);
        match (dx, dy) {
            (0, -1) => Some(Facing::North),
            (1, -1) => Some(Facing::NorthEast),
            (1, 0) => Some(Facing::East),
            (1, 1) => Some(Facing::SouthEast),
            (0, 1) => Some(Facing::South),
            (-1, 1) => Some(Facing::SouthWest),
            (-1, 0) => Some(Facing::West),
            (-1, -1) => Some(Facing::NorthWest),
            _ => None,
        }
    }
}

/// Collects window events between frames. Cursor positions are already in
/// back buffer pixels.
#[derive(Debug, Default)]
pub struct InputCollector {
    cursor: Option<(i32, i32)>,
    left: ButtonState,
    right: ButtonState,
    scroll: ScrollKeys,
    pressed_keys: Vec<KeyCode>,
    quit_requested: bool,
}

impl InputCollector {
    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.cursor
    }

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Some((x, y));
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    pub fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        match button {
            MouseButton::Left => self.left.set(state),
            MouseButton::Right => self.right.set(state),
            _ => {}
        }
    }

    /// Arrow keys scroll and Escape quits; every other key press is queued
    /// for the game.
    pub fn handle_key(&mut self, key: PhysicalKey, state: ElementState, repeat: bool) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        let pressed = state == ElementState::Pressed;
        match code {
            KeyCode::ArrowUp => self.scroll.up = pressed,
            KeyCode::ArrowDown => self.scroll.down = pressed,
            KeyCode::ArrowLeft => self.scroll.left = pressed,
            KeyCode::ArrowRight => self.scroll.right = pressed,
            KeyCode::Escape => {
                if pressed {
                    self.mark_quit_requested();
                }
            }
            _ => {
                if pressed && !repeat {
                    self.pressed_keys.push(code);
                }
            }
        }
    }

    pub fn scroll_facing(&self) -> Option<Facing> {
        self.scroll.facing()
    }

    /// Mouse button state for this frame. Edges are consumed.
    pub fn take_key_flags(&mut self) -> KeyFlags {
        self.left.take(
            KeyFlags::LEFT_PRESS,
            KeyFlags::LEFT_HELD,
            KeyFlags::LEFT_RELEASE,
            KeyFlags::LEFT_UP,
        ) | self.right.take(
            KeyFlags::RIGHT_PRESS,
            KeyFlags::RIGHT_HELD,
            KeyFlags::RIGHT_RELEASE,
            KeyFlags::RIGHT_UP,
        )
    }

    pub fn take_pressed_keys(&mut self) -> Vec<KeyCode> {
        std::mem::take(&mut self.pressed_keys)
    }
}
