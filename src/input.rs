//! Input handling: raw window events in, simulation [`Command`]s out.
//!
//! The `Input` tracker keeps the little state needed to turn winit events
//! into discrete commands: held modifiers, which button started a drag, and
//! the last cursor position.
//!
//! | Input | Command |
//! |-------|---------|
//! | wheel up / down | [`Command::Zoom`] (+1 / -1 per notch) |
//! | left click | [`Command::Click`] |
//! | shift + left drag | [`Command::Rotate`] |
//! | right drag | [`Command::Pan`] (rotate while shift is held) |
//! | `R` | [`Command::ResetView`] |
//! | `C` | [`Command::ClearTrajectories`] |
//! | `A` / `S` | [`Command::IncreaseA`] / [`Command::DecreaseA`] |
//! | `D` / `F` | [`Command::IncreaseB`] / [`Command::DecreaseB`] |
//! | `T` | [`Command::ToggleFollow`] |
//! | `P` | [`Command::TogglePause`] |
//! | `Esc`, window close | [`Command::Quit`] |

use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Pixels of touchpad scrolling that count as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 50.0;

/// Discrete input the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    /// Wheel notches, positive moves the camera closer.
    Zoom(f32),
    /// Button press at a screen position (origin top-left, pixels).
    Click { position: Vec2, shift: bool },
    /// Rotate-drag delta in pixels.
    Rotate(Vec2),
    /// Pan-drag delta in pixels.
    Pan(Vec2),
    ResetView,
    ClearTrajectories,
    IncreaseA,
    DecreaseA,
    IncreaseB,
    DecreaseB,
    ToggleFollow,
    TogglePause,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_winit(btn: WinitMouseButton) -> Option<Self> {
        match btn {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Keys with a binding, plus everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A,
    C,
    D,
    F,
    P,
    R,
    S,
    T,
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyA => KeyCode::A,
            WinitKeyCode::KeyC => KeyCode::C,
            WinitKeyCode::KeyD => KeyCode::D,
            WinitKeyCode::KeyF => KeyCode::F,
            WinitKeyCode::KeyP => KeyCode::P,
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyS => KeyCode::S,
            WinitKeyCode::KeyT => KeyCode::T,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

impl KeyCode {
    /// The command bound to this key, if any.
    pub fn command(self) -> Option<Command> {
        match self {
            KeyCode::R => Some(Command::ResetView),
            KeyCode::C => Some(Command::ClearTrajectories),
            KeyCode::A => Some(Command::IncreaseA),
            KeyCode::S => Some(Command::DecreaseA),
            KeyCode::D => Some(Command::IncreaseB),
            KeyCode::F => Some(Command::DecreaseB),
            KeyCode::T => Some(Command::ToggleFollow),
            KeyCode::P => Some(Command::TogglePause),
            KeyCode::Escape => Some(Command::Quit),
            KeyCode::Other(_) => None,
        }
    }
}

/// Input state tracking for turning window events into commands.
#[derive(Debug, Default)]
pub struct Input {
    shift: bool,
    left_held: bool,
    right_held: bool,
    /// Last cursor position while a drag is in progress.
    drag_anchor: Option<Vec2>,
    cursor: Vec2,
    pixel_scroll: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<Command> {
        match event {
            WindowEvent::CloseRequested => Some(Command::Quit),

            WindowEvent::ModifiersChanged(modifiers) => {
                self.set_shift(modifiers.state().shift_key());
                None
            }

            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => {
                    self.key(KeyCode::from(code), event.state == ElementState::Pressed, event.repeat)
                }
                PhysicalKey::Unidentified(_) => None,
            },

            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from_winit(*button)?;
                self.button(button, *state == ElementState::Pressed)
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }

            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.wheel_lines(*y),
                MouseScrollDelta::PixelDelta(pos) => self.wheel_pixels(pos.y as f32),
            },

            _ => None,
        }
    }

    pub(crate) fn set_shift(&mut self, held: bool) {
        self.shift = held;
    }

    pub(crate) fn key(&self, key: KeyCode, pressed: bool, repeat: bool) -> Option<Command> {
        if !pressed || repeat {
            return None;
        }
        key.command()
    }

    pub(crate) fn button(&mut self, button: MouseButton, pressed: bool) -> Option<Command> {
        match (button, pressed) {
            (MouseButton::Left, true) => {
                self.left_held = true;
                if self.shift {
                    self.drag_anchor = Some(self.cursor);
                }
                Some(Command::Click {
                    position: self.cursor,
                    shift: self.shift,
                })
            }
            (MouseButton::Right, true) => {
                self.right_held = true;
                self.drag_anchor = Some(self.cursor);
                None
            }
            (MouseButton::Left, false) => {
                self.left_held = false;
                self.end_drag_if_idle();
                None
            }
            (MouseButton::Right, false) => {
                self.right_held = false;
                self.end_drag_if_idle();
                None
            }
            (MouseButton::Middle, _) => None,
        }
    }

    pub(crate) fn cursor_moved(&mut self, position: Vec2) -> Option<Command> {
        self.cursor = position;
        let anchor = self.drag_anchor?;
        let delta = position - anchor;
        self.drag_anchor = Some(position);

        if delta == Vec2::ZERO {
            None
        } else if self.shift {
            Some(Command::Rotate(delta))
        } else if self.right_held {
            Some(Command::Pan(delta))
        } else {
            None
        }
    }

    pub(crate) fn wheel_lines(&mut self, lines: f32) -> Option<Command> {
        if lines == 0.0 || !lines.is_finite() {
            return None;
        }
        Some(Command::Zoom(lines.signum()))
    }

    pub(crate) fn wheel_pixels(&mut self, pixels: f32) -> Option<Command> {
        if !pixels.is_finite() {
            return None;
        }
        self.pixel_scroll += pixels;
        let notches = (self.pixel_scroll / PIXELS_PER_NOTCH).trunc();
        if notches == 0.0 {
            return None;
        }
        self.pixel_scroll -= notches * PIXELS_PER_NOTCH;
        Some(Command::Zoom(notches))
    }

    fn end_drag_if_idle(&mut self) {
        if !self.right_held && !(self.left_held && self.shift) {
            self.drag_anchor = None;
        }
    }
}
