//! Input handling for keyboard, mouse, and the on-screen touch controls.
//!
//! Gameplay only ever asks two questions: which way does the player want to
//! fly ([`InputState::movement_intent`]) and is the tractor beam held
//! ([`InputState::is_beam_held`]). Both merge every source so the simulation
//! never cares whether a keyboard or a touch screen produced them.

use glam::Vec2;
use std::collections::HashSet;

mod joystick;

pub use joystick::{TouchRegion, VirtualJoystick};

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,

    /// Mouse position in window coordinates.
    mouse_position: Vec2,

    /// On-screen stick and beam button.
    joystick: VirtualJoystick,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call once the frame's input has been consumed.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
            }
        }
    }

    /// Process cursor position update.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        self.mouse_position = Vec2::new(position.0 as f32, position.1 as f32);
    }

    /// Process a touch event. `window_size` is the surface size in the same pixel space.
    pub fn process_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        position: (f64, f64),
        window_size: (u32, u32),
    ) {
        let position = Vec2::new(position.0 as f32, position.1 as f32);
        match phase {
            TouchPhase::Started => self.joystick.touch_started(id, position, window_size),
            TouchPhase::Moved => self.joystick.touch_moved(id, position),
            TouchPhase::Ended | TouchPhase::Cancelled => self.joystick.touch_ended(id),
        }
    }

    /// Drop every held input, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        if !self.keys_held.is_empty() || !self.mouse_held.is_empty() {
            log::debug!("Releasing held inputs");
        }
        self.keys_held.clear();
        self.mouse_held.clear();
        self.joystick.release_all();
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Get the mouse position in window coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Keyboard movement (WASD or arrows). +Y is forward.
    pub fn keyboard_movement(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;

        if self.is_key_held(KeyCode::KeyW) || self.is_key_held(KeyCode::ArrowUp) {
            movement.y += 1.0;
        }
        if self.is_key_held(KeyCode::KeyS) || self.is_key_held(KeyCode::ArrowDown) {
            movement.y -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyA) || self.is_key_held(KeyCode::ArrowLeft) {
            movement.x -= 1.0;
        }
        if self.is_key_held(KeyCode::KeyD) || self.is_key_held(KeyCode::ArrowRight) {
            movement.x += 1.0;
        }

        movement.normalize_or_zero()
    }

    /// Movement from every source, summed and clamped to unit length.
    pub fn movement_intent(&self) -> Vec2 {
        (self.keyboard_movement() + self.joystick.stick()).clamp_length_max(1.0)
    }

    /// Beam is held from Space, the left mouse button, or the on-screen beam button.
    pub fn is_beam_held(&self) -> bool {
        self.is_key_held(KeyCode::Space)
            || self.is_mouse_held(MouseButton::Left)
            || self.joystick.is_beam_held()
    }

    /// Check if interact was pressed (E).
    pub fn is_interact_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyE)
    }

    /// Check if the map toggle was pressed (M).
    pub fn is_map_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyM)
    }

    /// Check if the project pick was pressed (P).
    pub fn is_project_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyP)
    }

    /// Check if reset was pressed (R).
    pub fn is_reset_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyR)
    }

    /// Check if back/close was pressed (Escape).
    pub fn is_back_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton, TouchPhase};
pub use winit::keyboard::KeyCode;
