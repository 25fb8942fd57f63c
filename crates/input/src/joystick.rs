//! On-screen touch controls: a floating stick on the left half of the window
//! and a beam button covering the right half.

use glam::Vec2;
use std::collections::HashSet;

/// Stick travel in pixels that maps to full deflection.
const STICK_RADIUS_PX: f32 = 80.0;
/// Deflection below this is treated as centered.
const STICK_DEADZONE: f32 = 0.12;

/// Which control a touch landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchRegion {
    Stick,
    BeamButton,
}

impl TouchRegion {
    pub fn classify(position: Vec2, window_size: (u32, u32)) -> Self {
        if position.x < window_size.0 as f32 * 0.5 {
            TouchRegion::Stick
        } else {
            TouchRegion::BeamButton
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StickTouch {
    id: u64,
    origin: Vec2,
    current: Vec2,
}

#[derive(Debug, Default)]
pub struct VirtualJoystick {
    stick: Option<StickTouch>,
    beam_touches: HashSet<u64>,
}

impl VirtualJoystick {
    pub fn touch_started(&mut self, id: u64, position: Vec2, window_size: (u32, u32)) {
        match TouchRegion::classify(position, window_size) {
            // The stick floats: it is centered wherever the finger first lands.
            TouchRegion::Stick if self.stick.is_none() => {
                self.stick = Some(StickTouch {
                    id,
                    origin: position,
                    current: position,
                });
            }
            TouchRegion::Stick => {}
            TouchRegion::BeamButton => {
                self.beam_touches.insert(id);
            }
        }
    }

    pub fn touch_moved(&mut self, id: u64, position: Vec2) {
        if let Some(stick) = self.stick.as_mut().filter(|s| s.id == id) {
            stick.current = position;
        }
    }

    pub fn touch_ended(&mut self, id: u64) {
        if self.stick.is_some_and(|s| s.id == id) {
            self.stick = None;
        }
        self.beam_touches.remove(&id);
    }

    pub fn release_all(&mut self) {
        self.stick = None;
        self.beam_touches.clear();
    }

    /// Stick deflection in [-1, 1]², +Y forward (screen up).
    pub fn stick(&self) -> Vec2 {
        let Some(stick) = self.stick else {
            return Vec2::ZERO;
        };
        let delta = stick.current - stick.origin;
        let v = Vec2::new(delta.x, -delta.y) / STICK_RADIUS_PX;
        let v = v.clamp_length_max(1.0);
        if v.length() < STICK_DEADZONE {
            Vec2::ZERO
        } else {
            v
        }
    }

    pub fn is_beam_held(&self) -> bool {
        !self.beam_touches.is_empty()
    }
}
