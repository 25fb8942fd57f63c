//! Vehicle position tracker.
//!
//! The vehicle controller is the only writer and publishes once per tick.
//! Collectibles read a [`VehicleSnapshot`] copied at the start of their pass,
//! so every collectible in a tick sees the same position and beam flag.

use glam::Vec3;

/// What the collectibles see of the vehicle during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleSnapshot {
    /// `None` until the controller has published at least once.
    pub position: Option<Vec3>,
    pub beam_active: bool,
}

#[derive(Debug, Default)]
pub struct PositionTracker {
    current: VehicleSnapshot,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, position: Vec3, beam_active: bool) {
        self.current = VehicleSnapshot {
            position: Some(position),
            beam_active,
        };
    }

    /// Forget the last published position (the vehicle is respawning).
    pub fn clear(&mut self) {
        self.current = VehicleSnapshot::default();
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        self.current
    }
}
