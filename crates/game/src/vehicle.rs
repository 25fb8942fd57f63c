//! UFO controller: turns the movement intent into a hovering position and
//! publishes it, with the beam flag, to the position tracker.

use engine_core::{Transform, Velocity};
use glam::{Vec2, Vec3};

use crate::config::VehicleTuning;
use crate::tracker::PositionTracker;

pub struct VehicleController {
    pub transform: Transform,
    pub velocity: Velocity,
    pub beam_active: bool,
    tuning: VehicleTuning,
}

impl VehicleController {
    pub fn new(tuning: VehicleTuning) -> Self {
        let mut vehicle = Self {
            transform: Transform::default(),
            velocity: Velocity::default(),
            beam_active: false,
            tuning,
        };
        vehicle.respawn();
        vehicle
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Back to the start position, at rest, beam off.
    pub fn respawn(&mut self) {
        let start = self.tuning.start_position;
        let position = Vec3::new(start.x, self.tuning.hover_height, start.z);
        self.transform = Transform::from_position(position);
        self.velocity = Velocity::default();
        self.beam_active = false;
    }

    /// Advance one tick. `intent` is +X right, +Y forward (-Z in world).
    pub fn update(&mut self, intent: Vec2, beam_held: bool, dt: f32) {
        let dt = dt.max(0.0);
        let intent = intent.clamp_length_max(1.0);
        let target = Vec3::new(intent.x, 0.0, -intent.y) * self.tuning.max_speed;

        // Exponential approach: frame-rate independent and never overshoots.
        let blend = 1.0 - (-self.tuning.acceleration * dt).exp();
        self.velocity.linear = self.velocity.linear.lerp(target, blend);

        let limit = self.tuning.arena_half_extent;
        let mut p = self.transform.position + self.velocity.linear * dt;
        if p.x.abs() > limit {
            p.x = p.x.clamp(-limit, limit);
            self.velocity.linear.x = 0.0;
        }
        if p.z.abs() > limit {
            p.z = p.z.clamp(-limit, limit);
            self.velocity.linear.z = 0.0;
        }
        p.y = self.tuning.hover_height;
        self.transform.position = p;
        self.beam_active = beam_held;
    }

    pub fn publish(&self, tracker: &mut PositionTracker) {
        tracker.publish(self.transform.position, self.beam_active);
    }
}
