//! Physical side of an abduction: beam forces, idle twitches, the off-stage
//! park on collection, and fell-through-the-world recovery.

use engine_core::planar_offset;
use glam::Vec3;
use physics::{PhysicsWorld, RigidBodyHandle};
use rand::Rng;

use crate::config::AbductionTuning;
use crate::session::{SessionError, SessionState};

/// Everything to push into one body this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyEffects {
    /// Continuous force for this step (replaces last tick's).
    pub force: Vec3,
    pub impulse: Vec3,
    pub torque_impulse: Vec3,
    pub lock_rotation: bool,
}

impl BodyEffects {
    /// No artificial effect; rotation still follows the lock rule.
    pub fn none(lock_rotation: bool) -> Self {
        Self {
            force: Vec3::ZERO,
            impulse: Vec3::ZERO,
            torque_impulse: Vec3::ZERO,
            lock_rotation,
        }
    }
}

/// Inputs the applier reads for one collectible.
#[derive(Debug, Clone, Copy)]
pub struct EffectInput {
    pub progress: f32,
    pub under_beam: bool,
    pub body_position: Vec3,
    pub vehicle_position: Option<Vec3>,
    pub mass: f32,
    pub gravity: f32,
    pub dt: f32,
}

/// Per-collectible idle twitch trigger.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwitchState {
    /// Offset into the shared waveform so the herd does not twitch in unison.
    pub phase_offset: f32,
    above_threshold: bool,
}

impl TwitchState {
    pub fn new(phase_offset: f32) -> Self {
        Self {
            phase_offset,
            above_threshold: false,
        }
    }

    /// Sample the waveform at `time`. Returns an impulse on the tick the wave
    /// rises past the threshold, if the body is grounded and the roll succeeds.
    pub fn sample(
        &mut self,
        time: f32,
        grounded: bool,
        mass: f32,
        tuning: &AbductionTuning,
        rng: &mut impl Rng,
    ) -> Option<Vec3> {
        let wave =
            (std::f32::consts::TAU * tuning.twitch_frequency * time + self.phase_offset).sin();
        let above = wave >= tuning.twitch_threshold;
        let rising = above && !self.above_threshold;
        self.above_threshold = above;

        if !rising || !grounded || rng.gen::<f32>() >= tuning.twitch_chance {
            return None;
        }
        let dir = Vec3::new(rng.gen_range(-0.3..0.3), 1.0, rng.gen_range(-0.3..0.3));
        Some(dir * tuning.twitch_impulse * mass)
    }
}

pub struct CollectionEffectApplier {
    tuning: AbductionTuning,
}

impl CollectionEffectApplier {
    pub fn new(tuning: AbductionTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &AbductionTuning {
        &self.tuning
    }

    /// Lift in multiples of body weight: `lift_base` at 0 progress up to
    /// `lift_base + lift_span` at full progress, times `lift_gain`.
    pub fn lift_factor(&self, progress: f32) -> f32 {
        let t = &self.tuning;
        (t.lift_base + t.lift_span * progress.clamp(0.0, 1.0)) * t.lift_gain
    }

    pub fn rotation_locked_at(&self, progress: f32) -> bool {
        progress < self.tuning.rotation_unlock_progress
    }

    /// Forces for a body under the beam; nothing otherwise.
    pub fn beam_effects(&self, input: &EffectInput) -> BodyEffects {
        let lock_rotation = self.rotation_locked_at(input.progress);
        if !input.under_beam {
            return BodyEffects::none(lock_rotation);
        }
        let t = &self.tuning;

        let force = Vec3::Y * input.mass * input.gravity * self.lift_factor(input.progress);
        let impulse = input
            .vehicle_position
            .map(|v| planar_offset(input.body_position, v) * input.dt * t.pull_gain * input.mass)
            .unwrap_or(Vec3::ZERO);

        BodyEffects {
            force,
            impulse,
            torque_impulse: t.torque_impulse,
            lock_rotation,
        }
    }

    /// Push `effects` into the physics world. Clears last tick's force first.
    pub fn apply(
        &self,
        physics: &mut PhysicsWorld,
        handle: RigidBodyHandle,
        effects: &BodyEffects,
    ) {
        physics.reset_forces(handle);
        physics.set_rotation_locked(handle, effects.lock_rotation);
        if effects.force != Vec3::ZERO {
            physics.add_force(handle, effects.force);
        }
        if effects.impulse != Vec3::ZERO {
            physics.apply_impulse(handle, effects.impulse);
        }
        if effects.torque_impulse != Vec3::ZERO && !effects.lock_rotation {
            physics.apply_torque_impulse(handle, effects.torque_impulse);
        }
    }

    /// Terminal effect: credit the skill and park the body off-stage.
    /// Returns whether the session changed.
    pub fn apply_collected(
        &self,
        physics: &mut PhysicsWorld,
        handle: RigidBodyHandle,
        session: &mut SessionState,
        skill_id: &str,
    ) -> Result<bool, SessionError> {
        physics.park(handle, self.tuning.offstage_position);
        session.record_collection(skill_id)
    }

    /// Put a body that fell below the lost height back at `spawn_height`, at rest.
    /// Parked bodies are never touched.
    pub fn recover_if_lost(
        &self,
        physics: &mut PhysicsWorld,
        handle: RigidBodyHandle,
        spawn_height: f32,
    ) -> bool {
        if !physics.is_body_enabled(handle) {
            return false;
        }
        match physics.body_position(handle) {
            Some(p) if p.y < self.tuning.lost_height => {
                physics.lift_to_height(handle, spawn_height);
                true
            }
            _ => false,
        }
    }
}
