//! Abduction progress state machine.
//!
//! Pure per-collectible state: no ECS, no physics handles. The simulation
//! feeds it the beam reading and the body's measured height each tick and
//! acts on the returned [`StepOutcome`].
//!
//! ```text
//!   Idle ──beam──▶ Charging ──no beam──▶ Releasing ──progress=0──▶ Idle
//!                    │  ▲                    │
//!                    │  └───────beam─────────┘
//!                    └─ saturated AND lifted ─▶ Collected (until reset)
//! ```

use crate::config::AbductionTuning;

/// Charging snaps to 1 and releasing snaps to 0 within this width, so summed
/// frame deltas land exactly on the ends.
const PROGRESS_SNAP: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbductionPhase {
    #[default]
    Idle,
    /// Under the beam, progress rising.
    Charging,
    /// Beam lost, progress decaying.
    Releasing,
    /// Terminal until a global reset.
    Collected,
}

/// What a single tick asks the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// First tick under the beam since progress was last 0.
    pub beam_cue: bool,
    /// The terminal transition fired this tick.
    pub collected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AbductionState {
    progress: f32,
    phase: AbductionPhase,
    cue_played: bool,
    collected: bool,
}

impl AbductionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn phase(&self) -> AbductionPhase {
        self.phase
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Advance one tick.
    ///
    /// `height` is the body's current Y; collection requires both saturated
    /// progress and a body lifted above `tuning.lift_height`.
    pub fn step(
        &mut self,
        under_beam: bool,
        height: f32,
        dt: f32,
        tuning: &AbductionTuning,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if self.collected {
            return outcome;
        }
        // NaN and negative deltas both become 0.
        let dt = dt.max(0.0);

        if under_beam {
            self.progress = charge(self.progress, dt * tuning.charge_rate);
            if self.progress == 0.0 {
                // Nothing charged yet (zero-length tick), so stay idle and keep the cue.
                return outcome;
            }
            self.phase = AbductionPhase::Charging;
            if !self.cue_played {
                self.cue_played = true;
                outcome.beam_cue = true;
            }
            if self.progress >= tuning.saturation_threshold && height > tuning.lift_height {
                self.phase = AbductionPhase::Collected;
                self.collected = true;
                outcome.collected = true;
            }
        } else {
            self.progress = release(self.progress, dt * tuning.release_rate);
            if self.progress == 0.0 {
                self.phase = AbductionPhase::Idle;
                self.cue_played = false;
            } else {
                self.phase = AbductionPhase::Releasing;
            }
        }

        outcome
    }

    /// Back to a fresh `Idle` state. Only a global reset calls this.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Rising progress. Only the top end snaps, so tiny deltas still accumulate.
fn charge(progress: f32, amount: f32) -> f32 {
    let p = (progress + amount).min(1.0);
    if p > 1.0 - PROGRESS_SNAP {
        1.0
    } else {
        p
    }
}

/// Falling progress. A residue below the snap width counts as fully released.
fn release(progress: f32, amount: f32) -> f32 {
    let p = (progress - amount).max(0.0);
    if p < PROGRESS_SNAP {
        0.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    const DT: f32 = 1.0 / 60.0;
    const GROUNDED: f32 = 0.5;
    const LIFTED: f32 = 10.0;

    fn tuning() -> AbductionTuning {
        AbductionTuning::default()
    }

    /// Run `seconds` worth of 60 Hz ticks.
    fn run(
        state: &mut AbductionState,
        under_beam: bool,
        height: f32,
        seconds: f32,
    ) -> Vec<StepOutcome> {
        let t = tuning();
        let steps = (seconds / DT).round() as usize;
        (0..steps).map(|_| state.step(under_beam, height, DT, &t)).collect()
    }

    #[test]
    fn saturates_at_one_but_waits_for_lift() {
        let mut s = AbductionState::new();
        let outcomes = run(&mut s, true, GROUNDED, 1.25);
        assert_eq!(s.progress(), 1.0);
        assert_eq!(s.phase(), AbductionPhase::Charging);
        assert!(!s.is_collected());
        assert!(outcomes.iter().all(|o| !o.collected));

        let o = s.step(true, LIFTED, DT, &tuning());
        assert!(o.collected);
        assert_eq!(s.phase(), AbductionPhase::Collected);
        assert!(s.is_collected());
    }

    #[test]
    fn lifted_but_unsaturated_does_not_collect() {
        let mut s = AbductionState::new();
        let outcomes = run(&mut s, true, LIFTED, 1.0);
        assert!(s.progress() < 1.0);
        assert!(outcomes.iter().all(|o| !o.collected));
    }

    #[test]
    fn short_charge_then_release_returns_to_idle() {
        let mut s = AbductionState::new();
        run(&mut s, true, GROUNDED, 0.4);
        assert!((s.progress() - 0.32).abs() < 1e-3);

        run(&mut s, false, GROUNDED, 0.4);
        assert_eq!(s.progress(), 0.0);
        assert_eq!(s.phase(), AbductionPhase::Idle);
    }

    #[test]
    fn release_for_progress_over_rate_reaches_exactly_zero() {
        let t = tuning();
        for charge_secs in [0.1_f32, 0.37, 0.9, 1.2] {
            let mut s = AbductionState::new();
            run(&mut s, true, GROUNDED, charge_secs);
            let needed = s.progress() / t.release_rate;
            // Round up to whole ticks.
            run(&mut s, false, GROUNDED, (needed / DT).ceil() * DT);
            assert_eq!(s.progress(), 0.0, "charge {}s did not fully decay", charge_secs);
            assert_eq!(s.phase(), AbductionPhase::Idle);
        }
    }

    #[test]
    fn interrupted_pulses_accumulate() {
        let mut s = AbductionState::new();
        run(&mut s, true, GROUNDED, 0.5);
        run(&mut s, false, GROUNDED, 0.1);
        assert_eq!(s.phase(), AbductionPhase::Releasing);
        let carried = s.progress();
        assert!(carried > 0.0);

        run(&mut s, true, GROUNDED, 0.5);
        assert!((s.progress() - (carried + 0.4)).abs() < 1e-3);
    }

    #[test]
    fn cue_fires_once_per_charge_from_zero() {
        let mut s = AbductionState::new();
        let cues = |o: &[StepOutcome]| o.iter().filter(|o| o.beam_cue).count();

        assert_eq!(cues(&run(&mut s, true, GROUNDED, 0.5)), 1);
        // Brief release keeps progress above zero, so no second cue.
        run(&mut s, false, GROUNDED, 0.05);
        assert_eq!(cues(&run(&mut s, true, GROUNDED, 0.2)), 0);

        // Full decay re-arms it.
        run(&mut s, false, GROUNDED, 2.0);
        assert_eq!(s.phase(), AbductionPhase::Idle);
        assert_eq!(cues(&run(&mut s, true, GROUNDED, 0.2)), 1);
    }

    #[test]
    fn collected_fires_at_most_once() {
        let mut s = AbductionState::new();
        let outcomes = run(&mut s, true, LIFTED, 20.0);
        assert_eq!(outcomes.iter().filter(|o| o.collected).count(), 1);

        // Terminal: no decay, no cue, no second collection.
        let after = run(&mut s, false, GROUNDED, 5.0);
        assert!(after.iter().all(|o| *o == StepOutcome::default()));
        assert_eq!(s.phase(), AbductionPhase::Collected);
        assert_eq!(s.progress(), 1.0);
    }

    #[test]
    fn progress_stays_in_bounds_under_any_schedule() {
        let t = tuning();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut s = AbductionState::new();
            for _ in 0..300 {
                let dt = match rng.gen_range(0..4) {
                    0 => 0.0,
                    1 => rng.gen_range(0.0..0.05),
                    2 => rng.gen_range(0.0..5.0),
                    _ => -rng.gen_range(0.0..1.0),
                };
                s.step(rng.gen_bool(0.5), GROUNDED, dt, &t);
                assert!((0.0..=1.0).contains(&s.progress()), "progress {}", s.progress());
            }
        }
    }

    #[test]
    fn nan_delta_changes_nothing() {
        let mut s = AbductionState::new();
        run(&mut s, true, GROUNDED, 0.25);
        let before = s.progress();
        s.step(true, GROUNDED, f32::NAN, &tuning());
        assert_eq!(s.progress(), before);
    }

    #[test]
    fn tiny_frames_still_charge() {
        let t = tuning();
        let mut s = AbductionState::new();
        let mut cues = 0;
        for _ in 0..10_000 {
            if s.step(true, GROUNDED, 1e-4, &t).beam_cue {
                cues += 1;
            }
        }
        assert!((s.progress() - 0.8).abs() < 5e-3, "progress {}", s.progress());
        assert_eq!(s.phase(), AbductionPhase::Charging);
        assert_eq!(cues, 1);
    }

    #[test]
    fn zero_length_tick_under_beam_stays_idle() {
        let t = tuning();
        let mut s = AbductionState::new();
        let o = s.step(true, GROUNDED, 0.0, &t);
        assert_eq!(o, StepOutcome::default());
        assert_eq!(s.phase(), AbductionPhase::Idle);
        assert_eq!(s.progress(), 0.0);

        let o = s.step(true, GROUNDED, f32::NAN, &t);
        assert!(!o.beam_cue);
        assert_eq!(s.phase(), AbductionPhase::Idle);

        // The cue is still available for the first real charge.
        assert!(s.step(true, GROUNDED, DT, &t).beam_cue);
        assert_eq!(s.phase(), AbductionPhase::Charging);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut s = AbductionState::new();
        run(&mut s, true, LIFTED, 3.0);
        assert!(s.is_collected());
        s.reset();
        assert_eq!(s, AbductionState::default());
        assert_eq!(s.phase(), AbductionPhase::Idle);
    }
}
