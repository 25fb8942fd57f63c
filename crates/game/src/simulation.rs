//! Headless simulation: one [`Simulation::tick`] per rendered frame.
//!
//! Tick order:
//! 1. vehicle controller integrates input and publishes to the tracker
//! 2. the tracker snapshot is taken once; every collectible reads that copy
//! 3. per collectible: lost-body recovery, beam check, FSM step, effects
//! 4. physics step, then body transforms are copied back into the ECS
//!
//! Collectibles only read the shared snapshot and their own state, so the
//! order they are visited in does not matter.

use engine_core::{Label, SpawnPoint, Transform};
use glam::{Vec2, Vec3};
use hecs::World;
use physics::{PhysicsBody, PhysicsWorld};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::abduction::AbductionPhase;
use crate::beam::ProximityBeamDetector;
use crate::collectible::{self, Collectible};
use crate::config::GameConfig;
use crate::effects::{CollectionEffectApplier, EffectInput};
use crate::landmarks::{Landmark, Landmarks};
use crate::session::{ModalSection, SessionState};
use crate::tracker::PositionTracker;
use crate::vehicle::VehicleController;

/// Extra probe length below a collectible's collider that still counts as grounded.
const GROUND_PROBE_SLACK: f32 = 0.15;

/// Input sampled once at the start of a tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub movement: Vec2,
    pub beam_held: bool,
}

/// Things that happened during a tick, for the audio/UI collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A collectible started charging from zero progress.
    BeamCue { skill_id: String },
    /// A collectible completed its abduction.
    CollectedCue { skill_id: String, label: String },
    /// The last skill was collected.
    AllCollected { elapsed: Option<f32> },
    /// A grounded, idle collectible hopped.
    Twitched { skill_id: String },
    /// A body fell out of the world and was put back.
    Recovered { skill_id: String },
    Reset,
}

/// Read-only view of one collectible for the HUD and tests.
#[derive(Debug, Clone)]
pub struct CollectibleView {
    pub skill_id: String,
    pub label: String,
    pub phase: AbductionPhase,
    pub progress: f32,
    pub position: Vec3,
}

pub struct Simulation {
    world: World,
    physics: PhysicsWorld,
    tracker: PositionTracker,
    detector: ProximityBeamDetector,
    applier: CollectionEffectApplier,
    vehicle: VehicleController,
    landmarks: Landmarks,
    session: SessionState,
    rng: StdRng,
    ground_probe: f32,
    time: f32,
    events: Vec<GameEvent>,
}

impl Simulation {
    pub fn new(config: &GameConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane();

        let landmarks = Landmarks::build(&config.landmarks, &mut physics);
        collectible::spawn_collectibles(&mut world, &mut physics, config, &mut rng);
        let session = SessionState::new(
            config
                .skills
                .iter()
                .map(|s| (s.id.clone(), s.label.clone())),
        );

        Self {
            world,
            physics,
            tracker: PositionTracker::new(),
            detector: ProximityBeamDetector::new(config.abduction.proximity_radius),
            applier: CollectionEffectApplier::new(config.abduction.clone()),
            vehicle: VehicleController::new(config.vehicle.clone()),
            landmarks,
            session,
            rng,
            ground_probe: config.collectible_half_extents.y + GROUND_PROBE_SLACK,
            time: 0.0,
            events: Vec::new(),
        }
    }

    pub fn tick(&mut self, dt: f32, input: &FrameInput) {
        let dt = dt.max(0.0);
        self.time += dt;

        self.vehicle.update(input.movement, input.beam_held, dt);
        self.vehicle.publish(&mut self.tracker);
        self.session.set_beam_active(self.vehicle.beam_active);
        if input.movement != Vec2::ZERO || input.beam_held {
            self.session.start_timer(self.time);
        }

        let snapshot = self.tracker.snapshot();
        let gravity = self.physics.gravity_magnitude();
        let tuning = self.applier.tuning();
        let mut newly_collected = 0;

        for (_, (collectible, spawn, label, body)) in self
            .world
            .query_mut::<(&mut Collectible, &SpawnPoint, &Label, &PhysicsBody)>()
        {
            if collectible.abduction.is_collected() {
                continue;
            }
            let handle = body.rigid_body;

            if self
                .applier
                .recover_if_lost(&mut self.physics, handle, spawn.position.y)
            {
                log::warn!("'{}' fell out of the world, recovered", collectible.skill_id);
                self.events.push(GameEvent::Recovered {
                    skill_id: collectible.skill_id.clone(),
                });
            }
            let Some(position) = self.physics.body_position(handle) else {
                continue;
            };

            let reading = self.detector.evaluate(&snapshot, position);
            let outcome = collectible
                .abduction
                .step(reading.under_beam, position.y, dt, tuning);

            if outcome.beam_cue {
                log::debug!("Beam locked on '{}'", collectible.skill_id);
                self.events.push(GameEvent::BeamCue {
                    skill_id: collectible.skill_id.clone(),
                });
            }

            if outcome.collected {
                match self.applier.apply_collected(
                    &mut self.physics,
                    handle,
                    &mut self.session,
                    &collectible.skill_id,
                ) {
                    Ok(true) => {
                        newly_collected += 1;
                        log::info!(
                            "Collected {} ({}/{})",
                            label.as_str(),
                            self.session.score(),
                            self.session.total()
                        );
                        self.events.push(GameEvent::CollectedCue {
                            skill_id: collectible.skill_id.clone(),
                            label: label.0.clone(),
                        });
                    }
                    Ok(false) => {}
                    Err(e) => log::warn!("Collection not recorded: {}", e),
                }
                continue;
            }

            let mass = self.physics.body_mass(handle).unwrap_or(0.0);
            let mut effects = self.applier.beam_effects(&EffectInput {
                progress: collectible.abduction.progress(),
                under_beam: reading.under_beam,
                body_position: position,
                vehicle_position: snapshot.position,
                mass,
                gravity,
                dt,
            });
            if !reading.under_beam {
                let grounded = self
                    .physics
                    .ground_clearance(handle, self.ground_probe)
                    .is_some();
                if let Some(kick) =
                    collectible
                        .twitch
                        .sample(self.time, grounded, mass, tuning, &mut self.rng)
                {
                    effects.impulse += kick;
                    self.events.push(GameEvent::Twitched {
                        skill_id: collectible.skill_id.clone(),
                    });
                }
            }
            self.applier.apply(&mut self.physics, handle, &effects);
        }

        if newly_collected > 0 && self.session.all_collected() {
            self.session.finish_timer(self.time);
            let elapsed = self.session.elapsed(self.time);
            log::info!("All skills collected");
            self.events.push(GameEvent::AllCollected { elapsed });
        }

        self.physics.step(dt);
        collectible::sync_transforms(&mut self.world, &self.physics);
    }

    /// Global reset: fresh session, every collectible back at its spawn, vehicle at start.
    pub fn reset(&mut self) {
        self.session.reset();
        collectible::respawn_all(&mut self.world, &mut self.physics);
        self.vehicle.respawn();
        self.tracker.clear();
        self.events.push(GameEvent::Reset);
        log::info!("Session reset");
    }

    // ── UI actions ─────────────────────────────────────────────────────

    /// Landmark the vehicle is hovering over, if any.
    pub fn landmark_in_reach(&self) -> Option<&Landmark> {
        self.landmarks.in_reach(self.vehicle.position())
    }

    /// Open the modal of the landmark in reach.
    pub fn interact(&mut self) -> Option<ModalSection> {
        let section = self.landmark_in_reach()?.section;
        self.open_modal(section);
        Some(section)
    }

    pub fn open_modal(&mut self, section: ModalSection) {
        log::debug!("Opening {} panel", section.title());
        self.session.open_modal(section);
    }

    pub fn close_modal(&mut self) {
        if let Some(section) = self.session.modal() {
            log::debug!("Closing {} panel", section.title());
        }
        self.session.close_modal();
    }

    pub fn toggle_map(&mut self) {
        if self.session.modal() == Some(ModalSection::Map) {
            self.close_modal();
        } else {
            self.open_modal(ModalSection::Map);
        }
    }

    pub fn select_map_project(&mut self) -> bool {
        self.session.select_map_project()
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn collectibles(&self) -> Vec<CollectibleView> {
        self.world
            .query::<(&Collectible, &Label, &Transform)>()
            .iter()
            .map(|(_, (c, label, transform))| CollectibleView {
                skill_id: c.skill_id.clone(),
                label: label.0.clone(),
                phase: c.abduction.phase(),
                progress: c.abduction.progress(),
                position: transform.position,
            })
            .collect()
    }

    /// Highest abduction progress among collectibles currently charging.
    pub fn strongest_pull(&self) -> Option<CollectibleView> {
        self.collectibles()
            .into_iter()
            .filter(|c| c.phase == AbductionPhase::Charging)
            .max_by(|a, b| a.progress.total_cmp(&b.progress))
    }

    #[cfg(test)]
    pub(crate) fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    #[cfg(test)]
    pub(crate) fn body_of(&self, skill_id: &str) -> Option<physics::RigidBodyHandle> {
        self.world
            .query::<(&Collectible, &PhysicsBody)>()
            .iter()
            .find(|(_, (c, _))| c.skill_id == skill_id)
            .map(|(_, (_, b))| b.rigid_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SkillConfig;

    const DT: f32 = 1.0 / 60.0;

    /// One skill directly under the vehicle's start, one far away.
    fn config() -> GameConfig {
        let mut config = GameConfig::default();
        config.vehicle.start_position = Vec3::new(0.0, 6.0, 0.0);
        config.skills = vec![
            SkillConfig {
                id: "rust".into(),
                label: "Rust".into(),
                spawn: Vec3::new(0.0, 0.5, 0.0),
            },
            SkillConfig {
                id: "go".into(),
                label: "Go".into(),
                spawn: Vec3::new(-15.0, 0.5, 8.0),
            },
        ];
        config.landmarks.clear();
        config
    }

    fn beam() -> FrameInput {
        FrameInput {
            movement: Vec2::ZERO,
            beam_held: true,
        }
    }

    fn view(sim: &Simulation, id: &str) -> CollectibleView {
        sim.collectibles()
            .into_iter()
            .find(|c| c.skill_id == id)
            .expect("collectible exists")
    }

    fn run_until_collected(sim: &mut Simulation, id: &str, max_seconds: f32) -> bool {
        for _ in 0..(max_seconds / DT) as usize {
            sim.tick(DT, &beam());
            if view(sim, id).phase == AbductionPhase::Collected {
                return true;
            }
        }
        false
    }

    #[test]
    fn saturates_first_then_collects_after_visible_lift() {
        let mut sim = Simulation::new(&config());
        for _ in 0..75 {
            sim.tick(DT, &beam());
        }
        let rust = view(&sim, "rust");
        assert_eq!(rust.progress, 1.0);
        assert_eq!(rust.phase, AbductionPhase::Charging);
        assert!(rust.position.y > 0.5, "body should already be rising");
        assert_eq!(sim.session().score(), 0);

        assert!(run_until_collected(&mut sim, "rust", 5.0));
        assert_eq!(sim.session().score(), 1);
        assert_eq!(sim.session().is_collected("rust"), Some(true));
        assert_eq!(sim.session().is_collected("go"), Some(false));

        let events = sim.drain_events();
        let cues = events.iter().filter(|e| matches!(e, GameEvent::BeamCue { .. })).count();
        let collected = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CollectedCue { .. }))
            .count();
        assert_eq!(cues, 1);
        assert_eq!(collected, 1);
    }

    #[test]
    fn collected_body_is_parked_and_never_scores_again() {
        let mut sim = Simulation::new(&config());
        assert!(run_until_collected(&mut sim, "rust", 5.0));
        for _ in 0..300 {
            sim.tick(DT, &beam());
        }
        assert_eq!(sim.session().score(), 1);

        let handle = sim.body_of("rust").expect("body");
        let parked = sim.physics_mut().body_position(handle);
        assert_eq!(parked, Some(GameConfig::default().abduction.offstage_position));
        assert!(!sim.physics_mut().is_body_enabled(handle));
    }

    #[test]
    fn far_collectible_is_untouched() {
        let mut sim = Simulation::new(&config());
        for _ in 0..60 {
            sim.tick(DT, &beam());
        }
        let go = view(&sim, "go");
        assert_eq!(go.progress, 0.0);
        assert_eq!(go.phase, AbductionPhase::Idle);
    }

    #[test]
    fn releasing_the_beam_decays_to_idle() {
        let mut sim = Simulation::new(&config());
        for _ in 0..24 {
            sim.tick(DT, &beam());
        }
        assert!((view(&sim, "rust").progress - 0.32).abs() < 1e-3);
        for _ in 0..24 {
            sim.tick(DT, &FrameInput::default());
        }
        let rust = view(&sim, "rust");
        assert_eq!(rust.progress, 0.0);
        assert_eq!(rust.phase, AbductionPhase::Idle);
        assert!(!sim.session().is_abducting());
    }

    #[test]
    fn reset_restores_score_flags_and_spawns() {
        let config = config();
        let mut sim = Simulation::new(&config);
        assert!(run_until_collected(&mut sim, "rust", 5.0));
        sim.open_modal(ModalSection::About);

        sim.reset();
        assert_eq!(sim.session().score(), 0);
        assert!(sim.session().skills().iter().all(|s| !s.collected));
        assert_eq!(sim.session().modal(), None);
        assert_eq!(sim.session().started_at(), None);
        for skill in &config.skills {
            let v = view(&sim, &skill.id);
            assert_eq!(v.position, skill.spawn);
            assert_eq!(v.phase, AbductionPhase::Idle);
            let handle = sim.body_of(&skill.id).expect("body");
            assert_eq!(sim.physics_mut().body_position(handle), Some(skill.spawn));
        }
        assert!(sim.drain_events().contains(&GameEvent::Reset));

        // And it can be collected again.
        assert!(run_until_collected(&mut sim, "rust", 5.0));
        assert_eq!(sim.session().score(), 1);
    }

    #[test]
    fn lost_body_is_recovered_to_spawn_height() {
        let mut sim = Simulation::new(&config());
        let handle = sim.body_of("go").expect("body");
        sim.physics_mut().teleport(handle, Vec3::new(-15.0, -40.0, 8.0));

        sim.tick(DT, &FrameInput::default());
        let events = sim.drain_events();
        assert!(events.contains(&GameEvent::Recovered {
            skill_id: "go".into()
        }));
        let y = view(&sim, "go").position.y;
        assert!((y - 0.5).abs() < 0.05, "recovered height {}", y);
    }

    #[test]
    fn collecting_everything_stops_the_timer() {
        let mut config = config();
        config.skills.truncate(1);
        let mut sim = Simulation::new(&config);
        assert!(run_until_collected(&mut sim, "rust", 5.0));
        assert!(sim.session().all_collected());
        let ended = sim.session().ended_at();
        assert!(ended.is_some());
        assert!(sim
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::AllCollected { elapsed: Some(_) })));

        sim.tick(DT, &beam());
        assert_eq!(sim.session().ended_at(), ended);
    }

    #[test]
    fn score_matches_flags_every_tick() {
        let mut sim = Simulation::new(&GameConfig::default());
        let input = FrameInput {
            movement: Vec2::new(0.3, 0.8),
            beam_held: true,
        };
        for _ in 0..600 {
            sim.tick(DT, &input);
            let flags = sim.session().skills().iter().filter(|s| s.collected).count() as u32;
            assert_eq!(sim.session().score(), flags);
        }
    }

    fn twitchy_config() -> GameConfig {
        let mut config = config();
        config.abduction.twitch_chance = 1.0;
        config.abduction.twitch_frequency = 5.0;
        config.abduction.twitch_threshold = 0.9;
        config
    }

    fn twitches_of(events: &[GameEvent], id: &str) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::Twitched { skill_id } if skill_id == id))
            .count()
    }

    #[test]
    fn grounded_idle_collectible_twitches() {
        let mut sim = Simulation::new(&twitchy_config());
        let mut events = Vec::new();
        for _ in 0..120 {
            sim.tick(DT, &FrameInput::default());
            events.extend(sim.drain_events());
        }
        assert!(twitches_of(&events, "go") >= 1);
        assert!(twitches_of(&events, "rust") >= 1);
    }

    #[test]
    fn beamed_collectible_never_twitches() {
        let mut sim = Simulation::new(&twitchy_config());
        let mut events = Vec::new();
        for _ in 0..60 {
            sim.tick(DT, &beam());
            events.extend(sim.drain_events());
        }
        assert_eq!(twitches_of(&events, "rust"), 0);
        assert!(twitches_of(&events, "go") >= 1);
    }

    #[test]
    fn airborne_collectible_never_twitches() {
        let mut sim = Simulation::new(&twitchy_config());
        let body = sim.body_of("go").expect("go has a body");
        sim.physics_mut().teleport(body, Vec3::new(-15.0, 20.0, 8.0));
        let mut events = Vec::new();
        for _ in 0..30 {
            sim.tick(DT, &FrameInput::default());
            events.extend(sim.drain_events());
        }
        assert!(sim.physics_mut().body_position(body).is_some_and(|p| p.y > 10.0));
        assert_eq!(twitches_of(&events, "go"), 0);
    }

    #[test]
    fn interact_opens_the_landmark_in_reach() {
        let mut config = GameConfig::default();
        let barn = config.landmarks[0].clone();
        config.vehicle.start_position = Vec3::new(barn.position.x, 6.0, barn.position.z + 1.0);
        let mut sim = Simulation::new(&config);
        sim.tick(DT, &FrameInput::default());

        assert_eq!(sim.interact(), Some(barn.section));
        assert_eq!(sim.session().modal(), Some(barn.section));
        sim.close_modal();
        assert_eq!(sim.session().modal(), None);

        sim.toggle_map();
        assert_eq!(sim.session().modal(), Some(ModalSection::Map));
        sim.toggle_map();
        assert_eq!(sim.session().modal(), None);
    }
}
