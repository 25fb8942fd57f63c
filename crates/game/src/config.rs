//! Game configuration (window, abduction tuning, scene layout). Loaded from config.ron at startup.
//!
//! Every field has a serde default, so a `config.ron` only needs to list what it overrides.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::session::ModalSection;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for beam detection, abduction progress and the forces it drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbductionTuning {
    /// Planar reach of the beam around the vehicle.
    pub proximity_radius: f32,
    /// Progress gained per second under the beam.
    pub charge_rate: f32,
    /// Progress lost per second out of the beam.
    pub release_rate: f32,
    /// Progress at which collection can happen (still needs the lift check).
    pub saturation_threshold: f32,
    /// Body height that confirms a visible lift.
    pub lift_height: f32,
    /// Bodies below this height fell out of the world and are recovered.
    pub lost_height: f32,
    /// Rotation stays locked until progress passes this.
    pub rotation_unlock_progress: f32,
    /// Lift in units of body weight at zero progress.
    pub lift_base: f32,
    /// Extra lift in units of body weight at full progress.
    pub lift_span: f32,
    pub lift_gain: f32,
    /// Pull impulse per unit of horizontal offset per second, per unit mass.
    pub pull_gain: f32,
    /// Tumble impulse applied every tick under the beam.
    pub torque_impulse: Vec3,
    /// Idle twitch waveform frequency in Hz.
    pub twitch_frequency: f32,
    /// Waveform level that arms a twitch.
    pub twitch_threshold: f32,
    /// Chance that an armed twitch actually fires.
    pub twitch_chance: f32,
    /// Upward twitch impulse per unit mass.
    pub twitch_impulse: f32,
    /// Where collected bodies are parked.
    pub offstage_position: Vec3,
}

impl Default for AbductionTuning {
    fn default() -> Self {
        Self {
            proximity_radius: 3.0,
            charge_rate: 0.8,
            release_rate: 1.6,
            saturation_threshold: 1.0,
            lift_height: 3.0,
            lost_height: -10.0,
            rotation_unlock_progress: 0.05,
            lift_base: 0.6,
            lift_span: 1.5,
            lift_gain: 1.0,
            pull_gain: 1.5,
            torque_impulse: Vec3::new(0.02, 0.035, 0.01),
            twitch_frequency: 0.35,
            twitch_threshold: 0.995,
            twitch_chance: 0.5,
            twitch_impulse: 1.6,
            offstage_position: Vec3::new(0.0, -200.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    pub hover_height: f32,
    pub max_speed: f32,
    /// How fast velocity converges on the input intent (1/s).
    pub acceleration: f32,
    /// The vehicle stays within +-this on X and Z.
    pub arena_half_extent: f32,
    pub start_position: Vec3,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            hover_height: 6.0,
            max_speed: 9.0,
            acceleration: 6.0,
            arena_half_extent: 40.0,
            start_position: Vec3::new(0.0, 6.0, 12.0),
        }
    }
}

/// One abductable skill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillConfig {
    pub id: String,
    pub label: String,
    pub spawn: Vec3,
}

impl SkillConfig {
    fn new(id: &str, label: &str, spawn: Vec3) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            spawn,
        }
    }
}

/// A scene landmark that opens a modal when the vehicle hovers near it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandmarkConfig {
    pub section: ModalSection,
    pub label: String,
    pub position: Vec3,
    pub half_extents: Vec3,
    pub radius: f32,
}

impl LandmarkConfig {
    fn new(
        section: ModalSection,
        label: &str,
        position: Vec3,
        half_extents: Vec3,
        radius: f32,
    ) -> Self {
        Self {
            section,
            label: label.to_string(),
            position,
            half_extents,
            radius,
        }
    }
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window width in logical pixels.
    pub window_width: u32,
    /// Window height in logical pixels.
    pub window_height: u32,
    /// Start in fullscreen.
    pub fullscreen: bool,
    /// Seed for the idle twitch rolls.
    pub seed: u64,
    /// Half extents of every collectible's box collider.
    pub collectible_half_extents: Vec3,
    pub abduction: AbductionTuning,
    pub vehicle: VehicleTuning,
    pub skills: Vec<SkillConfig>,
    pub landmarks: Vec<LandmarkConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fullscreen: false,
            seed: 0x7EC4_C0E5,
            collectible_half_extents: Vec3::new(0.6, 0.5, 0.9),
            abduction: AbductionTuning::default(),
            vehicle: VehicleTuning::default(),
            skills: default_skills(),
            landmarks: default_landmarks(),
        }
    }
}

fn default_skills() -> Vec<SkillConfig> {
    vec![
        SkillConfig::new("react", "React", Vec3::new(-12.0, 0.5, -6.0)),
        SkillConfig::new("typescript", "TypeScript", Vec3::new(-6.0, 0.5, 4.0)),
        SkillConfig::new("nodejs", "Node.js", Vec3::new(0.0, 0.5, -10.0)),
        SkillConfig::new("threejs", "Three.js", Vec3::new(6.0, 0.5, 6.0)),
        SkillConfig::new("python", "Python", Vec3::new(12.0, 0.5, -4.0)),
        SkillConfig::new("docker", "Docker", Vec3::new(-16.0, 0.5, 10.0)),
        SkillConfig::new("postgres", "PostgreSQL", Vec3::new(16.0, 0.5, 12.0)),
        SkillConfig::new("aws", "AWS", Vec3::new(2.0, 0.5, 18.0)),
    ]
}

fn default_landmarks() -> Vec<LandmarkConfig> {
    vec![
        LandmarkConfig::new(
            ModalSection::About,
            "Barn",
            Vec3::new(-22.0, 4.0, -20.0),
            Vec3::new(5.0, 4.0, 6.0),
            9.0,
        ),
        LandmarkConfig::new(
            ModalSection::Projects,
            "Silo",
            Vec3::new(22.0, 7.0, -18.0),
            Vec3::new(2.5, 7.0, 2.5),
            6.0,
        ),
        LandmarkConfig::new(
            ModalSection::Contact,
            "Mailbox",
            Vec3::new(-6.0, 0.8, 26.0),
            Vec3::new(0.4, 0.8, 0.4),
            3.5,
        ),
        LandmarkConfig::new(
            ModalSection::Map,
            "Water Tower",
            Vec3::new(26.0, 8.0, 22.0),
            Vec3::new(2.0, 8.0, 2.0),
            6.0,
        ),
    ]
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => {
                log::info!("Loaded config from {:?}", path);
                c
            }
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron_str(&data)
    }

    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.abduction;
        if self.skills.is_empty() {
            return Err(ConfigError::Invalid("at least one skill is required".into()));
        }
        let mut seen = HashSet::new();
        for skill in &self.skills {
            if !seen.insert(skill.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate skill id '{}'", skill.id)));
            }
            if skill.spawn.y <= t.lost_height {
                return Err(ConfigError::Invalid(format!(
                    "skill '{}' spawns below the lost height {}",
                    skill.id, t.lost_height
                )));
            }
        }
        if t.proximity_radius <= 0.0 || t.charge_rate <= 0.0 || t.release_rate <= 0.0 {
            return Err(ConfigError::Invalid(
                "beam radius, charge rate and release rate must be positive".into(),
            ));
        }
        if !(t.saturation_threshold > 0.0 && t.saturation_threshold <= 1.0) {
            return Err(ConfigError::Invalid("saturation_threshold must be in (0, 1]".into()));
        }
        if let Some(l) = self.landmarks.iter().find(|l| l.radius <= 0.0) {
            return Err(ConfigError::Invalid(format!("landmark '{}' has no reach", l.label)));
        }
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.ron")
}
