//! Per-window game state: owns input, frame time, the simulation and the
//! on-screen message log. One `update()` per redraw.

use std::sync::Arc;

use anyhow::Result;
use engine_core::Time;
use input::InputState;
use winit::window::Window;

use crate::config::GameConfig;
use crate::hud::{format_clock, HUDSystem};
use crate::session::ModalSection;
use crate::simulation::{FrameInput, GameEvent, Simulation};

// ── Game Messages ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
}

impl MessageKind {
    /// Console prefix standing in for a text colour.
    pub fn marker(self) -> &'static str {
        match self {
            MessageKind::Info => "-",
            MessageKind::Success => "+",
            MessageKind::Warning => "!",
        }
    }
}

/// On-screen message (event log).
pub struct GameMessage {
    pub text: String,
    pub kind: MessageKind,
    pub time_remaining: f32,
}

/// Manages the transient message log shown over the game view.
pub struct GameMessages {
    pub messages: Vec<GameMessage>,
    pub max_visible: usize,
    default_duration: f32,
}

impl GameMessages {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max_visible: 6,
            default_duration: 4.0,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.messages.push(GameMessage {
            text: text.into(),
            kind,
            time_remaining: self.default_duration,
        });
        if self.messages.len() > 50 {
            self.messages.remove(0);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text, MessageKind::Info);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(text, MessageKind::Success);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(text, MessageKind::Warning);
    }

    pub fn update(&mut self, dt: f32) {
        for msg in &mut self.messages {
            msg.time_remaining -= dt;
        }
        self.messages.retain(|m| m.time_remaining > 0.0);
    }

    /// Newest messages, at most `max_visible`.
    pub fn visible(&self) -> impl Iterator<Item = &GameMessage> {
        let skip = self.messages.len().saturating_sub(self.max_visible);
        self.messages.iter().skip(skip)
    }
}

impl Default for GameMessages {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a simulation event into a log line for the player, if it deserves one.
pub fn describe_event(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::CollectedCue { label, .. } => Some(format!("{} abducted!", label)),
        GameEvent::AllCollected { elapsed } => Some(match elapsed {
            Some(t) => format!("Every skill collected in {}", format_clock(*t)),
            None => "Every skill collected".to_string(),
        }),
        GameEvent::Recovered { skill_id } => Some(format!("Recovered '{}'", skill_id)),
        GameEvent::Reset => Some("Invasion restarted".to_string()),
        GameEvent::BeamCue { .. } | GameEvent::Twitched { .. } => None,
    }
}

pub struct GameState {
    pub window: Arc<Window>,
    pub time: Time,
    pub input: InputState,
    pub sim: Simulation,
    pub hud: HUDSystem,
    pub game_messages: GameMessages,
    pub running: bool,
    title: String,
}

impl GameState {
    pub fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self> {
        config.validate()?;
        let sim = Simulation::new(config);
        log::info!(
            "Session ready: {} skills, {} landmarks",
            sim.session().total(),
            config.landmarks.len()
        );
        for landmark in sim.landmarks().iter() {
            log::debug!(
                "{} at {:?} opens {}",
                landmark.label,
                landmark.position,
                landmark.section.title()
            );
        }

        let mut game_messages = GameMessages::new();
        game_messages.info("Hold SPACE to beam up the tech cows");

        Ok(Self {
            window,
            time: Time::new(),
            input: InputState::new(),
            sim,
            hud: HUDSystem::new(),
            game_messages,
            running: true,
            title: String::new(),
        })
    }

    pub fn window_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    pub fn update(&mut self) {
        self.time.update();
        let dt = self.time.delta_seconds();

        self.handle_actions();

        let frame = FrameInput {
            movement: self.input.movement_intent(),
            beam_held: self.input.is_beam_held(),
        };
        self.sim.tick(dt, &frame);

        for event in self.sim.drain_events() {
            match (&event, describe_event(&event)) {
                (GameEvent::CollectedCue { .. } | GameEvent::AllCollected { .. }, Some(text)) => {
                    self.game_messages.success(text)
                }
                (GameEvent::Recovered { .. }, Some(text)) => self.game_messages.warning(text),
                (_, Some(text)) => self.game_messages.info(text),
                (_, None) => {}
            }
        }
        self.game_messages.update(dt);

        let data = self
            .hud
            .generate_hud_data(&self.sim, &self.game_messages, self.time.fps());
        let title = self.hud.title_line(&data);
        if title != self.title {
            self.window.set_title(&title);
            log::debug!("\n{}", self.hud.render_console_hud(&data));
            self.title = title;
        }

        self.input.end_frame();
    }

    /// Key presses that act on the session rather than the vehicle.
    fn handle_actions(&mut self) {
        if self.input.is_back_pressed() {
            if self.sim.session().modal().is_some() {
                self.sim.close_modal();
            } else {
                log::info!("Escape pressed with no panel open, quitting");
                self.running = false;
            }
        }

        if self.input.is_reset_pressed() {
            self.sim.reset();
        }

        if self.input.is_map_pressed() {
            self.sim.toggle_map();
        }

        if self.input.is_interact_pressed() && self.sim.session().modal().is_none() {
            match self.sim.interact() {
                Some(section) => log::debug!("Interacted with {}", section.title()),
                None => log::debug!("Nothing in reach to interact with"),
            }
        }

        if self.input.is_project_pressed()
            && self.sim.session().modal() == Some(ModalSection::Projects)
            && self.sim.select_map_project()
        {
            self.game_messages.info("Map project selected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_expire() {
        let mut messages = GameMessages::new();
        messages.info("one");
        messages.update(1.0);
        messages.warning("two");
        messages.update(3.5);
        let texts: Vec<_> = messages.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["two"]);
    }

    #[test]
    fn only_newest_are_visible() {
        let mut messages = GameMessages::new();
        for i in 0..10 {
            messages.info(format!("m{}", i));
        }
        let visible: Vec<_> = messages.visible().map(|m| m.text.clone()).collect();
        assert_eq!(visible.len(), messages.max_visible);
        assert_eq!(visible.last().map(String::as_str), Some("m9"));
    }

    #[test]
    fn beam_cue_has_no_message() {
        let cue = GameEvent::BeamCue {
            skill_id: "rust".into(),
        };
        assert_eq!(describe_event(&cue), None);
        let done = GameEvent::AllCollected { elapsed: Some(65.0) };
        assert_eq!(
            describe_event(&done).as_deref(),
            Some("Every skill collected in 1:05.0")
        );
    }
}
