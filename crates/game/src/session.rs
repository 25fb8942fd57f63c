//! Process-wide session store: score, collected skills, modal selection,
//! the abduction banner flag and timer bounds.
//!
//! The UI layer only reads this. Writes come from two places: the abduction
//! state machine (a collection) and explicit UI actions (modal open/close,
//! reset). Everything runs on the one simulation thread, so a tick's writes
//! are all visible together before the UI reads the next frame.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown skill '{0}'")]
    UnknownSkill(String),
}

/// The modal panels a landmark (or a hotkey) can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModalSection {
    About,
    Projects,
    Contact,
    Map,
}

impl ModalSection {
    pub fn title(self) -> &'static str {
        match self {
            ModalSection::About => "About",
            ModalSection::Projects => "Projects",
            ModalSection::Contact => "Contact",
            ModalSection::Map => "Map",
        }
    }
}

/// Secondary selection inside an open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubSelection {
    /// The map-themed project highlighted from the Projects panel.
    MapProject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillFlag {
    pub id: String,
    pub label: String,
    pub collected: bool,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    score: u32,
    skills: Vec<SkillFlag>,
    modal: Option<ModalSection>,
    sub_selection: Option<SubSelection>,
    abducting: bool,
    started_at: Option<f32>,
    ended_at: Option<f32>,
}

impl SessionState {
    /// Create a session over the given `(id, label)` skills, all uncollected.
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            score: 0,
            skills: skills
                .into_iter()
                .map(|(id, label)| SkillFlag {
                    id: id.into(),
                    label: label.into(),
                    collected: false,
                })
                .collect(),
            modal: None,
            sub_selection: None,
            abducting: false,
            started_at: None,
            ended_at: None,
        }
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.skills.len() as u32
    }

    pub fn skills(&self) -> &[SkillFlag] {
        &self.skills
    }

    pub fn is_collected(&self, skill_id: &str) -> Option<bool> {
        self.skills
            .iter()
            .find(|s| s.id == skill_id)
            .map(|s| s.collected)
    }

    pub fn all_collected(&self) -> bool {
        self.score == self.total()
    }

    pub fn modal(&self) -> Option<ModalSection> {
        self.modal
    }

    pub fn sub_selection(&self) -> Option<SubSelection> {
        self.sub_selection
    }

    pub fn is_abducting(&self) -> bool {
        self.abducting
    }

    pub fn started_at(&self) -> Option<f32> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<f32> {
        self.ended_at
    }

    /// Seconds on the clock at `now`: frozen once every skill is collected.
    pub fn elapsed(&self, now: f32) -> Option<f32> {
        let start = self.started_at?;
        Some((self.ended_at.unwrap_or(now) - start).max(0.0))
    }

    // ── Writes ─────────────────────────────────────────────────────────

    /// Mark a skill collected. Returns `Ok(true)` if this call collected it and
    /// `Ok(false)` if it was already collected.
    pub fn record_collection(&mut self, skill_id: &str) -> Result<bool, SessionError> {
        let skill = self
            .skills
            .iter_mut()
            .find(|s| s.id == skill_id)
            .ok_or_else(|| SessionError::UnknownSkill(skill_id.to_string()))?;
        if skill.collected {
            return Ok(false);
        }
        skill.collected = true;
        self.score += 1;
        Ok(true)
    }

    pub fn set_beam_active(&mut self, active: bool) {
        self.abducting = active;
    }

    pub fn open_modal(&mut self, section: ModalSection) {
        if self.modal != Some(section) {
            self.sub_selection = None;
        }
        self.modal = Some(section);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.sub_selection = None;
    }

    /// Highlight the map-themed project. Only meaningful with Projects open.
    pub fn select_map_project(&mut self) -> bool {
        if self.modal == Some(ModalSection::Projects) {
            self.sub_selection = Some(SubSelection::MapProject);
            true
        } else {
            false
        }
    }

    /// Start the clock if it is not running yet.
    pub fn start_timer(&mut self, now: f32) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Stop the clock if it is running and not stopped yet.
    pub fn finish_timer(&mut self, now: f32) {
        if self.started_at.is_some() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    /// Back to a fresh session: no score, nothing collected, no modal, no timer.
    pub fn reset(&mut self) {
        self.score = 0;
        for skill in &mut self.skills {
            skill.collected = false;
        }
        self.modal = None;
        self.sub_selection = None;
        self.abducting = false;
        self.started_at = None;
        self.ended_at = None;
    }
}
