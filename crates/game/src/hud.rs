//! HUD (Heads-Up Display): score, skill checklist, abduction banner, timer,
//! landmark prompt and the open panel. Read-only view of the session.

use crate::session::{ModalSection, SubSelection};
use crate::simulation::Simulation;
use crate::state::GameMessages;

/// Key label shown in the landmark prompt.
pub const INTERACT_KEY: &str = "E";

/// One skill row in the checklist.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillRow {
    pub label: String,
    pub collected: bool,
}

/// All HUD data for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct HUDData {
    pub score: u32,
    pub total: u32,
    pub skills: Vec<SkillRow>,
    pub abducting: bool,
    /// Progress of the collectible closest to being taken, while charging.
    pub pull: Option<(String, f32)>,
    pub elapsed: Option<f32>,
    pub finished: bool,
    /// "[E] Visit the Barn" style prompt while hovering a landmark.
    pub prompt: Option<String>,
    pub modal: Option<ModalSection>,
    pub sub_selection: Option<SubSelection>,
    /// Visible message log lines, oldest first, already prefixed.
    pub messages: Vec<String>,
    pub fps: f32,
}

pub struct HUDSystem;

impl HUDSystem {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_hud_data(
        &self,
        sim: &Simulation,
        messages: &GameMessages,
        fps: f32,
    ) -> HUDData {
        let session = sim.session();
        let prompt = match session.modal() {
            Some(_) => None,
            None => sim
                .landmark_in_reach()
                .map(|l| format!("[{}] Visit the {}", INTERACT_KEY, l.label)),
        };

        HUDData {
            score: session.score(),
            total: session.total(),
            skills: session
                .skills()
                .iter()
                .map(|s| SkillRow {
                    label: s.label.clone(),
                    collected: s.collected,
                })
                .collect(),
            abducting: session.is_abducting(),
            pull: sim.strongest_pull().map(|c| (c.label, c.progress)),
            elapsed: session.elapsed(sim.time()),
            finished: session.ended_at().is_some(),
            prompt,
            modal: session.modal(),
            sub_selection: session.sub_selection(),
            messages: messages
                .visible()
                .map(|m| format!("{} {}", m.kind.marker(), m.text))
                .collect(),
            fps,
        }
    }

    /// Compact single line for the window title.
    pub fn title_line(&self, data: &HUDData) -> String {
        let mut line = format!("Fullstack Invasion | Skills {}/{}", data.score, data.total);
        if let Some(t) = data.elapsed {
            line.push_str(&format!(" | {}", format_clock(t)));
        }
        if data.finished {
            line.push_str(" | ALL SKILLS ABDUCTED");
        } else if data.abducting {
            line.push_str(" | ABDUCTING");
        }
        if let Some(prompt) = &data.prompt {
            line.push_str(&format!(" | {}", prompt));
        }
        if let Some(section) = data.modal {
            line.push_str(&format!(" | [{}]", section.title()));
        }
        line
    }

    pub fn render_console_hud(&self, data: &HUDData) -> String {
        let mut output = String::new();

        output.push_str("╔════════════════════════════════════════════════════╗\n");
        output.push_str(&format!(
            "║  SKILLS: {:>2}/{:<2}  │  TIME: {:>8}  │  FPS: {:4.0}  ║\n",
            data.score,
            data.total,
            data.elapsed.map(format_clock).unwrap_or_else(|| "--:--.-".to_string()),
            data.fps
        ));
        output.push_str("╚════════════════════════════════════════════════════╝\n");

        if data.abducting {
            output.push_str("                    >>> ABDUCTING <<<\n");
        }
        if let Some((label, progress)) = &data.pull {
            output.push_str(&format!(
                "  {:<12} [{}]\n",
                label,
                self.progress_bar(*progress, 20)
            ));
        }
        if data.finished {
            output.push_str("              ALL SKILLS ABDUCTED. Press R to replay.\n");
        }

        output.push('\n');
        for row in &data.skills {
            let mark = if row.collected { "x" } else { " " };
            output.push_str(&format!("  [{}] {}\n", mark, row.label));
        }

        if let Some(prompt) = &data.prompt {
            output.push_str(&format!("\n  {}\n", prompt));
        }
        if let Some(section) = data.modal {
            output.push_str(&format!("\n  ── {} ──\n", section.title()));
            if data.sub_selection == Some(SubSelection::MapProject) {
                output.push_str("  > Map project\n");
            }
            output.push_str("  [Esc] Close\n");
        }

        if !data.messages.is_empty() {
            output.push('\n');
            for line in &data.messages {
                output.push_str(&format!("  {}\n", line));
            }
        }

        output
    }

    fn progress_bar(&self, percent: f32, width: usize) -> String {
        let filled = (percent.clamp(0.0, 1.0) * width as f32) as usize;
        let empty = width - filled;
        format!("{}{}", "=".repeat(filled), "-".repeat(empty))
    }
}

impl Default for HUDSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// `m:ss.t`
pub fn format_clock(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u32;
    let rest = seconds - minutes as f32 * 60.0;
    format!("{}:{:04.1}", minutes, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::simulation::FrameInput;
    use glam::Vec2;

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0.0), "0:00.0");
        assert_eq!(format_clock(7.3), "0:07.3");
        assert_eq!(format_clock(75.0), "1:15.0");
        assert_eq!(format_clock(-3.0), "0:00.0");
    }

    #[test]
    fn fresh_session_hud() {
        let config = GameConfig::default();
        let sim = Simulation::new(&config);
        let hud = HUDSystem::new();
        let data = hud.generate_hud_data(&sim, &GameMessages::new(), 60.0);

        assert_eq!(data.score, 0);
        assert_eq!(data.total as usize, config.skills.len());
        assert!(data.skills.iter().all(|s| !s.collected));
        assert!(!data.abducting);
        assert_eq!(data.elapsed, None);
        assert_eq!(data.modal, None);

        let title = hud.title_line(&data);
        assert!(title.contains(&format!("Skills 0/{}", config.skills.len())));
        assert!(!title.contains("ABDUCTING"));
    }

    #[test]
    fn beam_shows_abducting_banner() {
        let mut sim = Simulation::new(&GameConfig::default());
        sim.tick(
            1.0 / 60.0,
            &FrameInput {
                movement: Vec2::ZERO,
                beam_held: true,
            },
        );
        let hud = HUDSystem::new();
        let data = hud.generate_hud_data(&sim, &GameMessages::new(), 60.0);
        assert!(data.abducting);
        assert!(data.elapsed.is_some());
        assert!(hud.title_line(&data).contains("ABDUCTING"));
        assert!(hud.render_console_hud(&data).contains("ABDUCTING"));
    }

    #[test]
    fn open_panel_hides_the_prompt() {
        let mut config = GameConfig::default();
        let barn = config.landmarks[0].clone();
        config.vehicle.start_position = barn.position;
        let mut sim = Simulation::new(&config);
        let hud = HUDSystem::new();

        let data = hud.generate_hud_data(&sim, &GameMessages::new(), 60.0);
        assert_eq!(
            data.prompt,
            Some(format!("[{}] Visit the {}", INTERACT_KEY, barn.label))
        );

        sim.interact();
        let data = hud.generate_hud_data(&sim, &GameMessages::new(), 60.0);
        assert_eq!(data.prompt, None);
        assert_eq!(data.modal, Some(barn.section));
        assert!(hud.render_console_hud(&data).contains(barn.section.title()));
    }
}
