//! Scene landmarks (barn, silo, mailbox, water tower). Each one is a solid
//! footprint in the physics world and a hover zone that offers its modal.

use engine_core::planar_distance;
use glam::Vec3;
use physics::PhysicsWorld;

use crate::config::LandmarkConfig;
use crate::session::ModalSection;

#[derive(Debug, Clone)]
pub struct Landmark {
    pub section: ModalSection,
    pub label: String,
    pub position: Vec3,
    pub radius: f32,
}

#[derive(Debug, Default)]
pub struct Landmarks {
    items: Vec<Landmark>,
}

impl Landmarks {
    pub fn build(configs: &[LandmarkConfig], physics: &mut PhysicsWorld) -> Self {
        let items = configs
            .iter()
            .map(|c| {
                physics.add_static_cuboid(c.position, 0.0, c.half_extents);
                Landmark {
                    section: c.section,
                    label: c.label.clone(),
                    position: c.position,
                    radius: c.radius,
                }
            })
            .collect();
        Self { items }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.items.iter()
    }

    /// The closest landmark whose planar reach contains `position`.
    pub fn in_reach(&self, position: Vec3) -> Option<&Landmark> {
        self.items
            .iter()
            .map(|l| (l, planar_distance(l.position, position)))
            .filter(|(l, d)| *d < l.radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(l, _)| l)
    }
}
