//! Tractor beam proximity test.

use engine_core::planar_distance;
use glam::Vec3;

use crate::tracker::VehicleSnapshot;

/// Result of one beam check for one collectible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamReading {
    /// Planar distance to the vehicle, if the vehicle position is known.
    pub distance: Option<f32>,
    pub under_beam: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ProximityBeamDetector {
    pub radius: f32,
}

impl ProximityBeamDetector {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    /// Under the beam iff the vehicle is known, its beam is on, and it is
    /// strictly closer than `radius` on the ground plane. Height is ignored.
    pub fn evaluate(&self, vehicle: &VehicleSnapshot, collectible: Vec3) -> BeamReading {
        let distance = vehicle.position.map(|p| planar_distance(p, collectible));
        let under_beam = vehicle.beam_active && distance.is_some_and(|d| d < self.radius);
        BeamReading {
            distance,
            under_beam,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(position: Option<Vec3>, beam_active: bool) -> VehicleSnapshot {
        VehicleSnapshot {
            position,
            beam_active,
        }
    }

    #[test]
    fn directly_below_with_beam_is_under() {
        let d = ProximityBeamDetector::new(3.0);
        let r = d.evaluate(&vehicle(Some(Vec3::new(0.0, 6.0, 0.0)), true), Vec3::ZERO);
        assert_eq!(r.distance, Some(0.0));
        assert!(r.under_beam);
    }

    #[test]
    fn beam_off_is_never_under() {
        let d = ProximityBeamDetector::new(3.0);
        let r = d.evaluate(&vehicle(Some(Vec3::ZERO), false), Vec3::ZERO);
        assert!(!r.under_beam);
    }

    #[test]
    fn radius_is_exclusive() {
        let d = ProximityBeamDetector::new(3.0);
        let at_edge = d.evaluate(&vehicle(Some(Vec3::new(3.0, 0.0, 0.0)), true), Vec3::ZERO);
        assert!(!at_edge.under_beam);
        let inside = d.evaluate(&vehicle(Some(Vec3::new(1.8, 0.0, 2.3)), true), Vec3::ZERO);
        assert!(inside.under_beam);
    }

    #[test]
    fn height_does_not_matter() {
        let d = ProximityBeamDetector::new(3.0);
        let r = d.evaluate(
            &vehicle(Some(Vec3::new(1.0, 500.0, 1.0)), true),
            Vec3::new(0.0, -3.0, 0.0),
        );
        assert!(r.under_beam);
    }

    #[test]
    fn unknown_vehicle_position_is_not_under() {
        let d = ProximityBeamDetector::new(3.0);
        let r = d.evaluate(&vehicle(None, true), Vec3::ZERO);
        assert_eq!(r.distance, None);
        assert!(!r.under_beam);
    }
}
