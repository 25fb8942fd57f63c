//! Transform component and planar helpers.
//!
//! The playfield is a flat XZ plane with +Y up. Most gameplay queries (beam
//! reach, landmark reach) ignore height, so the planar helpers live here next
//! to the transform they operate on.

use glam::{Quat, Vec2, Vec3};

/// A 3D transform representing position and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Project a world position onto the ground plane (x, z).
#[inline]
pub fn planar(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Distance between two points on the ground plane; Y is ignored.
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

/// Horizontal offset from `from` to `to` with the Y component zeroed.
#[inline]
pub fn planar_offset(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_distance_ignores_height() {
        let a = Vec3::new(0.0, 10.0, 0.0);
        let b = Vec3::new(3.0, -5.0, 4.0);
        assert_eq!(planar_distance(a, b), 5.0);
    }

    #[test]
    fn planar_offset_zeroes_y() {
        let off = planar_offset(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 9.0, 1.0));
        assert_eq!(off, Vec3::new(3.0, 0.0, -2.0));
    }
}
