//! Ray queries: ground probes for resting bodies.

use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
}

impl PhysicsWorld {
    /// Cast a ray and return the first hit, skipping colliders attached to `exclude`.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        let mut filter = QueryFilter::default();
        if let Some(handle) = exclude {
            filter = filter.exclude_rigid_body(handle);
        }

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, toi)| {
                let point = ray.point_at(toi);
                RaycastHit {
                    collider,
                    distance: toi,
                    point: Vec3::new(point.x, point.y, point.z),
                }
            })
    }

    /// Distance from a body's center straight down to whatever supports it, within `probe`.
    pub fn ground_clearance(&self, handle: RigidBodyHandle, probe: f32) -> Option<f32> {
        let origin = self.body_position(handle)?;
        self.raycast(origin, -Vec3::Y, probe, Some(handle))
            .map(|hit| hit.distance)
    }
}
