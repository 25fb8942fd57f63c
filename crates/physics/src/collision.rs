//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (ground, landmark footprints)
    Environment = 1 << 0,
    /// Abductable collectibles
    Collectible = 1 << 1,
}

impl CollisionGroup {
    /// Membership/filter pair for static environment. Collides with everything.
    pub fn environment() -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_retain(Self::Environment as u32),
            Group::ALL,
        )
    }

    /// Membership/filter pair for collectibles: the ground, landmarks and each other.
    pub fn collectible() -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_retain(Self::Collectible as u32),
            Group::from_bits_retain(Self::Environment as u32 | Self::Collectible as u32),
        )
    }
}

/// Component linking an ECS entity to its physics handles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    pub fn with_collider(rigid_body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self {
            rigid_body,
            collider: Some(collider),
        }
    }
}
