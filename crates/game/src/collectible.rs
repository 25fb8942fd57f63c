//! Tech cows: the abductable skill collectibles and their spawning.

use engine_core::{Label, SpawnPoint, Transform};
use glam::Vec3;
use hecs::World;
use physics::{CollisionGroup, DynamicBodyDesc, PhysicsBody, PhysicsWorld};
use rand::Rng;

use crate::abduction::AbductionState;
use crate::config::{GameConfig, SkillConfig};
use crate::effects::TwitchState;

/// Per-collectible gameplay state. Lives next to [`PhysicsBody`], [`SpawnPoint`] and [`Label`].
#[derive(Debug, Clone)]
pub struct Collectible {
    /// Stable skill id shared with the session's skill flags.
    pub skill_id: String,
    pub abduction: AbductionState,
    pub twitch: TwitchState,
}

impl Collectible {
    pub fn new(skill_id: impl Into<String>, twitch: TwitchState) -> Self {
        Self {
            skill_id: skill_id.into(),
            abduction: AbductionState::new(),
            twitch,
        }
    }
}

/// Spawn one collectible: a rotation-locked box resting at its spawn point.
pub fn spawn_collectible(
    world: &mut World,
    physics: &mut PhysicsWorld,
    skill: &SkillConfig,
    half_extents: Vec3,
    rng: &mut impl Rng,
) -> hecs::Entity {
    let body = physics.add_dynamic_body(skill.spawn, DynamicBodyDesc::default());
    let collider = physics.add_box_collider(body, half_extents, CollisionGroup::collectible());
    let twitch = TwitchState::new(rng.gen_range(0.0..std::f32::consts::TAU));

    world.spawn((
        Collectible::new(skill.id.clone(), twitch),
        Label::new(skill.label.clone()),
        SpawnPoint::new(skill.spawn),
        Transform::from_position(skill.spawn),
        PhysicsBody::with_collider(body, collider),
    ))
}

/// Spawn every configured skill, in config order.
pub fn spawn_collectibles(
    world: &mut World,
    physics: &mut PhysicsWorld,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<hecs::Entity> {
    let entities: Vec<_> = config
        .skills
        .iter()
        .map(|skill| spawn_collectible(world, physics, skill, config.collectible_half_extents, rng))
        .collect();
    log::info!("Spawned {} collectibles", entities.len());
    entities
}

/// Global reset for collectibles: every one back to `Idle` at its spawn point,
/// parked ones brought back into play.
pub fn respawn_all(world: &mut World, physics: &mut PhysicsWorld) {
    for (_, (collectible, spawn, transform, body)) in
        world.query_mut::<(&mut Collectible, &SpawnPoint, &mut Transform, &PhysicsBody)>()
    {
        collectible.abduction.reset();
        physics.restore(body.rigid_body, spawn.position);
        physics.set_rotation_locked(body.rigid_body, true);
        *transform = Transform::from_position(spawn.position);
    }
}

/// Copy body transforms back into the ECS after a physics step.
pub fn sync_transforms(world: &mut World, physics: &PhysicsWorld) {
    for (_, (transform, body)) in world.query_mut::<(&mut Transform, &PhysicsBody)>() {
        if let Some(t) = physics.get_body_transform(body.rigid_body) {
            *transform = t;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn spawns_one_entity_per_skill_at_its_spawn_point() {
        let config = GameConfig::default();
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);

        let entities = spawn_collectibles(&mut world, &mut physics, &config, &mut rng);
        assert_eq!(entities.len(), config.skills.len());

        for (entity, skill) in entities.iter().zip(&config.skills) {
            let c = world.get::<&Collectible>(*entity).expect("collectible");
            let body = world.get::<&PhysicsBody>(*entity).expect("body");
            assert_eq!(c.skill_id, skill.id);
            assert_eq!(physics.body_position(body.rigid_body), Some(skill.spawn));
            assert!(physics.is_rotation_locked(body.rigid_body));
        }
    }

    #[test]
    fn respawn_restores_parked_bodies() {
        let config = GameConfig::default();
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let entities = spawn_collectibles(&mut world, &mut physics, &config, &mut rng);

        let handle = world
            .get::<&PhysicsBody>(entities[0])
            .map(|b| b.rigid_body)
            .expect("body");
        physics.park(handle, Vec3::new(0.0, -200.0, 0.0));

        respawn_all(&mut world, &mut physics);
        assert!(physics.is_body_enabled(handle));
        assert_eq!(physics.body_position(handle), Some(config.skills[0].spawn));
    }
}
