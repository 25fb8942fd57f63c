//! Physics world management with Rapier3D.

use crate::collision::CollisionGroup;
use engine_core::{Transform, Vec3};
use rapier3d::na::{Isometry3, Vector3};
use rapier3d::prelude::*;

/// Standard gravity used for the playfield.
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Tuning applied to dynamic bodies at creation.
#[derive(Debug, Clone, Copy)]
pub struct DynamicBodyDesc {
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Spawn with rotations locked.
    pub rotation_locked: bool,
}

impl Default for DynamicBodyDesc {
    fn default() -> Self {
        Self {
            linear_damping: 0.4,
            angular_damping: 0.8,
            rotation_locked: true,
        }
    }
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self::with_gravity(DEFAULT_GRAVITY)
    }

    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Gravity magnitude along -Y.
    pub fn gravity_magnitude(&self) -> f32 {
        -self.gravity.y
    }

    /// Step the physics simulation by `dt` seconds. Non-positive steps are ignored.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Update query pipeline for raycasting outside of a step.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a dynamic rigid body and return its handle.
    pub fn add_dynamic_body(&mut self, position: Vec3, desc: DynamicBodyDesc) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .lock_rotations_if(desc.rotation_locked)
            .ccd_enabled(true)
            .build();
        self.rigid_body_set.insert(rigid_body)
    }

    /// Add a box collider to a rigid body.
    pub fn add_box_collider(
        &mut self,
        body_handle: RigidBodyHandle,
        half_extents: Vec3,
        groups: InteractionGroups,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(groups)
            .friction(0.8)
            .restitution(0.1)
            .build();
        self.collider_set
            .insert_with_parent(collider, body_handle, &mut self.rigid_body_set)
    }

    /// Add a ground plane collider (flat Y=0 half-space).
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .collision_groups(CollisionGroup::environment())
            .friction(0.9)
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a static cuboid collider (landmark footprints). No parent body; the
    /// collider is fixed in world. `translation`: world position of center.
    /// `rotation_y_rad`: rotation around Y axis in radians.
    pub fn add_static_cuboid(
        &mut self,
        translation: Vec3,
        rotation_y_rad: f32,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let axisangle = Vector3::y_axis().into_inner() * (rotation_y_rad as Real);
        let position = Isometry3::new(to_vector(translation), axisangle);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .position(position)
            .collision_groups(CollisionGroup::environment())
            .build();
        self.collider_set.insert(collider)
    }

    /// Get the transform of a rigid body.
    pub fn get_body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            let rot = body.rotation();
            Transform {
                position: from_vector(pos),
                rotation: glam::Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
            }
        })
    }

    /// World position of a body's center.
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| from_vector(body.translation()))
    }

    pub fn body_linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| from_vector(body.linvel()))
    }

    pub fn body_angular_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| from_vector(body.angvel()))
    }

    pub fn body_mass(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set.get(handle).map(|body| body.mass())
    }

    pub fn is_body_enabled(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .is_some_and(|body| body.is_enabled())
    }

    /// Clear any force accumulated on a body. Rapier keeps added forces across steps.
    pub fn reset_forces(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.reset_forces(false);
        }
    }

    /// Add a continuous force, applied on every step until [`Self::reset_forces`].
    pub fn add_force(&mut self, handle: RigidBodyHandle, force: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.add_force(to_vector(force), true);
        }
    }

    /// Apply an impulse to a dynamic body.
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.apply_impulse(to_vector(impulse), true);
        }
    }

    /// Apply an angular impulse to a dynamic body. No effect while rotations are locked.
    pub fn apply_torque_impulse(&mut self, handle: RigidBodyHandle, torque: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.apply_torque_impulse(to_vector(torque), true);
        }
    }

    pub fn is_rotation_locked(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .is_some_and(|body| body.locked_axes().contains(LockedAxes::ROTATION_LOCKED))
    }

    /// Lock or unlock all rotational axes. Only touches the body when the state changes.
    pub fn set_rotation_locked(&mut self, handle: RigidBodyHandle, locked: bool) {
        if self.is_rotation_locked(handle) == locked {
            return;
        }
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.lock_rotations(locked, true);
            if locked {
                body.set_angvel(Vector::zeros(), true);
            }
        }
    }

    /// Move a body to `position` upright with zero velocity and no pending force.
    pub fn teleport(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_position(Isometry3::translation(position.x, position.y, position.z), true);
            body.set_linvel(Vector::zeros(), true);
            body.set_angvel(Vector::zeros(), true);
            body.reset_forces(true);
            body.reset_torques(true);
        }
    }

    /// Reset only the height and velocity of a body, keeping its planar position.
    pub fn lift_to_height(&mut self, handle: RigidBodyHandle, height: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let mut translation = *body.translation();
            translation.y = height;
            body.set_translation(translation, true);
            body.set_linvel(Vector::zeros(), true);
            body.set_angvel(Vector::zeros(), true);
        }
    }

    /// Take a body out of the simulation at `position`: no collisions, no queries, no gravity.
    pub fn park(&mut self, handle: RigidBodyHandle, position: Vec3) {
        self.teleport(handle, position);
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_enabled(false);
            log::debug!("Parked body {:?} at {:?}", handle, position);
        }
    }

    /// Bring a parked body back into the simulation at `position`.
    pub fn restore(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            if !body.is_enabled() {
                log::debug!("Restoring parked body {:?}", handle);
            }
            body.set_enabled(true);
        }
        self.teleport(handle, position);
    }
}

/// Builder helper so the locked-at-spawn flag reads as one chain.
trait LockRotationsIf {
    fn lock_rotations_if(self, locked: bool) -> Self;
}

impl LockRotationsIf for RigidBodyBuilder {
    fn lock_rotations_if(self, locked: bool) -> Self {
        if locked {
            self.lock_rotations()
        } else {
            self
        }
    }
}
