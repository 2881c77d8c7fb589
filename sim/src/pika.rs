//! Creature body construction.
//!
//! A pika is a capsule shell the size of its rendered body plus a dense
//! core block sharing the same rigid frame. The heavy core keeps the
//! center of mass low so a walking push tends to right the body instead of
//! rolling it. Forward is local +Z.

use rapier3d::prelude::{Collider, ColliderBuilder, SharedShape};

use nalgebra as na;
use scene::{InstanceError, InstancedTransforms};

use crate::agent::Agent;
use crate::body::BodyDef;
use crate::settings::{
    PIKA_CORE_HALF, PIKA_CORE_MASS_KG, PIKA_LENGTH, PIKA_RADIUS, PIKA_RESTITUTION,
    PIKA_SHELL_MASS_KG,
};
use crate::world::PhysicsWorld;
use crate::{Iso, Vec3};

/// Outer shell: a Z-aligned capsule matching the rendered body envelope.
fn shell_shape() -> SharedShape {
    let half_segment = PIKA_LENGTH / 2.0 - PIKA_RADIUS;
    SharedShape::capsule(
        na::Point3::new(0.0, 0.0, -half_segment),
        na::Point3::new(0.0, 0.0, half_segment),
        PIKA_RADIUS,
    )
}

/// Dense core block, twice as long as it is wide.
fn core_collider() -> Collider {
    ColliderBuilder::new(SharedShape::cuboid(
        PIKA_CORE_HALF,
        PIKA_CORE_HALF,
        2.0 * PIKA_CORE_HALF,
    ))
    .mass(PIKA_CORE_MASS_KG)
    .restitution(PIKA_RESTITUTION)
    .build()
}

/// Spawn one creature at `position`: build its body, register it with the
/// physics world, and claim an instance slot for its rendered parts.
pub fn spawn(
    world: &mut PhysicsWorld,
    instances: &mut InstancedTransforms,
    position: Vec3,
) -> Result<Agent, InstanceError> {
    let pose = Iso::translation(position.x, position.y, position.z);

    // Creatures are force-driven and often look idle between gait pulses;
    // they must never be deactivated by the solver.
    let (body, shell) = BodyDef::new(pose, shell_shape(), PIKA_SHELL_MASS_KG)
        .restitution(PIKA_RESTITUTION)
        .keep_awake(true)
        .build();

    let handle = world.insert_with_colliders(body, [shell, core_collider()]);
    let index = instances.add_instance(&pose.to_homogeneous())?;

    Ok(Agent::new(handle, index))
}
