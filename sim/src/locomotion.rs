//! Walking-gait propulsion and uprighting for creature bodies.
//!
//! The gait is a clamped cosine of elapsed simulation time: during the
//! positive half of each cycle the creature pushes off along its local
//! forward-and-up axis, during the rest it recovers. Propulsion is injected
//! as a central impulse (passive dynamics: the solver stays in charge of
//! what the push actually does), and only while the creature is slow;
//! once moving it coasts, so repeated injection cannot wind speed up
//! without bound.

use rapier3d::prelude::RigidBodyHandle;

use crate::settings::{DIST_EPS, GAIT_IMPULSE, GAIT_RATE, GAIT_SPEED_THRESHOLD, UPRIGHT_GAIN};
use crate::world::PhysicsWorld;
use crate::{Quat, Vec3};

/// Clamped gait oscillator: `max(0, cos(t * GAIT_RATE))`.
#[inline]
pub fn gait_magnitude(elapsed: f32) -> f32 {
    (elapsed * GAIT_RATE).cos().max(0.0)
}

/// Push-off direction in the creature's local frame: forward and up, so a
/// step both drives and slightly unloads the body.
#[inline]
fn local_gait_axis() -> Vec3 {
    Vec3::new(0.0, 1.0, 1.0).normalize()
}

/// Propulsive impulse for this tick, or `None` when the creature is
/// already at speed and should coast.
pub fn gait_impulse(rotation: &Quat, speed: f32, elapsed: f32) -> Option<Vec3> {
    if speed >= GAIT_SPEED_THRESHOLD {
        return None;
    }
    Some(rotation * local_gait_axis() * (gait_magnitude(elapsed) * GAIT_IMPULSE))
}

/// Torque impulse pulling the creature's local up axis toward world up.
///
/// Proportional to `local_up x world_up`, so it vanishes when upright and
/// stays small enough not to fight the contact solver.
pub fn upright_torque(rotation: &Quat) -> Vec3 {
    let local_up = rotation * Vec3::y();
    local_up.cross(&Vec3::y()) * UPRIGHT_GAIN
}

/// Apply one locomotion tick to the given body.
pub fn step(world: &mut PhysicsWorld, handle: RigidBodyHandle, elapsed: f32) {
    let Some(body) = world.body_mut(handle) else {
        return;
    };

    let rotation = body.position().rotation;
    let speed = body.linvel().norm();

    if let Some(impulse) = gait_impulse(&rotation, speed, elapsed)
        && impulse.norm_squared() > DIST_EPS * DIST_EPS
    {
        body.apply_impulse(impulse, true);
    }

    let torque = upright_torque(&rotation);
    if torque.norm_squared() > DIST_EPS * DIST_EPS {
        body.apply_torque_impulse(torque, true);
    }
}
