//! Flock steering: pairwise proximity, heading alignment, and a
//! cohesion/separation balance, applied as rotational impulses.
//!
//! Purely functional per tick: every agent's tip/tail/heading is rederived
//! from its current physics pose, all pairwise contributions are summed
//! into one steering vector per agent, then applied. The pair scan is
//! O(n^2); the population cap in [`settings`](crate::settings) exists
//! precisely to keep that affordable. Scale it up and this wants a spatial
//! grid keyed by the search radius instead.

use rapier3d::prelude::RigidBodyHandle;

use crate::settings::{
    ALIGNMENT_SOFTENING, BOID_RADIUS, COHESION, DIST_EPS, PROXIMITY_RADIUS, SEARCH_RADIUS,
    STEER_TORQUE_SCALE,
};
use crate::world::PhysicsWorld;
use crate::{Iso, Vec3};

/// Steering state for one agent, rederived each tick from its world pose.
#[derive(Clone, Copy, Debug)]
pub struct Boid {
    /// World-space point one body-radius in front of the pivot.
    pub tip: Vec3,
    /// World-space point one body-radius behind the pivot.
    pub tail: Vec3,
    /// World-space forward axis (local +Z through the pose rotation).
    pub forward: Vec3,
    /// Unit heading, tip minus tail normalized.
    pub heading: Vec3,
}

impl Boid {
    pub fn from_pose(pose: &Iso) -> Self {
        let forward = pose.rotation * Vec3::z();
        let pivot = pose.translation.vector;
        let tip = pivot + forward * BOID_RADIUS;
        let tail = pivot - forward * BOID_RADIUS;

        let axis = tip - tail;
        let heading = if axis.norm_squared() > DIST_EPS * DIST_EPS {
            axis.normalize()
        } else {
            forward
        };

        Self {
            tip,
            tail,
            forward,
            heading,
        }
    }
}

/// Distance-well steering weight.
///
/// Zero at the proximity radius and at the search radius, positive
/// (attraction) in between, negative (repulsion) closer than the proximity
/// radius. The sign convention and overall scale are tuning choices, not
/// structural invariants.
#[inline]
pub fn well_weight(distance: f32) -> f32 {
    (SEARCH_RADIUS - distance) * (distance - PROXIMITY_RADIUS)
}

/// Summed steering vector for `boids[current]` against every other boid.
///
/// The vector is a rotation axis whose magnitude encodes how hard to turn:
/// `forward x to_neighbor` weighted by the distance well, plus a heading
/// alignment nudge that grows as neighbors get close. Pairs at or beyond
/// the search radius, and degenerate zero-length directions, contribute
/// nothing.
pub fn steering_for(boids: &[Boid], current: usize) -> Vec3 {
    let me = &boids[current];
    let mut total = Vec3::zeros();

    for (j, other) in boids.iter().enumerate() {
        if j == current {
            continue;
        }

        let d = other.tail - me.tip;
        let distance = d.norm();
        if distance >= SEARCH_RADIUS {
            // Limited perception, and it bounds per-pair cost.
            continue;
        }
        if distance <= DIST_EPS {
            continue;
        }

        let dir = d / distance;

        // Axis that rotates our forward toward the neighbor's tail.
        let steer = me.forward.cross(&dir) * well_weight(distance);

        // Axis that rotates our heading toward the neighbor's heading,
        // strongest when almost touching.
        let align = me.heading.cross(&other.heading) / (distance + ALIGNMENT_SOFTENING);

        total += steer + align;
    }

    total * COHESION
}

/// Apply one steering tick to every listed body.
///
/// Reads all poses first, then writes all torque impulses, so the scan sees
/// a consistent snapshot of this tick's post-step state.
pub fn step(world: &mut PhysicsWorld, handles: &[RigidBodyHandle]) {
    let mut flock: Vec<(RigidBodyHandle, Boid)> = Vec::with_capacity(handles.len());
    for &handle in handles {
        let Some(body) = world.body(handle) else {
            continue;
        };
        flock.push((handle, Boid::from_pose(body.position())));
    }

    let boids: Vec<Boid> = flock.iter().map(|&(_, b)| b).collect();

    for (i, &(handle, _)) in flock.iter().enumerate() {
        let steering = steering_for(&boids, i);
        if steering.norm_squared() <= DIST_EPS * DIST_EPS {
            continue;
        }
        let Some(body) = world.body_mut(handle) else {
            continue;
        };
        body.apply_torque_impulse(steering * STEER_TORQUE_SCALE, true);
    }
}
