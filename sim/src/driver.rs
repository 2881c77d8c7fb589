//! Single-threaded simulation driver.
//!
//! One [`Habitat`] owns the physics world, the creature list, and the
//! instance pool, and mutates them only from [`Habitat::tick`], which the
//! host's render loop calls once per frame. Intra-tick ordering is fixed:
//!
//! 1. kinematic pose targets from the input snapshot
//! 2. physics world step
//! 3. per-creature read-back + locomotion injection
//! 4. flock steering
//! 5. instance-transform write-back
//! 6. population growth
//!
//! Locomotion and steering see this tick's post-step state, and instance
//! transforms reflect their effects before the next render, even though
//! the solver only integrates those effects on the following step. The
//! one-tick lag is accepted.

use log::info;
use rapier3d::prelude::RigidBodyHandle;

use scene::{InstanceError, InstancedTransforms};

use crate::agent::Agent;
use crate::flock;
use crate::pika;
use crate::settings::{MAX_PIKAS, PHYSICS_SUBSTEPS, SPAWN_INTERVAL_SECS, SPAWN_RING_RADIUS};
use crate::world::PhysicsWorld;
use crate::{Iso, Vec3};

/// Everything external that can influence one tick, snapshotted up front.
#[derive(Clone, Copy, Debug)]
pub struct TickInput<'a> {
    /// Frame delta time in seconds.
    pub dt: f32,
    /// Pose targets for externally driven bodies (tracked grips etc.),
    /// written before the step.
    pub kinematic_targets: &'a [(RigidBodyHandle, Iso)],
}

impl TickInput<'_> {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            kinematic_targets: &[],
        }
    }
}

pub struct Habitat {
    world: PhysicsWorld,
    agents: Vec<Agent>,
    instances: InstancedTransforms,
    spawn_point: Vec3,
    max_population: usize,
    elapsed: f32,
    next_spawn_at: f32,
}

impl Habitat {
    /// Habitat with the default population cap, spawning around
    /// `spawn_point`.
    pub fn new(spawn_point: Vec3) -> Self {
        Self::with_population_cap(spawn_point, MAX_PIKAS)
    }

    /// Habitat with an explicit population cap; the instance pool is sized
    /// to exactly that cap, so the capacity invariant and the cap are one
    /// and the same.
    pub fn with_population_cap(spawn_point: Vec3, cap: usize) -> Self {
        Self {
            world: PhysicsWorld::new(),
            agents: Vec::new(),
            instances: InstancedTransforms::with_capacity(cap),
            spawn_point,
            max_population: cap,
            elapsed: 0.0,
            next_spawn_at: SPAWN_INTERVAL_SECS,
        }
    }

    #[inline]
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// The world is exposed mutably so the surrounding application can rip
    /// levels into it and register props before the first tick.
    #[inline]
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn instances(&self) -> &InstancedTransforms {
        &self.instances
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Run one simulation tick.
    pub fn tick(&mut self, input: &TickInput) -> Result<(), InstanceError> {
        for &(handle, pose) in input.kinematic_targets {
            if let Some(body) = self.world.body_mut(handle) {
                body.set_next_kinematic_position(pose);
            }
        }

        self.world.step(input.dt, PHYSICS_SUBSTEPS);
        self.elapsed += input.dt;

        for agent in &mut self.agents {
            agent.step(&mut self.world, self.elapsed);
        }

        let handles: Vec<RigidBodyHandle> = self.agents.iter().map(Agent::body).collect();
        flock::step(&mut self.world, &handles);

        for agent in &self.agents {
            agent.sync_instance(&self.world, &mut self.instances);
        }

        // Population growth is gated by elapsed time and the hard cap, and
        // runs inside the same tick as everything else.
        if self.agents.len() < self.max_population && self.elapsed >= self.next_spawn_at {
            self.spawn()?;
            self.next_spawn_at += SPAWN_INTERVAL_SECS;
        }

        Ok(())
    }

    /// Spawn one creature now, regardless of the time gate (the cap still
    /// holds via the instance pool).
    pub fn spawn(&mut self) -> Result<(), InstanceError> {
        let i = self.agents.len();
        // Golden-angle-ish spacing keeps the spawn ring spread out.
        let angle = i as f32 * 2.4;
        let position =
            self.spawn_point + Vec3::new(angle.cos(), 0.0, angle.sin()) * SPAWN_RING_RADIUS;

        let agent = pika::spawn(&mut self.world, &mut self.instances, position)?;
        info!("spawned pika {i} at {position:?}");
        self.agents.push(agent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyDef;
    use rapier3d::prelude::{SharedShape, Vector};

    const DT: f32 = 1.0 / 60.0;

    fn habitat_with_ground(cap: usize) -> Habitat {
        let mut habitat = Habitat::with_population_cap(Vec3::new(0.0, 0.3, 0.0), cap);
        let (body, collider) = BodyDef::new(
            Iso::identity(),
            SharedShape::halfspace(Vector::y_axis()),
            0.0,
        )
        .build();
        habitat.world_mut().insert(body, collider);
        habitat
    }

    fn run_seconds(habitat: &mut Habitat, seconds: f32) {
        let ticks = (seconds / DT).round() as usize;
        let input = TickInput::new(DT);
        for _ in 0..ticks {
            habitat.tick(&input).unwrap();
        }
    }

    #[test]
    fn one_creature_spawns_per_elapsed_second() {
        let mut habitat = habitat_with_ground(8);
        run_seconds(&mut habitat, 3.5);
        assert_eq!(habitat.population(), 3);
        assert_eq!(habitat.instances().len(), 3);
    }

    #[test]
    fn population_never_exceeds_the_cap() {
        let mut habitat = habitat_with_ground(3);
        run_seconds(&mut habitat, 10.0);
        // min(10, 3): the gate keeps running but the cap holds.
        assert_eq!(habitat.population(), 3);

        run_seconds(&mut habitat, 2.0);
        assert_eq!(habitat.population(), 3);
    }

    #[test]
    fn instance_transforms_are_rewritten_every_tick() {
        let mut habitat = habitat_with_ground(2);
        run_seconds(&mut habitat, 1.5);
        assert_eq!(habitat.population(), 1);

        let before = habitat.instances().generation();
        run_seconds(&mut habitat, 0.1);
        assert!(habitat.instances().generation() > before);
    }

    #[test]
    fn kinematic_targets_drive_their_bodies() {
        let mut habitat = habitat_with_ground(1);
        let (body, collider) = BodyDef::kinematic(
            Iso::translation(0.0, 1.0, 0.0),
            SharedShape::cuboid(0.075, 0.01, 0.1),
        )
        .build();
        let grip = habitat.world_mut().insert(body, collider);

        let target = Iso::translation(0.3, 1.2, -0.1);
        let targets = [(grip, target)];
        let input = TickInput {
            dt: DT,
            kinematic_targets: &targets,
        };
        for _ in 0..3 {
            habitat.tick(&input).unwrap();
        }

        let t = habitat.world().body(grip).unwrap().position().translation.vector;
        assert!((t - Vec3::new(0.3, 1.2, -0.1)).norm() < 1.0e-3, "t = {t:?}");
    }

    #[test]
    fn creatures_stay_near_the_ground_plane() {
        let mut habitat = habitat_with_ground(4);
        run_seconds(&mut habitat, 5.0);

        for agent in habitat.agents() {
            let y = habitat
                .world()
                .body(agent.body())
                .unwrap()
                .position()
                .translation
                .vector
                .y;
            assert!(y > -0.1, "creature fell through the floor, y = {y}");
            assert!(y < 2.0, "creature launched into the air, y = {y}");
        }
    }
}
