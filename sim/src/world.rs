//! Ownership wrapper around the physics engine's simulation state.
//!
//! Holds every Rapier set and pipeline stage needed for full dynamics and
//! exposes the handful of operations the simulation uses: insert bodies,
//! read/write body state, step. Owned by the tick driver and mutated only
//! from the single-threaded tick callback.

use rapier3d::prelude::*;

use crate::settings::GRAVITY_MPS2;

pub struct PhysicsWorld {
    pub gravity: Vector<f32>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Empty world with standard downward gravity.
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, -GRAVITY_MPS2, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Register a body/collider pair built by a
    /// [`BodyDef`](crate::body::BodyDef).
    pub fn insert(&mut self, body: RigidBody, collider: Collider) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Register a body carrying several colliders (e.g. a shell plus a
    /// dense core sharing one rigid frame).
    pub fn insert_with_colliders(
        &mut self,
        body: RigidBody,
        colliders: impl IntoIterator<Item = Collider>,
    ) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        for collider in colliders {
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
        }
        handle
    }

    #[inline]
    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    #[inline]
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Advance the simulation by `dt` seconds split into equal substeps.
    ///
    /// Substepping keeps small, fast bodies from tunneling without paying
    /// for continuous collision detection everywhere.
    pub fn step(&mut self, dt: f32, substeps: u32) {
        let substeps = substeps.max(1);
        self.integration_parameters.dt = dt / substeps as f32;

        // Using default hooks/events (none).
        let hooks = ();
        let events = ();

        for _ in 0..substeps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                &hooks,
                &events,
            );
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Iso;
    use crate::body::BodyDef;

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let mut world = PhysicsWorld::new();
        let pose = Iso::translation(0.0, 5.0, 0.0);
        let (body, collider) = BodyDef::new(pose, SharedShape::ball(0.1), 1.0).build();
        let handle = world.insert(body, collider);

        for _ in 0..60 {
            world.step(1.0 / 60.0, 1);
        }

        let y = world.body(handle).unwrap().position().translation.vector.y;
        assert!(y < 1.0, "body should have fallen, y = {y}");
    }

    #[test]
    fn fixed_body_does_not_move() {
        let mut world = PhysicsWorld::new();
        let pose = Iso::translation(0.0, 2.0, 0.0);
        let (body, collider) = BodyDef::new(pose, SharedShape::cuboid(1.0, 0.1, 1.0), 0.0).build();
        let handle = world.insert(body, collider);

        for _ in 0..30 {
            world.step(1.0 / 60.0, 2);
        }

        let y = world.body(handle).unwrap().position().translation.vector.y;
        assert!((y - 2.0).abs() < 1.0e-5);
    }

    #[test]
    fn ball_settles_on_static_ground() {
        let mut world = PhysicsWorld::new();

        let ground = BodyDef::new(
            Iso::identity(),
            SharedShape::halfspace(Vector::y_axis()),
            0.0,
        );
        let (gb, gc) = ground.build();
        world.insert(gb, gc);

        let (body, collider) =
            BodyDef::new(Iso::translation(0.0, 1.0, 0.0), SharedShape::ball(0.1), 0.5).build();
        let handle = world.insert(body, collider);

        for _ in 0..240 {
            world.step(1.0 / 60.0, 2);
        }

        let y = world.body(handle).unwrap().position().translation.vector.y;
        // Resting on the plane, not fallen through and not launched away.
        assert!(y > 0.0 && y < 0.5, "y = {y}");
    }
}
