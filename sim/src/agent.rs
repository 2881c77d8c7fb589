//! One creature: a physics body, an instance slot, and a derived heading.
//!
//! The three identities that refer to "one creature" live in a single
//! owning record; the driver keeps these in one `Vec` and everything else
//! works off that slice. Agents are created while the population is below
//! its cap and never destroyed during a session.

use rapier3d::prelude::RigidBodyHandle;

use scene::InstancedTransforms;

use crate::Vec3;
use crate::flock::Boid;
use crate::locomotion;
use crate::world::PhysicsWorld;

#[derive(Debug)]
pub struct Agent {
    body: RigidBodyHandle,
    instance: usize,
    heading: Vec3,
}

impl Agent {
    pub fn new(body: RigidBodyHandle, instance: usize) -> Self {
        Self {
            body,
            instance,
            heading: Vec3::z(),
        }
    }

    #[inline]
    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    #[inline]
    pub fn instance(&self) -> usize {
        self.instance
    }

    /// Unit heading derived from the body pose on the last step.
    #[inline]
    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    /// Per-tick update: rederive the heading from this tick's post-step
    /// pose, then inject locomotion (gait impulse and uprighting).
    pub fn step(&mut self, world: &mut PhysicsWorld, elapsed: f32) {
        if let Some(body) = world.body(self.body) {
            self.heading = Boid::from_pose(body.position()).heading;
        }
        locomotion::step(world, self.body, elapsed);
    }

    /// Write the body's current pose into this agent's instance slot so
    /// the next render sees this tick's locomotion and steering effects.
    pub fn sync_instance(&self, world: &PhysicsWorld, instances: &mut InstancedTransforms) {
        let Some(body) = world.body(self.body) else {
            return;
        };
        instances.set_transform_at(self.instance, &body.position().to_homogeneous());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Iso;
    use crate::pika;

    #[test]
    fn heading_tracks_body_rotation() {
        let mut world = PhysicsWorld::new();
        let mut instances = InstancedTransforms::with_capacity(4);
        let mut agent = pika::spawn(&mut world, &mut instances, Vec3::new(0.0, 1.0, 0.0)).unwrap();

        agent.step(&mut world, 0.0);
        assert!((agent.heading() - Vec3::z()).norm() < 1.0e-5);

        // Turn the body to face +X; the next step rederives the heading.
        let yaw = crate::Quat::from_axis_angle(
            &nalgebra::Vector3::y_axis(),
            -std::f32::consts::FRAC_PI_2,
        );
        let pose = Iso::from_parts(nalgebra::Translation3::new(0.0, 1.0, 0.0), yaw);
        world
            .body_mut(agent.body())
            .unwrap()
            .set_position(pose, true);

        agent.step(&mut world, 0.0);
        assert!((agent.heading() - Vec3::x()).norm() < 1.0e-4);
    }

    #[test]
    fn sync_instance_writes_body_pose_to_slot() {
        let mut world = PhysicsWorld::new();
        let mut instances = InstancedTransforms::with_capacity(4);
        let agent = pika::spawn(&mut world, &mut instances, Vec3::new(1.0, 2.0, 3.0)).unwrap();

        agent.sync_instance(&world, &mut instances);

        let m = instances.transforms()[agent.instance()];
        assert!((m[(0, 3)] - 1.0).abs() < 1.0e-5);
        assert!((m[(1, 3)] - 2.0).abs() < 1.0e-5);
        assert!((m[(2, 3)] - 3.0).abs() < 1.0e-5);
    }
}
