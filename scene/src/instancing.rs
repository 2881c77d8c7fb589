//! Fixed-capacity pool of per-instance world transforms.
//!
//! All render primitives of one instanced mesh set read the same pool, so a
//! single `set_transform_at` updates every visual part of an instance in
//! lockstep. Capacity is fixed at construction because the matching GPU
//! buffer is allocated once; running out is a configuration error, never a
//! resize point. Indices are assigned monotonically and never recycled
//! within a session.

use log::warn;
use nalgebra as na;
use thiserror::Error;

use crate::graph::{Mat4, NodeId, SceneGraph};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    /// More instances requested than the pool was sized for. Truncating
    /// instead would corrupt unrelated instance slots, so this is fatal.
    #[error("instance pool exhausted (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
}

#[derive(Debug)]
pub struct InstancedTransforms {
    transforms: Vec<Mat4>,
    len: usize,
    /// How many render primitives share this index space (informational,
    /// for the renderer's draw setup).
    primitive_count: usize,
    /// Bumped on every write; the renderer re-uploads when it changes.
    generation: u64,
}

impl InstancedTransforms {
    /// Pool for up to `capacity` instances of a single render primitive.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transforms: vec![na::Matrix4::identity(); capacity],
            len: 0,
            primitive_count: 1,
            generation: 0,
        }
    }

    /// Pool sized for `capacity` instances of the mesh set found under
    /// `root` (every mesh-bearing node counts as one shared primitive).
    pub fn from_subtree(graph: &SceneGraph, root: NodeId, capacity: usize) -> Self {
        let mut pool = Self::with_capacity(capacity);
        pool.primitive_count = graph.mesh_count(root).max(1);
        pool
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.transforms.len()
    }

    /// Number of assigned instance slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    /// Current write generation; changes whenever any slot changes.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Assigned slots, in index order, for the renderer to upload.
    #[inline]
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms[..self.len]
    }

    /// Claim the next instance slot and set its initial transform.
    pub fn add_instance(&mut self, transform: &Mat4) -> Result<usize, InstanceError> {
        if self.len >= self.transforms.len() {
            return Err(InstanceError::CapacityExceeded {
                capacity: self.transforms.len(),
            });
        }
        let index = self.len;
        self.transforms[index] = *transform;
        self.len += 1;
        self.generation += 1;
        Ok(index)
    }

    /// Overwrite the transform of an assigned slot.
    ///
    /// Idempotent; called every tick for every live instance. Writes to an
    /// unassigned slot are dropped (and logged) rather than corrupting the
    /// pool.
    pub fn set_transform_at(&mut self, index: usize, transform: &Mat4) {
        if index >= self.len {
            warn!(
                "ignoring transform write to unassigned instance slot {index} (len {})",
                self.len
            );
            return;
        }
        self.transforms[index] = *transform;
        self.generation += 1;
    }
}
