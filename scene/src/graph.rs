//! Arena-based scene-node hierarchy.
//!
//! Nodes are stored in one flat `Vec` and addressed by [`NodeId`], so the
//! hierarchy can be traversed without recursion and without reference
//! cycles. Each node carries a name (used by level classification), a local
//! TRS transform, optional mesh geometry, and parent/child links.
//!
//! World transforms are composed by walking *up* the parent chain, matching
//! the renderer's matrix model: `world = parent_world * local`. Scale is
//! part of the local transform because baked collision geometry must honor
//! it; rigid poses derived from a node ignore scale.

use nalgebra as na;

use crate::mesh::MeshData;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Mat4 = na::Matrix4<f32>;

/// Index of a node inside a [`SceneGraph`] arena.
///
/// Ids are only meaningful for the graph that issued them and are never
/// recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A local TRS transform (translation, rotation, non-uniform scale).
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Identity transform.
    #[inline]
    pub fn identity() -> Self {
        Self::new(Vec3::zeros(), Quat::identity())
    }

    /// Compose this transform into a homogeneous matrix (T * R * S).
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        let trs = na::Isometry3::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        );
        trs.to_homogeneous() * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// One node of the hierarchy.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub local: Transform,
    pub mesh: Option<MeshData>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Flat arena of scene nodes.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or as a root when `parent` is `None`).
    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        local: Transform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.into(),
            local,
            mesh: None,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.index()].children.push(id);
        }
        id
    }

    /// Attach mesh geometry to an existing node.
    pub fn set_mesh(&mut self, id: NodeId, mesh: MeshData) {
        self.nodes[id.index()].mesh = Some(mesh);
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// World matrix of `id`, composed by walking up the parent chain.
    ///
    /// Iterative on purpose: hierarchy depth never touches the call stack.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = self.nodes[id.index()].local.to_matrix();
        let mut cursor = self.nodes[id.index()].parent;
        while let Some(p) = cursor {
            let node = &self.nodes[p.index()];
            m = node.local.to_matrix() * m;
            cursor = node.parent;
        }
        m
    }

    /// Rigid world pose of `id` (translation and rotation only).
    ///
    /// Physics poses are rigid, so ancestor scale is deliberately ignored
    /// here; scale only matters for baked geometry, which goes through
    /// [`world_matrix`](Self::world_matrix).
    pub fn world_pose(&self, id: NodeId) -> (Vec3, Quat) {
        // Collect the chain root-first, then fold down.
        let mut chain = vec![id];
        let mut cursor = self.nodes[id.index()].parent;
        while let Some(p) = cursor {
            chain.push(p);
            cursor = self.nodes[p.index()].parent;
        }

        let mut translation = Vec3::zeros();
        let mut rotation = Quat::identity();
        for &n in chain.iter().rev() {
            let local = &self.nodes[n.index()].local;
            translation += rotation * local.translation;
            rotation *= local.rotation;
        }
        (translation, rotation)
    }

    /// Detach `id` from its parent and re-root it with the given local
    /// transform (normally its previous world pose).
    ///
    /// Used when a sub-object starts being driven by physics: from then on
    /// its transform is authored in world space, so it must not inherit an
    /// ancestor transform anymore.
    pub fn detach_to_root(&mut self, id: NodeId, new_local: Transform) {
        if let Some(p) = self.nodes[id.index()].parent {
            let siblings = &mut self.nodes[p.index()].children;
            siblings.retain(|&c| c != id);
        }
        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.local = new_local;
    }

    /// Depth-first ids of `root` and all its descendants, via an explicit
    /// stack.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &c in self.children(id) {
                stack.push(c);
            }
        }
        out
    }

    /// Number of mesh-bearing nodes in the subtree rooted at `root`.
    pub fn mesh_count(&self, root: NodeId) -> usize {
        self.descendants(root)
            .iter()
            .filter(|&&id| self.node(id).mesh.is_some())
            .count()
    }
}
