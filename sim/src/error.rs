//! Failure taxonomy for geometry processing.
//!
//! Steering and locomotion are total functions over numeric state and have
//! no error surface; everything that can fail at runtime is geometry
//! ingestion, and it fails fast; there is no sensible fallback for
//! un-indexed triangle data.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A bare mesh without a triangle index was handed to a triangle-soup
    /// operation.
    #[error("mesh is not indexed triangle data")]
    UnindexedMesh,

    /// A node in a hierarchy walk carries a mesh without a triangle index.
    #[error("mesh on node `{node}` is not indexed triangle data")]
    UnindexedNode { node: String },

    /// A subtree slated for collision baking contains no triangle geometry
    /// at all.
    #[error("no triangle geometry under node `{node}`")]
    EmptySubtree { node: String },

    /// The physics engine rejected the baked triangle soup.
    #[error("collision mesh rejected by the physics engine: {0}")]
    BadTrimesh(String),
}
