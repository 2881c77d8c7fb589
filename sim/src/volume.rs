//! Signed volume of closed triangle meshes, used for mass inference.
//!
//! The enclosed volume of a closed, consistently wound mesh is the sum of
//! the signed volumes of the tetrahedra formed by the origin and each
//! triangle: `dot(p1, cross(p2, p3)) / 6`. Counter-clockwise (outward)
//! winding yields a positive result; reversing the winding negates it.
//!
//! A mesh that is not closed or not consistently wound produces a value
//! that is arithmetically defined but physically meaningless. That is a
//! known, accepted weakness; callers relying on volume-derived mass must
//! validate meshes upstream. Nothing here detects it.

use scene::MeshData;
use scene::mesh::Point3;

use crate::error::GeometryError;
use crate::settings::LITERS_PER_CUBIC_METER;

/// Signed volume (m^3) of a stream of triangles via tetrahedron
/// decomposition. Degenerate triangles contribute zero and are not special
/// cased.
pub fn signed_volume(triangles: impl Iterator<Item = [Point3; 3]>) -> f32 {
    let mut six_v = 0.0f32;
    for [p1, p2, p3] in triangles {
        six_v += p1.coords.dot(&p2.coords.cross(&p3.coords));
    }
    six_v / 6.0
}

/// Signed volume of `mesh` in liters.
///
/// Reported in liters rather than m^3 so downstream density arithmetic can
/// use kg/L constants. Fails when the mesh has no triangle index.
pub fn mesh_volume(mesh: &MeshData) -> Result<f32, GeometryError> {
    let triangles = mesh.triangles().ok_or(GeometryError::UnindexedMesh)?;
    Ok(signed_volume(triangles) * LITERS_PER_CUBIC_METER)
}
