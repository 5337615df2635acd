//! UV sphere mesh generation for celestial body rendering.

use glam::Vec3;

use crate::buffer::VertexPositionNormalUv;

/// A unit-sphere mesh with polar-pole slice/stack tessellation.
pub struct SphereMesh {
    /// Vertex positions on the unit sphere.
    pub positions: Vec<Vec3>,
    /// Normal vectors (same as positions for a unit sphere).
    pub normals: Vec<Vec3>,
    /// Equirectangular UV coordinates per vertex.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices.
    pub indices: Vec<u16>,
}

impl SphereMesh {
    /// Interleave the mesh into the standard vertex format.
    pub fn vertices(&self) -> Vec<VertexPositionNormalUv> {
        (0..self.positions.len())
            .map(|i| VertexPositionNormalUv {
                position: self.positions[i].to_array(),
                normal: self.normals[i].to_array(),
                uv: self.uvs[i],
            })
            .collect()
    }
}

/// Generate a unit sphere tessellated into `slices` longitude segments and
/// `stacks` latitude segments, poles on the Y axis.
///
/// Vertices along the seam and at the poles are duplicated per column so
/// the equirectangular UVs stay continuous across every quad.
pub fn generate_uv_sphere(slices: u32, stacks: u32) -> SphereMesh {
    debug_assert!(slices >= 3 && stacks >= 2, "degenerate tessellation");

    let vertex_count = ((slices + 1) * (stacks + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let theta = v * std::f32::consts::PI; // 0 at the north pole
        let (ring, y) = theta.sin_cos();

        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let phi = u * std::f32::consts::TAU;
            positions.push(Vec3::new(ring * phi.cos(), y, ring * phi.sin()));
            uvs.push([u, v]);
        }
    }

    let normals = positions.clone();

    let mut indices = Vec::with_capacity((slices * stacks * 6) as usize);
    let columns = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = (stack * columns + slice) as u16;
            let b = a + columns as u16;
            indices.extend_from_slice(&[a, b, a + 1]);
            indices.extend_from_slice(&[a + 1, b, b + 1]);
        }
    }

    SphereMesh {
        positions,
        normals,
        uvs,
        indices,
    }
}
