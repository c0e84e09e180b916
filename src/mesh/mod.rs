//! Render output for a drone network
//!
//! Produces engine-agnostic vertex data: filled cells colored by their site,
//! and the two segments that draw each link.

mod colors;

pub use colors::SiteColor;

use glam::DVec2;

use crate::network::DroneNetwork;

/// Engine-agnostic 2D mesh data
///
/// Contains raw vertex data suitable for any renderer.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<[f32; 2]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<[f32; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Fill every cell with its site's color
///
/// Uses each cell's precomputed fill triangles. Cells with fewer than three
/// vertices are skipped.
pub fn generate_mesh(network: &DroneNetwork) -> MeshData {
    let mut mesh = MeshData::default();

    for site in network.sites() {
        if site.cell.is_empty() {
            continue;
        }

        let base_idx = mesh.positions.len() as u32;
        for v in site.cell.polygon.vertices() {
            mesh.positions.push(to_f32(*v));
            mesh.colors.push(site.color.0);
        }
        for tri in &site.cell.fill {
            mesh.indices.extend(tri.iter().map(|&i| base_idx + i as u32));
        }
    }

    mesh
}

/// Segments drawing each link: site -> midpoint -> other site
pub fn link_segments(network: &DroneNetwork) -> Vec<[DVec2; 2]> {
    let sites = network.sites();
    network
        .links()
        .iter()
        .flat_map(|link| {
            [
                [sites[link.a].position, link.midpoint],
                [sites[link.b].position, link.midpoint],
            ]
        })
        .collect()
}

#[inline]
fn to_f32(v: DVec2) -> [f32; 2] {
    [v.x as f32, v.y as f32]
}
