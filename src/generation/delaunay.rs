//! Delaunay triangle mesh over the site positions
//!
//! Wraps `delaunator` and adds the per-vertex queries needed to trace Voronoi
//! cells: incident triangles, rotational neighbours inside a triangle, outward
//! edge normals, and the ordered triangle fan around each vertex.

use glam::DVec2;
use std::collections::{HashMap, HashSet};

use crate::error::{DroneNetError, Result};
use crate::geometry::{circumcenter, orient2d, right_normal, Rect};

/// A mesh triangle with counter-clockwise vertex indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Indices into the mesh points, counter-clockwise (y axis up)
    pub vertices: [usize; 3],
    /// Center of the circumscribed circle
    pub circumcenter: DVec2,
}

impl Triangle {
    /// Check whether the triangle uses vertex `v`
    #[inline]
    pub fn has_vertex(&self, v: usize) -> bool {
        self.vertices.contains(&v)
    }

    fn slot(&self, v: usize) -> Option<usize> {
        self.vertices.iter().position(|&x| x == v)
    }
}

/// Triangles around one vertex, in counter-clockwise order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fan {
    /// Triangle indices, each one sharing an edge with the next
    pub triangles: Vec<usize>,
    /// True when the vertex lies on the mesh hull, so the ring does not close
    pub open: bool,
}

/// Planar triangulation of the site positions
///
/// Built once per topology rebuild and dropped after the cells are traced.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    points: Vec<DVec2>,
    triangles: Vec<Triangle>,
    vertex_triangles: Vec<Vec<usize>>,
    window: Rect,
}

impl TriangleMesh {
    /// Triangulate `points` inside `window`
    ///
    /// # Errors
    ///
    /// - `NotEnoughSites` for fewer than 3 points
    /// - `TriangulationFailed` if the points are collinear or a point is left
    ///   out of every triangle (duplicate positions)
    pub fn build(points: &[DVec2], window: Rect) -> Result<Self> {
        if points.len() < 3 {
            return Err(DroneNetError::NotEnoughSites {
                found: points.len(),
                required: 3,
            });
        }

        let input: Vec<delaunator::Point> = points
            .iter()
            .map(|p| delaunator::Point { x: p.x, y: p.y })
            .collect();
        let raw = delaunator::triangulate(&input);
        if raw.triangles.is_empty() {
            return Err(DroneNetError::TriangulationFailed(
                "site positions are collinear".to_string(),
            ));
        }

        let mut triangles = Vec::with_capacity(raw.triangles.len() / 3);
        for chunk in raw.triangles.chunks_exact(3) {
            let mut vertices = [chunk[0], chunk[1], chunk[2]];
            let (a, b, c) = (points[vertices[0]], points[vertices[1]], points[vertices[2]]);
            if orient2d(a, b, c) < 0.0 {
                vertices.swap(1, 2);
            }
            let center = circumcenter(a, b, c).ok_or_else(|| {
                DroneNetError::TriangulationFailed(format!(
                    "degenerate triangle {:?}",
                    vertices
                ))
            })?;
            triangles.push(Triangle {
                vertices,
                circumcenter: center,
            });
        }

        let vertex_triangles = build_vertex_triangle_map(points.len(), &triangles);
        if let Some(isolated) = vertex_triangles.iter().position(Vec::is_empty) {
            return Err(DroneNetError::TriangulationFailed(format!(
                "site {} is not part of any triangle",
                isolated
            )));
        }

        tracing::debug!(
            points = points.len(),
            triangles = triangles.len(),
            "triangle mesh built"
        );

        Ok(Self {
            points: points.to_vec(),
            triangles,
            vertex_triangles,
            window,
        })
    }

    #[inline]
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn triangle(&self, tri: usize) -> &Triangle {
        &self.triangles[tri]
    }

    #[inline]
    pub fn window(&self) -> &Rect {
        &self.window
    }

    #[inline]
    pub fn window_x_min(&self) -> f64 {
        self.window.x_min()
    }

    #[inline]
    pub fn window_x_max(&self) -> f64 {
        self.window.x_max()
    }

    #[inline]
    pub fn window_y_min(&self) -> f64 {
        self.window.y_min()
    }

    #[inline]
    pub fn window_y_max(&self) -> f64 {
        self.window.y_max()
    }

    /// Indices of the triangles that use vertex `v`, in mesh order
    pub fn triangles_containing(&self, v: usize) -> &[usize] {
        self.vertex_triangles
            .get(v)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Vertex following `v` counter-clockwise in triangle `tri`
    pub fn next_vertex(&self, tri: usize, v: usize) -> Option<usize> {
        let t = self.triangles.get(tri)?;
        t.slot(v).map(|i| t.vertices[(i + 1) % 3])
    }

    /// Vertex preceding `v` counter-clockwise in triangle `tri`
    pub fn prev_vertex(&self, tri: usize, v: usize) -> Option<usize> {
        let t = self.triangles.get(tri)?;
        t.slot(v).map(|i| t.vertices[(i + 2) % 3])
    }

    /// Outward normal of the edge from `v` to its next vertex in `tri`
    pub fn edge_normal_after(&self, tri: usize, v: usize) -> Option<DVec2> {
        let next = self.next_vertex(tri, v)?;
        Some(right_normal(self.points[v], self.points[next]).normalize_or_zero())
    }

    /// Outward normal of the edge from the previous vertex to `v` in `tri`
    pub fn edge_normal_before(&self, tri: usize, v: usize) -> Option<DVec2> {
        let prev = self.prev_vertex(tri, v)?;
        Some(right_normal(self.points[prev], self.points[v]).normalize_or_zero())
    }

    /// Triangles around `v` in counter-clockwise order
    ///
    /// Triangle B follows triangle A when A's previous vertex is B's next
    /// vertex, i.e. they share the edge between `v` and that vertex. A hull
    /// vertex gets an open fan starting at the triangle whose next edge has no
    /// neighbour.
    pub fn fan(&self, v: usize) -> Fan {
        let incident = self.triangles_containing(v);
        if incident.is_empty() {
            return Fan::default();
        }

        let mut by_next: HashMap<usize, usize> = HashMap::with_capacity(incident.len());
        let mut prevs: HashSet<usize> = HashSet::with_capacity(incident.len());
        for &tri in incident {
            if let (Some(next), Some(prev)) = (self.next_vertex(tri, v), self.prev_vertex(tri, v)) {
                by_next.insert(next, tri);
                prevs.insert(prev);
            }
        }

        let open_start = incident.iter().copied().find(|&tri| {
            self.next_vertex(tri, v)
                .map(|next| !prevs.contains(&next))
                .unwrap_or(false)
        });
        let open = open_start.is_some();
        let start = open_start.unwrap_or(incident[0]);

        let mut triangles = vec![start];
        let mut current = start;
        while triangles.len() < incident.len() {
            let step = self
                .prev_vertex(current, v)
                .and_then(|prev| by_next.get(&prev).copied());
            match step {
                Some(tri) if tri != start => {
                    triangles.push(tri);
                    current = tri;
                }
                _ => break,
            }
        }

        Fan { triangles, open }
    }
}

/// Map from vertex index to the triangles that include it
fn build_vertex_triangle_map(vertex_count: usize, triangles: &[Triangle]) -> Vec<Vec<usize>> {
    let mut map = vec![Vec::new(); vertex_count];
    for (tri_idx, triangle) in triangles.iter().enumerate() {
        for &v in &triangle.vertices {
            map[v].push(tri_idx);
        }
    }
    map
}
