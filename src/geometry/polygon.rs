//! Ordered vertex rings

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{approx_eq, lex_less, Rect, POINT_EPSILON};

/// Closed polygon given by its vertices in order
///
/// The closing edge from the last vertex back to the first is implicit:
/// [`Polygon::edge`] wraps around.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<DVec2>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn push(&mut self, vertex: DVec2) {
        self.vertices.push(vertex);
    }

    /// Edge `i` as `(vertices[i], vertices[i + 1])`, wrapping at the end
    ///
    /// # Panics
    ///
    /// Panics if the polygon is empty.
    pub fn edge(&self, i: usize) -> (DVec2, DVec2) {
        let n = self.vertices.len();
        (self.vertices[i % n], self.vertices[(i + 1) % n])
    }

    /// Iterate over all edges, closing edge included
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        (0..self.vertices.len()).map(move |i| self.edge(i))
    }

    /// Signed area, positive for counter-clockwise winding (y axis up)
    pub fn signed_area(&self) -> f64 {
        self.edges().map(|(a, b)| a.perp_dot(b)).sum::<f64>() * 0.5
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area-weighted centroid, or the vertex mean for degenerate rings
    pub fn centroid(&self) -> Option<DVec2> {
        if self.vertices.is_empty() {
            return None;
        }
        let area = self.signed_area();
        if area.abs() < f64::EPSILON {
            let sum: DVec2 = self.vertices.iter().copied().sum();
            return Some(sum / self.vertices.len() as f64);
        }

        let mut c = DVec2::ZERO;
        for (a, b) in self.edges() {
            c += (a + b) * a.perp_dot(b);
        }
        Some(c / (6.0 * area))
    }

    /// Even-odd point-in-polygon test
    pub fn contains(&self, p: DVec2) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Reverse the vertex order if the winding is clockwise
    pub fn ensure_ccw(&mut self) {
        if self.signed_area() < 0.0 {
            self.vertices.reverse();
        }
    }

    /// Drop consecutive vertices closer than `eps`, closing edge included
    pub fn dedup(&mut self, eps: f64) {
        self.vertices.dedup_by(|b, a| approx_eq(*a, *b, eps));
        while self.vertices.len() > 1 {
            let first = self.vertices[0];
            let last = self.vertices[self.vertices.len() - 1];
            if approx_eq(first, last, eps) {
                self.vertices.pop();
            } else {
                break;
            }
        }
    }

    /// Keep the part of the polygon on the side of the line through `point`
    /// opposite to `normal` (Sutherland-Hodgman, one plane)
    pub fn clip_half_plane(&self, point: DVec2, normal: DVec2) -> Polygon {
        let n = self.vertices.len();
        let mut out = Vec::with_capacity(n + 2);
        if n == 0 {
            return Polygon::new(out);
        }

        let side = |v: DVec2| (v - point).dot(normal);
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let da = side(a);
            let db = side(b);

            if da <= 0.0 {
                out.push(a);
            }
            if (da < 0.0 && db > 0.0) || (da > 0.0 && db < 0.0) {
                out.push(edge_crossing(a, b, da, db));
            }
        }

        Polygon::new(out)
    }

    /// Clip against an axis-aligned rectangle
    pub fn clip_to_rect(&self, rect: &Rect) -> Polygon {
        let mut clipped = self
            .clip_half_plane(rect.min(), DVec2::new(-1.0, 0.0))
            .clip_half_plane(rect.max(), DVec2::new(1.0, 0.0))
            .clip_half_plane(rect.min(), DVec2::new(0.0, -1.0))
            .clip_half_plane(rect.max(), DVec2::new(0.0, 1.0));
        clipped.dedup(POINT_EPSILON);
        clipped
    }

    /// Split the polygon into triangles for fill rendering
    ///
    /// Fan from the first vertex; valid for the convex rings produced by the
    /// Voronoi builder. Returns vertex index triples.
    pub fn triangulate(&self) -> Vec<[usize; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        (1..self.vertices.len() - 1).map(|i| [0, i, i + 1]).collect()
    }
}

/// Point where segment `ab` crosses the clip line, given signed distances
///
/// Evaluated with the endpoints in lexicographic order.
fn edge_crossing(a: DVec2, b: DVec2, da: f64, db: f64) -> DVec2 {
    let (a, b, da, db) = if lex_less(a, b) { (a, b, da, db) } else { (b, a, db, da) };
    let t = da / (da - db);
    a + (b - a) * t
}
