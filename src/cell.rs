//! Voronoi Cell Structure
//!
//! The region of the window closer to one site than to any other.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{approx_eq, Polygon};

/// A site's Voronoi cell, clipped to the window
///
/// # Design Notes
///
/// Cells are derived data. They are rebuilt from the site positions on every
/// topology rebuild and never edited in place.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// ID of the owning site
    pub site: usize,

    /// Boundary ring, counter-clockwise (y axis up)
    ///
    /// Empty when the site could not be given a region.
    pub polygon: Polygon,

    /// Fill triangles as index triples into `polygon`
    ///
    /// Only used for rendering.
    pub fill: Vec<[usize; 3]>,
}

impl Cell {
    /// Create a cell and triangulate it for fill rendering
    pub fn new(site: usize, polygon: Polygon) -> Self {
        let fill = polygon.triangulate();
        Self { site, polygon, fill }
    }

    /// True when the cell has no area to speak of
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.polygon.len() < 3
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.polygon.len()
    }

    #[inline]
    pub fn contains(&self, p: DVec2) -> bool {
        self.polygon.contains(p)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    /// First boundary edge this cell shares with `other`
    ///
    /// Edges are compared as unordered endpoint pairs within `eps`, since two
    /// adjacent cells walk their common edge in opposite directions.
    pub fn shared_edge(&self, other: &Cell, eps: f64) -> Option<(DVec2, DVec2)> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        self.polygon.edges().find(|&(a, b)| {
            other.polygon.edges().any(|(c, d)| {
                (approx_eq(a, c, eps) && approx_eq(b, d, eps))
                    || (approx_eq(a, d, eps) && approx_eq(b, c, eps))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(site: usize, points: &[(f64, f64)]) -> Cell {
        Cell::new(
            site,
            Polygon::new(points.iter().map(|&(x, y)| DVec2::new(x, y)).collect()),
        )
    }

    #[test]
    fn test_cell_creation() {
        let c = cell(3, &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        assert_eq!(c.site, 3);
        assert_eq!(c.vertex_count(), 4);
        assert_eq!(c.fill.len(), 2);
        assert_eq!(c.area(), 16.0);
        assert!(c.contains(DVec2::new(1.0, 1.0)));
        assert!(!c.is_empty());
    }

    #[test]
    fn test_shared_edge_opposite_winding() {
        let left = cell(0, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)]);
        let right = cell(1, &[(5.0, 0.0), (10.0, 0.0), (10.0, 5.0), (5.0, 5.0)]);
        let edge = left.shared_edge(&right, 1e-9).unwrap();
        assert_eq!(edge, (DVec2::new(5.0, 0.0), DVec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_no_shared_edge_at_corner() {
        let a = cell(0, &[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)]);
        let b = cell(1, &[(5.0, 5.0), (10.0, 5.0), (10.0, 10.0), (5.0, 10.0)]);
        assert!(a.shared_edge(&b, 1e-9).is_none());
    }

    #[test]
    fn test_empty_cell() {
        let c = Cell::new(0, Polygon::default());
        assert!(c.is_empty());
        assert!(c.fill.is_empty());
        assert!(c.shared_edge(&c, 1e-9).is_none());
    }
}
