//! Spatial indexing for nearest-site lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::DVec2;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over the site positions
///
/// Since a Voronoi cell is exactly the set of points nearest to its site, the
/// nearest site of a point is the owner of the cell containing it. Used to
/// attach drones that start outside every cell polygon.
#[derive(Clone)]
pub struct SiteIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
    len: usize,
}

impl SiteIndex {
    /// Build the index from site positions, in site ID order
    pub fn new(positions: &[DVec2]) -> Self {
        let points: Vec<[f64; 2]> = positions.iter().map(|p| [p.x, p.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
            len: positions.len(),
        }
    }

    /// ID of the site closest to `position`, `None` for an empty index
    pub fn find_nearest(&self, position: DVec2) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let result = self.tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some(result.item as usize)
    }
}
