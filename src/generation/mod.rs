//! Topology pipeline
//!
//! Runs the one-shot batch computation that turns site positions into the
//! structures the simulation reads every tick:
//!
//! sites -> triangle mesh -> Voronoi cells -> site graph -> routing table
//!
//! The mesh lives only for the duration of [`build_topology`].

mod delaunay;
mod sites;
mod voronoi;

pub use delaunay::{Fan, Triangle, TriangleMesh};
pub use sites::random_sites;
pub use voronoi::{generate_bisector_cells, generate_cells};

use glam::DVec2;

use crate::cell::Cell;
use crate::error::{DroneNetError, Result};
use crate::geometry::{orient2d, Rect};
use crate::graph::SiteGraph;
use crate::routing::RoutingTable;

/// Everything derived from the site positions
#[derive(Debug, Clone)]
pub struct Topology {
    /// One cell per site, indexed by site ID
    pub cells: Vec<Cell>,
    /// Links between sites whose cells share an edge
    pub graph: SiteGraph,
    /// All-pairs shortest paths over `graph`
    pub routing: RoutingTable,
}

/// Build cells, links and routes for `positions` inside `window`
///
/// Scenes with two sites, or whose sites all lie on one line, cannot be
/// triangulated; their cells are cut directly from the window by bisectors.
///
/// # Errors
///
/// - `NotEnoughSites` for fewer than two positions
/// - `DuplicateSite` if two positions coincide
/// - `TriangulationFailed` if the mesh cannot include every site
pub fn build_topology(positions: &[DVec2], window: &Rect) -> Result<Topology> {
    if positions.len() < 2 {
        return Err(DroneNetError::NotEnoughSites {
            found: positions.len(),
            required: 2,
        });
    }
    if let Some((i, j)) = find_duplicate(positions) {
        return Err(DroneNetError::DuplicateSite(format!(
            "sites {} and {} share position ({}, {})",
            i, j, positions[i].x, positions[i].y
        )));
    }

    let cells = if is_degenerate(positions) {
        tracing::debug!(
            sites = positions.len(),
            "sites cannot be triangulated, cutting cells by bisectors"
        );
        generate_bisector_cells(positions, window)
    } else {
        let mesh = TriangleMesh::build(positions, *window)?;
        generate_cells(&mesh)
    };

    let graph = SiteGraph::build(positions, &cells);
    let routing = RoutingTable::compute(&graph);

    Ok(Topology {
        cells,
        graph,
        routing,
    })
}

fn find_duplicate(positions: &[DVec2]) -> Option<(usize, usize)> {
    (0..positions.len()).find_map(|i| {
        (i + 1..positions.len())
            .find(|&j| positions[i] == positions[j])
            .map(|j| (i, j))
    })
}

/// True when the positions span no triangle at all
fn is_degenerate(positions: &[DVec2]) -> bool {
    if positions.len() < 3 {
        return true;
    }
    let a = positions[0];
    let Some(&b) = positions.iter().find(|&&p| p != a) else {
        return true;
    };
    positions.iter().all(|&c| orient2d(a, b, c) == 0.0)
}
