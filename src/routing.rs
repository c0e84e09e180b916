//! All-pairs shortest paths with first-hop routing
//!
//! Dijkstra runs once per source site. For every destination the table keeps
//! the shortest distance and the link to take first when leaving the source.
//! The table is rebuilt from scratch whenever the graph changes.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Write;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::{LinkId, SiteGraph};

/// Value used for unreachable destinations in [`RoutingTable::distance_matrix`]
pub const UNREACHABLE: f64 = -1.0;

/// Best known way from one site to another
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    /// Link to leave the source through; `None` for the source itself and
    /// for unreachable destinations
    pub first_hop: Option<LinkId>,
    /// Total cost, `f64::INFINITY` when unreachable
    pub distance: f64,
}

impl Route {
    const SELF: Route = Route {
        first_hop: None,
        distance: 0.0,
    };

    const UNREACHABLE: Route = Route {
        first_hop: None,
        distance: f64::INFINITY,
    };

    #[inline]
    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

/// Queue entry ordered so that `BinaryHeap` pops the smallest distance
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    site: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.site.cmp(&self.site))
    }
}

/// Shortest distance and first hop for every (source, destination) pair
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingTable {
    rows: Vec<Vec<Route>>,
}

impl RoutingTable {
    /// Run Dijkstra from every site of `graph`
    pub fn compute(graph: &SiteGraph) -> Self {
        let n = graph.site_count();
        let rows = (0..n).map(|source| shortest_routes(graph, source)).collect();
        let table = Self { rows };

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!("distance table\n{}", table.render());
        }
        table
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.rows.len()
    }

    /// Route from `from` to `to`, `None` if either site is unknown
    pub fn best(&self, from: usize, to: usize) -> Option<&Route> {
        self.rows.get(from)?.get(to)
    }

    /// Every route leaving `from`, indexed by destination
    pub fn row(&self, from: usize) -> Option<&[Route]> {
        self.rows.get(from).map(Vec::as_slice)
    }

    /// Distances as a square matrix, [`UNREACHABLE`] where there is no path
    pub fn distance_matrix(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|r| if r.is_reachable() { r.distance } else { UNREACHABLE })
                    .collect()
            })
            .collect()
    }

    /// Sites visited when following first hops from `from` to `to`
    ///
    /// Both endpoints included. `None` when `to` is unreachable or the hops
    /// do not lead there.
    pub fn path(&self, graph: &SiteGraph, from: usize, to: usize) -> Option<Vec<usize>> {
        if !self.best(from, to)?.is_reachable() {
            return None;
        }

        let mut path = vec![from];
        let mut current = from;
        while current != to {
            if path.len() > self.rows.len() {
                return None;
            }
            let hop = self.best(current, to)?.first_hop?;
            current = graph.link(hop)?.other(current)?;
            path.push(current);
        }
        Some(path)
    }

    /// Fixed-width text rendering of the distance table
    pub fn render(&self) -> String {
        let n = self.rows.len();
        let mut out = String::from("From/To |");
        for j in 0..n {
            let _ = write!(out, " {:>6} |", j);
        }
        out.push('\n');
        out.push_str("--------|");
        for _ in 0..n {
            out.push_str("--------|");
        }

        for (i, row) in self.rows.iter().enumerate() {
            let _ = write!(out, "\n{:>2}      |", i);
            for route in row {
                if route.is_reachable() {
                    let _ = write!(out, " {:>6.1} |", route.distance);
                } else {
                    let _ = write!(out, " {:>6} |", "INF");
                }
            }
        }
        out
    }
}

fn shortest_routes(graph: &SiteGraph, source: usize) -> Vec<Route> {
    let n = graph.site_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut prev_link: Vec<Option<LinkId>> = vec![None; n];
    let mut queue = BinaryHeap::new();

    dist[source] = 0.0;
    queue.push(Candidate {
        distance: 0.0,
        site: source,
    });

    while let Some(Candidate { distance, site }) = queue.pop() {
        // stale entry
        if distance != dist[site] {
            continue;
        }

        for (neighbor, link) in graph.neighbors(site) {
            let candidate = distance + link.distance;
            if candidate < dist[neighbor] {
                dist[neighbor] = candidate;
                prev[neighbor] = Some(site);
                prev_link[neighbor] = Some(link.id);
                queue.push(Candidate {
                    distance: candidate,
                    site: neighbor,
                });
            }
        }
    }

    (0..n)
        .map(|dest| {
            if dest == source {
                return Route::SELF;
            }
            if !dist[dest].is_finite() {
                return Route::UNREACHABLE;
            }

            // walk back until the predecessor is the source
            let mut current = dest;
            while let Some(p) = prev[current] {
                if p == source {
                    break;
                }
                current = p;
            }

            let first_hop = if prev[current] == Some(source) {
                prev_link[current]
            } else {
                None
            };
            Route {
                first_hop,
                distance: dist[dest],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::geometry::Polygon;
    use glam::DVec2;

    fn square_cell(site: usize, x: f64, y: f64) -> Cell {
        Cell::new(
            site,
            Polygon::new(vec![
                DVec2::new(x, y),
                DVec2::new(x + 1.0, y),
                DVec2::new(x + 1.0, y + 1.0),
                DVec2::new(x, y + 1.0),
            ]),
        )
    }

    /// 2x2 grid of unit squares plus one detached square far away
    fn grid_with_island() -> SiteGraph {
        let cells = vec![
            square_cell(0, 0.0, 0.0),
            square_cell(1, 1.0, 0.0),
            square_cell(2, 0.0, 1.0),
            square_cell(3, 1.0, 1.0),
            square_cell(4, 10.0, 10.0),
        ];
        let positions: Vec<DVec2> = cells
            .iter()
            .map(|c| c.polygon.centroid().unwrap())
            .collect();
        SiteGraph::build(&positions, &cells)
    }

    #[test]
    fn test_self_routes() {
        let graph = grid_with_island();
        let table = RoutingTable::compute(&graph);
        for s in 0..5 {
            let route = table.best(s, s).unwrap();
            assert_eq!(route.first_hop, None);
            assert_eq!(route.distance, 0.0);
        }
    }

    #[test]
    fn test_grid_distances() {
        let graph = grid_with_island();
        let table = RoutingTable::compute(&graph);

        assert_eq!(graph.link_count(), 4);
        assert!((table.best(0, 1).unwrap().distance - 1.0).abs() < 1e-12);
        // diagonal squares only touch at a corner: two hops
        assert!((table.best(0, 3).unwrap().distance - 2.0).abs() < 1e-12);

        let hop = table.best(0, 3).unwrap().first_hop.unwrap();
        let first = graph.link(hop).unwrap().other(0).unwrap();
        assert!(first == 1 || first == 2);
    }

    #[test]
    fn test_unreachable_island() {
        let graph = grid_with_island();
        let table = RoutingTable::compute(&graph);

        let route = table.best(0, 4).unwrap();
        assert!(!route.is_reachable());
        assert_eq!(route.first_hop, None);

        let matrix = table.distance_matrix();
        assert_eq!(matrix[0][4], UNREACHABLE);
        assert_eq!(matrix[4][0], UNREACHABLE);
        assert_eq!(matrix[4][4], 0.0);
        assert!(table.path(&graph, 0, 4).is_none());
    }

    #[test]
    fn test_path_follows_first_hops() {
        let graph = grid_with_island();
        let table = RoutingTable::compute(&graph);

        let path = table.path(&graph, 0, 3).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], 0);
        assert_eq!(path[2], 3);

        let cost: f64 = path
            .windows(2)
            .map(|w| graph.link_between(w[0], w[1]).unwrap().distance)
            .sum();
        assert!((cost - table.best(0, 3).unwrap().distance).abs() < 1e-12);
        assert_eq!(table.path(&graph, 2, 2), Some(vec![2]));
    }

    #[test]
    fn test_unknown_sites() {
        let table = RoutingTable::compute(&grid_with_island());
        assert!(table.best(0, 9).is_none());
        assert!(table.best(9, 0).is_none());
        assert!(table.row(9).is_none());
        assert_eq!(table.row(0).unwrap().len(), 5);
    }

    #[test]
    fn test_render() {
        let table = RoutingTable::compute(&grid_with_island());
        let text = table.render();
        assert!(text.starts_with("From/To |"));
        assert!(text.contains("INF"));
        assert_eq!(text.lines().count(), 2 + 5);
    }

    #[test]
    fn test_candidate_ordering() {
        let mut heap = BinaryHeap::new();
        heap.push(Candidate { distance: 3.0, site: 0 });
        heap.push(Candidate { distance: 1.0, site: 1 });
        heap.push(Candidate { distance: 2.0, site: 2 });
        assert_eq!(heap.pop().unwrap().site, 1);
        assert_eq!(heap.pop().unwrap().site, 2);
    }
}
