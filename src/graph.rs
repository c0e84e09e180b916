//! Site adjacency graph
//!
//! Two sites are linked when their cells share a boundary edge. The link is
//! anchored at the midpoint of that edge and costs the distance from each
//! site to the midpoint.

use glam::DVec2;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::geometry::POINT_EPSILON;

/// Index of a link in [`SiteGraph::links`]
pub type LinkId = usize;

/// Graph edge between two sites whose cells touch
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    /// Lower site ID
    pub a: usize,
    /// Higher site ID
    pub b: usize,
    /// The shared cell edge
    pub edge: (DVec2, DVec2),
    /// Midpoint of the shared edge, the waypoint drones cross
    pub midpoint: DVec2,
    /// `|a - midpoint| + |b - midpoint|`
    pub distance: f64,
}

impl Link {
    /// Create a link between the sites at `pos_a` and `pos_b` through `edge`
    pub fn new(id: LinkId, a: usize, pos_a: DVec2, b: usize, pos_b: DVec2, edge: (DVec2, DVec2)) -> Self {
        let midpoint = 0.5 * (edge.0 + edge.1);
        let distance = pos_a.distance(midpoint) + pos_b.distance(midpoint);
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        Self {
            id,
            a,
            b,
            edge,
            midpoint,
            distance,
        }
    }

    /// The endpoint opposite to `site`, or `None` if `site` is not an endpoint
    #[inline]
    pub fn other(&self, site: usize) -> Option<usize> {
        if site == self.a {
            Some(self.b)
        } else if site == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    #[inline]
    pub fn connects(&self, x: usize, y: usize) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// Owns every link and the per-site incidence lists
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteGraph {
    links: Vec<Link>,
    incidence: Vec<Vec<LinkId>>,
}

impl SiteGraph {
    /// Link every pair of sites whose cells share an edge
    ///
    /// Compares all edge pairs of all site pairs, which is fine for the tens
    /// of sites a scene holds. At most one link is created per pair.
    pub fn build(positions: &[DVec2], cells: &[Cell]) -> Self {
        let n = positions.len().min(cells.len());
        let mut graph = Self {
            links: Vec::new(),
            incidence: vec![Vec::new(); positions.len()],
        };

        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(edge) = cells[i].shared_edge(&cells[j], POINT_EPSILON) {
                    graph.add_link(i, positions[i], j, positions[j], edge);
                }
            }
        }

        tracing::debug!(
            sites = positions.len(),
            links = graph.links.len(),
            "site graph built"
        );
        graph
    }

    fn add_link(&mut self, a: usize, pos_a: DVec2, b: usize, pos_b: DVec2, edge: (DVec2, DVec2)) {
        let id = self.links.len();
        let link = Link::new(id, a, pos_a, b, pos_b, edge);
        tracing::trace!(a, b, distance = link.distance, "link created");
        self.links.push(link);
        self.incidence[a].push(id);
        self.incidence[b].push(id);
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.incidence.len()
    }

    #[inline]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[inline]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    /// IDs of the links touching `site`; empty for an unknown site
    pub fn links_of(&self, site: usize) -> &[LinkId] {
        self.incidence
            .get(site)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Neighbouring sites of `site` with the link reaching each
    pub fn neighbors(&self, site: usize) -> impl Iterator<Item = (usize, &Link)> + '_ {
        self.links_of(site).iter().filter_map(move |&id| {
            let link = &self.links[id];
            link.other(site).map(|other| (other, link))
        })
    }

    /// The link joining two sites, if their cells touch
    pub fn link_between(&self, x: usize, y: usize) -> Option<&Link> {
        self.links_of(x)
            .iter()
            .map(|&id| &self.links[id])
            .find(|link| link.connects(x, y))
    }

    /// Sites reachable from `center` in at most `hops` links (BFS)
    ///
    /// Includes `center` itself. Returns an empty vec for an unknown site.
    pub fn sites_within_hops(&self, center: usize, hops: usize) -> Vec<usize> {
        if center >= self.site_count() {
            return vec![];
        }

        let mut visited = HashSet::new();
        let mut current = vec![center];
        visited.insert(center);

        for _ in 0..hops {
            let mut next = Vec::new();
            for &site in &current {
                for (neighbor, _) in self.neighbors(site) {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            current = next;
        }

        let mut sites: Vec<usize> = visited.into_iter().collect();
        sites.sort_unstable();
        sites
    }
}
