//! DroneNetwork main structure

use glam::DVec2;

use crate::cell::Cell;
use crate::config::{NetworkConfig, OutsideCellPolicy};
use crate::drone::{Drone, DroneEvent, DroneState, NavigationContext};
use crate::error::{DroneNetError, Result};
use crate::generation::{build_topology, Topology};
use crate::geometry::Rect;
use crate::graph::{Link, SiteGraph};
use crate::routing::{Route, RoutingTable};
use crate::scene::Scene;
use crate::site::Site;

#[cfg(feature = "spatial-index")]
use crate::spatial::SiteIndex;

/// Sites, their cells and links, the routing table, and the drones flying
/// over them
///
/// The topology (cells, links, routes) is rebuilt as a whole by
/// [`DroneNetwork::rebuild_topology`]; drones only read it. A network whose
/// last rebuild failed is not ready and [`DroneNetwork::advance`] does
/// nothing until a rebuild succeeds.
///
/// # Examples
///
/// ```
/// use dronenet::*;
///
/// let scene = Scene {
///     window: Rect::new(DVec2::ZERO, DVec2::new(100.0, 100.0)),
///     sites: vec![
///         SiteSpec::new("a", DVec2::new(20.0, 20.0), SiteColor::GRAY),
///         SiteSpec::new("b", DVec2::new(80.0, 30.0), SiteColor::GRAY),
///         SiteSpec::new("c", DVec2::new(40.0, 80.0), SiteColor::GRAY),
///     ],
///     drones: vec![DroneSpec::new("d1", DVec2::new(20.0, 20.0), "c")],
/// };
///
/// let mut network = DroneNetwork::from_scene(&scene, NetworkConfig::default()).unwrap();
/// for _ in 0..10_000 {
///     network.advance(0.02);
/// }
/// assert!(network.all_docked());
/// ```
#[derive(Clone)]
pub struct DroneNetwork {
    config: NetworkConfig,
    window: Rect,
    sites: Vec<Site>,
    graph: SiteGraph,
    routing: RoutingTable,
    drones: Vec<Drone>,
    /// Simulated seconds since the network was built
    elapsed: f64,
    ready: bool,

    #[cfg(feature = "spatial-index")]
    site_index: SiteIndex,
}

impl DroneNetwork {
    /// Build a network from a scene
    ///
    /// Validates the scene, runs the full topology pipeline and attaches
    /// every drone to the cell it starts in.
    ///
    /// # Errors
    ///
    /// Everything [`Scene::validate`] reports, plus `TriangulationFailed`.
    /// Nothing is built when an error is returned.
    pub fn from_scene(scene: &Scene, config: NetworkConfig) -> Result<Self> {
        scene.validate()?;

        let sites: Vec<Site> = scene
            .sites
            .iter()
            .enumerate()
            .map(|(id, spec)| Site::new(id, spec.name.clone(), spec.position, spec.color))
            .collect();

        let drones = scene
            .drones
            .iter()
            .map(|spec| {
                let target = scene.site_id(&spec.target).ok_or_else(|| {
                    DroneNetError::UnknownTarget {
                        drone: spec.name.clone(),
                        target: spec.target.clone(),
                    }
                })?;
                Ok(Drone::new(
                    spec.name.clone(),
                    spec.position,
                    Some(target),
                    config.kinematics,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let positions: Vec<DVec2> = sites.iter().map(|s| s.position).collect();
        let mut network = Self {
            config,
            window: scene.window,
            sites,
            graph: SiteGraph::default(),
            routing: RoutingTable::default(),
            drones,
            elapsed: 0.0,
            ready: false,
            #[cfg(feature = "spatial-index")]
            site_index: SiteIndex::new(&positions),
        };

        network.rebuild_topology()?;
        Ok(network)
    }

    /// Recompute cells, links and routes from the current site positions
    ///
    /// Every drone is re-attached to the cell it is in and heads for that
    /// cell's site. On failure the previous topology is kept but the network
    /// is marked not ready.
    pub fn rebuild_topology(&mut self) -> Result<()> {
        let positions: Vec<DVec2> = self.sites.iter().map(|s| s.position).collect();

        let topology = match build_topology(&positions, &self.window) {
            Ok(topology) => topology,
            Err(err) => {
                tracing::warn!(error = %err, "topology rebuild failed");
                self.ready = false;
                return Err(err);
            }
        };
        self.install(topology);

        #[cfg(feature = "spatial-index")]
        {
            self.site_index = SiteIndex::new(&positions);
        }

        for i in 0..self.drones.len() {
            self.attach_drone(i);
        }

        self.ready = true;
        tracing::debug!(
            sites = self.sites.len(),
            links = self.graph.link_count(),
            drones = self.drones.len(),
            "topology ready"
        );
        Ok(())
    }

    fn install(&mut self, topology: Topology) {
        let Topology {
            cells,
            graph,
            routing,
        } = topology;

        for (site, cell) in self.sites.iter_mut().zip(cells) {
            if cell.is_empty() {
                tracing::warn!(site = site.id, name = %site.name, "site has an empty cell");
            }
            site.cell = cell;
            site.links = graph.links_of(site.id).to_vec();
        }
        self.graph = graph;
        self.routing = routing;
    }

    fn attach_drone(&mut self, index: usize) {
        let position = self.drones[index].position;
        let site = self.locate(position).or_else(|| match self.config.outside_policy {
            OutsideCellPolicy::Park => None,
            OutsideCellPolicy::SnapToNearestSite => self.nearest_site(position),
        });

        let drone = &mut self.drones[index];
        drone.attach(site.and_then(|id| self.sites.get(id)));
        match site {
            Some(id) => tracing::debug!(drone = %drone.name, site = id, "drone attached"),
            None => tracing::warn!(drone = %drone.name, ?position, "drone is outside every cell"),
        }
    }

    /// Move a site; the topology must be rebuilt before the next tick
    ///
    /// # Errors
    ///
    /// `SiteNotFound` for an unknown ID, `InvalidScene` for a non-finite
    /// position.
    pub fn set_site_position(&mut self, id: usize, position: DVec2) -> Result<()> {
        if !position.is_finite() {
            return Err(DroneNetError::InvalidScene(format!(
                "site {} moved to a non-finite position",
                id
            )));
        }
        let site = self.sites.get_mut(id).ok_or(DroneNetError::SiteNotFound(id))?;
        site.position = position;
        self.ready = false;
        Ok(())
    }

    /// Advance every drone by `dt` seconds
    ///
    /// Drones are updated one after the other and never interact. Does
    /// nothing while the network is not ready.
    pub fn advance(&mut self, dt: f64) {
        if !self.ready || !(dt.is_finite() && dt >= 0.0) {
            return;
        }
        self.elapsed += dt;

        let nav = NavigationContext {
            sites: &self.sites,
            graph: &self.graph,
            routing: &self.routing,
        };
        for drone in &mut self.drones {
            match drone.step(dt, &nav) {
                Some(DroneEvent::Docked { site }) => {
                    tracing::debug!(drone = %drone.name, site, "drone docked")
                }
                Some(DroneEvent::Stranded { site }) => {
                    tracing::trace!(drone = %drone.name, site, "no route to target")
                }
                Some(event) => tracing::trace!(drone = %drone.name, ?event, "waypoint reached"),
                None => {}
            }
        }
    }

    #[inline]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    #[inline]
    pub fn window(&self) -> &Rect {
        &self.window
    }

    /// True once the topology matches the current sites
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Simulated seconds advanced so far
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    #[inline]
    pub fn site(&self, id: usize) -> Option<&Site> {
        self.sites.get(id)
    }

    /// ID of the site called `name`
    pub fn site_id(&self, name: &str) -> Option<usize> {
        self.sites.iter().position(|s| s.name == name)
    }

    /// Cells in site order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.sites.iter().map(|s| &s.cell)
    }

    #[inline]
    pub fn graph(&self) -> &SiteGraph {
        &self.graph
    }

    #[inline]
    pub fn links(&self) -> &[Link] {
        self.graph.links()
    }

    #[inline]
    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    #[inline]
    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    #[inline]
    pub fn drone(&self, index: usize) -> Option<&Drone> {
        self.drones.get(index)
    }

    /// Shortest route between two sites
    pub fn best_route(&self, from: usize, to: usize) -> Option<&Route> {
        self.routing.best(from, to)
    }

    /// Distance table with -1 for unreachable pairs
    pub fn distance_matrix(&self) -> Vec<Vec<f64>> {
        self.routing.distance_matrix()
    }

    /// Sites along the shortest route, endpoints included
    pub fn path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        self.routing.path(&self.graph, from, to)
    }

    /// Sites within `hops` links of `center`
    pub fn sites_within_hops(&self, center: usize, hops: usize) -> Vec<usize> {
        self.graph.sites_within_hops(center, hops)
    }

    /// Site whose cell polygon contains `point`, scanning in site order
    pub fn locate(&self, point: DVec2) -> Option<usize> {
        self.sites
            .iter()
            .find(|s| s.cell.contains(point))
            .map(|s| s.id)
    }

    /// Site closest to `point`
    #[cfg(feature = "spatial-index")]
    pub fn nearest_site(&self, point: DVec2) -> Option<usize> {
        self.site_index.find_nearest(point)
    }

    /// Site closest to `point`
    #[cfg(not(feature = "spatial-index"))]
    pub fn nearest_site(&self, point: DVec2) -> Option<usize> {
        self.sites
            .iter()
            .min_by(|a, b| {
                a.position
                    .distance_squared(point)
                    .total_cmp(&b.position.distance_squared(point))
            })
            .map(|s| s.id)
    }

    /// Mission phase of each drone
    pub fn drone_states(&self) -> Vec<DroneState> {
        self.drones.iter().map(|d| d.state(&self.sites)).collect()
    }

    /// True when every drone rests on its target site
    pub fn all_docked(&self) -> bool {
        self.drones
            .iter()
            .all(|d| d.state(&self.sites) == DroneState::Docked)
    }
}
