//! Drone kinematics and waypoint sequencing
//!
//! A drone flies from waypoint to waypoint: from the site it is attached to,
//! to the midpoint of the first link of the shortest route, then into the
//! neighbouring cell's site, until it docks at its target site.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::KinematicsConfig;
use crate::graph::{LinkId, SiteGraph};
use crate::routing::RoutingTable;
use crate::site::Site;

/// Speeds below this are treated as standing still
const SPEED_EPSILON: f64 = 1e-9;

/// Read-only view of the topology a drone navigates
#[derive(Debug, Clone, Copy)]
pub struct NavigationContext<'a> {
    pub sites: &'a [Site],
    pub graph: &'a SiteGraph,
    pub routing: &'a RoutingTable,
}

/// Discrete change in a drone's mission during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DroneEvent {
    /// Left the current site toward the midpoint of `link`
    HopStarted { site: usize, link: LinkId },
    /// Crossed a link midpoint into the cell of `to`
    CellCrossed { from: usize, to: usize },
    /// At the current site with no route to the target
    Stranded { site: usize },
    /// At a midpoint that belongs to no link of the current site
    Returning { site: usize },
    /// Arrived at the target site
    Docked { site: usize },
}

/// Phase of a drone's mission, derived from its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DroneState {
    /// No target or not attached to any cell; never moves
    Idle,
    /// Flying toward the current waypoint
    Cruising,
    /// Resting on the target site
    Docked,
}

/// A drone flying across the cells toward a target site
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Drone {
    pub name: String,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Heading in degrees, derived from the velocity for display
    pub azimuth: f64,
    /// Destination site of the mission
    pub target: Option<usize>,
    /// Site whose cell the drone is currently in
    pub connected_to: Option<usize>,
    /// Current waypoint: a link midpoint or a site position
    pub destination: DVec2,
    pub kinematics: KinematicsConfig,
}

impl Drone {
    /// Create a drone at rest, not yet attached to any cell
    pub fn new(
        name: impl Into<String>,
        position: DVec2,
        target: Option<usize>,
        kinematics: KinematicsConfig,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            velocity: DVec2::ZERO,
            azimuth: 0.0,
            target,
            connected_to: None,
            destination: position,
            kinematics,
        }
    }

    /// Attach to the cell of `site` and head for its position
    ///
    /// `None` detaches the drone and parks it where it is.
    pub fn attach(&mut self, site: Option<&Site>) {
        match site {
            Some(site) => {
                self.connected_to = Some(site.id);
                self.destination = site.position;
            }
            None => {
                self.connected_to = None;
                self.destination = self.position;
            }
        }
        self.velocity = DVec2::ZERO;
    }

    /// Current mission phase for a topology with the given sites
    pub fn state(&self, sites: &[Site]) -> DroneState {
        let (Some(target), Some(current)) = (self.target, self.connected_to) else {
            return DroneState::Idle;
        };
        match sites.get(target) {
            Some(site)
                if current == target
                    && self.position == site.position
                    && self.velocity == DVec2::ZERO =>
            {
                DroneState::Docked
            }
            Some(_) => DroneState::Cruising,
            None => DroneState::Idle,
        }
    }

    #[inline]
    fn near(&self, a: DVec2, b: DVec2) -> bool {
        a.distance(b) <= self.kinematics.arrival_tolerance
    }

    /// Advance the drone by `dt` seconds
    ///
    /// Waypoint transitions are decided first, then the velocity is updated and
    /// integrated. Drones without a target or outside every cell do nothing.
    pub fn step(&mut self, dt: f64, nav: &NavigationContext<'_>) -> Option<DroneEvent> {
        let (Some(target), Some(current)) = (self.target, self.connected_to) else {
            return None;
        };
        let target_pos = nav.sites.get(target)?.position;
        let current_pos = nav.sites.get(current)?.position;

        if current == target && self.near(self.position, target_pos) {
            let arriving = self.position != target_pos || self.velocity != DVec2::ZERO;
            self.position = target_pos;
            self.destination = target_pos;
            self.velocity = DVec2::ZERO;
            return arriving.then_some(DroneEvent::Docked { site: target });
        }

        let mut event = None;
        if self.near(self.position, self.destination) {
            self.position = self.destination;
            self.velocity = DVec2::ZERO;
            event = Some(self.next_waypoint(current, current_pos, target, nav));
        }

        self.integrate(dt);
        event
    }

    /// Pick the waypoint after the one just reached
    fn next_waypoint(
        &mut self,
        current: usize,
        current_pos: DVec2,
        target: usize,
        nav: &NavigationContext<'_>,
    ) -> DroneEvent {
        if self.near(self.position, current_pos) {
            let hop = nav
                .routing
                .best(current, target)
                .and_then(|route| route.first_hop)
                .and_then(|id| nav.graph.link(id));
            return match hop {
                Some(link) => {
                    self.destination = link.midpoint;
                    DroneEvent::HopStarted {
                        site: current,
                        link: link.id,
                    }
                }
                None => {
                    self.destination = current_pos;
                    DroneEvent::Stranded { site: current }
                }
            };
        }

        let crossing = nav
            .graph
            .links_of(current)
            .iter()
            .filter_map(|&id| nav.graph.link(id))
            .find(|link| self.near(self.position, link.midpoint))
            .and_then(|link| link.other(current))
            .and_then(|other| nav.sites.get(other));

        match crossing {
            Some(next) => {
                self.connected_to = Some(next.id);
                self.destination = next.position;
                DroneEvent::CellCrossed {
                    from: current,
                    to: next.id,
                }
            }
            None => {
                self.destination = current_pos;
                DroneEvent::Returning { site: current }
            }
        }
    }

    /// Update velocity toward the destination and move
    fn integrate(&mut self, dt: f64) {
        let k = self.kinematics;
        let dir = self.destination - self.position;
        let d = dir.length();

        if d < k.slow_down_radius {
            self.velocity = if d > 0.0 {
                dir * (k.approach_speed / k.slow_down_radius)
            } else {
                DVec2::ZERO
            };
        } else {
            self.velocity += dir * (k.acceleration * dt / d);
        }
        self.velocity = self.velocity.clamp_length_max(k.max_speed);

        // never fly past the waypoint within one tick
        let speed = self.velocity.length();
        if dt > 0.0 && speed * dt > d {
            self.velocity = dir / dt;
        }

        self.position += self.velocity * dt;

        if let Some(azimuth) = heading_degrees(self.velocity) {
            self.azimuth = azimuth;
        }
    }
}

/// Display heading of a velocity vector, in degrees
///
/// Matches the screen convention of the renderer (y axis down): +y maps to
/// 180 minus the angle, -y to minus the angle, and a purely horizontal
/// velocity to -90 (toward +x) or 90. `None` when the drone is not moving.
pub fn heading_degrees(velocity: DVec2) -> Option<f64> {
    let speed = velocity.length();
    if speed < SPEED_EPSILON {
        return None;
    }
    let v = velocity / speed;

    let azimuth = if v.y == 0.0 {
        if v.x > 0.0 {
            -90.0
        } else {
            90.0
        }
    } else if v.y > 0.0 {
        180.0 - (v.x / v.y).atan().to_degrees()
    } else {
        -(v.x / v.y).atan().to_degrees()
    };
    Some(azimuth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::geometry::Polygon;
    use crate::mesh::SiteColor;

    /// Two unit-ish square cells side by side: site 0 at (5,5), site 1 at (15,5)
    fn two_cells() -> (Vec<Site>, SiteGraph, RoutingTable) {
        let mut sites = vec![
            Site::new(0, "west", DVec2::new(5.0, 5.0), SiteColor::GRAY),
            Site::new(1, "east", DVec2::new(15.0, 5.0), SiteColor::GRAY),
        ];
        for (i, x) in [(0usize, 0.0), (1, 10.0)] {
            sites[i].cell = Cell::new(
                i,
                Polygon::new(vec![
                    DVec2::new(x, 0.0),
                    DVec2::new(x + 10.0, 0.0),
                    DVec2::new(x + 10.0, 10.0),
                    DVec2::new(x, 10.0),
                ]),
            );
        }
        let positions: Vec<DVec2> = sites.iter().map(|s| s.position).collect();
        let cells: Vec<Cell> = sites.iter().map(|s| s.cell.clone()).collect();
        let graph = SiteGraph::build(&positions, &cells);
        let routing = RoutingTable::compute(&graph);
        for site in &mut sites {
            site.links = graph.links_of(site.id).to_vec();
        }
        (sites, graph, routing)
    }

    fn kinematics() -> KinematicsConfig {
        KinematicsConfig {
            max_speed: 10.0,
            approach_speed: 8.0,
            acceleration: 20.0,
            slow_down_radius: 3.0,
            arrival_tolerance: 0.05,
        }
    }

    #[test]
    fn test_heading_degrees() {
        assert_eq!(heading_degrees(DVec2::new(1.0, 0.0)), Some(-90.0));
        assert_eq!(heading_degrees(DVec2::new(-1.0, 0.0)), Some(90.0));
        assert_eq!(heading_degrees(DVec2::new(0.0, 2.0)), Some(180.0));
        assert_eq!(heading_degrees(DVec2::new(0.0, -2.0)), Some(0.0));
        let diag = heading_degrees(DVec2::new(1.0, 1.0)).unwrap();
        assert!((diag - 135.0).abs() < 1e-9);
        let diag = heading_degrees(DVec2::new(1.0, -1.0)).unwrap();
        assert!((diag - 45.0).abs() < 1e-9);
        assert_eq!(heading_degrees(DVec2::ZERO), None);
    }

    #[test]
    fn test_idle_without_target_or_cell() {
        let (sites, graph, routing) = two_cells();
        let nav = NavigationContext { sites: &sites, graph: &graph, routing: &routing };

        let mut drone = Drone::new("d", DVec2::new(2.0, 2.0), None, kinematics());
        drone.attach(Some(&sites[0]));
        assert_eq!(drone.step(0.1, &nav), None);
        assert_eq!(drone.position, DVec2::new(2.0, 2.0));
        assert_eq!(drone.state(&sites), DroneState::Idle);

        let mut drone = Drone::new("d", DVec2::new(2.0, 2.0), Some(1), kinematics());
        assert_eq!(drone.step(0.1, &nav), None);
        assert_eq!(drone.position, DVec2::new(2.0, 2.0));
    }

    #[test]
    fn test_hop_then_cross_then_dock() {
        let (sites, graph, routing) = two_cells();
        let nav = NavigationContext { sites: &sites, graph: &graph, routing: &routing };

        let mut drone = Drone::new("d", sites[0].position, Some(1), kinematics());
        drone.attach(Some(&sites[0]));

        let mut events = Vec::new();
        for _ in 0..2000 {
            if let Some(event) = drone.step(0.02, &nav) {
                events.push(event);
            }
        }

        assert_eq!(
            events,
            vec![
                DroneEvent::HopStarted { site: 0, link: 0 },
                DroneEvent::CellCrossed { from: 0, to: 1 },
                DroneEvent::Docked { site: 1 },
            ]
        );
        assert_eq!(drone.position, sites[1].position);
        assert_eq!(drone.velocity, DVec2::ZERO);
        assert_eq!(drone.connected_to, Some(1));
        assert_eq!(drone.state(&sites), DroneState::Docked);
    }

    #[test]
    fn test_first_waypoint_is_link_midpoint() {
        let (sites, graph, routing) = two_cells();
        let nav = NavigationContext { sites: &sites, graph: &graph, routing: &routing };

        let mut drone = Drone::new("d", sites[0].position, Some(1), kinematics());
        drone.attach(Some(&sites[0]));
        drone.step(0.02, &nav);
        assert_eq!(drone.destination, DVec2::new(10.0, 5.0));
        assert!(drone.position.x > 5.0);
        assert_eq!(drone.azimuth, -90.0);
    }

    #[test]
    fn test_speed_is_capped() {
        let (sites, graph, routing) = two_cells();
        let nav = NavigationContext { sites: &sites, graph: &graph, routing: &routing };

        let mut drone = Drone::new("d", DVec2::new(0.5, 5.0), Some(1), kinematics());
        drone.attach(Some(&sites[0]));
        drone.destination = DVec2::new(200.0, 5.0);
        for _ in 0..100 {
            drone.step(0.05, &nav);
            assert!(drone.velocity.length() <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_stranded_without_route() {
        let (mut sites, _, _) = two_cells();
        // no links at all: the target is unreachable
        let graph = SiteGraph::default();
        let routing = RoutingTable::default();
        for site in &mut sites {
            site.links.clear();
        }
        let nav = NavigationContext { sites: &sites, graph: &graph, routing: &routing };

        let mut drone = Drone::new("d", sites[0].position, Some(1), kinematics());
        drone.attach(Some(&sites[0]));
        for _ in 0..50 {
            let event = drone.step(0.1, &nav);
            assert_eq!(event, Some(DroneEvent::Stranded { site: 0 }));
        }
        assert_eq!(drone.position, sites[0].position);
        assert_eq!(drone.state(&sites), DroneState::Cruising);
    }

    #[test]
    fn test_returns_to_site_from_stray_waypoint() {
        let (sites, graph, routing) = two_cells();
        let nav = NavigationContext { sites: &sites, graph: &graph, routing: &routing };

        let mut drone = Drone::new("d", DVec2::new(3.0, 8.0), Some(1), kinematics());
        drone.connected_to = Some(0);
        drone.destination = DVec2::new(3.0, 8.0);
        assert_eq!(drone.step(0.1, &nav), Some(DroneEvent::Returning { site: 0 }));
        assert_eq!(drone.destination, sites[0].position);
    }

    #[test]
    fn test_docked_drone_stays_put() {
        let (sites, graph, routing) = two_cells();
        let nav = NavigationContext { sites: &sites, graph: &graph, routing: &routing };

        let mut drone = Drone::new("d", DVec2::new(15.01, 5.0), Some(1), kinematics());
        drone.attach(Some(&sites[1]));
        assert_eq!(drone.step(0.1, &nav), Some(DroneEvent::Docked { site: 1 }));
        for _ in 0..10 {
            assert_eq!(drone.step(0.1, &nav), None);
            assert_eq!(drone.position, sites[1].position);
            assert_eq!(drone.velocity, DVec2::ZERO);
        }
    }
}
