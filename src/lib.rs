//! Voronoi-partitioned drone network simulation
//!
//! Sites split a rectangular window into Voronoi cells. Cells that share an
//! edge are linked, an all-pairs routing table is computed over the links,
//! and drones fly from cell to cell, crossing each shared edge at its
//! midpoint, until they dock at their target site.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dronenet::*;
//!
//! let window = Rect::new(DVec2::ZERO, DVec2::new(800.0, 600.0));
//! let sites = random_sites(12, &window, 42)
//!     .into_iter()
//!     .enumerate()
//!     .map(|(i, p)| SiteSpec::new(format!("s{}", i), p, SiteColor::GRAY))
//!     .collect::<Vec<_>>();
//! let drones = vec![DroneSpec::new("d0", sites[0].position, "s11")];
//!
//! let scene = Scene { window, sites, drones };
//! let mut network = DroneNetwork::from_scene(&scene, NetworkConfig::default()).unwrap();
//!
//! while !network.all_docked() {
//!     network.advance(0.02);
//! }
//! println!("docked after {:.1}s", network.elapsed());
//!
//! // Geometry for rendering
//! let mesh = generate_mesh(&network);
//! println!("{} cell triangles", mesh.triangle_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): KD-tree nearest-site lookups for drones that start outside every cell
//! - `serde`: Serialization for configuration, topology and scene descriptions

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod cell;
pub mod site;
pub mod graph;
pub mod routing;
pub mod drone;
pub mod scene;
pub mod generation;
pub mod network;
pub mod mesh;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{DroneNetError, Result};
pub use config::{
    KinematicsConfig, KinematicsConfigBuilder, NetworkConfig, NetworkConfigBuilder,
    OutsideCellPolicy,
};
pub use geometry::{Polygon, Rect};
pub use cell::Cell;
pub use site::Site;
pub use graph::{Link, LinkId, SiteGraph};
pub use routing::{Route, RoutingTable, UNREACHABLE};
pub use drone::{heading_degrees, Drone, DroneEvent, DroneState, NavigationContext};
pub use scene::{
    DroneDescription, DroneSpec, Scene, SceneDescription, SiteDescription, SiteSpec,
    WindowDescription,
};
pub use generation::{build_topology, random_sites, Topology};
pub use network::DroneNetwork;
pub use mesh::{generate_mesh, link_segments, MeshData, SiteColor};

#[cfg(feature = "spatial-index")]
pub use spatial::SiteIndex;

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
