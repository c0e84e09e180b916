//! Full simulation run over a random scene
//!
//! Run with `RUST_LOG=dronenet=debug` to see topology and docking logs.

use dronenet::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SITE_COUNT: usize = 16;
const DRONE_COUNT: usize = 6;
const TICK: f64 = 0.02;
const MAX_TICKS: usize = 200_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            "simulate=info".parse().map_err(|e| DroneNetError::InvalidConfig(format!("{}", e)))?,
        ))
        .init();

    // Step 1: Build a scene
    let window = Rect::new(DVec2::ZERO, DVec2::new(800.0, 600.0));
    let positions = random_sites(SITE_COUNT, &window, 12345);
    let sites: Vec<SiteSpec> = positions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let hue = i as f32 / positions.len() as f32;
            SiteSpec::new(
                format!("server-{}", i),
                p,
                SiteColor([hue, 0.6, 1.0 - hue, 1.0]),
            )
        })
        .collect();

    let last = sites.len() - 1;
    let drones: Vec<DroneSpec> = (0..DRONE_COUNT.min(sites.len()))
        .map(|i| {
            DroneSpec::new(
                format!("drone-{}", i),
                sites[i].position,
                sites[last - i].name.clone(),
            )
        })
        .collect();

    let scene = Scene {
        window,
        sites,
        drones,
    };

    // Step 2: Build the network
    let kinematics = KinematicsConfigBuilder::new()
        .max_speed(80.0)
        .approach_speed(60.0)
        .build()?;
    let config = NetworkConfigBuilder::new()
        .kinematics(kinematics)
        .outside_policy(OutsideCellPolicy::SnapToNearestSite)
        .build();
    let mut network = DroneNetwork::from_scene(&scene, config)?;

    info!(
        sites = network.site_count(),
        links = network.links().len(),
        "network ready"
    );
    for site in network.sites() {
        info!(
            site = %site.name,
            links = site.link_count(),
            area = site.cell.area(),
            "cell"
        );
    }

    // Step 3: Show planned routes
    for drone in network.drones() {
        let (Some(from), Some(to)) = (drone.connected_to, drone.target) else {
            continue;
        };
        match (network.path(from, to), network.best_route(from, to)) {
            (Some(path), Some(route)) => {
                info!(drone = %drone.name, ?path, distance = route.distance, "planned route")
            }
            _ => info!(drone = %drone.name, "target unreachable"),
        }
    }

    // Step 4: Fly
    let mut ticks = 0;
    while !network.all_docked() && ticks < MAX_TICKS {
        network.advance(TICK);
        ticks += 1;
        if ticks % 500 == 0 {
            let docked = network
                .drone_states()
                .iter()
                .filter(|s| **s == DroneState::Docked)
                .count();
            info!(elapsed = network.elapsed(), docked, "progress");
        }
    }

    info!(
        ticks,
        elapsed = network.elapsed(),
        all_docked = network.all_docked(),
        "simulation finished"
    );

    // Step 5: Render data
    let mesh = generate_mesh(&network);
    let segments = link_segments(&network);
    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        segments = segments.len(),
        "render data"
    );

    Ok(())
}
