//! Seeded random site placement
//!
//! Produces reproducible site layouts inside a window, mostly for demos and
//! tests. Candidates closer than a minimum spacing to an accepted site are
//! rejected so the mesh never sees near-duplicate points.

use glam::DVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::Rect;

/// Rejection attempts per requested site before giving up on spacing
const ATTEMPTS_PER_SITE: usize = 64;

/// Generate `count` site positions inside `window`
///
/// The same seed always yields the same positions. Sites keep a spacing of
/// roughly half the mean cell width; if the window is too crowded to honour
/// it, fewer sites are returned.
pub fn random_sites(count: usize, window: &Rect, seed: u64) -> Vec<DVec2> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spacing = 0.5 * (window.area() / count.max(1) as f64).sqrt();
    let margin = 0.02 * window.size.min_element();

    let mut sites: Vec<DVec2> = Vec::with_capacity(count);
    let mut attempts = 0;
    while sites.len() < count && attempts < count * ATTEMPTS_PER_SITE {
        attempts += 1;
        let candidate = DVec2::new(
            rng.gen_range(window.x_min() + margin..window.x_max() - margin),
            rng.gen_range(window.y_min() + margin..window.y_max() - margin),
        );
        if sites.iter().all(|s| s.distance(candidate) >= spacing) {
            sites.push(candidate);
        }
    }

    if sites.len() < count {
        tracing::warn!(
            requested = count,
            placed = sites.len(),
            "window too crowded for requested site count"
        );
    }
    sites
}
