//! Voronoi cell construction from the triangle mesh
//!
//! Each site's cell is traced by walking the fan of triangles around it and
//! emitting their circumcenters. Cells of hull sites are unbounded: their two
//! boundary rays are projected onto an enclosing box and the box corners
//! between them close the ring before it is clipped to the window.

use glam::DVec2;

use crate::cell::Cell;
use crate::geometry::{Polygon, Rect, POINT_EPSILON};

use super::delaunay::TriangleMesh;

/// Trace the cell of every mesh vertex, indexed like the mesh points
pub fn generate_cells(mesh: &TriangleMesh) -> Vec<Cell> {
    let bounds = enclosing_box(mesh);

    (0..mesh.points().len())
        .map(|site| {
            let polygon = trace_cell(mesh, site, &bounds);
            tracing::trace!(site, vertices = polygon.len(), "cell traced");
            Cell::new(site, polygon)
        })
        .collect()
}

/// Cells for scenes that cannot be triangulated (two sites, collinear sites)
///
/// Each cell is the window cut by the perpendicular bisector against every
/// other site, which is exact but quadratic in the site count.
pub fn generate_bisector_cells(points: &[DVec2], window: &Rect) -> Vec<Cell> {
    let frame = Polygon::new(window.corners().to_vec());

    points
        .iter()
        .enumerate()
        .map(|(i, &site)| {
            let mut polygon = frame.clone();
            for (j, &other) in points.iter().enumerate() {
                if i == j || polygon.is_empty() {
                    continue;
                }
                let midpoint = 0.5 * (site + other);
                polygon = polygon.clip_half_plane(midpoint, other - site);
            }
            polygon.dedup(POINT_EPSILON);
            Cell::new(i, polygon)
        })
        .collect()
}

/// Window grown to contain every circumcenter, with some margin
///
/// Boundary rays start strictly inside this box, so their projection onto it
/// never needs the clamp in [`Rect::project_ray`].
fn enclosing_box(mesh: &TriangleMesh) -> Rect {
    let mut bounds = *mesh.window();
    for t in mesh.triangles() {
        bounds.include(t.circumcenter);
    }
    bounds.inflated(0.1 * bounds.diagonal() + 1.0)
}

fn trace_cell(mesh: &TriangleMesh, site: usize, bounds: &Rect) -> Polygon {
    let fan = mesh.fan(site);
    if fan.triangles.is_empty() {
        return Polygon::default();
    }

    let mut ring = Polygon::default();

    let mut entry = None;
    if fan.open {
        let first = fan.triangles[0];
        entry = mesh
            .edge_normal_after(first, site)
            .and_then(|normal| bounds.project_ray(mesh.triangle(first).circumcenter, normal));
        if let Some(point) = entry {
            ring.push(point);
        }
    }

    for &tri in &fan.triangles {
        ring.push(mesh.triangle(tri).circumcenter);
    }

    if fan.open {
        let last = fan.triangles[fan.triangles.len() - 1];
        let exit = mesh
            .edge_normal_before(last, site)
            .and_then(|normal| bounds.project_ray(mesh.triangle(last).circumcenter, normal));
        if let Some(point) = exit {
            ring.push(point);
            if let Some(entry) = entry {
                for corner in bounds.corners_between(point, entry) {
                    ring.push(corner);
                }
            }
        }
    }

    ring.dedup(POINT_EPSILON);
    ring.clip_to_rect(mesh.window())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::new(DVec2::ZERO, DVec2::new(100.0, 100.0))
    }

    fn total_area(cells: &[Cell]) -> f64 {
        cells.iter().map(|c| c.polygon.area()).sum()
    }

    #[test]
    fn test_three_sites_tile_window() {
        let points = vec![
            DVec2::new(20.0, 20.0),
            DVec2::new(80.0, 30.0),
            DVec2::new(40.0, 80.0),
        ];
        let mesh = TriangleMesh::build(&points, window()).unwrap();
        let cells = generate_cells(&mesh);

        assert_eq!(cells.len(), 3);
        assert!((total_area(&cells) - window().area()).abs() < 1e-6);
        for (i, cell) in cells.iter().enumerate() {
            assert!(cell.vertex_count() >= 3);
            assert!(cell.contains(points[i]));
            assert!(cell.polygon.signed_area() > 0.0);
        }
    }

    #[test]
    fn test_interior_site_has_bounded_cell() {
        let points = vec![
            DVec2::new(50.0, 10.0),
            DVec2::new(90.0, 50.0),
            DVec2::new(50.0, 90.0),
            DVec2::new(10.0, 50.0),
            DVec2::new(52.0, 49.0),
        ];
        let mesh = TriangleMesh::build(&points, window()).unwrap();
        let cells = generate_cells(&mesh);

        // the inner cell is exactly the ring of the four circumcenters
        assert_eq!(cells[4].vertex_count(), 4);
        for t in mesh.triangles() {
            assert!(cells[4]
                .polygon
                .vertices()
                .iter()
                .any(|v| v.distance(t.circumcenter) < 1e-9));
        }
        assert!((total_area(&cells) - window().area()).abs() < 1e-6);
    }

    #[test]
    fn test_cells_hold_nearest_points() {
        let points = vec![
            DVec2::new(15.0, 15.0),
            DVec2::new(85.0, 20.0),
            DVec2::new(50.0, 55.0),
            DVec2::new(20.0, 85.0),
            DVec2::new(80.0, 90.0),
        ];
        let mesh = TriangleMesh::build(&points, window()).unwrap();
        let cells = generate_cells(&mesh);

        for x in (5..100).step_by(10) {
            for y in (5..100).step_by(10) {
                let p = DVec2::new(x as f64 + 0.37, y as f64 + 0.61);
                let nearest = (0..points.len())
                    .min_by(|&a, &b| p.distance(points[a]).total_cmp(&p.distance(points[b])))
                    .unwrap();
                let owners: Vec<usize> = (0..cells.len()).filter(|&i| cells[i].contains(p)).collect();
                assert_eq!(owners, vec![nearest], "point {:?}", p);
            }
        }
    }

    #[test]
    fn test_bisector_cells_two_sites() {
        let points = vec![DVec2::new(0.0, 0.0), DVec2::new(100.0, 0.0)];
        let cells = generate_bisector_cells(&points, &window());

        assert_eq!(cells.len(), 2);
        assert!((cells[0].polygon.area() - 5000.0).abs() < 1e-9);
        assert!((cells[1].polygon.area() - 5000.0).abs() < 1e-9);
        assert!(cells[0].polygon.vertices().iter().all(|v| v.x <= 50.0));
    }

    #[test]
    fn test_bisector_cells_collinear() {
        let points = vec![
            DVec2::new(10.0, 50.0),
            DVec2::new(50.0, 50.0),
            DVec2::new(90.0, 50.0),
        ];
        let cells = generate_bisector_cells(&points, &window());
        assert!((cells[1].polygon.area() - 4000.0).abs() < 1e-9);
        assert!((total_area(&cells) - window().area()).abs() < 1e-9);
    }
}
