//! Sites: the fixed service locations that seed the cells

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::graph::LinkId;
use crate::mesh::SiteColor;

/// A fixed location owning one Voronoi cell
///
/// Sites are stored in an arena indexed by `id`. Links, drones and routes
/// refer to sites by ID only, so a topology rebuild can replace `cell` and
/// `links` without invalidating anything else.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Dense index, assigned in scene order
    pub id: usize,
    pub name: String,
    pub position: DVec2,
    /// Display color, ignored by the core
    pub color: SiteColor,
    /// Region of the window served by this site
    pub cell: Cell,
    /// Links to neighbouring sites
    pub links: Vec<LinkId>,
}

impl Site {
    /// Create a site with no cell and no links yet
    pub fn new(id: usize, name: impl Into<String>, position: DVec2, color: SiteColor) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            color,
            cell: Cell {
                site: id,
                ..Cell::default()
            },
            links: Vec::new(),
        }
    }

    #[inline]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn has_link(&self, link: LinkId) -> bool {
        self.links.contains(&link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_creation() {
        let site = Site::new(2, "alpha", DVec2::new(3.0, 4.0), SiteColor::GRAY);
        assert_eq!(site.id, 2);
        assert_eq!(site.name, "alpha");
        assert_eq!(site.cell.site, 2);
        assert!(site.cell.is_empty());
        assert_eq!(site.link_count(), 0);
        assert!(!site.has_link(0));
    }
}
