//! Scene input
//!
//! [`Scene`] is the normalized in-memory input of a network: the window, the
//! sites in order, and the drones with their target site names.
//! [`SceneDescription`] mirrors the on-disk layout, where points and sizes are
//! `"x,y"` strings, and converts into a `Scene`.

use glam::DVec2;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DroneNetError, Result};
use crate::geometry::Rect;
use crate::mesh::SiteColor;

/// A site as given by the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSpec {
    pub name: String,
    pub position: DVec2,
    pub color: SiteColor,
}

impl SiteSpec {
    pub fn new(name: impl Into<String>, position: DVec2, color: SiteColor) -> Self {
        Self {
            name: name.into(),
            position,
            color,
        }
    }
}

/// A drone as given by the scene; `target` is a site name
#[derive(Debug, Clone, PartialEq)]
pub struct DroneSpec {
    pub name: String,
    pub position: DVec2,
    pub target: String,
}

impl DroneSpec {
    pub fn new(name: impl Into<String>, position: DVec2, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position,
            target: target.into(),
        }
    }
}

/// Normalized scene: site IDs are the indices into `sites`
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub window: Rect,
    pub sites: Vec<SiteSpec>,
    pub drones: Vec<DroneSpec>,
}

impl Scene {
    /// Check the scene before any topology is built
    ///
    /// # Errors
    ///
    /// - `InvalidScene` for a window without area or a non-finite position
    /// - `NotEnoughSites` for fewer than two sites
    /// - `DuplicateSite` if two sites share a name or a position
    /// - `UnknownTarget` if a drone targets a site name that does not exist
    pub fn validate(&self) -> Result<()> {
        if !self.window.is_valid() {
            return Err(DroneNetError::InvalidScene(format!(
                "window must have a positive size (got {:?})",
                self.window.size
            )));
        }
        if self.sites.len() < 2 {
            return Err(DroneNetError::NotEnoughSites {
                found: self.sites.len(),
                required: 2,
            });
        }

        let mut names = HashSet::new();
        for (i, site) in self.sites.iter().enumerate() {
            if !site.position.is_finite() {
                return Err(DroneNetError::InvalidScene(format!(
                    "site {} has a non-finite position",
                    site.name
                )));
            }
            if !names.insert(site.name.as_str()) {
                return Err(DroneNetError::DuplicateSite(site.name.clone()));
            }
            if self.sites[..i].iter().any(|other| other.position == site.position) {
                return Err(DroneNetError::DuplicateSite(format!(
                    "{} at {:?}",
                    site.name, site.position
                )));
            }
        }

        for drone in &self.drones {
            if !drone.position.is_finite() {
                return Err(DroneNetError::InvalidScene(format!(
                    "drone {} has a non-finite position",
                    drone.name
                )));
            }
            self.site_id(&drone.target)
                .ok_or_else(|| DroneNetError::UnknownTarget {
                    drone: drone.name.clone(),
                    target: drone.target.clone(),
                })?;
        }
        Ok(())
    }

    /// ID of the site called `name`
    pub fn site_id(&self, name: &str) -> Option<usize> {
        self.sites.iter().position(|s| s.name == name)
    }
}

/// Window entry of a scene description
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDescription {
    /// Minimum corner, `"x,y"`
    #[cfg_attr(feature = "serde", serde(rename = "origine"))]
    pub origin: String,
    /// Width and height, `"w,h"`
    pub size: String,
}

/// Site entry of a scene description
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SiteDescription {
    pub name: String,
    pub position: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: String,
}

/// Drone entry of a scene description
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DroneDescription {
    pub name: String,
    pub position: String,
    pub target: String,
}

/// Scene as laid out in a scene file
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub window: WindowDescription,
    #[cfg_attr(feature = "serde", serde(rename = "servers"))]
    pub sites: Vec<SiteDescription>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub drones: Vec<DroneDescription>,
}

impl Scene {
    /// Convert a description into a validated scene
    ///
    /// # Errors
    ///
    /// `InvalidScene` for malformed `"x,y"` strings, plus everything
    /// [`Scene::validate`] reports.
    pub fn from_description(desc: &SceneDescription) -> Result<Self> {
        let window = Rect::new(
            parse_pair(&desc.window.origin, "window origin")?,
            parse_pair(&desc.window.size, "window size")?,
        );

        let sites = desc
            .sites
            .iter()
            .map(|s| {
                Ok(SiteSpec {
                    name: s.name.clone(),
                    position: parse_pair(&s.position, &s.name)?,
                    color: SiteColor::parse_or_gray(&s.color),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let drones = desc
            .drones
            .iter()
            .map(|d| {
                Ok(DroneSpec {
                    name: d.name.clone(),
                    position: parse_pair(&d.position, &d.name)?,
                    target: d.target.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let scene = Scene {
            window,
            sites,
            drones,
        };
        scene.validate()?;
        Ok(scene)
    }
}

/// Parse `"x,y"` into a point
pub fn parse_pair(text: &str, what: &str) -> Result<DVec2> {
    let mut parts = text.split(',').map(str::trim);
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DroneNetError::InvalidScene(format!(
            "{}: expected \"x,y\", got {:?}",
            what, text
        )));
    };

    let parse = |s: &str| {
        s.parse::<f64>().map_err(|_| {
            DroneNetError::InvalidScene(format!("{}: bad coordinate {:?}", what, s))
        })
    };
    Ok(DVec2::new(parse(x)?, parse(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description() -> SceneDescription {
        SceneDescription {
            window: WindowDescription {
                origin: "0,0".to_string(),
                size: "800, 600".to_string(),
            },
            sites: vec![
                SiteDescription {
                    name: "north".to_string(),
                    position: "400,100".to_string(),
                    color: "#ff8800".to_string(),
                },
                SiteDescription {
                    name: "south".to_string(),
                    position: "400,500".to_string(),
                    color: "blue".to_string(),
                },
                SiteDescription {
                    name: "east".to_string(),
                    position: "700,300".to_string(),
                    color: String::new(),
                },
            ],
            drones: vec![DroneDescription {
                name: "D1".to_string(),
                position: "390,120".to_string(),
                target: "south".to_string(),
            }],
        }
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("3,4", "p").unwrap(), DVec2::new(3.0, 4.0));
        assert_eq!(parse_pair(" -1.5 , 2 ", "p").unwrap(), DVec2::new(-1.5, 2.0));
        assert!(parse_pair("3", "p").is_err());
        assert!(parse_pair("3,4,5", "p").is_err());
        assert!(parse_pair("a,4", "p").is_err());
    }

    #[test]
    fn test_from_description() {
        let scene = Scene::from_description(&description()).unwrap();
        assert_eq!(scene.window.size, DVec2::new(800.0, 600.0));
        assert_eq!(scene.sites.len(), 3);
        assert_eq!(scene.sites[2].color, SiteColor::GRAY);
        assert_eq!(scene.drones[0].position, DVec2::new(390.0, 120.0));
        assert_eq!(scene.site_id("south"), Some(1));
        assert_eq!(scene.site_id("west"), None);
    }

    #[test]
    fn test_unknown_target() {
        let mut desc = description();
        desc.drones[0].target = "nowhere".to_string();
        let result = Scene::from_description(&desc);
        assert_eq!(
            result,
            Err(DroneNetError::UnknownTarget {
                drone: "D1".to_string(),
                target: "nowhere".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_sites() {
        let mut desc = description();
        desc.sites[1].name = "north".to_string();
        assert!(matches!(
            Scene::from_description(&desc),
            Err(DroneNetError::DuplicateSite(_))
        ));

        let mut desc = description();
        desc.sites[2].position = "400,100".to_string();
        assert!(matches!(
            Scene::from_description(&desc),
            Err(DroneNetError::DuplicateSite(_))
        ));
    }

    #[test]
    fn test_invalid_window() {
        let mut desc = description();
        desc.window.size = "0,600".to_string();
        assert!(matches!(
            Scene::from_description(&desc),
            Err(DroneNetError::InvalidScene(_))
        ));
    }

    #[test]
    fn test_not_enough_sites() {
        let mut desc = description();
        desc.sites.truncate(1);
        desc.drones.clear();
        assert_eq!(
            Scene::from_description(&desc),
            Err(DroneNetError::NotEnoughSites { found: 1, required: 2 })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_description_from_json() {
        let json = r##"{
            "window": { "origine": "0,0", "size": "100,100" },
            "servers": [
                { "name": "A", "position": "20,20", "color": "#ff0000" },
                { "name": "B", "position": "80,80", "color": "#00ff00" }
            ],
            "drones": [ { "name": "D", "position": "25,20", "target": "B" } ]
        }"##;
        let desc: SceneDescription = serde_json::from_str(json).unwrap();
        let scene = Scene::from_description(&desc).unwrap();
        assert_eq!(scene.sites[1].name, "B");
        assert_eq!(scene.drones[0].target, "B");
    }
}
