//! Error types for scene loading and topology construction

use thiserror::Error;

/// Errors reported while loading a scene or building its topology
///
/// Runtime degeneracies during simulation (a drone outside every cell, an
/// unreachable target) are not errors and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DroneNetError {
    /// The scene has too few sites to partition the window
    #[error("not enough sites: found {found}, need at least {required}")]
    NotEnoughSites { found: usize, required: usize },

    /// Two sites share a name or a position
    #[error("duplicate site: {0}")]
    DuplicateSite(String),

    /// A drone names a target site that does not exist
    #[error("drone {drone} targets unknown site {target:?}")]
    UnknownTarget { drone: String, target: String },

    /// Requested site ID does not exist
    #[error("site not found: {0}")]
    SiteNotFound(usize),

    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Scene description is malformed
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    /// The triangulation could not be built from the site positions
    #[error("triangulation failed: {0}")]
    TriangulationFailed(String),
}

/// Result type alias for dronenet operations
pub type Result<T> = std::result::Result<T, DroneNetError>;
