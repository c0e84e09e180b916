//! Simulation configuration and builders
//!
//! Kinematic constants shared by every drone, and the policy for drones that
//! start outside all cells.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DroneNetError, Result};

/// Motion constants of a drone
///
/// All distances are in window units and all times in seconds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicsConfig {
    /// Upper bound on the speed
    pub max_speed: f64,

    /// Speed at the edge of the slow-down radius
    ///
    /// Inside the radius the speed falls linearly with the remaining distance:
    /// `d * approach_speed / slow_down_radius`.
    pub approach_speed: f64,

    /// Acceleration toward the waypoint outside the slow-down radius
    pub acceleration: f64,

    /// Distance to the waypoint under which the drone starts braking
    pub slow_down_radius: f64,

    /// Distance under which a waypoint counts as reached
    pub arrival_tolerance: f64,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            max_speed: 50.0,
            approach_speed: 40.0,
            acceleration: 25.0,
            slow_down_radius: 20.0,
            arrival_tolerance: 0.5,
        }
    }
}

/// Builder for [`KinematicsConfig`] with validation
///
/// # Example
///
/// ```rust
/// use dronenet::*;
///
/// let kinematics = KinematicsConfigBuilder::new()
///     .max_speed(80.0)
///     .slow_down_radius(30.0)
///     .build()
///     .unwrap();
/// assert_eq!(kinematics.max_speed, 80.0);
/// ```
#[derive(Debug, Clone)]
pub struct KinematicsConfigBuilder {
    config: KinematicsConfig,
}

impl KinematicsConfigBuilder {
    /// Start from [`KinematicsConfig::default`]
    pub fn new() -> Self {
        Self {
            config: KinematicsConfig::default(),
        }
    }

    pub fn max_speed(mut self, speed: f64) -> Self {
        self.config.max_speed = speed;
        self
    }

    pub fn approach_speed(mut self, speed: f64) -> Self {
        self.config.approach_speed = speed;
        self
    }

    pub fn acceleration(mut self, acceleration: f64) -> Self {
        self.config.acceleration = acceleration;
        self
    }

    pub fn slow_down_radius(mut self, radius: f64) -> Self {
        self.config.slow_down_radius = radius;
        self
    }

    pub fn arrival_tolerance(mut self, tolerance: f64) -> Self {
        self.config.arrival_tolerance = tolerance;
        self
    }

    /// Validate and build
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a value is not finite and positive, or if the
    /// arrival tolerance is not smaller than the slow-down radius.
    pub fn build(self) -> Result<KinematicsConfig> {
        let c = self.config;
        let fields = [
            ("max_speed", c.max_speed),
            ("approach_speed", c.approach_speed),
            ("acceleration", c.acceleration),
            ("slow_down_radius", c.slow_down_radius),
            ("arrival_tolerance", c.arrival_tolerance),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(DroneNetError::InvalidConfig(format!(
                    "{} must be finite and > 0 (got {})",
                    name, value
                )));
            }
        }
        if c.arrival_tolerance >= c.slow_down_radius {
            return Err(DroneNetError::InvalidConfig(format!(
                "arrival_tolerance ({}) must be smaller than slow_down_radius ({})",
                c.arrival_tolerance, c.slow_down_radius
            )));
        }
        Ok(c)
    }
}

impl Default for KinematicsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What to do with a drone whose start position is in no cell
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutsideCellPolicy {
    /// Leave the drone detached; it never moves
    #[default]
    Park,
    /// Attach the drone to the nearest site and fly there first
    SnapToNearestSite,
}

/// Configuration of a [`DroneNetwork`](crate::DroneNetwork)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetworkConfig {
    /// Motion constants applied to every drone
    pub kinematics: KinematicsConfig,
    /// Handling of drones outside every cell
    pub outside_policy: OutsideCellPolicy,
}

/// Builder for [`NetworkConfig`]
///
/// # Example
///
/// ```rust
/// use dronenet::*;
///
/// let config = NetworkConfigBuilder::new()
///     .outside_policy(OutsideCellPolicy::SnapToNearestSite)
///     .build();
/// assert_eq!(config.kinematics, KinematicsConfig::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetworkConfigBuilder {
    kinematics: KinematicsConfig,
    outside_policy: OutsideCellPolicy,
}

impl NetworkConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinematics(mut self, kinematics: KinematicsConfig) -> Self {
        self.kinematics = kinematics;
        self
    }

    pub fn outside_policy(mut self, policy: OutsideCellPolicy) -> Self {
        self.outside_policy = policy;
        self
    }

    pub fn build(self) -> NetworkConfig {
        NetworkConfig {
            kinematics: self.kinematics,
            outside_policy: self.outside_policy,
        }
    }
}
