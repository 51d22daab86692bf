//! Camera mapping configuration

use serde::{Deserialize, Serialize};

/// Camera mapping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Azimuth radians per unit of horizontal pinch motion
    pub yaw_scale: f32,
    /// Polar radians per unit of vertical pinch motion
    pub pitch_scale: f32,
    /// World units per unit of horizontal palm motion
    pub pan_x_scale: f32,
    /// World units per unit of vertical palm motion
    pub pan_y_scale: f32,
    /// World units per unit of inter-hand spread change
    pub zoom_scale: f32,
    /// Closest allowed camera-to-target distance
    pub min_distance: f32,
    /// Farthest allowed camera-to-target distance
    pub max_distance: f32,
    /// Polar clearance from the poles, in radians
    pub polar_margin: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            yaw_scale: 4.0,
            pitch_scale: 4.0,
            pan_x_scale: 8.0,
            pan_y_scale: 8.0,
            zoom_scale: 20.0,
            min_distance: 1.0,
            max_distance: 50.0,
            polar_margin: 0.05,
        }
    }
}
