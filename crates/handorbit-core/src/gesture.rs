//! The gesture control signal flowing through the pipeline

use serde::{Deserialize, Serialize};

/// Discrete gesture category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureKind {
    /// No recognized gesture
    None,
    /// Single-hand pinch: orbit the camera around its target
    Rotate,
    /// Single-hand open palm: translate camera and target together
    Pan,
    /// Two hands: dolly the camera along the view ray
    Zoom,
}

impl GestureKind {
    /// Whether this kind drives the camera
    pub fn is_active(&self) -> bool {
        !matches!(self, GestureKind::None)
    }
}

/// One tick of the gesture control signal
///
/// Invariant: when `kind` is `None`, all deltas are exactly zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureState {
    pub kind: GestureKind,
    /// Detection confidence in [0, 1]; informational only, never gates
    /// classification.
    pub confidence: f32,
    /// Horizontal motion since the previous same-kind frame
    pub dx: f32,
    /// Vertical motion since the previous same-kind frame
    pub dy: f32,
    /// Change in inter-hand spread (zoom only)
    pub dz: f32,
}

impl GestureState {
    /// The canonical empty signal
    pub fn idle() -> Self {
        Self {
            kind: GestureKind::None,
            confidence: 0.0,
            dx: 0.0,
            dy: 0.0,
            dz: 0.0,
        }
    }

    /// An active signal with the given kind and motion
    pub fn active(kind: GestureKind, confidence: f32, dx: f32, dy: f32, dz: f32) -> Self {
        debug_assert!(kind.is_active());
        Self {
            kind,
            confidence,
            dx,
            dy,
            dz,
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::idle()
    }
}
