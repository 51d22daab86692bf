//! Hand landmark frames and the 21-point hand topology
//!
//! Landmarks use normalized image coordinates: x grows rightward, y grows
//! downward, both roughly in [0, 1]; z is relative depth from the detector.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::LandmarkError;

/// Number of landmarks per detected hand.
pub const LANDMARK_COUNT: usize = 21;

// Landmark indices in the standard 21-point hand topology.
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// Fingertip and middle-knuckle pairs for the four non-thumb fingers.
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Which hand the detector believes produced a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand for one tick
///
/// Immutable for the duration of the tick; pipeline stages keep derived
/// scalars across frames, never the landmark array itself.
#[derive(Debug, Clone, Copy)]
pub struct HandFrame {
    pub landmarks: [Vec3; LANDMARK_COUNT],
    pub handedness: Handedness,
    /// Per-hand detection confidence in [0, 1]
    pub confidence: f32,
}

impl HandFrame {
    /// Create a frame from an already-decoded landmark array
    pub fn new(landmarks: [Vec3; LANDMARK_COUNT], handedness: Handedness, confidence: f32) -> Self {
        Self {
            landmarks,
            handedness,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Decode one hand from a flat `x,y,z` buffer as produced by landmark
    /// detectors bridging across an FFI or worker boundary.
    pub fn from_flat(
        data: &[f32],
        handedness: Handedness,
        confidence: f32,
    ) -> Result<Self, LandmarkError> {
        let expected = LANDMARK_COUNT * 3;
        if data.len() < expected {
            return Err(LandmarkError::TruncatedFrame {
                expected,
                actual: data.len(),
            });
        }

        let mut landmarks = [Vec3::ZERO; LANDMARK_COUNT];
        for (i, landmark) in landmarks.iter_mut().enumerate() {
            let base = i * 3;
            let point = Vec3::new(data[base], data[base + 1], data[base + 2]);
            if !point.is_finite() {
                return Err(LandmarkError::NonFiniteCoordinate { index: i });
            }
            *landmark = point;
        }

        Ok(Self::new(landmarks, handedness, confidence))
    }

    /// 2D image-plane position of a landmark
    pub fn point2(&self, index: usize) -> Vec2 {
        self.landmarks[index].truncate()
    }

    /// Palm center: midpoint of the wrist and the middle-finger base
    pub fn palm_center(&self) -> Vec2 {
        (self.point2(WRIST) + self.point2(MIDDLE_MCP)) * 0.5
    }

    /// 2D distance between thumb tip and index fingertip
    pub fn pinch_gap(&self) -> f32 {
        self.point2(THUMB_TIP).distance(self.point2(INDEX_TIP))
    }

    /// Midpoint of thumb tip and index fingertip
    pub fn pinch_midpoint(&self) -> Vec2 {
        (self.point2(THUMB_TIP) + self.point2(INDEX_TIP)) * 0.5
    }

    /// Count of non-thumb fingers whose tip sits above its middle knuckle
    /// in image space (y grows downward, so extended means smaller y).
    pub fn extended_fingers(&self) -> usize {
        FINGER_JOINTS
            .iter()
            .filter(|&&(tip, knuckle)| self.landmarks[tip].y < self.landmarks[knuckle].y)
            .count()
    }
}

/// Source of the latest detected hands
///
/// Refreshed asynchronously by the detector; `latest` never blocks waiting
/// for a new frame, it returns whatever snapshot is current.
pub trait LandmarkSource {
    fn latest(&mut self) -> &[HandFrame];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand(fill: f32) -> Vec<f32> {
        vec![fill; LANDMARK_COUNT * 3]
    }

    #[test]
    fn test_from_flat_decodes_all_landmarks() {
        let mut data = flat_hand(0.0);
        data[WRIST * 3] = 0.5;
        data[INDEX_TIP * 3 + 1] = 0.25;

        let frame = HandFrame::from_flat(&data, Handedness::Right, 0.9).unwrap();
        assert_eq!(frame.landmarks[WRIST].x, 0.5);
        assert_eq!(frame.landmarks[INDEX_TIP].y, 0.25);
        assert_eq!(frame.confidence, 0.9);
    }

    #[test]
    fn test_from_flat_rejects_truncated_buffer() {
        let data = vec![0.0; 10];
        let err = HandFrame::from_flat(&data, Handedness::Left, 1.0).unwrap_err();
        assert!(matches!(
            err,
            LandmarkError::TruncatedFrame { expected: 63, actual: 10 }
        ));
    }

    #[test]
    fn test_from_flat_rejects_non_finite() {
        let mut data = flat_hand(0.0);
        data[MIDDLE_MCP * 3 + 2] = f32::NAN;
        let err = HandFrame::from_flat(&data, Handedness::Left, 1.0).unwrap_err();
        assert!(matches!(
            err,
            LandmarkError::NonFiniteCoordinate { index: MIDDLE_MCP }
        ));
    }

    #[test]
    fn test_palm_center_is_wrist_knuckle_midpoint() {
        let mut landmarks = [Vec3::ZERO; LANDMARK_COUNT];
        landmarks[WRIST] = Vec3::new(0.2, 0.8, 0.0);
        landmarks[MIDDLE_MCP] = Vec3::new(0.4, 0.4, 0.0);
        let frame = HandFrame::new(landmarks, Handedness::Left, 1.0);

        let center = frame.palm_center();
        assert!((center.x - 0.3).abs() < 1e-6);
        assert!((center.y - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_extended_finger_count() {
        let mut landmarks = [Vec3::ZERO; LANDMARK_COUNT];
        // Three fingers extended (tip above knuckle), pinky curled.
        for (tip, knuckle) in [
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
        ] {
            landmarks[tip] = Vec3::new(0.5, 0.3, 0.0);
            landmarks[knuckle] = Vec3::new(0.5, 0.5, 0.0);
        }
        landmarks[PINKY_TIP] = Vec3::new(0.5, 0.6, 0.0);
        landmarks[PINKY_PIP] = Vec3::new(0.5, 0.5, 0.0);

        let frame = HandFrame::new(landmarks, Handedness::Right, 1.0);
        assert_eq!(frame.extended_fingers(), 3);
    }
}
