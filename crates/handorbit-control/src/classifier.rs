//! Stage 1: per-tick geometric gesture classification
//!
//! Pure geometry plus single-step finite differences. The classifier holds
//! only the previous tick's reference points (pinch midpoint, palm center,
//! two-hand spread), never landmark history.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use handorbit_core::{GestureKind, GestureState, HandFrame};

/// Classifier tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Maximum thumb-to-index gap (normalized image units) counted as a pinch
    pub pinch_threshold: f32,
    /// Non-thumb fingers that must be extended to count as an open palm
    pub min_extended_fingers: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.08,
            min_extended_fingers: 3,
        }
    }
}

/// Classifies one landmark snapshot per tick into a raw gesture
///
/// Priority: two-hand zoom, then single-hand pinch (rotate), then open palm
/// (pan). At most one gesture is ever reported.
#[derive(Debug, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
    pinch_anchor: Option<Vec2>,
    palm_anchor: Option<Vec2>,
    spread_anchor: Option<f32>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::with_config(ClassifierConfig::default())
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self {
            config,
            pinch_anchor: None,
            palm_anchor: None,
            spread_anchor: None,
        }
    }

    /// Classify the current snapshot of detected hands.
    ///
    /// Deltas are differences against the previous tick's reference point of
    /// the same gesture family; the first frame of a family reports zero
    /// motion because no valid reference exists yet.
    pub fn classify(&mut self, hands: &[HandFrame]) -> GestureState {
        match hands {
            [] => {
                self.reset();
                GestureState::idle()
            }
            [hand] => {
                // A lone hand invalidates any two-hand spread reference.
                self.spread_anchor = None;
                self.classify_single(hand)
            }
            [first, second, ..] => {
                self.pinch_anchor = None;
                self.palm_anchor = None;
                self.classify_spread(first, second)
            }
        }
    }

    /// Drop all cross-frame reference points.
    pub fn reset(&mut self) {
        self.pinch_anchor = None;
        self.palm_anchor = None;
        self.spread_anchor = None;
    }

    fn classify_single(&mut self, hand: &HandFrame) -> GestureState {
        if hand.pinch_gap() < self.config.pinch_threshold {
            self.palm_anchor = None;
            let midpoint = hand.pinch_midpoint();
            let delta = step(&mut self.pinch_anchor, midpoint);
            return GestureState::active(
                GestureKind::Rotate,
                hand.confidence,
                delta.x,
                delta.y,
                0.0,
            );
        }

        if hand.extended_fingers() >= self.config.min_extended_fingers {
            self.pinch_anchor = None;
            let center = hand.palm_center();
            let delta = step(&mut self.palm_anchor, center);
            return GestureState::active(GestureKind::Pan, hand.confidence, delta.x, delta.y, 0.0);
        }

        // Ambiguous pose: neither pinch nor open palm.
        self.pinch_anchor = None;
        self.palm_anchor = None;
        GestureState::idle()
    }

    fn classify_spread(&mut self, first: &HandFrame, second: &HandFrame) -> GestureState {
        let spread = first.palm_center().distance(second.palm_center());
        let dz = match self.spread_anchor.replace(spread) {
            Some(previous) => spread - previous,
            None => 0.0,
        };
        let confidence = (first.confidence + second.confidence) * 0.5;
        GestureState::active(GestureKind::Zoom, confidence, 0.0, 0.0, dz)
    }
}

/// Advance a finite-difference anchor and return the step from the previous
/// value, or zero when the anchor was empty.
fn step(anchor: &mut Option<Vec2>, current: Vec2) -> Vec2 {
    match anchor.replace(current) {
        Some(previous) => current - previous,
        None => Vec2::ZERO,
    }
}
