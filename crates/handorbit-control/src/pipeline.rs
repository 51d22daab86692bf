//! The per-tick pipeline wiring classify -> stabilize -> map
//!
//! One instance per control session. The host's render loop calls [`tick`]
//! once per frame with the latest landmark snapshot, and [`stop`] when the
//! capture device is released.
//!
//! [`tick`]: GesturePipeline::tick
//! [`stop`]: GesturePipeline::stop

use tracing::info;

use handorbit_core::{GestureState, HandFrame};

use crate::camera::{CameraConfig, CameraMapper, OrbitControls};
use crate::classifier::{ClassifierConfig, GestureClassifier};
use crate::stabilizer::{GestureStabilizer, StabilizerConfig};

/// The full gesture-to-camera pipeline for one control session
#[derive(Debug, Default)]
pub struct GesturePipeline {
    classifier: GestureClassifier,
    stabilizer: GestureStabilizer,
    mapper: CameraMapper,
}

impl GesturePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configs(
        classifier: ClassifierConfig,
        stabilizer: StabilizerConfig,
        camera: CameraConfig,
    ) -> Self {
        Self {
            classifier: GestureClassifier::with_config(classifier),
            stabilizer: GestureStabilizer::with_config(stabilizer),
            mapper: CameraMapper::with_config(camera),
        }
    }

    /// Run all three stages for one tick.
    ///
    /// `hands` is whatever snapshot the landmark source currently holds;
    /// stale frames are used as-is, never buffered or replayed. When the
    /// controls reference is unavailable the camera stage is skipped but
    /// classification state still advances, so hysteresis stays truthful.
    pub fn tick(
        &mut self,
        hands: &[HandFrame],
        controls: Option<&mut dyn OrbitControls>,
    ) -> GestureState {
        let raw = self.classifier.classify(hands);
        let stabilized = self.stabilizer.push(&raw);

        if let Some(controls) = controls {
            self.mapper.apply(&stabilized, controls);
        }

        stabilized
    }

    /// Whether the pipeline currently holds the controls' enabled flag.
    /// External code re-enabling controls must check this first.
    pub fn owns_controls(&self) -> bool {
        self.mapper.owns_controls()
    }

    /// Session teardown: clear all hysteresis and finite-difference state
    /// and hand back the controls if this pipeline disabled them.
    pub fn stop(&mut self, controls: Option<&mut dyn OrbitControls>) {
        info!("gesture session stopped");
        self.classifier.reset();
        self.stabilizer.reset();
        if let Some(controls) = controls {
            self.mapper.release_controls(controls);
        }
    }
}
