//! Handorbit Control - The gesture-to-camera pipeline
//!
//! Three stages run in fixed order once per rendering tick:
//! 1. [`GestureClassifier`] - raw landmarks to an instantaneous gesture
//! 2. [`GestureStabilizer`] - debounce and smooth the noisy stream
//! 3. [`CameraMapper`] - drive the orbit camera from the confirmed signal
//!
//! [`GesturePipeline`] wires the stages together for the host's tick loop.

pub mod camera;
pub mod classifier;
pub mod pipeline;
pub mod stabilizer;

pub use camera::{CameraConfig, CameraMapper, ControlsLease, OrbitControls, OrbitRig};
pub use classifier::{ClassifierConfig, GestureClassifier};
pub use pipeline::GesturePipeline;
pub use stabilizer::{GestureStabilizer, HoldState, StabilizerConfig};
