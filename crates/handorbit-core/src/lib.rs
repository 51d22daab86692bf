//! Handorbit Core - Foundational types for gesture-driven camera control
//!
//! This crate provides the types shared by every pipeline stage:
//! - Hand landmark frames and the 21-point hand topology
//! - The gesture control signal (`GestureState`)
//! - Frame decoding errors

pub mod error;
pub mod gesture;
pub mod landmarks;

pub use error::LandmarkError;
pub use gesture::{GestureKind, GestureState};
pub use landmarks::{HandFrame, Handedness, LandmarkSource, LANDMARK_COUNT};
