//! Camera mapping module
//!
//! Applies the confirmed gesture signal to an orbit camera: spherical orbit,
//! screen-space pan, and clamped dolly zoom, with leased ownership of the
//! controls' enabled flag.

mod config;
mod mapper;
mod rig;

pub use config::CameraConfig;
pub use mapper::{CameraMapper, ControlsLease};
pub use rig::{OrbitControls, OrbitRig};
