//! Stage 3: mapping the confirmed gesture onto the orbit camera

use glam::Vec3;
use tracing::debug;

use handorbit_core::{GestureKind, GestureState};

use super::config::CameraConfig;
use super::rig::OrbitControls;

/// Proof that the mapper disabled the controls.
///
/// The enabled flag is shared with a competing pointer-drag controller, so
/// the mapper may only restore what it took: releasing a lease re-enables
/// the controls only if they were enabled at acquisition. Anything else
/// would wrongly resurrect controls some other system turned off.
#[derive(Debug)]
pub struct ControlsLease {
    was_enabled: bool,
}

impl ControlsLease {
    /// Take over the controls, remembering their prior enabled state.
    pub fn acquire(controls: &mut dyn OrbitControls) -> Self {
        let was_enabled = controls.is_enabled();
        controls.set_enabled(false);
        Self { was_enabled }
    }

    /// Hand the controls back, restoring only what this lease disabled.
    pub fn release(self, controls: &mut dyn OrbitControls) {
        if self.was_enabled {
            controls.set_enabled(true);
        }
    }
}

/// Applies one confirmed gesture tick to the camera/controls
#[derive(Debug, Default)]
pub struct CameraMapper {
    config: CameraConfig,
    lease: Option<ControlsLease>,
}

impl CameraMapper {
    pub fn new() -> Self {
        Self::with_config(CameraConfig::default())
    }

    pub fn with_config(config: CameraConfig) -> Self {
        Self {
            config,
            lease: None,
        }
    }

    /// Whether the mapper currently holds the controls' enabled flag.
    pub fn owns_controls(&self) -> bool {
        self.lease.is_some()
    }

    /// Apply one tick of the stabilized signal.
    ///
    /// No-op for the idle signal beyond handing back the controls lease.
    pub fn apply(&mut self, gesture: &GestureState, controls: &mut dyn OrbitControls) {
        if gesture.kind == GestureKind::None {
            self.release_controls(controls);
            return;
        }

        if self.lease.is_none() {
            debug!("gesture active, taking over orbit controls");
            self.lease = Some(ControlsLease::acquire(controls));
        }

        match gesture.kind {
            GestureKind::Rotate => self.orbit(gesture.dx, gesture.dy, controls),
            GestureKind::Pan => self.pan(gesture.dx, gesture.dy, controls),
            GestureKind::Zoom => self.zoom(gesture.dz, controls),
            GestureKind::None => unreachable!(),
        }
    }

    /// Hand the controls back if this mapper took them. Called on the idle
    /// signal and on session teardown.
    pub fn release_controls(&mut self, controls: &mut dyn OrbitControls) {
        if let Some(lease) = self.lease.take() {
            debug!("gesture ended, handing back orbit controls");
            lease.release(controls);
        }
    }

    /// Orbit around the target in spherical coordinates. Rightward pinch
    /// motion orbits the camera leftward, matching drag-to-orbit.
    fn orbit(&self, dx: f32, dy: f32, controls: &mut dyn OrbitControls) {
        let target = controls.target();
        let offset = controls.position() - target;
        let radius = offset.length();
        if radius < f32::EPSILON {
            return;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += dx * self.config.yaw_scale;
        phi -= dy * self.config.pitch_scale;

        // Keep the polar angle strictly off the poles so the view never
        // flips when the camera crosses overhead.
        let margin = self.config.polar_margin;
        phi = phi.clamp(margin, std::f32::consts::PI - margin);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let rotated = Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * radius;

        controls.set_position(target + rotated);
        controls.update();
    }

    /// Translate camera and target together along the view plane, keeping
    /// the camera-to-target offset intact.
    fn pan(&self, dx: f32, dy: f32, controls: &mut dyn OrbitControls) {
        let forward = controls.target() - controls.position();
        let Some(forward) = forward.try_normalize() else {
            return;
        };
        let Some(right) = forward.cross(Vec3::Y).try_normalize() else {
            return;
        };
        let up = right.cross(forward);

        let shift = right * (-dx * self.config.pan_x_scale) + up * (dy * self.config.pan_y_scale);
        controls.set_position(controls.position() + shift);
        controls.set_target(controls.target() + shift);
        controls.update();
    }

    /// Dolly along the view ray. Spreading hands (positive dz) moves the
    /// camera closer; the distance stays inside the configured bounds.
    fn zoom(&self, dz: f32, controls: &mut dyn OrbitControls) {
        let target = controls.target();
        let offset = controls.position() - target;
        let Some(direction) = offset.try_normalize() else {
            return;
        };

        let distance = (offset.length() - dz * self.config.zoom_scale)
            .clamp(self.config.min_distance, self.config.max_distance);

        controls.set_position(target + direction * distance);
        controls.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::rig::OrbitRig;
    use std::f32::consts::PI;

    fn rotate(dx: f32, dy: f32) -> GestureState {
        GestureState::active(GestureKind::Rotate, 1.0, dx, dy, 0.0)
    }

    fn azimuth(rig: &OrbitRig) -> f32 {
        let offset = rig.position() - rig.target();
        offset.x.atan2(offset.z)
    }

    fn polar(rig: &OrbitRig) -> f32 {
        let offset = rig.position() - rig.target();
        (offset.y / offset.length()).acos()
    }

    #[test]
    fn test_idle_gesture_is_a_noop() {
        let mut mapper = CameraMapper::new();
        let mut rig = OrbitRig::default();
        let position = rig.position();
        let target = rig.target();

        mapper.apply(&GestureState::idle(), &mut rig);
        assert_eq!(rig.position(), position);
        assert_eq!(rig.target(), target);
        assert!(rig.is_enabled());
    }

    #[test]
    fn test_rotate_orbits_and_preserves_radius() {
        let mut mapper = CameraMapper::new();
        let mut rig = OrbitRig::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let before = azimuth(&rig);

        mapper.apply(&rotate(0.1, 0.0), &mut rig);
        assert!(azimuth(&rig) > before);
        assert!((rig.position().length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_polar_angle_never_reaches_poles() {
        let config = CameraConfig::default();
        let margin = config.polar_margin;
        let mut mapper = CameraMapper::with_config(config);
        let mut rig = OrbitRig::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

        // Drive the pitch hard in both directions.
        for _ in 0..100 {
            mapper.apply(&rotate(0.0, 1.0), &mut rig);
            let phi = polar(&rig);
            assert!(phi >= margin - 1e-4 && phi <= PI - margin + 1e-4);
        }
        for _ in 0..100 {
            mapper.apply(&rotate(0.0, -1.0), &mut rig);
            let phi = polar(&rig);
            assert!(phi >= margin - 1e-4 && phi <= PI - margin + 1e-4);
        }
    }

    #[test]
    fn test_pan_preserves_camera_target_offset() {
        let mut mapper = CameraMapper::new();
        let mut rig = OrbitRig::new(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO);
        let offset = rig.position() - rig.target();

        let pan = GestureState::active(GestureKind::Pan, 1.0, 0.05, -0.02, 0.0);
        mapper.apply(&pan, &mut rig);

        assert_ne!(rig.target(), Vec3::ZERO);
        let after = rig.position() - rig.target();
        assert!((after - offset).length() < 1e-5);
    }

    #[test]
    fn test_zoom_stays_within_distance_bounds() {
        let config = CameraConfig::default();
        let (min, max) = (config.min_distance, config.max_distance);
        let mut mapper = CameraMapper::with_config(config);
        let mut rig = OrbitRig::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

        // Hands spreading: camera approaches but never passes min_distance.
        for _ in 0..50 {
            let zoom = GestureState::active(GestureKind::Zoom, 1.0, 0.0, 0.0, 0.1);
            mapper.apply(&zoom, &mut rig);
            let distance = (rig.position() - rig.target()).length();
            assert!(distance >= min - 1e-4 && distance <= max + 1e-4);
        }

        // Hands closing: camera retreats but never passes max_distance.
        for _ in 0..50 {
            let zoom = GestureState::active(GestureKind::Zoom, 1.0, 0.0, 0.0, -0.1);
            mapper.apply(&zoom, &mut rig);
            let distance = (rig.position() - rig.target()).length();
            assert!(distance >= min - 1e-4 && distance <= max + 1e-4);
        }
    }

    #[test]
    fn test_zoom_sign_convention() {
        let mut mapper = CameraMapper::new();
        let mut rig = OrbitRig::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);

        let zoom = GestureState::active(GestureKind::Zoom, 1.0, 0.0, 0.0, 0.1);
        mapper.apply(&zoom, &mut rig);
        assert!((rig.position() - rig.target()).length() < 10.0);
    }

    #[test]
    fn test_lease_disables_and_restores_controls() {
        let mut mapper = CameraMapper::new();
        let mut rig = OrbitRig::default();

        mapper.apply(&rotate(0.01, 0.0), &mut rig);
        assert!(!rig.is_enabled());
        assert!(mapper.owns_controls());

        mapper.apply(&GestureState::idle(), &mut rig);
        assert!(rig.is_enabled());
        assert!(!mapper.owns_controls());
    }

    #[test]
    fn test_lease_never_reenables_foreign_disable() {
        let mut mapper = CameraMapper::new();
        let mut rig = OrbitRig::default();

        // Something else (a tour animation, say) already owns the flag.
        rig.set_enabled(false);

        mapper.apply(&rotate(0.01, 0.0), &mut rig);
        mapper.apply(&GestureState::idle(), &mut rig);
        assert!(!rig.is_enabled());
    }
}
