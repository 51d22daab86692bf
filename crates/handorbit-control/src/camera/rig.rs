//! The orbit-controls surface owned by the rendering layer

use glam::{Mat4, Vec3};

/// The camera/controls surface the mapper drives.
///
/// Owned by the rendering layer; the mapper is the only pipeline component
/// that mutates it. `update` must be called after any external change to
/// position or target so the controls' internal state stays consistent.
pub trait OrbitControls {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn target(&self) -> Vec3;
    fn set_target(&mut self, target: Vec3);
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    fn update(&mut self);
}

/// A self-contained orbit camera rig
///
/// Concrete [`OrbitControls`] implementation used by the demo driver and
/// tests; real hosts adapt their own controls object instead.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    enabled: bool,
    view: Mat4,
}

impl OrbitRig {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut rig = Self {
            position,
            target,
            up: Vec3::Y,
            enabled: true,
            view: Mat4::IDENTITY,
        };
        rig.update();
        rig
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// The view matrix as of the last `update` call
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO)
    }
}

impl OrbitControls for OrbitRig {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn update(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.target, self.up);
    }
}
