//! Handorbit - gesture-driven orbit camera control
//!
//! Demo driver: replays a scripted capture session (pinch orbit, open-palm
//! pan, two-hand zoom, with simulated detector noise and dropouts) through
//! the full pipeline and logs the resulting camera motion.

mod settings;

use anyhow::Result;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use handorbit_control::{GesturePipeline, OrbitControls, OrbitRig};
use handorbit_core::landmarks::{
    INDEX_PIP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP,
    RING_PIP, RING_TIP, THUMB_TIP, WRIST,
};
use handorbit_core::{HandFrame, Handedness, LandmarkSource};

use settings::Settings;

/// Jitter amplitude applied to every scripted landmark, in normalized image
/// units. Roughly what a webcam detector produces at rest.
const DETECTOR_NOISE: f32 = 0.002;

/// One phase of the scripted session
enum Phase {
    /// Pinch drifting rightward: should confirm Rotate and orbit
    PinchDrag { ticks: u32 },
    /// Open palm drifting upward: should confirm Pan
    PalmDrift { ticks: u32 },
    /// Two hands spreading apart: should confirm Zoom and dolly in
    HandSpread { ticks: u32 },
    /// Detector dropout: no hands at all
    Dropout { ticks: u32 },
}

impl Phase {
    fn length(&self) -> u32 {
        match *self {
            Phase::PinchDrag { ticks }
            | Phase::PalmDrift { ticks }
            | Phase::HandSpread { ticks }
            | Phase::Dropout { ticks } => ticks,
        }
    }
}

/// Scripted stand-in for the webcam landmark detector
struct ScriptedDetector {
    phases: Vec<Phase>,
    phase: usize,
    tick_in_phase: u32,
    total_ticks: u32,
    rng: StdRng,
    current: Vec<HandFrame>,
}

impl ScriptedDetector {
    fn new(phases: Vec<Phase>) -> Self {
        Self {
            phases,
            phase: 0,
            tick_in_phase: 0,
            total_ticks: 0,
            rng: StdRng::seed_from_u64(7),
            current: Vec::new(),
        }
    }

    fn finished(&self) -> bool {
        self.phase >= self.phases.len()
    }

    /// Produce the next frame of the script.
    fn advance(&mut self) {
        self.current.clear();
        if self.finished() {
            return;
        }

        let t = self.tick_in_phase as f32;
        let frame = match self.phases[self.phase] {
            Phase::PinchDrag { .. } => {
                let hand = self.pinch_hand(0.3 + t * 0.01, 0.5);
                vec![hand]
            }
            Phase::PalmDrift { .. } => {
                let hand = self.open_hand(0.5, 0.6 - t * 0.008);
                vec![hand]
            }
            Phase::HandSpread { .. } => {
                let spread = 0.1 + t * 0.012;
                let left = self.open_hand(0.5 - spread, 0.5);
                let right = self.open_hand(0.5 + spread, 0.5);
                vec![left, right]
            }
            Phase::Dropout { .. } => Vec::new(),
        };
        self.current = frame;

        self.tick_in_phase += 1;
        self.total_ticks += 1;
        if self.tick_in_phase >= self.phases[self.phase].length() {
            self.phase += 1;
            self.tick_in_phase = 0;
        }
    }

    fn noisy(&mut self, x: f32, y: f32) -> Vec3 {
        let jx = self.rng.gen_range(-DETECTOR_NOISE..DETECTOR_NOISE);
        let jy = self.rng.gen_range(-DETECTOR_NOISE..DETECTOR_NOISE);
        Vec3::new(x + jx, y + jy, 0.0)
    }

    /// Thumb and index tips nearly touching around (x, y)
    fn pinch_hand(&mut self, x: f32, y: f32) -> HandFrame {
        let mut landmarks = [Vec3::ZERO; LANDMARK_COUNT];
        for point in landmarks.iter_mut() {
            *point = self.noisy(x, y + 0.2);
        }
        landmarks[THUMB_TIP] = self.noisy(x - 0.01, y);
        landmarks[INDEX_TIP] = self.noisy(x + 0.01, y);
        HandFrame::new(landmarks, Handedness::Right, 0.93)
    }

    /// Four fingers extended above their knuckles, palm centered at (x, y)
    fn open_hand(&mut self, x: f32, y: f32) -> HandFrame {
        let mut landmarks = [Vec3::ZERO; LANDMARK_COUNT];
        for point in landmarks.iter_mut() {
            *point = self.noisy(x, y);
        }
        landmarks[WRIST] = self.noisy(x, y + 0.1);
        landmarks[MIDDLE_MCP] = self.noisy(x, y - 0.1);
        landmarks[THUMB_TIP] = self.noisy(x - 0.15, y);
        for (tip, knuckle) in [
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ] {
            landmarks[knuckle] = self.noisy(x, y);
            landmarks[tip] = self.noisy(x, y - 0.15);
        }
        HandFrame::new(landmarks, Handedness::Left, 0.88)
    }
}

impl LandmarkSource for ScriptedDetector {
    fn latest(&mut self) -> &[HandFrame] {
        &self.current
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("Starting handorbit demo session...");

    let settings = Settings::load();
    let mut pipeline = GesturePipeline::with_configs(
        settings.classifier.clone(),
        settings.stabilizer.clone(),
        settings.camera.clone(),
    );
    let mut rig = OrbitRig::new(Vec3::new(0.0, 2.0, 10.0), Vec3::ZERO);

    let mut detector = ScriptedDetector::new(vec![
        Phase::PinchDrag { ticks: 30 },
        Phase::Dropout { ticks: 3 }, // short dropout: gesture must survive
        Phase::PinchDrag { ticks: 10 },
        Phase::Dropout { ticks: 15 },
        Phase::PalmDrift { ticks: 30 },
        Phase::Dropout { ticks: 15 },
        Phase::HandSpread { ticks: 30 },
        Phase::Dropout { ticks: 15 },
    ]);

    while !detector.finished() {
        detector.advance();
        let hands = detector.latest().to_vec();
        let state = pipeline.tick(&hands, Some(&mut rig));

        if detector.total_ticks % 10 == 0 {
            info!(
                tick = detector.total_ticks,
                kind = ?state.kind,
                position = ?rig.position(),
                target = ?rig.target(),
                "camera"
            );
        }
    }

    pipeline.stop(Some(&mut rig));
    info!(
        position = ?rig.position(),
        enabled = rig.is_enabled(),
        "session complete"
    );

    // Persist the active settings so they can be tuned between runs.
    if let Err(e) = settings.save() {
        tracing::warn!("Failed to save settings: {e}");
    }
    Ok(())
}
