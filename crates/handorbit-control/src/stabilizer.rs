//! Stage 2: temporal stabilization of the raw classification stream
//!
//! Two jobs: debounce the flickering per-frame kind through an explicit
//! hysteresis state machine, and smooth the motion deltas with per-kind
//! exponential moving averages.

use serde::{Deserialize, Serialize};
use tracing::debug;

use handorbit_core::{GestureKind, GestureState};

/// Stabilizer tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilizerConfig {
    /// Consecutive matching raw frames required to confirm a gesture
    pub hold_frames: u32,
    /// Consecutive empty frames tolerated before a confirmed gesture ends
    pub release_frames: u32,
    /// EMA factor while rotating (higher = more responsive)
    pub rotate_alpha: f32,
    /// EMA factor while panning
    pub pan_alpha: f32,
    /// EMA factor while zooming
    pub zoom_alpha: f32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            hold_frames: 4,
            release_frames: 6,
            rotate_alpha: 0.5,
            pan_alpha: 0.4,
            zoom_alpha: 0.35,
        }
    }
}

impl StabilizerConfig {
    fn alpha(&self, kind: GestureKind) -> f32 {
        match kind {
            GestureKind::Rotate => self.rotate_alpha,
            GestureKind::Pan => self.pan_alpha,
            GestureKind::Zoom => self.zoom_alpha,
            GestureKind::None => 0.0,
        }
    }
}

/// A gesture awaiting confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub kind: GestureKind,
    pub frames: u32,
}

/// Hysteresis state of the stabilizer
///
/// Pure state machine: [`HoldState::step`] consumes a raw kind and produces
/// the next state plus the event that occurred, with no reference to the
/// smoothing accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldState {
    /// No gesture confirmed, none pending
    #[default]
    Idle,
    /// A gesture is accumulating consecutive frames toward confirmation
    Acquiring(Candidate),
    /// A gesture is confirmed; a different kind may be pending underneath
    Confirmed {
        kind: GestureKind,
        candidate: Option<Candidate>,
    },
    /// A confirmed gesture is riding out a run of empty frames
    Releasing { kind: GestureKind, none_frames: u32 },
}

/// What a single transition did, so the owner knows when to reset smoothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// No change in the externally visible kind
    Held,
    /// A gesture was just confirmed
    Confirmed(GestureKind),
    /// The confirmed gesture ended
    Released(GestureKind),
}

impl HoldState {
    /// The externally visible gesture kind for this state.
    pub fn confirmed_kind(&self) -> GestureKind {
        match self {
            HoldState::Idle | HoldState::Acquiring(_) => GestureKind::None,
            HoldState::Confirmed { kind, .. } | HoldState::Releasing { kind, .. } => *kind,
        }
    }

    /// Advance the state machine by one raw frame.
    pub fn step(self, raw: GestureKind, config: &StabilizerConfig) -> (HoldState, StepEvent) {
        match (self, raw) {
            (HoldState::Idle, GestureKind::None) => (HoldState::Idle, StepEvent::Held),

            // A dropout breaks a candidate's consecutive run.
            (HoldState::Acquiring(_), GestureKind::None) => (HoldState::Idle, StepEvent::Held),

            (HoldState::Idle, kind) => Self::advance_candidate(None, kind, config),

            (HoldState::Acquiring(candidate), kind) => {
                Self::advance_candidate(Some(candidate), kind, config)
            }

            // Sustaining the confirmed gesture clears any pending candidate.
            (HoldState::Confirmed { kind, .. }, raw) if raw == kind => (
                HoldState::Confirmed {
                    kind,
                    candidate: None,
                },
                StepEvent::Held,
            ),

            (HoldState::Confirmed { kind, .. }, GestureKind::None) => (
                HoldState::Releasing {
                    kind,
                    none_frames: 1,
                },
                StepEvent::Held,
            ),

            // A different active kind while confirmed: stack it underneath.
            (HoldState::Confirmed { kind, candidate }, raw) => {
                let frames = match candidate {
                    Some(c) if c.kind == raw => c.frames + 1,
                    _ => 1,
                };
                if frames >= config.hold_frames {
                    (
                        HoldState::Confirmed {
                            kind: raw,
                            candidate: None,
                        },
                        StepEvent::Confirmed(raw),
                    )
                } else {
                    (
                        HoldState::Confirmed {
                            kind,
                            candidate: Some(Candidate { kind: raw, frames }),
                        },
                        StepEvent::Held,
                    )
                }
            }

            (HoldState::Releasing { kind, none_frames }, GestureKind::None) => {
                let none_frames = none_frames + 1;
                if none_frames > config.release_frames {
                    (HoldState::Idle, StepEvent::Released(kind))
                } else {
                    (HoldState::Releasing { kind, none_frames }, StepEvent::Held)
                }
            }

            // The gesture came back within the grace period.
            (HoldState::Releasing { kind, .. }, raw) if raw == kind => (
                HoldState::Confirmed {
                    kind,
                    candidate: None,
                },
                StepEvent::Held,
            ),

            // A different kind during the grace period becomes a candidate.
            (HoldState::Releasing { kind, .. }, raw) => (
                HoldState::Confirmed {
                    kind,
                    candidate: Some(Candidate {
                        kind: raw,
                        frames: 1,
                    }),
                },
                StepEvent::Held,
            ),
        }
    }

    fn advance_candidate(
        candidate: Option<Candidate>,
        kind: GestureKind,
        config: &StabilizerConfig,
    ) -> (HoldState, StepEvent) {
        let frames = match candidate {
            Some(c) if c.kind == kind => c.frames + 1,
            _ => 1,
        };
        if frames >= config.hold_frames {
            (
                HoldState::Confirmed {
                    kind,
                    candidate: None,
                },
                StepEvent::Confirmed(kind),
            )
        } else {
            (
                HoldState::Acquiring(Candidate { kind, frames }),
                StepEvent::Held,
            )
        }
    }
}

/// Turns the noisy raw stream into a debounced, smoothed control signal
#[derive(Debug, Default)]
pub struct GestureStabilizer {
    config: StabilizerConfig,
    state: HoldState,
    smoothed_dx: f32,
    smoothed_dy: f32,
    smoothed_dz: f32,
}

impl GestureStabilizer {
    pub fn new() -> Self {
        Self::with_config(StabilizerConfig::default())
    }

    pub fn with_config(config: StabilizerConfig) -> Self {
        Self {
            config,
            state: HoldState::Idle,
            smoothed_dx: 0.0,
            smoothed_dy: 0.0,
            smoothed_dz: 0.0,
        }
    }

    /// Current hysteresis state, for diagnostics.
    pub fn hold_state(&self) -> HoldState {
        self.state
    }

    /// Feed one raw classification and get the stabilized signal for this
    /// tick.
    pub fn push(&mut self, raw: &GestureState) -> GestureState {
        let (next, event) = self.state.step(raw.kind, &self.config);
        self.state = next;

        match event {
            StepEvent::Confirmed(kind) => {
                // Stale smoothing from a previous gesture would cause a
                // visible jump on the first confirmed frame.
                self.zero_deltas();
                debug!(?kind, "gesture confirmed");
            }
            StepEvent::Released(kind) => {
                self.zero_deltas();
                debug!(?kind, "gesture released");
            }
            StepEvent::Held => {}
        }

        let confirmed = self.state.confirmed_kind();
        if confirmed == GestureKind::None {
            return GestureState::idle();
        }

        // Smooth only frames that agree with the confirmed kind; mismatched
        // frames are noise and must not decay the signal toward zero.
        if raw.kind == confirmed {
            let alpha = self.config.alpha(confirmed);
            self.smoothed_dx = ema(self.smoothed_dx, raw.dx, alpha);
            self.smoothed_dy = ema(self.smoothed_dy, raw.dy, alpha);
            self.smoothed_dz = ema(self.smoothed_dz, raw.dz, alpha);
        }

        GestureState::active(
            confirmed,
            raw.confidence,
            self.smoothed_dx,
            self.smoothed_dy,
            self.smoothed_dz,
        )
    }

    /// Full reset for session teardown: no hysteresis state may leak into
    /// the next capture session.
    pub fn reset(&mut self) {
        self.state = HoldState::Idle;
        self.zero_deltas();
    }

    fn zero_deltas(&mut self) {
        self.smoothed_dx = 0.0;
        self.smoothed_dy = 0.0;
        self.smoothed_dz = 0.0;
    }
}

fn ema(smoothed: f32, raw: f32, alpha: f32) -> f32 {
    smoothed * (1.0 - alpha) + raw * alpha
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: GestureKind, dx: f32) -> GestureState {
        match kind {
            GestureKind::None => GestureState::idle(),
            _ => GestureState::active(kind, 0.9, dx, 0.0, 0.0),
        }
    }

    fn config() -> StabilizerConfig {
        StabilizerConfig {
            hold_frames: 4,
            release_frames: 3,
            rotate_alpha: 0.5,
            pan_alpha: 0.5,
            zoom_alpha: 0.5,
        }
    }

    #[test]
    fn test_acquisition_requires_full_hold() {
        let mut stabilizer = GestureStabilizer::with_config(config());

        // One frame short of the threshold never confirms.
        for _ in 0..3 {
            let out = stabilizer.push(&raw(GestureKind::Rotate, 1.0));
            assert_eq!(out.kind, GestureKind::None);
        }
        let out = stabilizer.push(&GestureState::idle());
        assert_eq!(out.kind, GestureKind::None);
        assert_eq!(stabilizer.hold_state(), HoldState::Idle);
    }

    #[test]
    fn test_acquisition_confirms_on_threshold_frame() {
        let mut stabilizer = GestureStabilizer::with_config(config());

        for i in 0..4 {
            let out = stabilizer.push(&raw(GestureKind::Rotate, 1.0));
            if i < 3 {
                assert_eq!(out.kind, GestureKind::None, "frame {i} confirmed early");
            } else {
                assert_eq!(out.kind, GestureKind::Rotate);
                // Deltas were reset at the commit, then one EMA step ran.
                assert!((out.dx - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_candidate_resets_on_kind_change() {
        let mut stabilizer = GestureStabilizer::with_config(config());

        stabilizer.push(&raw(GestureKind::Rotate, 0.0));
        stabilizer.push(&raw(GestureKind::Rotate, 0.0));
        stabilizer.push(&raw(GestureKind::Pan, 0.0));

        // Pan restarted the count, so two more pan frames are not enough.
        let out = stabilizer.push(&raw(GestureKind::Pan, 0.0));
        assert_eq!(out.kind, GestureKind::None);
    }

    #[test]
    fn test_release_grace_period() {
        let mut stabilizer = GestureStabilizer::with_config(config());
        for _ in 0..4 {
            stabilizer.push(&raw(GestureKind::Rotate, 1.0));
        }

        // Up to release_frames empty frames keep the gesture alive.
        for _ in 0..3 {
            let out = stabilizer.push(&GestureState::idle());
            assert_eq!(out.kind, GestureKind::Rotate);
        }

        // One more ends it, with deltas zeroed.
        let out = stabilizer.push(&GestureState::idle());
        assert_eq!(out, GestureState::idle());
        assert_eq!(stabilizer.hold_state(), HoldState::Idle);
    }

    #[test]
    fn test_dropout_recovery_keeps_gesture() {
        let mut stabilizer = GestureStabilizer::with_config(config());
        for _ in 0..4 {
            stabilizer.push(&raw(GestureKind::Rotate, 1.0));
        }

        stabilizer.push(&GestureState::idle());
        let out = stabilizer.push(&raw(GestureKind::Rotate, 1.0));
        assert_eq!(out.kind, GestureKind::Rotate);
    }

    #[test]
    fn test_mismatched_frame_holds_smoothed_value() {
        let mut stabilizer = GestureStabilizer::with_config(config());
        for _ in 0..4 {
            stabilizer.push(&raw(GestureKind::Rotate, 1.0));
        }
        let before = stabilizer.push(&raw(GestureKind::Rotate, 1.0));

        // A single pan frame must not decay the rotate signal.
        let during = stabilizer.push(&raw(GestureKind::Pan, 9.0));
        assert_eq!(during.kind, GestureKind::Rotate);
        assert_eq!(during.dx, before.dx);
    }

    #[test]
    fn test_switch_to_new_kind_resets_smoothing() {
        let mut stabilizer = GestureStabilizer::with_config(config());
        for _ in 0..4 {
            stabilizer.push(&raw(GestureKind::Rotate, 2.0));
        }

        // Sustained pan takes over after hold_frames frames.
        let mut out = GestureState::idle();
        for _ in 0..4 {
            out = stabilizer.push(&raw(GestureKind::Pan, 1.0));
        }
        assert_eq!(out.kind, GestureKind::Pan);
        // Fresh accumulator: exactly one EMA step from zero.
        assert!((out.dx - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoothing_converges_toward_raw() {
        let mut stabilizer = GestureStabilizer::with_config(config());
        let mut out = GestureState::idle();
        for _ in 0..20 {
            out = stabilizer.push(&raw(GestureKind::Rotate, 1.0));
        }
        assert_eq!(out.kind, GestureKind::Rotate);
        assert!(out.dx > 0.99);
        assert!(out.dx <= 1.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stabilizer = GestureStabilizer::with_config(config());
        for _ in 0..4 {
            stabilizer.push(&raw(GestureKind::Zoom, 1.0));
        }

        stabilizer.reset();
        assert_eq!(stabilizer.hold_state(), HoldState::Idle);
        let out = stabilizer.push(&GestureState::idle());
        assert_eq!(out, GestureState::idle());
    }
}
