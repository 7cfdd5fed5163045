//! Flight animator: banking / vertical-loop motion for the aircraft,
//! camera orbit and sea texture scroll.
//!
//! The animator owns only its phase accumulators. It never reads the scene:
//! the frame driver passes a [`FrameInput`] in and applies the returned
//! [`FrameDelta`]. Every phase advances by a fixed step per call, so motion is
//! tied to the number of frames, not to `dt`.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

const ROLL_STEP: f64 = 0.02;
const LOOP_STEP: f64 = 0.05;
const CAMERA_STEP: f64 = 0.01;
const SCROLL_STEP: f64 = 0.04;

/// Peak bank angle in degrees.
const ROLL_AMPLITUDE_DEG: f64 = 25.0;
const LOOP_RADIUS: f64 = 20.0;
const CAMERA_ORBIT_RADIUS: f64 = 400.0;

/// Discrete flight mode, cycled by user clicks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationState {
    /// Roll back and forth in place.
    #[default]
    Bank,
    /// Fly one vertical loop while still rolling, then fall back to `Bank`.
    Loop,
}

impl AnimationState {
    /// Next mode in the `Bank -> Loop -> Bank` cycle.
    #[inline]
    pub fn next(self) -> Self {
        match self {
            AnimationState::Bank => AnimationState::Loop,
            AnimationState::Loop => AnimationState::Bank,
        }
    }
}

/// Per-frame readiness signals and the aircraft's current position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub has_moving_object: bool,
    pub has_water_surface: bool,
    /// Position of the moving object before this frame's update.
    pub object_position: DVec3,
}

/// Additive motion produced while looping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopStep {
    /// Added to the object's position (y = up, z = forward).
    pub translation: DVec3,
    /// Added to the object's pitch (X rotation), in degrees.
    pub pitch_degrees: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AircraftDelta {
    /// Absolute roll (Z rotation) in degrees; replaces the current value.
    pub roll_degrees: f64,
    /// `None` in `Bank` mode.
    pub loop_step: Option<LoopStep>,
}

/// Absolute camera position on the horizontal orbit circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraOrbit {
    pub x: f64,
    pub z: f64,
}

/// Everything one `advance` call asks the scene to change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameDelta {
    pub aircraft: Option<AircraftDelta>,
    /// Camera target: the moving object's position after this frame's update.
    pub look_at: Option<DVec3>,
    pub camera: CameraOrbit,
    /// Absolute sea texture V-offset.
    pub scroll_offset: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Animator {
    mode: AnimationState,
    roll_phase: f64,
    loop_phase: f64,
    camera_phase: f64,
    scroll_offset: f64,
    elapsed: f64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in `mode` with a preset loop phase (used to resume mid-maneuver).
    pub fn with_loop_phase(mode: AnimationState, loop_phase: f64) -> Self {
        Self {
            mode,
            loop_phase,
            ..Self::default()
        }
    }

    #[inline]
    pub fn mode(&self) -> AnimationState {
        self.mode
    }

    #[inline]
    pub fn roll_phase(&self) -> f64 {
        self.roll_phase
    }

    #[inline]
    pub fn loop_phase(&self) -> f64 {
        self.loop_phase
    }

    #[inline]
    pub fn camera_phase(&self) -> f64 {
        self.camera_phase
    }

    #[inline]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Total of all `dt` values seen so far. Diagnostics only.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Cycle to the next mode. No accumulator is reset.
    pub fn toggle_mode(&mut self) -> AnimationState {
        self.mode = self.mode.next();
        self.mode
    }

    /// Advance one frame. `dt` only feeds the elapsed-time counter.
    pub fn advance(&mut self, dt: f64, input: FrameInput) -> FrameDelta {
        let aircraft = input
            .has_moving_object
            .then(|| self.step_aircraft(input.object_position));

        // Single look-at after the position update; nothing else moves the
        // object before the camera is placed.
        let look_at = aircraft.map(|a| {
            input.object_position + a.loop_step.map_or(DVec3::ZERO, |s| s.translation)
        });

        self.camera_phase += CAMERA_STEP;
        let camera = CameraOrbit {
            x: self.camera_phase.cos() * CAMERA_ORBIT_RADIUS,
            z: self.camera_phase.sin() * CAMERA_ORBIT_RADIUS,
        };

        let scroll_offset = input.has_water_surface.then(|| {
            self.scroll_offset -= SCROLL_STEP;
            self.scroll_offset
        });

        self.elapsed += dt;

        FrameDelta {
            aircraft,
            look_at,
            camera,
            scroll_offset,
        }
    }

    fn step_aircraft(&mut self, position: DVec3) -> AircraftDelta {
        self.roll_phase += ROLL_STEP;
        let roll_degrees = self.roll_phase.sin() * ROLL_AMPLITUDE_DEG;

        let loop_step = match self.mode {
            AnimationState::Bank => None,
            AnimationState::Loop => {
                self.loop_phase += LOOP_STEP;
                let translation = DVec3::new(
                    0.0,
                    self.loop_phase.sin() * LOOP_RADIUS,
                    self.loop_phase.cos() * LOOP_RADIUS,
                );
                let moved = position + translation;
                let pitch_degrees = -(PI / 180.0) * moved.z.atan2(moved.y);

                if self.loop_phase > TAU {
                    self.loop_phase = 0.0;
                    self.mode = AnimationState::Bank;
                    log::debug!("Loop complete, back to {:?}", self.mode);
                }

                Some(LoopStep {
                    translation,
                    pitch_degrees,
                })
            }
        };

        AircraftDelta {
            roll_degrees,
            loop_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn with_aircraft(position: DVec3) -> FrameInput {
        FrameInput {
            has_moving_object: true,
            has_water_surface: true,
            object_position: position,
        }
    }

    #[test]
    fn starts_banking_with_zeroed_phases() {
        let a = Animator::new();
        assert_eq!(a.mode(), AnimationState::Bank);
        assert_eq!(a.roll_phase(), 0.0);
        assert_eq!(a.loop_phase(), 0.0);
        assert_eq!(a.camera_phase(), 0.0);
        assert_eq!(a.elapsed(), 0.0);
    }

    #[test]
    fn bank_never_moves_the_aircraft() {
        let mut a = Animator::new();
        for dt in [0.0, 0.016, 0.5, 3.0] {
            let d = a.advance(dt, with_aircraft(DVec3::new(0.0, 200.0, 0.0)));
            let aircraft = d.aircraft.expect("aircraft delta");
            assert!(aircraft.loop_step.is_none());
            assert_eq!(a.loop_phase(), 0.0);
        }
    }

    #[test]
    fn bank_roll_follows_sine_of_roll_phase() {
        let mut a = Animator::new();
        let d = a.advance(0.016, with_aircraft(DVec3::ZERO));
        let roll = d.aircraft.unwrap().roll_degrees;
        assert!((roll - 0.02f64.sin() * 25.0).abs() < EPS);
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut a = Animator::new();
        assert_eq!(a.toggle_mode(), AnimationState::Loop);
        assert_eq!(a.toggle_mode(), AnimationState::Bank);
        assert_eq!(AnimationState::Bank.next().next(), AnimationState::Bank);
    }

    #[test]
    fn toggle_keeps_accumulators() {
        let mut a = Animator::with_loop_phase(AnimationState::Loop, 1.0);
        a.advance(0.016, with_aircraft(DVec3::ZERO));
        let roll = a.roll_phase();
        let lp = a.loop_phase();
        a.toggle_mode();
        assert_eq!(a.roll_phase(), roll);
        assert_eq!(a.loop_phase(), lp);
    }

    #[test]
    fn loop_reverts_to_bank_after_full_revolution() {
        let mut a = Animator::with_loop_phase(AnimationState::Loop, TAU - 0.06);
        a.advance(0.016, with_aircraft(DVec3::new(0.0, 200.0, 0.0)));
        assert_eq!(a.mode(), AnimationState::Loop);
        assert!(a.loop_phase() < TAU);

        let d = a.advance(0.016, with_aircraft(DVec3::new(0.0, 200.0, 0.0)));
        assert!(d.aircraft.unwrap().loop_step.is_some());
        assert_eq!(a.mode(), AnimationState::Bank);
        assert_eq!(a.loop_phase(), 0.0);
    }

    #[test]
    fn roll_depends_on_call_count_not_dt() {
        let mut slow = Animator::new();
        let mut fast = Animator::new();
        for i in 0..50 {
            let a = slow.advance(0.001 * f64::from(i), with_aircraft(DVec3::ZERO));
            let b = fast.advance(0.25, with_aircraft(DVec3::ZERO));
            assert_eq!(
                a.aircraft.unwrap().roll_degrees,
                b.aircraft.unwrap().roll_degrees
            );
        }
    }

    #[test]
    fn roll_is_periodic_in_frame_count() {
        // Period is 2π / 0.02 frames (~314.16), so frame n and n + 314 are
        // close but not identical; check the closed form and the bound.
        let mut a = Animator::new();
        for n in 1..=700 {
            let d = a.advance(0.016, with_aircraft(DVec3::ZERO));
            let roll = d.aircraft.unwrap().roll_degrees;
            let expected = (f64::from(n) * ROLL_STEP).sin() * ROLL_AMPLITUDE_DEG;
            assert!((roll - expected).abs() < 1e-6);
            assert!(roll.abs() <= ROLL_AMPLITUDE_DEG);
        }
    }

    #[test]
    fn zero_dt_still_steps_every_phase() {
        let mut a = Animator::with_loop_phase(AnimationState::Loop, 0.0);
        a.advance(0.0, with_aircraft(DVec3::new(0.0, 200.0, 0.0)));
        assert!((a.roll_phase() - 0.02).abs() < EPS);
        assert!((a.loop_phase() - 0.05).abs() < EPS);
        assert!((a.camera_phase() - 0.01).abs() < EPS);
        assert!((a.scroll_offset() + 0.04).abs() < EPS);
        assert_eq!(a.elapsed(), 0.0);
    }

    #[test]
    fn missing_aircraft_still_orbits_camera() {
        let mut a = Animator::new();
        let d = a.advance(
            0.016,
            FrameInput {
                has_moving_object: false,
                has_water_surface: false,
                object_position: DVec3::ZERO,
            },
        );
        assert!(d.aircraft.is_none());
        assert!(d.look_at.is_none());
        assert!(d.scroll_offset.is_none());
        assert!((d.camera.x - 0.01f64.cos() * 400.0).abs() < EPS);
        assert!((d.camera.z - 0.01f64.sin() * 400.0).abs() < EPS);
        assert_eq!(a.roll_phase(), 0.0);
        assert!((a.elapsed() - 0.016).abs() < EPS);
    }

    #[test]
    fn ten_loop_frames_match_pitch_formula() {
        let mut a = Animator::new();
        assert_eq!(a.toggle_mode(), AnimationState::Loop);

        let mut position = DVec3::new(0.0, 200.0, 0.0);
        let mut last = None;
        for _ in 0..10 {
            let d = a.advance(0.016, with_aircraft(position));
            let step = d.aircraft.unwrap().loop_step.expect("looping");
            position += step.translation;
            assert_eq!(d.look_at, Some(position));
            last = Some(step);
        }

        assert!((a.loop_phase() - 0.5).abs() < EPS);
        let expected = -(PI / 180.0) * position.z.atan2(position.y);
        assert!((last.unwrap().pitch_degrees - expected).abs() < EPS);
        assert!((a.elapsed() - 0.16).abs() < EPS);
    }

    #[test]
    fn scroll_offset_accumulates_only_with_water() {
        let mut a = Animator::new();
        let dry = FrameInput {
            has_moving_object: true,
            has_water_surface: false,
            object_position: DVec3::ZERO,
        };
        a.advance(0.016, dry);
        assert_eq!(a.scroll_offset(), 0.0);

        let d1 = a.advance(0.016, with_aircraft(DVec3::ZERO));
        let d2 = a.advance(0.016, with_aircraft(DVec3::ZERO));
        assert!((d1.scroll_offset.unwrap() + 0.04).abs() < EPS);
        assert!((d2.scroll_offset.unwrap() + 0.08).abs() < EPS);
    }
}
