//! Per-frame motion for decorative objects.

use glam::Vec3;

use crate::backend::{Camera, Transform};
use crate::color::Rgb;
use crate::consts::{
    CAMERA_DISTANCE, CAMERA_DRIFT_SPEED, CAMERA_DRIFT_X, CAMERA_DRIFT_Y, COLOR_LIGHTNESS,
    COLOR_SATURATION, HUE_INDEX_STEP, HUE_SPEED, MAX_FRAME_DELTA_MS, PULSE_AMPLITUDE,
};
use crate::factory::AnimationProfile;

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
}

/// Animation time that only advances while frames are being delivered.
///
/// The first frame after a resume contributes no time, so a pause never shows
/// up as a jump in motion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    elapsed_ms: f64,
    last_ms: Option<f64>,
}

impl FrameClock {
    /// Account for a frame delivered at `now_ms` and return elapsed seconds.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        if let Some(last) = self.last_ms {
            self.elapsed_ms += (now_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS);
        }
        self.last_ms = Some(now_ms);
        self.elapsed()
    }

    /// Forget the last frame timestamp.
    pub fn suspend(&mut self) {
        self.last_ms = None;
    }

    #[must_use]
    pub fn elapsed(&self) -> f32 {
        (self.elapsed_ms / 1000.0) as f32
    }
}

/// Advance one object to `elapsed` seconds and return its display color.
///
/// `index` is the object's position in its surface; it offsets every phase so
/// that neighbours do not move in lockstep.
pub fn advance_object(
    transform: &mut Transform,
    profile: &AnimationProfile,
    size: f32,
    index: usize,
    elapsed: f32,
) -> Rgb {
    let phase = index as f32;

    let spun = transform.rotation + profile.rotation_speed();
    transform.rotation = spun.map(|r| r.rem_euclid(std::f32::consts::TAU));

    let origin = profile.origin();
    let lift = (elapsed * profile.float_speed() + phase).sin() * profile.float_amplitude();
    transform.position = Vec3::new(origin.x, origin.y + lift, origin.z);

    let pulse = 1.0 + (elapsed * profile.pulse_speed() + phase).sin() * PULSE_AMPLITUDE;
    transform.scale = size * pulse;

    Rgb::from_hsl(
        elapsed * HUE_SPEED + phase * HUE_INDEX_STEP,
        COLOR_SATURATION,
        COLOR_LIGHTNESS,
    )
}

/// Move the camera along its small drift path, still looking at the origin.
pub fn camera_drift(camera: &mut Camera, elapsed: f32) {
    let angle = elapsed * CAMERA_DRIFT_SPEED;
    camera.position = Vec3::new(
        angle.sin() * CAMERA_DRIFT_X,
        angle.cos() * CAMERA_DRIFT_Y,
        CAMERA_DISTANCE,
    );
    camera.target = Vec3::ZERO;
}
