//! Shared numeric constants for the decorative animation core.

// ── Camera ──────────────────────────────────────────────────────

/// Distance of the camera from the origin along +Z.
pub const CAMERA_DISTANCE: f32 = 5.0;

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEG: f32 = 75.0;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Amplitude of the horizontal camera drift.
pub const CAMERA_DRIFT_X: f32 = 0.5;

/// Amplitude of the vertical camera drift.
pub const CAMERA_DRIFT_Y: f32 = 0.3;

/// Angular speed of the camera drift (radians per second).
pub const CAMERA_DRIFT_SPEED: f32 = 0.1;

// ── Object defaults ─────────────────────────────────────────────

pub const DEFAULT_SIZE: f32 = 0.8;
pub const DEFAULT_SEGMENTS: u32 = 32;
pub const DEFAULT_DETAIL: u32 = 0;

// ── Randomization ranges (half-open) ────────────────────────────

/// Half extent of the initial position on X and Y.
pub const POSITION_SPREAD_XY: f32 = 4.0;

/// Half extent of the initial position on Z.
pub const POSITION_SPREAD_Z: f32 = 2.0;

/// Half extent of the per-axis rotation velocity (radians per frame).
pub const ROTATION_SPEED_MAX: f32 = 0.01;

/// Float frequency range (radians per second).
pub const FLOAT_SPEED_MIN: f32 = 0.5;
pub const FLOAT_SPEED_MAX: f32 = 1.5;

/// Float amplitude range (world units).
pub const FLOAT_AMPLITUDE_MIN: f32 = 0.1;
pub const FLOAT_AMPLITUDE_MAX: f32 = 0.6;

/// Pulse frequency range (radians per second).
pub const PULSE_SPEED_MIN: f32 = 0.5;
pub const PULSE_SPEED_MAX: f32 = 1.5;

/// Relative amplitude of the scale pulse.
pub const PULSE_AMPLITUDE: f32 = 0.1;

/// Size range for randomly sized objects on secondary surfaces.
pub const RANDOM_SIZE_MIN: f32 = 0.3;
pub const RANDOM_SIZE_MAX: f32 = 0.8;

// ── Color cycling ───────────────────────────────────────────────

/// Hue turns per second.
pub const HUE_SPEED: f32 = 0.05;

/// Hue offset between consecutive objects (in turns).
pub const HUE_INDEX_STEP: f32 = 0.1;

pub const COLOR_SATURATION: f32 = 0.7;
pub const COLOR_LIGHTNESS: f32 = 0.6;

// ── Frame clock ─────────────────────────────────────────────────

/// Upper bound on the time advanced by a single frame, in milliseconds.
pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

// ── Pool ────────────────────────────────────────────────────────

/// Delay before the first secondary surface is created.
pub const STARTUP_DELAY_MS: u32 = 200;

/// Spacing between consecutive secondary surfaces.
pub const STAGGER_MS: u32 = 100;

/// Objects per secondary surface.
pub const SECONDARY_OBJECT_COUNT: usize = 3;

/// Objects of each kind on the hero surface.
pub const HERO_PER_KIND: usize = 4;

/// Oversized focal objects on the hero surface.
pub const HERO_FOCAL_COUNT: usize = 3;

/// Size of the hero focal objects.
pub const HERO_FOCAL_SIZE: f32 = 1.5;

/// Fraction of a surface that must intersect the viewport to count as visible.
pub const VISIBILITY_THRESHOLD: f64 = 0.1;
