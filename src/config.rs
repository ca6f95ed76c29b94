//! Page-level configuration: which surfaces exist and what they contain.
//!
//! The defaults describe the stock page layout. A page can override any field
//! with a JSON document; missing fields keep their defaults.

use rand::Rng;
use serde::{Deserialize, Deserializer};

use crate::color::{Palette, Rgb};
use crate::consts::{
    HERO_FOCAL_COUNT, HERO_FOCAL_SIZE, HERO_PER_KIND, RANDOM_SIZE_MAX, RANDOM_SIZE_MIN,
    SECONDARY_OBJECT_COUNT, STAGGER_MS, STARTUP_DELAY_MS, VISIBILITY_THRESHOLD,
};
use crate::shape::{ObjectOptions, ShapeKind};

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Shape kinds that make up the body of the hero surface.
const HERO_KINDS: [ShapeKind; 5] = [
    ShapeKind::Sphere,
    ShapeKind::Cube,
    ShapeKind::Torus,
    ShapeKind::Octahedron,
    ShapeKind::Icosahedron,
];

/// Kind of the oversized focal objects on the hero surface.
const HERO_FOCAL_KIND: ShapeKind = ShapeKind::Icosahedron;

/// How a surface is populated when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ObjectMix {
    /// A fixed spread over five kinds plus a few large focal objects.
    Hero,
    /// `count` objects of random kind and size.
    Random {
        #[serde(default = "default_random_count")]
        count: usize,
    },
}

fn default_random_count() -> usize {
    SECONDARY_OBJECT_COUNT
}

impl Default for ObjectMix {
    fn default() -> Self {
        Self::Random {
            count: SECONDARY_OBJECT_COUNT,
        }
    }
}

impl ObjectMix {
    /// The shapes and options to create, in order.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(ShapeKind, ObjectOptions)> {
        match *self {
            Self::Hero => {
                let body = HERO_KINDS.iter().flat_map(|&kind| {
                    std::iter::repeat((kind, ObjectOptions::default())).take(HERO_PER_KIND)
                });
                let focal = (HERO_FOCAL_KIND, ObjectOptions::with_size(HERO_FOCAL_SIZE));
                let focal = std::iter::repeat(focal).take(HERO_FOCAL_COUNT);
                body.chain(focal).collect()
            }
            Self::Random { count } => (0..count)
                .map(|_| {
                    let kind = ShapeKind::random(rng);
                    let size = rng.random_range(RANDOM_SIZE_MIN..RANDOM_SIZE_MAX);
                    (kind, ObjectOptions::with_size(size))
                })
                .collect(),
        }
    }
}

/// One drawable target and how to fill it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurfaceSpec {
    pub target: String,
    pub colors: [Rgb; 2],
    #[serde(default)]
    pub mix: ObjectMix,
}

impl SurfaceSpec {
    #[must_use]
    pub fn new(target: &str, primary: u32, secondary: u32, mix: ObjectMix) -> Self {
        Self {
            target: target.to_owned(),
            colors: [Rgb::from_hex(primary), Rgb::from_hex(secondary)],
            mix,
        }
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette::from(self.colors)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Created synchronously on start-up.
    pub hero: Option<SurfaceSpec>,
    /// Created later, one at a time.
    pub secondary: Vec<SurfaceSpec>,
    pub startup_delay_ms: u32,
    pub stagger_ms: u32,
    /// Fraction of a surface that must be on-screen for it to animate, in `0.0..=1.0`.
    #[serde(deserialize_with = "unit_fraction")]
    pub visibility_threshold: f64,
    /// Honour `prefers-reduced-motion` by presenting still frames.
    pub respect_reduced_motion: bool,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

fn unit_fraction<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format_args!(
            "visibility_threshold must be within 0..=1, got {value}"
        )))
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            hero: Some(SurfaceSpec::new("hero-canvas", 0x6366f1, 0x8b5cf6, ObjectMix::Hero)),
            secondary: vec![
                SurfaceSpec::new("about-canvas", 0x06b6d4, 0x3b82f6, ObjectMix::default()),
                SurfaceSpec::new("services-canvas", 0xec4899, 0xf43f5e, ObjectMix::default()),
                SurfaceSpec::new("work-canvas", 0x10b981, 0x14b8a6, ObjectMix::default()),
                SurfaceSpec::new("contact-canvas", 0xf59e0b, 0xef4444, ObjectMix::default()),
            ],
            startup_delay_ms: STARTUP_DELAY_MS,
            stagger_ms: STAGGER_MS,
            visibility_threshold: VISIBILITY_THRESHOLD,
            respect_reduced_motion: true,
            log_level: "info".to_owned(),
        }
    }
}

impl PoolConfig {
    /// Parse a JSON override document.
    ///
    /// # Errors
    ///
    /// Malformed JSON, unknown mix kinds, invalid colors or a visibility
    /// threshold outside `0..=1`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Delay before the secondary surface at `index` is created.
    #[must_use]
    pub fn delay_for(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.startup_delay_ms
            .saturating_add(self.stagger_ms.saturating_mul(index))
    }

    /// The configured log level, `Info` when unrecognized.
    #[must_use]
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
