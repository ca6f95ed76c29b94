//! Shape vocabulary and per-object construction options.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer};

use crate::consts::{DEFAULT_DETAIL, DEFAULT_SEGMENTS, DEFAULT_SIZE};

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

/// The primitive shapes a decorative object can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    #[default]
    Sphere,
    Cube,
    Torus,
    Octahedron,
    Icosahedron,
    Tetrahedron,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Sphere,
        ShapeKind::Cube,
        ShapeKind::Torus,
        ShapeKind::Octahedron,
        ShapeKind::Icosahedron,
        ShapeKind::Tetrahedron,
    ];

    /// Pick one of the six kinds uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Resolve a shape name, falling back to [`ShapeKind::Sphere`] for anything unknown.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Cube => "cube",
            Self::Torus => "torus",
            Self::Octahedron => "octahedron",
            Self::Icosahedron => "icosahedron",
            Self::Tetrahedron => "tetrahedron",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Unknown names deserialize as [`ShapeKind::Sphere`], like [`ShapeKind::from_name`].
impl<'de> Deserialize<'de> for ShapeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Construction options for one object. Unset fields take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObjectOptions {
    /// Base size (radius for round shapes, edge length for the cube).
    pub size: f32,
    /// Tessellation for the sphere and torus.
    pub segments: u32,
    /// Subdivision level for the polyhedra.
    pub detail: u32,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            segments: DEFAULT_SEGMENTS,
            detail: DEFAULT_DETAIL,
        }
    }
}

impl ObjectOptions {
    #[must_use]
    pub fn with_size(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}
