//! Construction of decorative objects with randomized motion.
//!
//! [`choose_parameters`] is a pure function of its RNG and inputs; every
//! random draw happens there. The ranges live in [`crate::consts`].

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::backend::{Renderer, Transform};
use crate::color::{Palette, Rgb};
use crate::consts::{
    FLOAT_AMPLITUDE_MAX, FLOAT_AMPLITUDE_MIN, FLOAT_SPEED_MAX, FLOAT_SPEED_MIN, POSITION_SPREAD_XY,
    POSITION_SPREAD_Z, PULSE_SPEED_MAX, PULSE_SPEED_MIN, ROTATION_SPEED_MAX,
};
use crate::error::SurfaceError;
use crate::geometry::Geometry;
use crate::shape::{ObjectOptions, ShapeKind};

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

/// Per-instance motion parameters, fixed when the object is created.
///
/// Fields are private so nothing can retune an object after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationProfile {
    rotation_speed: Vec3,
    float_speed: f32,
    float_amplitude: f32,
    pulse_speed: f32,
    origin: Vec3,
}

impl AnimationProfile {
    /// Radians added to each rotation axis per frame.
    #[must_use]
    pub fn rotation_speed(&self) -> Vec3 {
        self.rotation_speed
    }

    #[must_use]
    pub fn float_speed(&self) -> f32 {
        self.float_speed
    }

    #[must_use]
    pub fn float_amplitude(&self) -> f32 {
        self.float_amplitude
    }

    #[must_use]
    pub fn pulse_speed(&self) -> f32 {
        self.pulse_speed
    }

    /// Position the object floats around.
    #[must_use]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }
}

/// Everything randomly chosen for one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectParams {
    pub kind: ShapeKind,
    pub options: ObjectOptions,
    pub color: Rgb,
    pub position: Vec3,
    pub rotation: Vec3,
    pub profile: AnimationProfile,
}

/// Draw color, placement and motion for one object of `kind`.
pub fn choose_parameters<R: Rng + ?Sized>(
    rng: &mut R,
    palette: &Palette,
    kind: ShapeKind,
    options: ObjectOptions,
) -> ObjectParams {
    let color = palette.pick(rng);
    let position = Vec3::new(
        symmetric(rng, POSITION_SPREAD_XY),
        symmetric(rng, POSITION_SPREAD_XY),
        symmetric(rng, POSITION_SPREAD_Z),
    );
    let rotation = Vec3::new(
        rng.random_range(0.0..TAU),
        rng.random_range(0.0..TAU),
        rng.random_range(0.0..TAU),
    );
    let profile = AnimationProfile {
        rotation_speed: Vec3::new(
            symmetric(rng, ROTATION_SPEED_MAX),
            symmetric(rng, ROTATION_SPEED_MAX),
            symmetric(rng, ROTATION_SPEED_MAX),
        ),
        float_speed: rng.random_range(FLOAT_SPEED_MIN..FLOAT_SPEED_MAX),
        float_amplitude: rng.random_range(FLOAT_AMPLITUDE_MIN..FLOAT_AMPLITUDE_MAX),
        pulse_speed: rng.random_range(PULSE_SPEED_MIN..PULSE_SPEED_MAX),
        origin: position,
    };
    ObjectParams {
        kind,
        options,
        color,
        position,
        rotation,
        profile,
    }
}

/// Create one object of `kind` on `renderer`, with freshly drawn parameters.
///
/// # Errors
///
/// Propagates the renderer's failure to allocate the mesh.
pub fn build_object<R, G>(
    renderer: &mut R,
    rng: &mut G,
    palette: &Palette,
    id: ObjectId,
    kind: ShapeKind,
    options: ObjectOptions,
) -> Result<DecorativeObject<R::Mesh>, SurfaceError>
where
    R: Renderer,
    G: Rng + ?Sized,
{
    let params = choose_parameters(rng, palette, kind, options);
    let object = DecorativeObject::new(id, &params, ());
    let mesh = renderer.create_mesh(object.geometry(), params.color)?;
    renderer.update_mesh(&mesh, object.transform(), params.color);
    Ok(object.with_mesh(mesh))
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    rng.random_range(-half..half)
}

/// Identifier of an object within its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// One animated shape owned by a surface.
#[derive(Debug)]
pub struct DecorativeObject<M> {
    id: ObjectId,
    kind: ShapeKind,
    geometry: Geometry,
    size: f32,
    color: Rgb,
    display_color: Rgb,
    profile: AnimationProfile,
    pub(crate) transform: Transform,
    pub(crate) mesh: M,
}

impl<M> DecorativeObject<M> {
    pub(crate) fn new(id: ObjectId, params: &ObjectParams, mesh: M) -> Self {
        Self {
            id,
            kind: params.kind,
            geometry: Geometry::new(params.kind, &params.options),
            size: params.options.size,
            color: params.color,
            display_color: params.color,
            profile: params.profile,
            transform: Transform {
                position: params.position,
                rotation: params.rotation,
                scale: params.options.size,
            },
            mesh,
        }
    }

    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Base size before the pulse is applied.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Palette color chosen at creation.
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Color from the most recent frame.
    #[must_use]
    pub fn display_color(&self) -> Rgb {
        self.display_color
    }

    #[must_use]
    pub fn profile(&self) -> &AnimationProfile {
        &self.profile
    }

    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[must_use]
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    pub(crate) fn set_display_color(&mut self, color: Rgb) {
        self.display_color = color;
    }

    pub(crate) fn into_mesh(self) -> M {
        self.mesh
    }

    fn with_mesh<N>(self, mesh: N) -> DecorativeObject<N> {
        DecorativeObject {
            id: self.id,
            kind: self.kind,
            geometry: self.geometry,
            size: self.size,
            color: self.color,
            display_color: self.display_color,
            profile: self.profile,
            transform: self.transform,
            mesh,
        }
    }
}
