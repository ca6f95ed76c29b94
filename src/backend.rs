//! Capabilities the animation core needs from its host.
//!
//! The core never touches the DOM or a graphics API directly. A
//! [`RenderHost`] turns a target id into a [`Renderer`] bound to that target,
//! a [`FrameScheduler`] delivers one-shot frame callbacks, and a
//! [`StartupScheduler`] delivers delayed surface creation. The browser
//! implementations live in the `wasm` module; tests use in-memory fakes.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::color::Rgb;
use crate::consts::{CAMERA_DISTANCE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR};
use crate::error::SurfaceError;
use crate::geometry::Geometry;

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

/// Visible size of a drawable target in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; `1.0` while the target has no visible area.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Perspective camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
            target: Vec3::ZERO,
            fov_y_deg: CAMERA_FOV_DEG,
            aspect: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

impl Camera {
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Rgb,
    pub intensity: f32,
    /// Direction toward the light for directional lights, world position for point lights.
    pub vector: Vec3,
}

impl Light {
    /// Color premultiplied by intensity.
    #[must_use]
    pub fn radiance(&self) -> [f32; 3] {
        (Vec3::from_array(self.color.to_array()) * self.intensity).to_array()
    }
}

/// Ambient + directional + point lighting shared by every surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub ambient: Light,
    pub directional: Light,
    pub point: Light,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: Light {
                color: Rgb::WHITE,
                intensity: 0.5,
                vector: Vec3::ZERO,
            },
            directional: Light {
                color: Rgb::WHITE,
                intensity: 0.8,
                vector: Vec3::new(5.0, 5.0, 5.0),
            },
            point: Light {
                color: Rgb::from_hex(0x8b5cf6),
                intensity: 1.0,
                vector: Vec3::new(-5.0, -5.0, 5.0),
            },
        }
    }
}

/// Position, Euler rotation (XYZ, radians) and uniform scale of one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Transform {
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        let rotation =
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rotation, self.position)
    }
}

/// A rendering context bound to one drawable target.
pub trait Renderer {
    /// Handle to one renderable object owned by this context.
    type Mesh;

    /// The target's current visible size.
    fn visible_size(&self) -> Viewport;

    /// Resize the output sink.
    fn set_viewport(&mut self, viewport: Viewport);

    fn create_mesh(&mut self, geometry: &Geometry, color: Rgb) -> Result<Self::Mesh, SurfaceError>;

    fn update_mesh(&mut self, mesh: &Self::Mesh, transform: &Transform, color: Rgb);

    fn dispose_mesh(&mut self, mesh: Self::Mesh);

    /// Draw every live mesh from the camera's point of view.
    fn present(&mut self, camera: &Camera);

    /// Release the context itself. No other method is called afterwards.
    fn release(&mut self);
}

/// Creates renderers for drawable targets.
pub trait RenderHost {
    type Renderer: Renderer;

    /// Bind a new rendering context to `target`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::TargetNotFound`] when no drawable exists for `target`,
    /// [`SurfaceError::ContextCreationFailed`] or
    /// [`SurfaceError::GraphicsUnavailable`] when a context cannot be set up.
    fn create_renderer(
        &mut self,
        target: &str,
        lights: &LightRig,
    ) -> Result<Self::Renderer, SurfaceError>;
}

/// Opaque handle for a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// One-shot "before next frame" callbacks, keyed by target.
///
/// When a requested frame fires, the host calls
/// [`SurfacePool::on_frame`](crate::pool::SurfacePool::on_frame) with the
/// target and a millisecond timestamp.
pub trait FrameScheduler {
    /// Request a callback for `target` before the next frame.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::FrameRequestFailed`] when the host refuses the request.
    fn request_frame(&self, target: &str) -> Result<FrameHandle, SurfaceError>;

    fn cancel_frame(&self, handle: FrameHandle);

    /// Drop any per-target state once the target's binding is disposed.
    fn release(&self, _target: &str) {}
}

/// Delayed one-shot tasks used to stagger surface creation.
///
/// When a task fires, the host calls
/// [`SurfacePool::create_pending`](crate::pool::SurfacePool::create_pending).
pub trait StartupScheduler {
    fn schedule(&self, target: &str, delay_ms: u32);

    /// Cancel every task that has not fired yet.
    fn cancel_all(&self) {}
}
