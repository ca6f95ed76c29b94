#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f32 = 1e-5;

#[test]
fn viewport_aspect() {
    assert_eq!(Viewport::new(1920, 1080).aspect(), 1920.0 / 1080.0);
    assert_eq!(Viewport::new(0, 1080).aspect(), 1.0);
    assert_eq!(Viewport::new(300, 0).aspect(), 1.0);
    assert!(Viewport::default().is_empty());
}

#[test]
fn camera_defaults_to_fixed_distance_facing_origin() {
    let cam = Camera::default();
    assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
    assert_eq!(cam.target, Vec3::ZERO);
}

#[test]
fn camera_projects_origin_to_screen_center() {
    let cam = Camera {
        aspect: 16.0 / 9.0,
        ..Camera::default()
    };
    let clip = cam.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < EPSILON);
    assert!(ndc.y.abs() < EPSILON);
    assert!(ndc.z > -1.0 && ndc.z < 1.0);
}

#[test]
fn transform_identity_matrix() {
    assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
}

#[test]
fn transform_applies_scale_then_translation() {
    let t = Transform {
        position: Vec3::new(1.0, 2.0, 3.0),
        rotation: Vec3::ZERO,
        scale: 2.0,
    };
    let p = t.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
    assert!((p - Vec3::new(3.0, 2.0, 3.0)).length() < EPSILON);
}

#[test]
fn light_radiance_scales_color() {
    let light = Light {
        color: Rgb::new(1.0, 0.5, 0.0),
        intensity: 0.5,
        vector: Vec3::ZERO,
    };
    assert_eq!(light.radiance(), [0.5, 0.25, 0.0]);
}
