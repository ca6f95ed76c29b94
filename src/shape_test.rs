#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

#[test]
fn names_resolve_case_insensitively() {
    assert_eq!(ShapeKind::from_name("Torus"), ShapeKind::Torus);
    assert_eq!(ShapeKind::from_name(" ICOSAHEDRON "), ShapeKind::Icosahedron);
}

#[test]
fn every_kind_resolves_from_its_name() {
    for kind in ShapeKind::ALL {
        assert_eq!(ShapeKind::from_name(kind.name()), kind);
        assert_eq!(kind.to_string(), kind.name());
    }
}

#[test]
fn unknown_name_falls_back_to_sphere() {
    assert_eq!(ShapeKind::from_name("dodecahedron"), ShapeKind::Sphere);
    assert_eq!(ShapeKind::from_name(""), ShapeKind::Sphere);
}

#[test]
fn random_covers_all_kinds() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..600 {
        seen.insert(ShapeKind::random(&mut rng));
    }
    assert_eq!(seen.len(), ShapeKind::ALL.len());
}

#[test]
fn options_default() {
    let opts = ObjectOptions::default();
    assert_eq!(opts.size, 0.8);
    assert_eq!(opts.segments, 32);
    assert_eq!(opts.detail, 0);
}

#[test]
fn options_partial_override_keeps_defaults() {
    let opts: ObjectOptions = serde_json::from_str(r#"{"size": 1.5}"#).unwrap();
    assert_eq!(opts.size, 1.5);
    assert_eq!(opts.segments, 32);
    assert_eq!(opts.detail, 0);

    let opts: ObjectOptions = serde_json::from_str(r#"{"detail": 2, "segments": 8}"#).unwrap();
    assert_eq!(opts.size, 0.8);
    assert_eq!(opts.segments, 8);
    assert_eq!(opts.detail, 2);
}

#[test]
fn with_size_overrides_only_size() {
    let opts = ObjectOptions::with_size(0.4);
    assert_eq!(opts.size, 0.4);
    assert_eq!(opts.segments, ObjectOptions::default().segments);
}

#[test]
fn deserializes_lowercase_kind() {
    let kind: ShapeKind = serde_json::from_str("\"octahedron\"").unwrap();
    assert_eq!(kind, ShapeKind::Octahedron);
}

#[test]
fn deserializing_unknown_kind_falls_back_to_sphere() {
    let kind: ShapeKind = serde_json::from_str("\"dodecahedron\"").unwrap();
    assert_eq!(kind, ShapeKind::Sphere);
    let kind: ShapeKind = serde_json::from_str("\"Torus\"").unwrap();
    assert_eq!(kind, ShapeKind::Torus);
    assert!(serde_json::from_str::<ShapeKind>("3").is_err());
}
