#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

// --- Object mixes ---

#[test]
fn hero_mix_is_twenty_plus_three_focal() {
    let mut rng = SmallRng::seed_from_u64(0);
    let plan = ObjectMix::Hero.plan(&mut rng);
    assert_eq!(plan.len(), 23);

    let mut per_kind: HashMap<ShapeKind, usize> = HashMap::new();
    for (kind, _) in &plan[..20] {
        *per_kind.entry(*kind).or_default() += 1;
    }
    assert_eq!(per_kind.len(), 5);
    assert!(per_kind.values().all(|&n| n == 4));

    for (kind, options) in &plan[20..] {
        assert_eq!(*kind, ShapeKind::Icosahedron);
        assert_eq!(options.size, HERO_FOCAL_SIZE);
    }
}

#[test]
fn random_mix_sizes_in_range() {
    let mut rng = SmallRng::seed_from_u64(1);
    for _ in 0..100 {
        let plan = ObjectMix::default().plan(&mut rng);
        assert_eq!(plan.len(), 3);
        for (_, options) in plan {
            assert!((RANDOM_SIZE_MIN..RANDOM_SIZE_MAX).contains(&options.size));
        }
    }
}

#[test]
fn random_mix_honours_count() {
    let mut rng = SmallRng::seed_from_u64(1);
    assert_eq!(ObjectMix::Random { count: 7 }.plan(&mut rng).len(), 7);
    assert!(ObjectMix::Random { count: 0 }.plan(&mut rng).is_empty());
}

// --- Defaults ---

#[test]
fn default_layout() {
    let config = PoolConfig::default();
    assert_eq!(config.hero.as_ref().unwrap().target, "hero-canvas");
    assert_eq!(config.hero.as_ref().unwrap().mix, ObjectMix::Hero);
    assert_eq!(config.secondary.len(), 4);
    assert!(config.secondary.iter().all(|s| s.mix == ObjectMix::default()));
    assert_eq!(config.visibility_threshold, 0.1);
    assert!(config.respect_reduced_motion);
}

#[test]
fn delays_are_staggered() {
    let config = PoolConfig {
        startup_delay_ms: 200,
        stagger_ms: 100,
        ..PoolConfig::default()
    };
    assert_eq!(config.delay_for(0), 200);
    assert_eq!(config.delay_for(1), 300);
    assert_eq!(config.delay_for(3), 500);
}

#[test]
fn delay_saturates() {
    let config = PoolConfig {
        startup_delay_ms: u32::MAX - 5,
        stagger_ms: 100,
        ..PoolConfig::default()
    };
    assert_eq!(config.delay_for(2), u32::MAX);
}

#[test]
fn log_level_parsing() {
    let mut config = PoolConfig::default();
    assert_eq!(config.log_level(), log::Level::Info);
    config.log_level = "debug".into();
    assert_eq!(config.log_level(), log::Level::Debug);
    config.log_level = "chatty".into();
    assert_eq!(config.log_level(), log::Level::Info);
}

// --- JSON ---

#[test]
fn empty_json_is_default() {
    assert_eq!(PoolConfig::from_json("{}").unwrap(), PoolConfig::default());
}

#[test]
fn json_overrides_fields() {
    let config = PoolConfig::from_json(
        r##"{
            "hero": null,
            "secondary": [
                { "target": "a", "colors": ["#112233", "#445566"] },
                {
                    "target": "b",
                    "colors": ["#000000", "#ffffff"],
                    "mix": { "kind": "random", "count": 5 }
                },
                { "target": "c", "colors": ["#000000", "#ffffff"], "mix": { "kind": "hero" } }
            ],
            "stagger_ms": 40,
            "respect_reduced_motion": false
        }"##,
    )
    .unwrap();

    assert!(config.hero.is_none());
    assert_eq!(config.secondary.len(), 3);
    assert_eq!(config.secondary[0].mix, ObjectMix::default());
    assert_eq!(config.secondary[0].palette().primary, Rgb::from_hex(0x112233));
    assert_eq!(config.secondary[1].mix, ObjectMix::Random { count: 5 });
    assert_eq!(config.secondary[2].mix, ObjectMix::Hero);
    assert_eq!(config.stagger_ms, 40);
    assert_eq!(config.startup_delay_ms, STARTUP_DELAY_MS);
    assert!(!config.respect_reduced_motion);
}

#[test]
fn random_mix_without_count_uses_default() {
    let config = PoolConfig::from_json(
        r##"{ "secondary": [
            { "target": "a", "colors": ["#112233", "#445566"], "mix": { "kind": "random" } }
        ] }"##,
    )
    .unwrap();
    assert_eq!(config.secondary[0].mix, ObjectMix::Random { count: 3 });
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(PoolConfig::from_json("not json").is_err());
    let bad_color = r##"{ "secondary": [ { "target": "a", "colors": ["red", "#445566"] } ] }"##;
    assert!(PoolConfig::from_json(bad_color).is_err());
    let bad_mix = r##"{ "secondary": [
        { "target": "a", "colors": ["#112233", "#445566"], "mix": { "kind": "spiral" } }
    ] }"##;
    assert!(PoolConfig::from_json(bad_mix).is_err());
}

#[test]
fn visibility_threshold_must_be_a_fraction() {
    assert!(PoolConfig::from_json(r#"{ "visibility_threshold": 10.0 }"#).is_err());
    assert!(PoolConfig::from_json(r#"{ "visibility_threshold": -0.5 }"#).is_err());

    let lower = PoolConfig::from_json(r#"{ "visibility_threshold": 0 }"#).unwrap();
    assert_eq!(lower.visibility_threshold, 0.0);
    let upper = PoolConfig::from_json(r#"{ "visibility_threshold": 1.0 }"#).unwrap();
    assert_eq!(upper.visibility_threshold, 1.0);
}
