use std::fs;

use confetti_rain::EffectsConfig;

#[test]
fn defaults_match_the_classic_page_constants() {
    let cfg = EffectsConfig::default();
    assert_eq!(cfg.ambient.count, 100);
    assert_eq!(cfg.ambient.reduced_count, 50);
    assert_eq!(cfg.burst.count, 50);
    assert_eq!(cfg.burst.life, 100);
    assert!((cfg.burst.gravity - 0.5).abs() < f32::EPSILON);
    assert_eq!(cfg.sparkles.count, 10);
    assert_eq!(cfg.hearts.count, 5);
    assert_eq!(cfg.celebration.mega_rounds, 10);
    assert!(cfg.validate().is_empty());
}

#[test]
fn layered_overlay_overrides_only_named_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("base.ron");
    let overlay = dir.path().join("overlay.ron");
    fs::write(
        &base,
        r#"(
            window: (width: 640.0, height: 480.0, title: "Test", autoClose: 0.0),
            ambient: (count: 20),
        )"#,
    )
    .expect("write base ron");
    fs::write(
        &overlay,
        r#"(
            ambient: (count: 8),
            burst: (gravity: 1.0),
        )"#,
    )
    .expect("write overlay ron");

    let (cfg, used, errors) = EffectsConfig::load_layered([&base, &overlay]);
    assert_eq!(used.len(), 2, "both layers should load: {errors:?}");
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    // Overlay wins where it speaks...
    assert_eq!(cfg.ambient.count, 8);
    assert!((cfg.burst.gravity - 1.0).abs() < f32::EPSILON);
    // ...base survives where it doesn't...
    assert_eq!(cfg.window.width, 640.0);
    assert_eq!(cfg.window.title, "Test");
    // ...and untouched sections keep their defaults.
    assert_eq!(cfg.hearts.count, 5);
}

#[test]
fn missing_layers_fall_back_to_defaults_with_errors() {
    let (cfg, used, errors) = EffectsConfig::load_layered(["/nonexistent/effects.ron"]);
    assert!(used.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(cfg, EffectsConfig::default());
}

#[test]
fn validation_flags_degenerate_configs() {
    let mut cfg = EffectsConfig::default();
    cfg.window.width = 0.0;
    cfg.ambient.size_range.min = -1.0;
    cfg.sparkles.life = 0;
    cfg.performance.frame_rate = 0.0;
    let joined = cfg.validate().join("\n");
    assert!(joined.contains("window dimensions"));
    assert!(joined.contains("ambient.size_range.min"));
    assert!(joined.contains("sparkles.life"));
    assert!(joined.contains("frame rates"));
}

#[test]
fn shipped_config_parses_cleanly() {
    let cfg = EffectsConfig::load_from_file("assets/config/effects.ron")
        .expect("assets/config/effects.ron should parse");
    assert_eq!(cfg, EffectsConfig::default());
}
