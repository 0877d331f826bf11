use std::fs;

use citygrowth::sim::Stage;
use citygrowth::testutil::headless_sim;
use citygrowth::{ConfigError, SimConfig};

#[test]
fn load_overrides_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("city.json");
    fs::write(
        &path,
        r#"{
            "seed": 99,
            "grid": { "size": 24 },
            "stages": [
                { "below": 3, "min": 1.0, "max": 2.0 },
                { "min": 5.0, "max": 6.0 }
            ],
            "economy": { "officer": -35 },
            "hud": { "viewport_height": 720 }
        }"#,
    )
    .unwrap();

    let config = SimConfig::load(&path).unwrap();
    assert_eq!(config.seed, 99);
    assert_eq!(config.grid.size, 24);
    assert_eq!(config.grid.cell_pixels, 64.0);
    assert_eq!(
        config.stages,
        vec![Stage::new(Some(3), 1.0, 2.0), Stage::new(None, 5.0, 6.0)]
    );
    assert_eq!(config.economy.officer, -35);
    assert_eq!(config.economy.town, 100);
    assert_eq!(config.hud.viewport_height, 720);

    let mut sim = headless_sim(&config);
    sim.tick(2.0).unwrap();
    sim.shutdown();
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = SimConfig::load(&path).unwrap_err();
    match &err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("expected an io error, got {other:?}"),
    }
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"seed\": ").unwrap();
    assert!(matches!(
        SimConfig::load(&path).unwrap_err(),
        ConfigError::Parse(_)
    ));
}

#[test]
fn out_of_range_values_are_invalid() {
    let cases = [
        r#"{ "grid": { "size": 0 } }"#,
        r#"{ "grid": { "size": 70000 } }"#,
        r#"{ "economy": { "accrual_period": 0.0 } }"#,
        r#"{ "hud": { "viewport_height": 0 } }"#,
        r#"{ "stages": [] }"#,
    ];
    for json in cases {
        let err = SimConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{json}: {err}");
    }
}
