use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use figment::providers::{Format, Toml};
use figment::{Figment, Jail};

use pinrank_core::config::{expand_path, Config, PinningSettings};
use pinrank_core::{Identified, PinRecord, Position, SearchHit};

#[test]
fn pinning_settings_default_when_section_missing() {
    let config = Config::from_figment(Figment::new());
    let settings = config.pinning().expect("settings");
    assert_eq!(settings, PinningSettings::default());
    assert_eq!(settings.lookup_budget(), Duration::from_millis(50));
    assert_eq!(settings.max_position, 100);
    assert_eq!(settings.max_in_flight_lookups, 4);
}

#[test]
fn pinning_settings_partial_section_keeps_defaults() {
    let figment = Figment::new().merge(Toml::string("[pinning]\nlookup_budget_ms = 5\n"));
    let settings = Config::from_figment(figment).pinning().expect("settings");
    assert_eq!(settings.lookup_budget_ms, 5);
    assert_eq!(settings.store_path, "pins.json");
}

#[test]
fn zero_max_position_is_rejected() {
    let figment = Figment::new().merge(Toml::string("[pinning]\nmax_position = 0\n"));
    assert!(Config::from_figment(figment).pinning().is_err());
}

#[test]
fn load_merges_toml_and_env() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[pinning]\nstore_path = \"a.json\"\nmax_position = 10\n")?;
        jail.create_file("config.test.toml", "[pinning]\nstore_path = \"b.json\"\n")?;
        jail.set_env("RUST_ENV", "test");
        jail.set_env("APP_PINNING__LOOKUP_BUDGET_MS", "7");

        let config = Config::load().map_err(|e| e.to_string())?;
        let settings = config.pinning().map_err(|e| e.to_string())?;
        assert_eq!(settings.store_path, "b.json");
        assert_eq!(settings.max_position, 10);
        assert_eq!(settings.lookup_budget_ms, 7);
        Ok(())
    });
}

#[test]
fn production_requires_lookup_budget() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[pinning]\nlookup_budget_ms = 0\n")?;
        jail.set_env("RUST_ENV", "production");
        assert!(Config::load().is_err());
        Ok(())
    });
}

#[test]
fn store_path_resolves_against_config_dir() {
    Jail::expect_with(|jail| {
        let tmp = tempfile::TempDir::new().map_err(|e| e.to_string())?;
        fs::write(tmp.path().join("config.toml"), "[pinning]\nstore_path = \"data/pins.json\"\n")
            .map_err(|e| e.to_string())?;
        jail.create_file("config.toml", "[pinning]\nstore_path = \"elsewhere.json\"\n")?;

        let config = Config::load_from(tmp.path()).map_err(|e| e.to_string())?;
        assert_eq!(config.base_dir(), tmp.path());
        let settings = config.pinning().map_err(|e| e.to_string())?;
        assert_eq!(settings.resolve_store_path(config.base_dir()), tmp.path().join("data/pins.json"));

        let absolute = PinningSettings { store_path: "/abs/pins.json".to_string(), ..PinningSettings::default() };
        assert_eq!(absolute.resolve_store_path(tmp.path()), PathBuf::from("/abs/pins.json"));
        assert_eq!(expand_path("/abs/pins.json"), PathBuf::from("/abs/pins.json"));
        Ok(())
    });
}

#[test]
fn zero_in_flight_lookups_is_rejected() {
    let figment = Figment::new().merge(Toml::string("[pinning]\nmax_in_flight_lookups = 0\n"));
    assert!(Config::from_figment(figment).pinning().is_err());
}

#[test]
fn identified_reads_id_through_wrappers() {
    let hit = SearchHit::new("doc-1", 0.5);
    assert_eq!(hit.doc_id(), "doc-1");
    assert_eq!((&hit).doc_id(), "doc-1");
    assert_eq!(Arc::new(hit.clone()).doc_id(), "doc-1");
    assert_eq!(("doc-2".to_string(), 42u8).doc_id(), "doc-2");
    assert_eq!("doc-3".doc_id(), "doc-3");
    assert_eq!(String::from("doc-4").doc_id(), "doc-4");
}

#[test]
fn record_round_trips_through_json() {
    let rec = PinRecord::new("doc-1", ["leddy 60"], Position::from_raw(4));
    let json = serde_json::to_string(&rec).unwrap();
    assert_eq!(json, r#"{"doc_id":"doc-1","keywords":["leddy 60"],"position":4}"#);
    let back: PinRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rec);
}
