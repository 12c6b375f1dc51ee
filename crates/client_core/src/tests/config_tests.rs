use super::{
    apply_env_overrides, apply_file_settings, load_settings, normalize_database_url,
    prepare_database_url, FileSettings, Settings,
};

use std::{collections::HashMap, fs};

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_memory_and_full_urls_untouched() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("sqlite:///tmp/nick.db"),
        "sqlite:///tmp/nick.db"
    );
}

#[test]
fn rewrites_single_colon_sqlite_prefix() {
    assert_eq!(
        normalize_database_url("sqlite:data\\nick.db"),
        "sqlite://data/nick.db"
    );
}

#[test]
fn blank_url_falls_back_to_default() {
    assert_eq!(
        normalize_database_url("   "),
        Settings::default().database_url
    );
}

#[test]
fn creates_parent_dir_for_file_url() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("data").join("test.db");

    let url = prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare db url");
    assert!(url.starts_with("sqlite://"));
    assert!(temp_root.path().join("data").exists());
}

#[test]
fn default_settings_use_fixed_nickname_key() {
    let settings = Settings::default();
    assert_eq!(settings.storage_key, "@nickname");
    assert_eq!(settings.log_filter, "info");
    assert!(settings.database_url.ends_with("nickname.db"));
}

#[test]
fn file_settings_override_defaults() {
    let mut settings = Settings::default();
    let file_cfg: FileSettings = toml::from_str(
        r#"
        database_url = "sqlite://./custom.db"
        storage_key = "@handle"
        "#,
    )
    .expect("parse");

    apply_file_settings(&mut settings, file_cfg);
    assert_eq!(settings.database_url, "sqlite://./custom.db");
    assert_eq!(settings.storage_key, "@handle");
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("NICKNAME_DATABASE_URL", "sqlite://./plain.db"),
        ("APP__DATABASE_URL", "sqlite://./app.db"),
        ("NICKNAME_STORAGE_KEY", "@alias"),
        ("APP__LOG_FILTER", "debug"),
    ]);

    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

    assert_eq!(settings.database_url, "sqlite://./app.db");
    assert_eq!(settings.storage_key, "@alias");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn loads_settings_from_explicit_file() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let path = temp_root.path().join("nickname.toml");
    fs::write(&path, "log_filter = \"warn\"\n").expect("write settings");

    let settings = load_settings(Some(path.as_path()));
    if std::env::var("APP__LOG_FILTER").is_err() {
        assert_eq!(settings.log_filter, "warn");
    }
}

#[test]
fn unreadable_settings_file_keeps_defaults() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let path = temp_root.path().join("nickname.toml");
    fs::write(&path, "this is = = not toml").expect("write settings");

    let settings = load_settings(Some(path.as_path()));
    if std::env::var("NICKNAME_STORAGE_KEY").is_err() && std::env::var("APP__STORAGE_KEY").is_err()
    {
        assert_eq!(settings.storage_key, "@nickname");
    }
}
