// Configuration module unit tests

use brewcache::config::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_can_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
assets:
  root: ./public/assets
uploads:
  max_bytes: 2000000
logging:
  format: pretty
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).expect("config should load");
    assert_eq!(config.assets.root, PathBuf::from("./public/assets"));
    assert_eq!(config.uploads.max_bytes, 2_000_000);
    assert_eq!(config.uploads.jpeg_quality, 75);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_missing_file_reports_read_error() {
    let err = Config::from_file("/nonexistent/brewcache.yaml").unwrap_err();
    assert!(err.starts_with("Failed to read config file"));
}

#[test]
fn test_invalid_yaml_reports_parse_error() {
    let err = Config::from_yaml_with_env("uploads: [not, a, map]").unwrap_err();
    assert!(err.starts_with("Failed to parse config"));
}

#[test]
fn test_unknown_log_format_is_rejected() {
    assert!(Config::from_yaml_with_env("logging:\n  format: xml\n").is_err());
}

#[test]
fn test_default_resident_set_is_shell_and_manifest() {
    let config = Config::default();
    assert_eq!(
        config.resident,
        vec![
            ResidentConfig {
                name: "index.html".to_string(),
                path: PathBuf::from("dist/index.html"),
                content_type: "text/html".to_string(),
            },
            ResidentConfig {
                name: "manifest.json".to_string(),
                path: PathBuf::from("manifest.json"),
                content_type: "application/json".to_string(),
            },
        ]
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_resident_list_is_allowed() {
    let config = Config::from_yaml_with_env("resident: []\n").unwrap();
    assert!(config.resident.is_empty());
}

#[test]
fn test_zero_max_age_is_rejected() {
    let yaml = "cache_control:\n  image_max_age_secs: 0\n";
    let err = Config::from_yaml_with_env(yaml).unwrap_err();
    assert!(err.contains("max-age"));
}
