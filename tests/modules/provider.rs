//! 本地文件数据源集成测试

use flagron::prelude::*;
use std::io::Write as _;
use std::sync::Arc;

fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("temp file should be created");
    file.write_all(content.as_bytes()).expect("write should succeed");
    path
}

#[test]
fn test_load_json_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(
        &dir,
        "flags.json",
        r#"{
            "feature_flags": [
                {"id": "FromFile", "enabled": true},
                {"id": "OffFlag", "enabled": false}
            ]
        }"#,
    );

    let provider = LocalFileProvider::load(&path).unwrap();
    assert_eq!(provider.feature_names().unwrap(), vec!["FromFile", "OffFlag"]);

    let manager = FeatureManager::new(Arc::new(provider)).unwrap();
    assert!(manager.is_enabled("FromFile").unwrap());
    assert!(!manager.is_enabled("OffFlag").unwrap());
}

#[test]
fn test_load_yaml_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(
        &dir,
        "flags.yaml",
        concat!(
            "feature_flags:\n",
            "  - id: YamlFlag\n",
            "    enabled: true\n",
            "    variants:\n",
            "      - name: Small\n",
            "        configuration_value: 300px\n",
            "    allocation:\n",
            "      default_when_enabled: Small\n",
        ),
    );

    let provider = LocalFileProvider::load(&path).unwrap();
    let manager = FeatureManager::new(Arc::new(provider)).unwrap();

    let ctx = TargetingContext::for_user("Alice");
    let variant = manager.get_variant("YamlFlag", &ctx).unwrap().unwrap();
    assert_eq!(variant.name, "Small");
    assert_eq!(
        variant.configuration_value,
        Some(serde_json::Value::String("300px".to_string()))
    );
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "flags.toml", "feature_flags = []");
    let result = LocalFileProvider::load(&path);
    assert!(matches!(result, Err(FlagronError::ValidationError(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = LocalFileProvider::load("/nonexistent/flags.json");
    assert!(matches!(result, Err(FlagronError::IoError(_))));
}

#[test]
fn test_malformed_json_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "broken.json", "{not valid json");
    let result = LocalFileProvider::load(&path);
    assert!(matches!(result, Err(FlagronError::SerdeError(_))));
}
