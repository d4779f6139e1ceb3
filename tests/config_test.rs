use anyhow::Result;
use lead_intake::utils::validation::Validate;
use lead_intake::core::defaults::quick_add;
use lead_intake::utils::error::ErrorSeverity;
use lead_intake::{Catalog, CatalogIndex, DeliveryMode, IntakeConfig, IntakeError, SelectionModel};
use tempfile::TempDir;

const SMALL_CATALOG: &str = r#"
[[services]]
id = "hosting"
name = "Web Hosting"
category = "Support"

[[services.subServices]]
id = "managed"
name = "Managed Hosting"

[[services.subServices.features]]
id = "backups"
name = "Daily Backups"
included = true

[[services.subServices.features]]
id = "cdn"
name = "CDN"
included = false

[[services.subServices.features.options]]
id = "cdn-region"
name = "Region"
choices = [
    { id = "eu", name = "Europe" },
    { id = "us", name = "United States" },
]
"#;

#[test]
fn test_config_points_to_catalog_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let catalog_path = temp_dir.path().join("catalog.toml");
    std::fs::write(&catalog_path, SMALL_CATALOG)?;

    let config_path = temp_dir.path().join("intake.toml");
    let normalized = catalog_path.to_str().unwrap().replace('\\', "/");
    std::fs::write(
        &config_path,
        format!(
            r#"
[app]
name = "hosting-leads"

[catalog]
path = "{}"

[delivery]
mode = "messaging_link"
recipient_id = "15551234567"
simulated_delay_ms = 10
"#,
            normalized
        ),
    )?;

    let config = IntakeConfig::from_file(&config_path)?;
    config.validate()?;
    assert_eq!(config.delivery.mode, DeliveryMode::MessagingLink);

    let catalog = config.load_catalog()?;
    assert_eq!(catalog.categories(), vec!["Support"]);

    let index = CatalogIndex::new(catalog);
    let hosting = index.service("hosting").expect("hosting service");
    let model = quick_add(&SelectionModel::new(), hosting);
    assert!(model.is_feature_selected("hosting", "managed", "backups"));
    assert!(!model.is_feature_selected("hosting", "managed", "cdn"));
    assert_eq!(
        index
            .choice("hosting", "managed", "cdn", "cdn-region", "eu")
            .map(|c| c.name.as_str()),
        Some("Europe")
    );
    Ok(())
}

#[test]
fn test_json_catalog_file_round_trips_bundled_data() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("catalog.json");
    let bundled = Catalog::bundled()?;
    std::fs::write(&path, serde_json::to_string_pretty(&bundled)?)?;

    let loaded = Catalog::from_file(&path)?;
    assert_eq!(loaded, bundled);
    Ok(())
}

#[test]
fn test_unknown_catalog_extension_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("catalog.yaml");
    std::fs::write(&path, "services: []")?;

    let err = Catalog::from_file(&path).unwrap_err();
    assert!(matches!(err, IntakeError::InvalidConfigValueError { .. }));
    Ok(())
}

#[test]
fn test_duplicate_feature_ids_fail_at_load() {
    let content = SMALL_CATALOG.replace("id = \"cdn\"", "id = \"backups\"");
    let err = Catalog::from_toml_str(&content).unwrap_err();
    match err {
        IntakeError::CatalogError { path, .. } => {
            assert_eq!(path, "services.hosting.managed.features.backups")
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_missing_config_file_is_io_error() {
    let err = IntakeConfig::from_file("/definitely/not/here/intake.toml").unwrap_err();
    assert!(matches!(err, IntakeError::IoError(_)));
    assert_eq!(err.severity(), ErrorSeverity::Critical);
}
