use crate::adapters::delivery::{DEFAULT_MESSAGING_BASE_URL, DEFAULT_SIMULATED_DELAY_MS};
use crate::domain::catalog::Catalog;
use crate::domain::ports::DeliverySettings;
use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAX_SIMULATED_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub delivery: DeliverySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSection {
    /// JSON or TOML catalog file; the bundled catalog is used when unset.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    #[default]
    Simulated,
    MessagingLink,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverySection {
    #[serde(default)]
    pub mode: DeliveryMode,
    #[serde(default = "default_delay_ms")]
    pub simulated_delay_ms: u64,
    #[serde(default = "default_base_url")]
    pub messaging_base_url: String,
    pub recipient_id: Option<String>,
}

impl Default for DeliverySection {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::default(),
            simulated_delay_ms: default_delay_ms(),
            messaging_base_url: default_base_url(),
            recipient_id: None,
        }
    }
}

fn default_app_name() -> String {
    "lead-intake".to_string()
}

fn default_delay_ms() -> u64 {
    DEFAULT_SIMULATED_DELAY_MS
}

fn default_base_url() -> String {
    DEFAULT_MESSAGING_BASE_URL.to_string()
}

impl IntakeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IntakeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| IntakeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SALES_PHONE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| IntakeError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("app.name", &self.app.name)?;

        if let Some(path) = &self.catalog.path {
            validation::validate_path("catalog.path", path)?;
        }

        validation::validate_url("delivery.messaging_base_url", &self.delivery.messaging_base_url)?;
        validation::validate_range(
            "delivery.simulated_delay_ms",
            self.delivery.simulated_delay_ms,
            0,
            MAX_SIMULATED_DELAY_MS,
        )?;

        if self.delivery.mode == DeliveryMode::MessagingLink {
            let recipient =
                validation::validate_required_field(
                    "delivery.recipient_id",
                    &self.delivery.recipient_id,
                )?;
            validation::validate_recipient_id("delivery.recipient_id", recipient)?;
        }

        Ok(())
    }

    /// 載入服務目錄
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog.path {
            Some(path) => Catalog::from_file(path),
            None => {
                tracing::debug!("No catalog path configured, using bundled catalog");
                Catalog::bundled()
            }
        }
    }
}

impl DeliverySettings for IntakeConfig {
    fn messaging_base_url(&self) -> &str {
        &self.delivery.messaging_base_url
    }

    fn recipient_id(&self) -> Option<&str> {
        self.delivery.recipient_id.as_deref()
    }

    fn simulated_delay_ms(&self) -> u64 {
        self.delivery.simulated_delay_ms
    }
}

impl Validate for IntakeConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
