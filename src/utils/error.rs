use crate::core::contact::ValidationReport;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Catalog integrity error at '{path}': {message}")]
    CatalogError { path: String, message: String },

    #[error("Contact details are incomplete: {}", .0.summary())]
    ValidationFailed(ValidationReport),

    #[error("No services selected")]
    NoServicesSelected,

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("Delivery failed: {message}")]
    DeliveryError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    System,
    Configuration,
    Catalog,
    UserInput,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IntakeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IntakeError::IoError(_) | IntakeError::SerializationError(_) => ErrorCategory::System,
            IntakeError::TomlError(_)
            | IntakeError::UrlError(_)
            | IntakeError::ConfigValidationError { .. }
            | IntakeError::InvalidConfigValueError { .. }
            | IntakeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            IntakeError::CatalogError { .. } => ErrorCategory::Catalog,
            IntakeError::ValidationFailed(_)
            | IntakeError::NoServicesSelected
            | IntakeError::SubmissionInProgress => ErrorCategory::UserInput,
            IntakeError::DeliveryError { .. } => ErrorCategory::Delivery,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::UserInput => ErrorSeverity::Low,
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Catalog => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            IntakeError::IoError(e) => format!("Could not read a required file: {}", e),
            IntakeError::ValidationFailed(report) => {
                format!("Please fix your contact details: {}", report.summary())
            }
            IntakeError::NoServicesSelected => {
                "Please select at least one service to continue.".to_string()
            }
            IntakeError::SubmissionInProgress => {
                "Your request is already being sent, please wait.".to_string()
            }
            IntakeError::CatalogError { .. } => {
                format!("The service catalog is invalid: {}", self)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::System => "Check file permissions and that the paths exist",
            ErrorCategory::Configuration => "Review the TOML configuration file and CLI flags",
            ErrorCategory::Catalog => "Make sure every id is unique among its siblings",
            ErrorCategory::UserInput => "Correct the highlighted fields and submit again",
            ErrorCategory::Delivery => "Retry later or contact the sales team directly",
        }
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;
