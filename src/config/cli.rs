use crate::config::toml_config::DeliveryMode;
use crate::core::contact::ContactInfo;
use crate::core::mutation::SelectionAction;
use crate::utils::error::{IntakeError, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "lead-intake")]
#[command(about = "Build a service request from the catalog and send it to the sales team")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Catalog file (.json or .toml), overrides the configuration
    #[arg(long)]
    pub catalog: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the services in the catalog
    Catalog {
        /// Only show services of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show the selection and the message that would be sent
    Preview {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        contact: ContactArgs,
    },
    /// Validate the contact details and deliver the request
    Submit {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        contact: ContactArgs,
        /// Override the delivery mode from the configuration
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Override the messaging recipient id
        #[arg(long)]
        recipient: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Simulated,
    Link,
}

impl From<ModeArg> for DeliveryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simulated => DeliveryMode::Simulated,
            ModeArg::Link => DeliveryMode::MessagingLink,
        }
    }
}

/// Selection flags. They are applied in this order: quick adds, services,
/// sub-services, features, options.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Select a service with its default features
    #[arg(long = "quick-add", value_name = "SERVICE")]
    pub quick_add: Vec<String>,

    /// Toggle a service
    #[arg(long = "service", value_name = "SERVICE")]
    pub services: Vec<String>,

    /// Toggle a sub-service
    #[arg(long = "sub-service", value_name = "SERVICE/SUB")]
    pub sub_services: Vec<String>,

    /// Toggle a feature
    #[arg(long = "feature", value_name = "SERVICE/SUB/FEATURE")]
    pub features: Vec<String>,

    /// Set an option choice
    #[arg(long = "option", value_name = "SERVICE/SUB/FEATURE/OPTION=CHOICE")]
    pub options: Vec<String>,
}

impl SelectionArgs {
    /// Mutation actions for everything except quick adds.
    pub fn to_actions(&self) -> Result<Vec<SelectionAction>> {
        let mut actions = Vec::new();

        for service_id in &self.services {
            actions.push(SelectionAction::ToggleService {
                service_id: service_id.clone(),
            });
        }

        for raw in &self.sub_services {
            let [service_id, sub_service_id] = split_path::<2>("--sub-service", raw)?;
            actions.push(SelectionAction::ToggleSubService {
                service_id,
                sub_service_id,
            });
        }

        for raw in &self.features {
            let [service_id, sub_service_id, feature_id] = split_path::<3>("--feature", raw)?;
            actions.push(SelectionAction::ToggleFeature {
                service_id,
                sub_service_id,
                feature_id,
            });
        }

        for raw in &self.options {
            let (path, choice_id) = raw
                .split_once('=')
                .ok_or_else(|| invalid("--option", raw, "expected OPTION=CHOICE"))?;
            if choice_id.is_empty() {
                return Err(invalid("--option", raw, "choice id cannot be empty"));
            }
            let [service_id, sub_service_id, feature_id, option_id] =
                split_path::<4>("--option", path)?;
            actions.push(SelectionAction::UpdateOption {
                service_id,
                sub_service_id,
                feature_id,
                option_id,
                choice_id: choice_id.to_string(),
            });
        }

        Ok(actions)
    }
}

fn split_path<const N: usize>(flag: &str, raw: &str) -> Result<[String; N]> {
    let parts: Vec<String> = raw.split('/').map(str::to_string).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(invalid(flag, raw, "path segments cannot be empty"));
    }
    parts
        .try_into()
        .map_err(|_| invalid(flag, raw, &format!("expected {} segments separated by '/'", N)))
}

fn invalid(flag: &str, raw: &str, reason: &str) -> IntakeError {
    IntakeError::InvalidConfigValueError {
        field: flag.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ContactArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long)]
    pub company: Option<String>,

    /// Additional free-text message
    #[arg(long, default_value = "")]
    pub message: String,
}

impl From<ContactArgs> for ContactInfo {
    fn from(args: ContactArgs) -> Self {
        ContactInfo {
            name: args.name,
            email: args.email,
            phone: args.phone,
            company: args.company,
            message: args.message,
        }
    }
}
