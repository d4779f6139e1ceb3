pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{DeliveryMode, IntakeConfig};

pub use adapters::{MessagingLinkDelivery, SimulatedDelivery};
pub use core::contact::{validate_contact, ContactField, ContactInfo, ValidationReport};
pub use core::mutation::{
    apply, toggle_feature, toggle_service, toggle_sub_service, update_option, SelectionAction,
};
pub use core::session::SelectionSession;
pub use core::summary::{render_text, serialize, ServiceSummary};
pub use domain::catalog::{Catalog, CatalogIndex};
pub use domain::selection::SelectionModel;
pub use utils::error::{IntakeError, Result};
