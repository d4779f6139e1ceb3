pub mod contact;
pub mod defaults;
pub mod mutation;
pub mod session;
pub mod summary;

pub use crate::domain::catalog::{Catalog, CatalogIndex};
pub use crate::domain::ports::{DeliveryAdapter, DeliverySettings, LinkOpener};
pub use crate::domain::selection::SelectionModel;
pub use crate::utils::error::Result;
