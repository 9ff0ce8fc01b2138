pub mod cleanup;
pub mod diagnostics;
pub mod provider;
pub mod schema;
pub mod tfsdk;

pub use crate::domain::model::{CleanupResourceModel, CleanupSettings, Schedule};
pub use crate::domain::ports::{CleanupClient, Resource};
pub use crate::utils::error::Result;
