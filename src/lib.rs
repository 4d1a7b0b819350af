pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::http::WebhookTransport;
pub use config::toml_config::TomlConfig;
pub use core::session::{RsvpSession, SubmitOutcome};
pub use domain::model::{ErrorKey, FormField, RsvpFormData, RsvpPayload, ValidationErrorSet};
pub use domain::state::SubmissionState;
pub use utils::error::{Result, RsvpError};
