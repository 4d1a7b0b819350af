pub mod payload;
pub mod sanitize;
pub mod session;
pub mod validators;

pub use crate::domain::model::{RsvpFormData, RsvpPayload, ValidationErrorSet};
pub use crate::domain::ports::{ConfigProvider, RsvpTransport};
pub use crate::domain::state::SubmissionState;
pub use crate::utils::error::Result;
