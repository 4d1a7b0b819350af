use thiserror::Error;

#[derive(Error, Debug)]
pub enum RsvpError {
    #[error("Webhook request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Webhook responded with HTTP {status}")]
    WebhookStatusError { status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for form field '{field}'")]
    InvalidFieldValue { field: String, value: String },

    #[error("A submission is already {state}")]
    SubmissionBusy { state: String },

    #[error("Invalid submission transition: {event} while {from}")]
    InvalidTransition { from: String, event: String },

    #[error("RSVP session has been closed")]
    SessionClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    State,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RsvpError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RsvpError::ApiError(_) | RsvpError::WebhookStatusError { .. } => ErrorCategory::Network,
            RsvpError::ConfigValidationError { .. }
            | RsvpError::InvalidConfigValueError { .. }
            | RsvpError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RsvpError::InvalidFieldValue { .. } => ErrorCategory::Input,
            RsvpError::SubmissionBusy { .. }
            | RsvpError::InvalidTransition { .. }
            | RsvpError::SessionClosed => ErrorCategory::State,
            RsvpError::IoError(_) | RsvpError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::State => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 網路類錯誤可以直接重送
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Network)
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RsvpError::ApiError(_) | RsvpError::WebhookStatusError { .. } => {
                "Error submitting RSVP. Please try again.".to_string()
            }
            RsvpError::InvalidFieldValue { field, value } => {
                format!("'{}' is not a valid choice for {}", value, field)
            }
            RsvpError::SubmissionBusy { .. } => {
                "Your RSVP is already being processed.".to_string()
            }
            RsvpError::SessionClosed => "This RSVP form is no longer active.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your connection and submit the RSVP again",
            ErrorCategory::Configuration => {
                "Check the webhook endpoint and timeout settings in the config file or CLI flags"
            }
            ErrorCategory::Input => "Pick one of the listed options for this field",
            ErrorCategory::State => "Wait for the current submission to finish before retrying",
            ErrorCategory::Internal => "Re-run with --verbose and report the log output",
        }
    }
}

pub type Result<T> = std::result::Result<T, RsvpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_and_severity() {
        let err = RsvpError::WebhookStatusError { status: 502 };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.is_retryable());

        let err = RsvpError::MissingConfigError {
            field: "webhook.endpoint".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!err.is_retryable());

        let err = RsvpError::InvalidFieldValue {
            field: "guests".to_string(),
            value: "9".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.user_friendly_message(), "'9' is not a valid choice for guests");
    }

    #[test]
    fn test_transport_errors_share_generic_message() {
        let err = RsvpError::WebhookStatusError { status: 500 };
        assert_eq!(
            err.user_friendly_message(),
            "Error submitting RSVP. Please try again."
        );
    }
}
