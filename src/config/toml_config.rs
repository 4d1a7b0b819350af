use crate::config::LogFormat;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, RsvpError};
use crate::utils::validation::{validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_RESET_DELAY_MS: u64 = 4000;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub webhook: WebhookConfig,
    pub session: Option<SessionConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    /// 非 2xx 是否視為失敗，預設沿用「有回應就算成功」
    pub strict_status: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub reset_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<LogFormat>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RsvpError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RsvpError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RSVP_WEBHOOK_URL})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.webhook.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn reset_delay_ms(&self) -> u64 {
        self.session
            .as_ref()
            .and_then(|s| s.reset_delay_ms)
            .unwrap_or(DEFAULT_RESET_DELAY_MS)
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        self.logging.as_ref().and_then(|l| l.format)
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn webhook_endpoint(&self) -> &str {
        &self.webhook.endpoint
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms())
    }

    fn strict_status(&self) -> bool {
        self.webhook.strict_status.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("webhook.endpoint", &self.webhook.endpoint)?;
        validate_range("webhook.timeout_seconds", self.timeout_seconds(), 1, 300)?;
        validate_range("session.reset_delay_ms", self.reset_delay_ms(), 0, 600_000)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[webhook]
endpoint = "https://script.google.com/macros/s/deployment/exec"
timeout_seconds = 10
strict_status = true

[session]
reset_delay_ms = 2500

[logging]
verbose = true
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.webhook_endpoint(),
            "https://script.google.com/macros/s/deployment/exec"
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.reset_delay(), Duration::from_millis(2500));
        assert!(config.strict_status());
        assert_eq!(config.log_format(), Some(LogFormat::Json));
        assert!(config.verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = TomlConfig::from_toml_str(
            r#"
[webhook]
endpoint = "https://hooks.example.com/rsvp"
"#,
        )
        .unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.reset_delay(), Duration::from_millis(4000));
        assert!(!config.strict_status());
        assert_eq!(config.log_format(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_RSVP_WEBHOOK", "https://hooks.example.com/from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[webhook]
endpoint = "${TEST_RSVP_WEBHOOK}"
"#,
        )
        .unwrap();
        assert_eq!(config.webhook.endpoint, "https://hooks.example.com/from-env");

        std::env::remove_var("TEST_RSVP_WEBHOOK");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[webhook]
endpoint = "${TEST_RSVP_WEBHOOK_UNSET}"
"#,
        )
        .unwrap();
        assert_eq!(config.webhook.endpoint, "${TEST_RSVP_WEBHOOK_UNSET}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[webhook]
endpoint = "https://hooks.example.com/rsvp"
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(RsvpError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_missing_webhook_section_is_parse_error() {
        let err = TomlConfig::from_toml_str("[session]\nreset_delay_ms = 10\n").unwrap_err();
        assert!(matches!(err, RsvpError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[webhook]\nendpoint = \"http://localhost:9000/rsvp\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.webhook_endpoint(), "http://localhost:9000/rsvp");
    }
}
