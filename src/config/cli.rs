use super::LogFormat;
use crate::core::ConfigProvider;
use crate::domain::model::FormField;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_required_field, validate_url, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "wedding-rsvp")]
#[command(about = "Validate a wedding RSVP and send it to the guest-list webhook")]
pub struct CliConfig {
    /// Path to TOML configuration file; its webhook settings replace the flags below
    #[arg(short, long)]
    pub config: Option<String>,

    /// Webhook URL that receives the RSVP
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "4000")]
    pub reset_delay_ms: u64,

    /// Treat non-2xx webhook responses as failures
    #[arg(long)]
    pub strict_status: bool,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "1")]
    pub guests: String,

    #[arg(long, default_value = "yes")]
    pub attending: String,

    /// "8th March", "9th March" or "Both Days (8th & 9th March)"
    #[arg(long, default_value = "")]
    pub days: String,

    /// Arrival time, HH:MM (24h, IST)
    #[arg(long, default_value = "")]
    pub arrival: String,

    #[arg(long, default_value = "")]
    pub message: String,

    /// Print the payload instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 依表單操作順序產生欄位編輯事件，出席與否放最前面
    pub fn form_edits(&self) -> Vec<(FormField, &str)> {
        vec![
            (FormField::Attending, self.attending.as_str()),
            (FormField::Name, self.name.as_str()),
            (FormField::Phone, self.phone.as_str()),
            (FormField::Guests, self.guests.as_str()),
            (FormField::AttendanceDays, self.days.as_str()),
            (FormField::ArrivalTime, self.arrival.as_str()),
            (FormField::Message, self.message.as_str()),
        ]
    }
}

impl ConfigProvider for CliConfig {
    fn webhook_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or_default()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    fn strict_status(&self) -> bool {
        self.strict_status
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let endpoint = validate_required_field("endpoint", &self.endpoint)?;
        validate_url("endpoint", endpoint)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_range("reset_delay_ms", self.reset_delay_ms, 0, 600_000)?;
        Ok(())
    }
}
