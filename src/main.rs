use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use wedding_rsvp::config::LogFormat;
use wedding_rsvp::core::payload::build_payload;
use wedding_rsvp::core::validators::validate_form;
use wedding_rsvp::core::ConfigProvider;
use wedding_rsvp::utils::error::ErrorSeverity;
use wedding_rsvp::utils::{logger, validation::Validate};
use wedding_rsvp::{
    CliConfig, RsvpSession, SubmitOutcome, TomlConfig, ValidationErrorSet, WebhookTransport,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let toml_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let log_format = cli
        .log_format
        .or_else(|| toml_config.as_ref().and_then(TomlConfig::log_format))
        .unwrap_or_default();
    let verbose = cli.verbose || toml_config.as_ref().is_some_and(TomlConfig::verbose);
    match log_format {
        LogFormat::Compact => logger::init_cli_logger(verbose),
        LogFormat::Json => logger::init_json_logger(verbose),
    }

    tracing::info!("Starting wedding-rsvp");
    if verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match &toml_config {
        Some(config) => run(&cli, config).await?,
        None => run(&cli, &cli).await?,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run<C: ConfigProvider + Validate>(cli: &CliConfig, config: &C) -> anyhow::Result<i32> {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return Ok(1);
    }

    let transport =
        WebhookTransport::from_config(config).context("failed to build the webhook client")?;
    let session = RsvpSession::from_config(transport, config);

    for (field, value) in cli.form_edits() {
        if let Err(e) = session.edit_field(field, value) {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            return Ok(1);
        }
    }

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be sent");
        let form = session.form();
        let errors = validate_form(&form);
        if !errors.is_empty() {
            print_field_errors(&errors);
            return Ok(1);
        }
        let payload = build_payload(&form, Utc::now());
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(0);
    }

    let exit_code = match session.submit().await {
        Ok(SubmitOutcome::Submitted(receipt)) => {
            tracing::info!("Webhook acknowledged with HTTP {}", receipt.status);
            let state = session.state();
            println!("✅ {}", state.button_label());
            if let Some((title, text)) = state.confirmation() {
                println!("{}", title);
                println!("{}", text);
            }
            0
        }
        Ok(SubmitOutcome::Invalid(errors)) => {
            print_field_errors(&errors);
            1
        }
        Ok(SubmitOutcome::Failed(message)) => {
            eprintln!("❌ {}", message);
            2
        }
        Err(e) => {
            tracing::error!(
                "❌ RSVP submission failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::High => 1,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::Critical => 3,
            }
        }
    };

    session.close();
    Ok(exit_code)
}

fn print_field_errors(errors: &ValidationErrorSet) {
    eprintln!("❌ Please fix the following fields:");
    for (key, message) in errors.iter() {
        eprintln!("   {}: {}", key, message);
    }
}
