use anyhow::Result;
use httpmock::prelude::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio_test::{assert_err, assert_ok};
use wedding_rsvp::utils::validation::Validate;
use wedding_rsvp::{
    ErrorKey, FormField, RsvpError, RsvpFormData, RsvpSession, SubmissionState, SubmitOutcome,
    TomlConfig, WebhookTransport,
};

fn fill_attending<T: wedding_rsvp::core::RsvpTransport + 'static>(session: &RsvpSession<T>) -> Result<()> {
    session.edit_field(FormField::Name, "Aarav D'Souza")?;
    session.edit_field(FormField::Phone, "+91 (22) 4567-8901")?;
    session.edit_field(FormField::Guests, "3")?;
    session.edit_field(FormField::AttendanceDays, "8th March")?;
    session.edit_field(FormField::ArrivalTime, "15:45")?;
    session.edit_field(FormField::Message, "See you at the sangeet <3")?;
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_rsvp_with_real_http() -> Result<()> {
    let server = MockServer::start();
    let webhook = server.mock(|when, then| {
        when.method(POST)
            .path("/macros/s/test/exec")
            .body_contains("\"name\":\"Aarav D&#x27;Souza\"")
            .body_contains("\"guests\":\"3\"")
            .body_contains("\"attending\":\"yes\"")
            .body_contains("\"message\":\"See you at the sangeet &lt;3\"")
            .body_contains("\"attendanceInfo\":\"8th March - Arrival: 15:45 IST\"");
        then.status(200).body("{\"result\":\"success\"}");
    });

    let transport = WebhookTransport::new(server.url("/macros/s/test/exec"))?;
    let session = RsvpSession::with_reset_delay(transport, Duration::from_millis(50));
    fill_attending(&session)?;
    assert!(session.errors().is_empty());

    let outcome = session.submit().await?;

    webhook.assert();
    assert!(matches!(outcome, SubmitOutcome::Submitted(receipt) if receipt.status == 200));
    assert_eq!(session.state(), SubmissionState::Submitted);

    let mut rx = session.subscribe();
    tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|state| *state == SubmissionState::Idle),
    )
    .await??;

    assert_eq!(session.form(), RsvpFormData::default());
    Ok(())
}

#[tokio::test]
async fn test_declined_rsvp_sends_not_attending() -> Result<()> {
    let server = MockServer::start();
    let webhook = server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .body_contains("\"attending\":\"no\"")
            .body_contains("\"attendanceInfo\":\"Not Attending\"");
        then.status(302).header("Location", "/echo");
    });
    server.mock(|when, then| {
        when.method(GET).path("/echo");
        then.status(200);
    });

    let session = RsvpSession::new(WebhookTransport::new(server.url("/exec"))?);
    session.edit_field(FormField::Attending, "no")?;
    session.edit_field(FormField::Name, "Leela Nair")?;
    session.edit_field(FormField::Phone, "09876543210")?;

    let outcome = session.submit().await?;

    webhook.assert();
    assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
    session.close();
    Ok(())
}

#[tokio::test]
async fn test_missing_arrival_time_never_hits_webhook() -> Result<()> {
    let server = MockServer::start();
    let webhook = server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(200);
    });

    let session = RsvpSession::new(WebhookTransport::new(server.url("/exec"))?);
    fill_attending(&session)?;
    session.edit_field(FormField::ArrivalTime, "")?;

    let outcome = session.submit().await?;

    webhook.assert_hits(0);
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure");
    };
    assert!(errors.contains(ErrorKey::ArrivalTime));
    assert_eq!(session.state(), SubmissionState::Idle);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_webhook_fails_and_keeps_form() -> Result<()> {
    let session = RsvpSession::new(WebhookTransport::new("http://127.0.0.1:1/exec")?);
    fill_attending(&session)?;
    let before = session.form();

    let outcome = session.submit().await?;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(session.state(), SubmissionState::Failed);
    assert_eq!(session.form(), before);
    assert_eq!(
        session.errors().keys().collect::<Vec<_>>(),
        vec![ErrorKey::Submit]
    );
    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_strict_status() -> Result<()> {
    let server = MockServer::start();
    let webhook = server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(500);
    });

    let mut config_file = NamedTempFile::new()?;
    write!(
        config_file,
        "[webhook]\nendpoint = \"{}\"\nstrict_status = true\ntimeout_seconds = 5\n\n[session]\nreset_delay_ms = 100\n",
        server.url("/exec")
    )?;

    let config = TomlConfig::from_file(config_file.path())?;
    assert_ok!(config.validate());

    let session = RsvpSession::from_config(WebhookTransport::from_config(&config)?, &config);
    fill_attending(&session)?;

    let outcome = session.submit().await?;

    webhook.assert();
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(session.state(), SubmissionState::Failed);

    // a closed session accepts no further submissions
    session.close();
    let err = assert_err!(session.submit().await);
    assert!(matches!(err, RsvpError::SessionClosed));
    Ok(())
}
