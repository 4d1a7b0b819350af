use crate::core::sanitize::sanitize_input;
use crate::domain::model::{FormField, RsvpFormData, RsvpPayload};
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Asia::Kolkata;

pub const NOT_ATTENDING: &str = "Not Attending";

/// 印度時間 `DD/MM/YYYY, HH:MM:SS`（24 小時制）
pub fn format_ist(at: DateTime<Utc>) -> String {
    at.with_timezone(&Kolkata)
        .format("%d/%m/%Y, %H:%M:%S")
        .to_string()
}

/// UTC ISO-8601，精確到毫秒，例如 `2026-03-09T04:30:00.000Z`
pub fn format_utc_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn attendance_info(form: &RsvpFormData) -> String {
    if form.attending.is_attending() {
        format!(
            "{} - Arrival: {} IST",
            form.value(FormField::AttendanceDays),
            sanitize_input(&form.arrival_time)
        )
    } else {
        NOT_ATTENDING.to_string()
    }
}

/// 以送出當下的表單快照組出 payload，自由輸入欄位各清理一次
pub fn build_payload(form: &RsvpFormData, at: DateTime<Utc>) -> RsvpPayload {
    RsvpPayload {
        name: sanitize_input(&form.name),
        phone: sanitize_input(&form.phone),
        attending: form.attending.as_str().to_string(),
        guests: form.guests.to_string(),
        message: sanitize_input(&form.message),
        submission_time_ist: format_ist(at),
        attendance_days: form.value(FormField::AttendanceDays),
        arrival_time: sanitize_input(&form.arrival_time),
        attendance_info: attendance_info(form),
        timestamp: format_utc_iso(at),
    }
}
