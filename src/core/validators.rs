//! 各欄位的驗證器。即時驗證（編輯時）與送出前的完整驗證共用同一組函式。

use crate::core::sanitize::sanitize_input;
use crate::domain::model::{AttendanceDays, ErrorKey, FormField, RsvpFormData, ValidationErrorSet};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;
pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const MESSAGE_MAX_LEN: usize = 500;
pub const MESSAGE_MAX_SPECIAL_CHARS: usize = 50;

/// 垃圾訊息判斷用的特殊字元。只是啟發式規則，防 XSS 靠的是 sanitize。
pub const MESSAGE_SPECIAL_CHARS: &str = "!@#$%^&*()_+=[]{};:'\",.<>?/\\|`~";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("name pattern is valid"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s\-+()]+$").expect("phone pattern is valid"));

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be at least 2 characters")]
    NameTooShort,
    #[error("Name must not exceed 100 characters")]
    NameTooLong,
    #[error("Name can only contain letters, spaces, hyphens, and apostrophes")]
    NameInvalidCharacters,

    #[error("Phone number is required")]
    PhoneRequired,
    #[error("Phone number must be at least 10 digits")]
    PhoneTooShort,
    #[error("Phone number must not exceed 15 digits")]
    PhoneTooLong,
    #[error("Phone number contains invalid characters")]
    PhoneInvalidCharacters,

    #[error("Message must not exceed 500 characters")]
    MessageTooLong,
    #[error("Message contains too many special characters")]
    MessageTooManySpecialCharacters,

    #[error("Please select which days you will attend")]
    AttendanceDaysRequired,
    #[error("Arrival time is required")]
    ArrivalTimeRequired,
}

pub type FieldResult = std::result::Result<(), FieldError>;

pub fn validate_name(name: &str) -> FieldResult {
    let sanitized = sanitize_input(name);
    let len = sanitized.chars().count();

    if sanitized.is_empty() {
        return Err(FieldError::NameRequired);
    }
    if len < NAME_MIN_LEN {
        return Err(FieldError::NameTooShort);
    }
    if len > NAME_MAX_LEN {
        return Err(FieldError::NameTooLong);
    }
    // 字元集檢查用未轉義的值，否則撇號會變成 &#x27; 而被拒絕
    if !NAME_RE.is_match(name.trim()) {
        return Err(FieldError::NameInvalidCharacters);
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> FieldResult {
    let sanitized = sanitize_input(phone);
    if sanitized.is_empty() {
        return Err(FieldError::PhoneRequired);
    }

    let digits = sanitized.chars().filter(char::is_ascii_digit).count();
    if digits < PHONE_MIN_DIGITS {
        return Err(FieldError::PhoneTooShort);
    }
    if digits > PHONE_MAX_DIGITS {
        return Err(FieldError::PhoneTooLong);
    }
    if !PHONE_RE.is_match(&sanitized) {
        return Err(FieldError::PhoneInvalidCharacters);
    }
    Ok(())
}

pub fn validate_message(message: &str) -> FieldResult {
    // 選填欄位
    if message.trim().is_empty() {
        return Ok(());
    }

    let sanitized = sanitize_input(message);
    if sanitized.chars().count() > MESSAGE_MAX_LEN {
        return Err(FieldError::MessageTooLong);
    }

    let special = sanitized
        .chars()
        .filter(|c| MESSAGE_SPECIAL_CHARS.contains(*c))
        .count();
    if special > MESSAGE_MAX_SPECIAL_CHARS {
        return Err(FieldError::MessageTooManySpecialCharacters);
    }
    Ok(())
}

pub fn validate_days_selection(days: Option<AttendanceDays>) -> FieldResult {
    days.map(|_| ()).ok_or(FieldError::AttendanceDaysRequired)
}

pub fn validate_arrival_time(time: &str) -> FieldResult {
    if time.is_empty() {
        return Err(FieldError::ArrivalTimeRequired);
    }
    Ok(())
}

/// 執行單一欄位的驗證器。沒有驗證器的欄位回傳 None。
pub fn validate_field(field: FormField, form: &RsvpFormData) -> Option<(ErrorKey, FieldResult)> {
    let result = match field {
        FormField::Name => validate_name(&form.name),
        FormField::Phone => validate_phone(&form.phone),
        FormField::Message => validate_message(&form.message),
        FormField::AttendanceDays => validate_days_selection(form.attendance_days),
        FormField::ArrivalTime => validate_arrival_time(&form.arrival_time),
        FormField::Guests | FormField::Attending => return None,
    };
    field.error_key().map(|key| (key, result))
}

/// 送出前的完整驗證，收集所有失敗的欄位而不是只回報第一個。
pub fn validate_form(form: &RsvpFormData) -> ValidationErrorSet {
    let mut fields = vec![FormField::Name, FormField::Phone, FormField::Message];
    if form.attending.is_attending() {
        fields.push(FormField::AttendanceDays);
        fields.push(FormField::ArrivalTime);
    }

    let mut errors = ValidationErrorSet::new();
    for field in fields {
        if let Some((key, Err(e))) = validate_field(field, form) {
            errors.insert(key, e.to_string());
        }
    }
    errors
}
