use crate::utils::error::RsvpError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 表單欄位，key 與前端 `name` 屬性一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Phone,
    Guests,
    Message,
    Attending,
    AttendanceDays,
    ArrivalTime,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::Phone,
        FormField::Guests,
        FormField::Message,
        FormField::Attending,
        FormField::AttendanceDays,
        FormField::ArrivalTime,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Phone => "phone",
            FormField::Guests => "guests",
            FormField::Message => "message",
            FormField::Attending => "attending",
            FormField::AttendanceDays => "attendanceDays",
            FormField::ArrivalTime => "arrivalTime",
        }
    }

    /// 有驗證器的欄位才會出現在錯誤集合中
    pub fn error_key(self) -> Option<ErrorKey> {
        match self {
            FormField::Name => Some(ErrorKey::Name),
            FormField::Phone => Some(ErrorKey::Phone),
            FormField::Message => Some(ErrorKey::Message),
            FormField::AttendanceDays => Some(ErrorKey::AttendanceDays),
            FormField::ArrivalTime => Some(ErrorKey::ArrivalTime),
            FormField::Guests | FormField::Attending => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormField {
    type Err = RsvpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| RsvpError::InvalidFieldValue {
                field: "field".to_string(),
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKey {
    Name,
    Phone,
    Message,
    AttendanceDays,
    ArrivalTime,
    Submit,
}

impl ErrorKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKey::Name => "name",
            ErrorKey::Phone => "phone",
            ErrorKey::Message => "message",
            ErrorKey::AttendanceDays => "attendanceDays",
            ErrorKey::ArrivalTime => "arrivalTime",
            ErrorKey::Submit => "submit",
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attending {
    #[default]
    Yes,
    No,
}

impl Attending {
    pub fn as_str(self) -> &'static str {
        match self {
            Attending::Yes => "yes",
            Attending::No => "no",
        }
    }

    pub fn is_attending(self) -> bool {
        self == Attending::Yes
    }
}

impl FromStr for Attending {
    type Err = RsvpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Attending::Yes),
            "no" => Ok(Attending::No),
            other => Err(RsvpError::InvalidFieldValue {
                field: FormField::Attending.key().to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// 同行人數，只允許 1 到 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuestCount(u8);

impl GuestCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(count: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&count).then_some(Self(count))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// 下拉選單的顯示文字
    pub fn label(self) -> String {
        if self.0 == 1 {
            "1 Guest".to_string()
        } else {
            format!("{} Guests", self.0)
        }
    }

    pub fn options() -> impl Iterator<Item = GuestCount> {
        (Self::MIN..=Self::MAX).map(GuestCount)
    }
}

impl Default for GuestCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for GuestCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GuestCount {
    type Err = RsvpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(GuestCount::new)
            .ok_or_else(|| RsvpError::InvalidFieldValue {
                field: FormField::Guests.key().to_string(),
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceDays {
    EighthMarch,
    NinthMarch,
    BothDays,
}

impl AttendanceDays {
    pub const PLACEHOLDER: &'static str = "Select days";
    pub const ALL: [AttendanceDays; 3] = [
        AttendanceDays::EighthMarch,
        AttendanceDays::NinthMarch,
        AttendanceDays::BothDays,
    ];

    /// 送往 webhook 的值
    pub fn value(self) -> &'static str {
        match self {
            AttendanceDays::EighthMarch => "8th March",
            AttendanceDays::NinthMarch => "9th March",
            AttendanceDays::BothDays => "Both Days (8th & 9th March)",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttendanceDays::EighthMarch => "8th March Only",
            AttendanceDays::NinthMarch => "9th March Only",
            AttendanceDays::BothDays => "Both Days (8th & 9th March)",
        }
    }

    /// 空字串代表尚未選擇
    pub fn parse_selection(s: &str) -> Result<Option<Self>, RsvpError> {
        if s.is_empty() {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl fmt::Display for AttendanceDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for AttendanceDays {
    type Err = RsvpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttendanceDays::ALL
            .into_iter()
            .find(|days| days.value() == s)
            .ok_or_else(|| RsvpError::InvalidFieldValue {
                field: FormField::AttendanceDays.key().to_string(),
                value: s.to_string(),
            })
    }
}

/// 表單目前的原始值。自由輸入欄位保留未清理的內容，
/// 清理只在驗證與送出時各做一次。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsvpFormData {
    pub name: String,
    pub phone: String,
    pub guests: GuestCount,
    pub message: String,
    pub attending: Attending,
    pub attendance_days: Option<AttendanceDays>,
    pub arrival_time: String,
}

impl RsvpFormData {
    /// 以字串形式讀取欄位值，與前端顯示一致
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.name.clone(),
            FormField::Phone => self.phone.clone(),
            FormField::Guests => self.guests.to_string(),
            FormField::Message => self.message.clone(),
            FormField::Attending => self.attending.as_str().to_string(),
            FormField::AttendanceDays => self
                .attendance_days
                .map(|days| days.value().to_string())
                .unwrap_or_default(),
            FormField::ArrivalTime => self.arrival_time.clone(),
        }
    }

    /// 寫入一個欄位。列舉欄位的值無法解析時回傳錯誤且不修改表單。
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), RsvpError> {
        match field {
            FormField::Name => self.name = value.to_string(),
            FormField::Phone => self.phone = value.to_string(),
            FormField::Guests => self.guests = value.parse()?,
            FormField::Message => self.message = value.to_string(),
            FormField::Attending => self.attending = value.parse()?,
            FormField::AttendanceDays => {
                self.attendance_days = AttendanceDays::parse_selection(value)?
            }
            FormField::ArrivalTime => self.arrival_time = value.to_string(),
        }
        Ok(())
    }
}

/// 欄位錯誤集合。沒有出現的 key 表示該欄位在最近一次檢查中通過。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrorSet(BTreeMap<ErrorKey, String>);

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ErrorKey, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    pub fn remove(&mut self, key: ErrorKey) -> Option<String> {
        self.0.remove(&key)
    }

    pub fn get(&self, key: ErrorKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: ErrorKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = ErrorKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, &str)> {
        self.0.iter().map(|(key, message)| (*key, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// 送往 webhook 的 JSON 內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpPayload {
    pub name: String,
    pub phone: String,
    pub attending: String,
    pub guests: String,
    pub message: String,
    #[serde(rename = "submissionTimeIST")]
    pub submission_time_ist: String,
    pub attendance_days: String,
    pub arrival_time: String,
    pub attendance_info: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
}
