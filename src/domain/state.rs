use crate::utils::error::{Result, RsvpError};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Submitted,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// 驗證通過，開始送出
    Start,
    /// 驗證失敗，不送出
    ValidationFailed,
    Acknowledged,
    TransportFailed,
    ResetElapsed,
}

impl SubmissionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Loading => "loading",
            SubmissionState::Submitted => "submitted",
            SubmissionState::Failed => "failed",
        }
    }

    /// 狀態轉移表，未列出的組合一律拒絕
    pub fn transition(self, event: SubmissionEvent) -> Result<SubmissionState> {
        use SubmissionEvent::*;
        use SubmissionState::*;

        match (self, event) {
            (Idle | Failed, Start) => Ok(Loading),
            (Idle | Failed, ValidationFailed) => Ok(Idle),
            (Loading, Acknowledged) => Ok(Submitted),
            (Loading, TransportFailed) => Ok(Failed),
            (Submitted, ResetElapsed) => Ok(Idle),
            (from, event) => Err(RsvpError::InvalidTransition {
                from: from.to_string(),
                event: format!("{:?}", event),
            }),
        }
    }

    /// Loading 與 Submitted 期間送出按鈕停用
    pub fn is_submit_enabled(self) -> bool {
        matches!(self, SubmissionState::Idle | SubmissionState::Failed)
    }

    pub fn button_label(self) -> &'static str {
        match self {
            SubmissionState::Loading => "Submitting...",
            SubmissionState::Submitted => "Thank You!",
            SubmissionState::Idle | SubmissionState::Failed => "Send RSVP",
        }
    }

    /// 成功後顯示的確認訊息（標題, 內文）
    pub fn confirmation(self) -> Option<(&'static str, &'static str)> {
        (self == SubmissionState::Submitted).then_some((
            "RSVP Received!",
            "Thank you for your response. We look forward to celebrating with you!",
        ))
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
