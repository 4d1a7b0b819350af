use crate::domain::model::{DeliveryReceipt, RsvpPayload};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn webhook_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn reset_delay(&self) -> Duration;
    /// 為 true 時非 2xx 回應也視為送出失敗
    fn strict_status(&self) -> bool;
}

/// 把 RSVP 送到外部服務。任何已完成的回應都回傳 Ok，連線層錯誤回傳 Err。
#[async_trait]
pub trait RsvpTransport: Send + Sync {
    async fn deliver(&self, payload: &RsvpPayload) -> Result<DeliveryReceipt>;
}
