use crate::core::payload::build_payload;
use crate::core::validators::{validate_field, validate_form};
use crate::domain::model::{
    DeliveryReceipt, ErrorKey, FormField, RsvpFormData, ValidationErrorSet,
};
use crate::domain::ports::{ConfigProvider, RsvpTransport};
use crate::domain::state::{SubmissionEvent, SubmissionState};
use crate::utils::error::{Result, RsvpError};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(4000);
pub const SUBMIT_ERROR_MESSAGE: &str = "Error submitting RSVP. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 有欄位沒通過驗證，沒有發出請求
    Invalid(ValidationErrorSet),
    Submitted(DeliveryReceipt),
    /// 傳送失敗，表單保留以便重送
    Failed(String),
}

struct SessionInner {
    form: RsvpFormData,
    errors: ValidationErrorSet,
    state: SubmissionState,
    closed: bool,
    // 每次送出成功遞增，讓過期的重設計時器失效
    generation: u64,
    reset_task: Option<JoinHandle<()>>,
}

struct Shared {
    inner: Mutex<SessionInner>,
    state_tx: watch::Sender<SubmissionState>,
}

impl Shared {
    // 鎖只在同步區段內持有，不會跨越 await
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, inner: &mut SessionInner, event: SubmissionEvent) -> Result<SubmissionState> {
        let next = inner.state.transition(event)?;
        inner.state = next;
        self.state_tx.send_replace(next);
        Ok(next)
    }
}

/// 一份 RSVP 表單的狀態：欄位值、錯誤集合與送出狀態機。
///
/// Clone 出來的 handle 共用同一份狀態，所以送出進行中仍可編輯欄位；
/// 請求送出的是呼叫 `submit` 當下的快照。
pub struct RsvpSession<T: RsvpTransport> {
    shared: Arc<Shared>,
    transport: Arc<T>,
    reset_delay: Duration,
}

impl<T: RsvpTransport> Clone for RsvpSession<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            transport: Arc::clone(&self.transport),
            reset_delay: self.reset_delay,
        }
    }
}

impl<T: RsvpTransport + 'static> RsvpSession<T> {
    pub fn new(transport: T) -> Self {
        Self::with_reset_delay(transport, DEFAULT_RESET_DELAY)
    }

    pub fn with_reset_delay(transport: T, reset_delay: Duration) -> Self {
        let (state_tx, _) = watch::channel(SubmissionState::Idle);
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(SessionInner {
                    form: RsvpFormData::default(),
                    errors: ValidationErrorSet::new(),
                    state: SubmissionState::Idle,
                    closed: false,
                    generation: 0,
                    reset_task: None,
                }),
                state_tx,
            }),
            transport: Arc::new(transport),
            reset_delay,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(transport: T, config: &C) -> Self {
        Self::with_reset_delay(transport, config.reset_delay())
    }

    pub fn form(&self) -> RsvpFormData {
        self.shared.lock().form.clone()
    }

    pub fn errors(&self) -> ValidationErrorSet {
        self.shared.lock().errors.clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.shared.lock().state
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.shared.state_tx.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// 寫入欄位並只重跑該欄位的驗證器
    pub fn edit_field(&self, field: FormField, value: &str) -> Result<()> {
        let mut inner = self.shared.lock();
        if inner.closed {
            return Err(RsvpError::SessionClosed);
        }

        inner.form.set(field, value)?;

        if let Some((key, result)) = validate_field(field, &inner.form) {
            match result {
                Ok(()) => {
                    inner.errors.remove(key);
                }
                Err(e) => inner.errors.insert(key, e.to_string()),
            }
        }

        // 不出席時日期與抵達時間欄位會被隱藏
        if field == FormField::Attending && !inner.form.attending.is_attending() {
            inner.errors.remove(ErrorKey::AttendanceDays);
            inner.errors.remove(ErrorKey::ArrivalTime);
        }

        Ok(())
    }

    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let payload = {
            let mut inner = self.shared.lock();
            if inner.closed {
                return Err(RsvpError::SessionClosed);
            }
            if !inner.state.is_submit_enabled() {
                return Err(RsvpError::SubmissionBusy {
                    state: inner.state.to_string(),
                });
            }

            let errors = validate_form(&inner.form);
            if !errors.is_empty() {
                tracing::debug!(
                    "RSVP not sent, {} field(s) need attention: {:?}",
                    errors.len(),
                    errors.keys().collect::<Vec<_>>()
                );
                self.shared.apply(&mut inner, SubmissionEvent::ValidationFailed)?;
                inner.errors = errors.clone();
                return Ok(SubmitOutcome::Invalid(errors));
            }

            inner.errors.clear();
            self.shared.apply(&mut inner, SubmissionEvent::Start)?;
            build_payload(&inner.form, Utc::now())
        };

        tracing::info!(
            "📨 Submitting RSVP (attending: {}, guests: {})",
            payload.attending,
            payload.guests
        );

        // 傳送與後續狀態轉移在獨立 task 中完成，呼叫端放棄等待也不會卡在 Loading
        let shared = Arc::clone(&self.shared);
        let transport = Arc::clone(&self.transport);
        let reset_delay = self.reset_delay;
        let delivery = tokio::spawn(async move {
            let result = transport.deliver(&payload).await;
            Self::finish_delivery(&shared, reset_delay, result)
        });

        match delivery.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("❌ RSVP delivery task aborted: {}", e);
                let mut inner = self.shared.lock();
                if inner.closed {
                    return Err(RsvpError::SessionClosed);
                }
                Self::mark_failed(&self.shared, &mut inner)
            }
        }
    }

    fn finish_delivery(
        shared: &Arc<Shared>,
        reset_delay: Duration,
        result: Result<DeliveryReceipt>,
    ) -> Result<SubmitOutcome> {
        let mut inner = shared.lock();
        if inner.closed {
            tracing::debug!("RSVP session closed while the request was in flight, ignoring response");
            return Err(RsvpError::SessionClosed);
        }

        match result {
            Ok(receipt) => {
                shared.apply(&mut inner, SubmissionEvent::Acknowledged)?;
                tracing::info!("✅ RSVP delivered (HTTP {})", receipt.status);

                inner.generation += 1;
                let generation = inner.generation;
                inner.reset_task = Some(Self::spawn_reset(
                    Arc::clone(shared),
                    reset_delay,
                    generation,
                ));
                Ok(SubmitOutcome::Submitted(receipt))
            }
            Err(e) => {
                tracing::warn!("❌ RSVP delivery failed: {}", e);
                tracing::warn!("💡 {}", e.recovery_suggestion());
                Self::mark_failed(shared, &mut inner)
            }
        }
    }

    fn mark_failed(shared: &Shared, inner: &mut SessionInner) -> Result<SubmitOutcome> {
        shared.apply(inner, SubmissionEvent::TransportFailed)?;
        inner.errors.insert(ErrorKey::Submit, SUBMIT_ERROR_MESSAGE);
        Ok(SubmitOutcome::Failed(SUBMIT_ERROR_MESSAGE.to_string()))
    }

    fn spawn_reset(shared: Arc<Shared>, delay: Duration, generation: u64) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut inner = shared.lock();
            if inner.closed || inner.generation != generation {
                return;
            }
            if shared.apply(&mut inner, SubmissionEvent::ResetElapsed).is_ok() {
                inner.form = RsvpFormData::default();
                inner.errors.clear();
                inner.reset_task = None;
                tracing::debug!("RSVP form reset after {:?}", delay);
            }
        })
    }

    /// 關閉後，遲到的回應與重設計時器都不會再改動狀態
    pub fn close(&self) {
        let mut inner = self.shared.lock();
        inner.closed = true;
        if let Some(task) = inner.reset_task.take() {
            task.abort();
        }
    }
}
