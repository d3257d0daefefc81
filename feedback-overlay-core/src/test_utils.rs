//! 测试辅助模块
//!
//! 提供 mock 实现，供各 service 的单元测试使用。

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use feedback_overlay_client::{ApiError, CreateFeedbackRequest, FeedbackApi};
use serde_json::Value;
use tokio::sync::Notify;

use crate::error::{CoreError, CoreResult};
use crate::traits::{FrameTransport, OverlaySurface, PageDocument};
use crate::types::{ColorMode, FocusTarget, FrameId, InvalidTargetNotice};

// ===== MockFeedbackApi =====

pub struct MockFeedbackApi {
    upsert_result: Mutex<Result<String, ApiError>>,
    feedback_result: Mutex<Result<(), ApiError>>,
    upsert_calls: Mutex<Vec<String>>,
    feedback_calls: Mutex<Vec<CreateFeedbackRequest>>,
    /// 如果 Some，upsert 会等待 notify 后才返回（模拟请求在途）
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockFeedbackApi {
    pub fn with_token(token: &str) -> Self {
        Self {
            upsert_result: Mutex::new(Ok(token.to_string())),
            feedback_result: Mutex::new(Ok(())),
            upsert_calls: Mutex::new(Vec::new()),
            feedback_calls: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        }
    }

    pub fn set_upsert_result(&self, result: Result<String, ApiError>) {
        *self.upsert_result.lock().unwrap() = result;
    }

    pub fn set_feedback_result(&self, result: Result<(), ApiError>) {
        *self.feedback_result.lock().unwrap() = result;
    }

    /// Hold upsert responses until the returned `Notify` is signalled.
    pub fn hold_responses(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn upsert_calls(&self) -> Vec<String> {
        self.upsert_calls.lock().unwrap().clone()
    }

    pub fn feedback_calls(&self) -> Vec<CreateFeedbackRequest> {
        self.feedback_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackApi for MockFeedbackApi {
    async fn upsert_org(&self, org_id: &str) -> Result<String, ApiError> {
        self.upsert_calls.lock().unwrap().push(org_id.to_string());
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.upsert_result.lock().unwrap().clone()
    }

    async fn create_feedback(&self, request: &CreateFeedbackRequest) -> Result<(), ApiError> {
        self.feedback_calls.lock().unwrap().push(request.clone());
        self.feedback_result.lock().unwrap().clone()
    }
}

// ===== MockSurface =====

pub struct MockSurface {
    tabbables: Mutex<Vec<FocusTarget>>,
    next_frame: AtomicU64,
}

impl MockSurface {
    pub fn with_tabbables(tabbables: Vec<FocusTarget>) -> Self {
        Self {
            tabbables: Mutex::new(tabbables),
            next_frame: AtomicU64::new(1),
        }
    }
}

impl OverlaySurface for MockSurface {
    fn mount_frame(&self, _url: &str) -> CoreResult<FrameId> {
        Ok(FrameId(self.next_frame.fetch_add(1, Ordering::SeqCst)))
    }

    fn set_frame_visible(&self, _frame: FrameId, _visible: bool) -> CoreResult<()> {
        Ok(())
    }

    fn unmount_frame(&self, _frame: FrameId) -> CoreResult<()> {
        Ok(())
    }

    fn set_panel_open(&self, _open: bool) -> CoreResult<()> {
        Ok(())
    }

    fn apply_color_mode(&self, _mode: ColorMode) -> CoreResult<()> {
        Ok(())
    }

    fn show_notice(&self, _notice: Option<&InvalidTargetNotice>) -> CoreResult<()> {
        Ok(())
    }

    fn navigate(&self, _url: &str, _new_tab: bool) -> CoreResult<()> {
        Ok(())
    }

    fn container(&self) -> FocusTarget {
        FocusTarget::container("panel")
    }

    fn tabbable_elements(&self) -> Vec<FocusTarget> {
        self.tabbables.lock().unwrap().clone()
    }
}

// ===== MockTransport =====

pub struct MockTransport {
    posted: Mutex<Vec<(FrameId, Value)>>,
    fail: Mutex<bool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            posted: Mutex::new(Vec::new()),
            fail: Mutex::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn posted(&self) -> Vec<(FrameId, Value)> {
        self.posted.lock().unwrap().clone()
    }
}

impl FrameTransport for MockTransport {
    fn post(&self, frame: FrameId, message: &Value) -> CoreResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(CoreError::FrameUnavailable(format!("frame {}", frame.0)));
        }
        self.posted.lock().unwrap().push((frame, message.clone()));
        Ok(())
    }
}

// ===== MockDocument =====

pub struct MockDocument {
    overflow: Mutex<String>,
    padding_right: Mutex<String>,
    scrollbar_width: u32,
    active: Mutex<Option<FocusTarget>>,
    focus_log: Mutex<Vec<FocusTarget>>,
}

impl MockDocument {
    pub fn new(overflow: &str, padding_right: &str, scrollbar_width: u32) -> Self {
        Self {
            overflow: Mutex::new(overflow.to_string()),
            padding_right: Mutex::new(padding_right.to_string()),
            scrollbar_width,
            active: Mutex::new(None),
            focus_log: Mutex::new(Vec::new()),
        }
    }

    pub fn set_active(&self, target: Option<FocusTarget>) {
        *self.active.lock().unwrap() = target;
    }

    pub fn overflow(&self) -> String {
        self.overflow.lock().unwrap().clone()
    }

    pub fn padding_right(&self) -> String {
        self.padding_right.lock().unwrap().clone()
    }

    pub fn focus_log(&self) -> Vec<FocusTarget> {
        self.focus_log.lock().unwrap().clone()
    }
}

impl PageDocument for MockDocument {
    fn body_overflow(&self) -> String {
        self.overflow()
    }

    fn set_body_overflow(&self, value: &str) {
        *self.overflow.lock().unwrap() = value.to_string();
    }

    fn body_padding_right(&self) -> String {
        self.padding_right()
    }

    fn set_body_padding_right(&self, value: &str) {
        *self.padding_right.lock().unwrap() = value.to_string();
    }

    fn scrollbar_width(&self) -> u32 {
        self.scrollbar_width
    }

    fn active_element(&self) -> Option<FocusTarget> {
        self.active.lock().unwrap().clone()
    }

    fn focus(&self, target: &FocusTarget) {
        *self.active.lock().unwrap() = Some(target.clone());
        self.focus_log.lock().unwrap().push(target.clone());
    }
}
