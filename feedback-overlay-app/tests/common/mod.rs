#![allow(clippy::expect_used, clippy::unwrap_used, dead_code)]
//! Shared fixtures for the runtime integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use feedback_overlay_app::adapters::HeadlessPage;
use feedback_overlay_app::{OverlayHandle, OverlayRuntimeBuilder};
use feedback_overlay_core::client::{ApiError, CreateFeedbackRequest, FeedbackApi};
use feedback_overlay_core::error::{CoreError, CoreResult};
use feedback_overlay_core::traits::OverlaySurface;
use feedback_overlay_core::types::{
    ColorMode, FocusTarget, FrameId, InvalidTargetNotice, RuntimeOptions, WidgetConfig,
};
use tokio::sync::Notify;

pub const ID: &str = "cc10380b-6f5f-41fc-b28b-4000c021bc3b";

/// `FeedbackApi` with scripted results and a call log.
pub struct ScriptedApi {
    token: Mutex<Result<String, ApiError>>,
    feedback: Mutex<Result<(), ApiError>>,
    upserts: Mutex<Vec<String>>,
    submissions: Mutex<Vec<CreateFeedbackRequest>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedApi {
    pub fn returning(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: Mutex::new(Ok(token.to_string())),
            feedback: Mutex::new(Ok(())),
            upserts: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        })
    }

    pub fn failing() -> Arc<Self> {
        let api = Self::returning("unused");
        api.fail_upsert();
        api
    }

    pub fn fail_upsert(&self) {
        *self.token.lock().unwrap() = Err(ApiError::NetworkError {
            endpoint: "upsert-org".to_string(),
            detail: "connection refused".to_string(),
        });
    }

    pub fn set_token(&self, token: &str) {
        *self.token.lock().unwrap() = Ok(token.to_string());
    }

    /// Keep upsert responses in flight until the returned `Notify` fires.
    pub fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn release(&self) {
        *self.gate.lock().unwrap() = None;
    }

    pub fn upserts(&self) -> Vec<String> {
        self.upserts.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<CreateFeedbackRequest> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackApi for ScriptedApi {
    async fn upsert_org(&self, org_id: &str) -> Result<String, ApiError> {
        self.upserts.lock().unwrap().push(org_id.to_string());
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.token.lock().unwrap().clone()
    }

    async fn create_feedback(&self, request: &CreateFeedbackRequest) -> Result<(), ApiError> {
        self.submissions.lock().unwrap().push(request.clone());
        self.feedback.lock().unwrap().clone()
    }
}

/// Headless surface whose first `failures` frame mounts are rejected.
pub struct FlakySurface {
    page: Arc<HeadlessPage>,
    failures: AtomicUsize,
}

impl FlakySurface {
    pub fn new(page: Arc<HeadlessPage>, failures: usize) -> Arc<Self> {
        Arc::new(Self {
            page,
            failures: AtomicUsize::new(failures),
        })
    }
}

impl OverlaySurface for FlakySurface {
    fn mount_frame(&self, url: &str) -> CoreResult<FrameId> {
        let rejected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(CoreError::SurfaceError("frame element rejected".to_string()));
        }
        self.page.mount_frame(url)
    }

    fn set_frame_visible(&self, frame: FrameId, visible: bool) -> CoreResult<()> {
        self.page.set_frame_visible(frame, visible)
    }

    fn unmount_frame(&self, frame: FrameId) -> CoreResult<()> {
        self.page.unmount_frame(frame)
    }

    fn set_panel_open(&self, open: bool) -> CoreResult<()> {
        self.page.set_panel_open(open)
    }

    fn apply_color_mode(&self, mode: ColorMode) -> CoreResult<()> {
        self.page.apply_color_mode(mode)
    }

    fn show_notice(&self, notice: Option<&InvalidTargetNotice>) -> CoreResult<()> {
        self.page.show_notice(notice)
    }

    fn navigate(&self, url: &str, new_tab: bool) -> CoreResult<()> {
        self.page.navigate(url, new_tab)
    }

    fn container(&self) -> FocusTarget {
        self.page.container()
    }

    fn tabbable_elements(&self) -> Vec<FocusTarget> {
        self.page.tabbable_elements()
    }
}

/// Start an overlay whose frames go through `surface`.
pub fn start_with_surface(
    config: WidgetConfig,
    api: &Arc<ScriptedApi>,
    page: &Arc<HeadlessPage>,
    surface: Arc<dyn OverlaySurface>,
) -> OverlayHandle {
    OverlayRuntimeBuilder::new()
        .config(config)
        .api(api.clone())
        .surface(surface)
        .transport(page.clone())
        .document(page.clone())
        .build()
        .expect("runtime should build")
        .start()
}

/// Start an overlay over a fresh headless page.
pub fn start(
    config: WidgetConfig,
    options: RuntimeOptions,
    api: &Arc<ScriptedApi>,
) -> (OverlayHandle, Arc<HeadlessPage>) {
    let page = Arc::new(HeadlessPage::new());
    let handle = start_on(config, options, api, &page);
    (handle, page)
}

/// Start an overlay on an existing page.
pub fn start_on(
    config: WidgetConfig,
    options: RuntimeOptions,
    api: &Arc<ScriptedApi>,
    page: &Arc<HeadlessPage>,
) -> OverlayHandle {
    OverlayRuntimeBuilder::new()
        .config(config)
        .options(options)
        .api(api.clone())
        .surface(page.clone())
        .transport(page.clone())
        .document(page.clone())
        .build()
        .expect("runtime should build")
        .start()
}

/// Let spawned tasks and the event loop drain without advancing time.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Process queued commands, then advance the paused clock by `ms` and let
/// everything react.
pub async fn advance(ms: u64) {
    settle().await;
    tokio::time::advance(std::time::Duration::from_millis(ms)).await;
    settle().await;
}
