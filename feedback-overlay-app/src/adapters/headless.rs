//! In-memory page
//!
//! Implements every core port over a plain state struct: no DOM, no
//! network. Used by the integration tests and by server-side renderers
//! that only need the overlay's state.

use std::sync::{Mutex, MutexGuard, PoisonError};

use feedback_overlay_core::error::{CoreError, CoreResult};
use feedback_overlay_core::traits::{FrameTransport, OverlaySurface, PageDocument};
use feedback_overlay_core::types::{ColorMode, FocusTarget, FrameId, InvalidTargetNotice};
use serde_json::Value;

const CLOSE_BUTTON: &str = "overlay-close";
const FOOTER_LINK: &str = "overlay-footer";
const PANEL: &str = "overlay-panel";

/// An attached frame element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessFrame {
    pub id: FrameId,
    pub url: String,
    pub visible: bool,
}

/// Everything the overlay did to the page.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub body_overflow: String,
    pub body_padding_right: String,
    pub scrollbar_width: u32,
    pub active: Option<FocusTarget>,
    /// Every focus move, in order.
    pub focus_history: Vec<FocusTarget>,
    pub panel_open: bool,
    pub color_mode: Option<ColorMode>,
    pub notice: Option<InvalidTargetNotice>,
    pub frames: Vec<HeadlessFrame>,
    /// Messages posted into frames.
    pub outbox: Vec<(FrameId, Value)>,
    /// `(url, new_tab)` for every navigation.
    pub navigations: Vec<(String, bool)>,
    next_frame: u64,
}

/// Headless implementation of [`OverlaySurface`], [`FrameTransport`] and
/// [`PageDocument`].
#[derive(Debug, Default)]
pub struct HeadlessPage {
    state: Mutex<PageState>,
}

impl HeadlessPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Page whose vertical scrollbar is `width` pixels wide.
    #[must_use]
    pub fn with_scrollbar(width: u32) -> Self {
        let page = Self::new();
        page.lock().scrollbar_width = width;
        page
    }

    /// Preset inline body styles, to check they are restored exactly.
    #[must_use]
    pub fn with_body_style(self, overflow: &str, padding_right: &str) -> Self {
        {
            let mut state = self.lock();
            state.body_overflow = overflow.to_string();
            state.body_padding_right = padding_right.to_string();
        }
        self
    }

    /// Copy of the current page state.
    #[must_use]
    pub fn state(&self) -> PageState {
        self.lock().clone()
    }

    /// Simulate the user focusing something on the host page.
    pub fn focus_page_element(&self, id: &str) {
        let mut state = self.lock();
        state.active = Some(FocusTarget::element(id));
    }

    /// The attached frame, if any.
    #[must_use]
    pub fn current_frame(&self) -> Option<HeadlessFrame> {
        self.lock().frames.last().cloned()
    }

    /// Drain messages posted into frames.
    pub fn take_outbox(&self) -> Vec<(FrameId, Value)> {
        std::mem::take(&mut self.lock().outbox)
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn frame_target(frame: FrameId) -> FocusTarget {
        FocusTarget::frame(format!("overlay-frame-{}", frame.0))
    }
}

impl OverlaySurface for HeadlessPage {
    fn mount_frame(&self, url: &str) -> CoreResult<FrameId> {
        let mut state = self.lock();
        state.next_frame += 1;
        let id = FrameId(state.next_frame);
        state.frames.push(HeadlessFrame {
            id,
            url: url.to_string(),
            visible: false,
        });
        log::debug!("[headless] mounted frame {} -> {url}", id.0);
        Ok(id)
    }

    fn set_frame_visible(&self, frame: FrameId, visible: bool) -> CoreResult<()> {
        let mut state = self.lock();
        let entry = state
            .frames
            .iter_mut()
            .find(|f| f.id == frame)
            .ok_or_else(|| CoreError::SurfaceError(format!("frame {} is not attached", frame.0)))?;
        entry.visible = visible;
        Ok(())
    }

    fn unmount_frame(&self, frame: FrameId) -> CoreResult<()> {
        let mut state = self.lock();
        let before = state.frames.len();
        state.frames.retain(|f| f.id != frame);
        if state.frames.len() == before {
            return Err(CoreError::SurfaceError(format!(
                "frame {} is not attached",
                frame.0
            )));
        }
        Ok(())
    }

    fn set_panel_open(&self, open: bool) -> CoreResult<()> {
        self.lock().panel_open = open;
        Ok(())
    }

    fn apply_color_mode(&self, mode: ColorMode) -> CoreResult<()> {
        self.lock().color_mode = Some(mode);
        Ok(())
    }

    fn show_notice(&self, notice: Option<&InvalidTargetNotice>) -> CoreResult<()> {
        self.lock().notice = notice.cloned();
        Ok(())
    }

    fn navigate(&self, url: &str, new_tab: bool) -> CoreResult<()> {
        self.lock().navigations.push((url.to_string(), new_tab));
        Ok(())
    }

    fn container(&self) -> FocusTarget {
        FocusTarget::container(PANEL)
    }

    fn tabbable_elements(&self) -> Vec<FocusTarget> {
        let state = self.lock();
        let mut tabbables = vec![FocusTarget::element(CLOSE_BUTTON)];
        if let Some(frame) = state.frames.last() {
            tabbables.push(Self::frame_target(frame.id));
        }
        tabbables.push(FocusTarget::element(FOOTER_LINK));
        tabbables
    }
}

impl FrameTransport for HeadlessPage {
    fn post(&self, frame: FrameId, message: &Value) -> CoreResult<()> {
        let mut state = self.lock();
        if !state.frames.iter().any(|f| f.id == frame) {
            return Err(CoreError::FrameUnavailable(format!(
                "frame {} has no content window",
                frame.0
            )));
        }
        state.outbox.push((frame, message.clone()));
        Ok(())
    }
}

impl PageDocument for HeadlessPage {
    fn body_overflow(&self) -> String {
        self.lock().body_overflow.clone()
    }

    fn set_body_overflow(&self, value: &str) {
        self.lock().body_overflow = value.to_string();
    }

    fn body_padding_right(&self) -> String {
        self.lock().body_padding_right.clone()
    }

    fn set_body_padding_right(&self, value: &str) {
        self.lock().body_padding_right = value.to_string();
    }

    fn scrollbar_width(&self) -> u32 {
        self.lock().scrollbar_width
    }

    fn active_element(&self) -> Option<FocusTarget> {
        self.lock().active.clone()
    }

    fn focus(&self, target: &FocusTarget) {
        let mut state = self.lock();
        state.active = Some(target.clone());
        state.focus_history.push(target.clone());
    }
}
