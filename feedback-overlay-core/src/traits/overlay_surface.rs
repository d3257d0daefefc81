//! 浮层渲染面抽象 Trait

use crate::error::CoreResult;
use crate::types::{ColorMode, FocusTarget, FrameId, InvalidTargetNotice};

/// The overlay's own DOM subtree: panel chrome, backdrop and the frame.
///
/// 平台实现:
/// - Browser: a `web-sys` binding (not part of this workspace)
/// - Headless: `HeadlessPage` in `feedback-overlay-app`
pub trait OverlaySurface: Send + Sync {
    /// Attach a frame element pointed at `url` (hidden) and return its handle.
    fn mount_frame(&self, url: &str) -> CoreResult<FrameId>;

    /// Show or hide an attached frame without detaching it.
    fn set_frame_visible(&self, frame: FrameId, visible: bool) -> CoreResult<()>;

    /// Detach the frame element.
    fn unmount_frame(&self, frame: FrameId) -> CoreResult<()>;

    /// Slide the panel (and backdrop) in or out.
    fn set_panel_open(&self, open: bool) -> CoreResult<()>;

    /// Reflect a color mode in the panel chrome.
    fn apply_color_mode(&self, mode: ColorMode) -> CoreResult<()>;

    /// Render (`Some`) or clear (`None`) the misconfiguration notice.
    fn show_notice(&self, notice: Option<&InvalidTargetNotice>) -> CoreResult<()>;

    /// Leave the overlay and navigate the browser.
    ///
    /// # Arguments
    /// * `url` - 目标地址
    /// * `new_tab` - `true` opens a new browsing context
    fn navigate(&self, url: &str, new_tab: bool) -> CoreResult<()>;

    /// The panel container, focus target of last resort.
    fn container(&self) -> FocusTarget;

    /// Tabbable nodes inside the overlay subtree, in document order.
    /// The frame is included (as [`crate::types::FocusKind::Frame`]) when mounted.
    fn tabbable_elements(&self) -> Vec<FocusTarget>;
}
