//! 业务逻辑服务层

mod channel;
mod controller;
mod feedback_service;
mod focus;
mod resolver;
mod viewport;

pub use channel::{ChannelEvent, ControlChannel};
pub use controller::{Effect, FrameLifecycleController};
pub use feedback_service::FeedbackService;
pub use focus::FocusTrap;
pub use resolver::IdentifierResolver;
pub use viewport::{ViewportCoordinator, ViewportLease};

use std::sync::Arc;

use feedback_overlay_client::FeedbackApi;

use crate::traits::{FrameTransport, OverlaySurface, PageDocument};

/// 服务上下文 - 持有所有平台依赖
///
/// The platform layer builds one per overlay instance. Instances on the same
/// page should share one [`ViewportCoordinator`] (see
/// [`OverlayContext::with_viewport`]) so the guard composes.
pub struct OverlayContext {
    /// Remote API
    pub api: Arc<dyn FeedbackApi>,
    /// Overlay subtree
    pub surface: Arc<dyn OverlaySurface>,
    /// postMessage into the frame
    pub transport: Arc<dyn FrameTransport>,
    /// Host page document (focus moves)
    pub document: Arc<dyn PageDocument>,
    /// Page-wide scroll/focus guard
    pub viewport: Arc<ViewportCoordinator>,
}

impl OverlayContext {
    /// Context with a viewport guard of its own over `document`.
    #[must_use]
    pub fn new(
        api: Arc<dyn FeedbackApi>,
        surface: Arc<dyn OverlaySurface>,
        transport: Arc<dyn FrameTransport>,
        document: Arc<dyn PageDocument>,
    ) -> Self {
        let viewport = Arc::new(ViewportCoordinator::new(Arc::clone(&document)));
        Self {
            api,
            surface,
            transport,
            document,
            viewport,
        }
    }

    /// Use a guard shared with other overlays on the page.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Arc<ViewportCoordinator>) -> Self {
        self.viewport = viewport;
        self
    }
}
