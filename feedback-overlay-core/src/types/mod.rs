//! 类型定义模块

mod channel;
mod config;
mod endpoint;
mod feedback;
mod focus;
mod overlay;

pub use channel::{HostCall, InboundMessage, OutboundMessage};
pub use config::{ColorMode, DisplayStyle, RuntimeOptions, WidgetConfig};
pub use endpoint::{InvalidTargetNotice, ResolutionPlan, ResolvedEndpoint};
pub use feedback::{SubmissionStatus, MAX_FEEDBACK_CHARS};
pub use focus::{FocusKind, FocusSignal, FocusTarget, FrameFocusPolicy};
pub use overlay::{
    ChannelStatus, CloseReason, FrameId, OverlaySnapshot, OverlayState, SessionId, TimerTicket,
    TransitionEdge,
};

// Re-export client 库的公共类型
pub use feedback_overlay_client::CreateFeedbackRequest;
