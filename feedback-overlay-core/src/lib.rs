//! Feedback Overlay Core Library
//!
//! Platform-independent runtime for embedding a remotely hosted feedback
//! board in a host page as a slide-over panel or popover:
//! - Identifier Resolver (identifier -> loadable URL, via the org-upsert API)
//! - Frame Lifecycle Controller (open/close state machine with timed transitions)
//! - Cross-Frame Control Channel (allow-listed RPC over the frame boundary)
//! - Viewport Guard (scroll lock and focus containment, reference counted)
//!
//! The DOM is reached only through the traits in [`traits`]; a browser
//! binding or the headless adapter in `feedback-overlay-app` provides them.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export the API client crate
pub use feedback_overlay_client as client;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{
    ChannelEvent, ControlChannel, Effect, FeedbackService, FocusTrap, FrameLifecycleController,
    IdentifierResolver, OverlayContext, ViewportCoordinator, ViewportLease,
};
pub use traits::{FrameTransport, OverlaySurface, PageDocument};
