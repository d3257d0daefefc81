//! Platform port trait definitions
//!
//! Everything the runtime does to the host page goes through these traits.
//! Calls are synchronous: DOM mutations and `postMessage` complete
//! immediately on the page's single control flow.

mod frame_transport;
mod overlay_surface;
mod page_document;

pub use frame_transport::FrameTransport;
pub use overlay_surface::OverlaySurface;
pub use page_document::PageDocument;
