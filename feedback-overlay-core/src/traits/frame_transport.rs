use serde_json::Value;

use crate::error::CoreResult;
use crate::types::FrameId;

/// `postMessage` into a frame's content window.
///
/// Target origin is always `*`; the control channel does not check origins.
pub trait FrameTransport: Send + Sync {
    /// Post `message` to the content window of `frame`.
    ///
    /// Fails with `FrameUnavailable` when the frame has no content window.
    fn post(&self, frame: FrameId, message: &Value) -> CoreResult<()>;
}
