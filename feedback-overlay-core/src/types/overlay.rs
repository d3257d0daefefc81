//! Overlay lifecycle types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ColorMode, InvalidTargetNotice, ResolvedEndpoint, SubmissionStatus};

/// Lifecycle state, owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverlayState {
    #[default]
    Closed,
    Resolving,
    Opening,
    Open,
    Closing,
}

impl OverlayState {
    /// `Opening` or `Open`: the states in which a channel and the viewport guard may be live.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }
}

impl fmt::Display for OverlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Timed transition edges. At most one timer per edge is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionEdge {
    /// `Opening -> Open` after the reveal debounce.
    Reveal,
    /// `Closing -> Closed` after the exit transition.
    Settle,
}

/// Identifies one scheduled timer; a fired timer whose ticket is no longer
/// current is stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerTicket(pub u64);

/// Control channel session, one per `Opening` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

/// Frame element handle minted by the surface adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(pub u64);

/// Why the overlay was closed; only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    Trigger,
    Backdrop,
    Escape,
    RemoteRequest,
    Reconfigure,
    Shutdown,
}

/// Handshake progress of the live control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    Connecting,
    Connected,
}

/// Point-in-time view of one overlay, for the presentation shell and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    pub state: OverlayState,
    pub color_mode: ColorMode,
    pub endpoint: Option<ResolvedEndpoint>,
    pub frame_mounted: bool,
    pub frame_visible: bool,
    pub channel: Option<ChannelStatus>,
    pub notice: Option<InvalidTargetNotice>,
    pub pending_timers: usize,
    pub viewport_locked: bool,
    pub submission: SubmissionStatus,
}
