//! Cross-frame control channel
//!
//! One [`ControlChannel`] per overlay. It holds at most one live handle,
//! bound to a session and to the frame the session was opened on. Messages
//! from any other frame, and messages that are not protocol traffic, are
//! dropped. Origins are not checked; the method allow-list in
//! [`HostCall::from_call`] is the trust boundary.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::traits::FrameTransport;
use crate::types::{
    ChannelStatus, ColorMode, FocusSignal, FrameId, HostCall, InboundMessage, OutboundMessage,
    SessionId,
};

/// Something the lifecycle controller or focus trap must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent {
    Call(HostCall),
    Focus(FocusSignal),
}

#[derive(Debug)]
struct ChannelHandle {
    session: SessionId,
    frame: FrameId,
    status: ChannelStatus,
    pending_push: Option<ColorMode>,
}

pub struct ControlChannel {
    transport: Arc<dyn FrameTransport>,
    live: Option<ChannelHandle>,
}

impl ControlChannel {
    #[must_use]
    pub fn new(transport: Arc<dyn FrameTransport>) -> Self {
        Self {
            transport,
            live: None,
        }
    }

    /// Open a handle for `session` on `frame`.
    ///
    /// Fails with `ChannelBusy` while a previous handle is still live.
    pub fn connect(&mut self, session: SessionId, frame: FrameId) -> CoreResult<()> {
        if let Some(handle) = &self.live {
            return Err(CoreError::ChannelBusy(handle.session.0));
        }
        log::info!("[channel] session {} connecting to frame {}", session.0, frame.0);
        self.live = Some(ChannelHandle {
            session,
            frame,
            status: ChannelStatus::Connecting,
            pending_push: None,
        });
        Ok(())
    }

    /// Drop the handle for `session`. Returns whether it was live.
    pub fn disconnect(&mut self, session: SessionId) -> bool {
        if self.session() != Some(session) {
            return false;
        }
        log::info!("[channel] session {} disconnected", session.0);
        self.live = None;
        true
    }

    #[must_use]
    pub fn status(&self) -> Option<ChannelStatus> {
        self.live.as_ref().map(|h| h.status)
    }

    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        self.live.as_ref().map(|h| h.session)
    }

    /// Send the color mode to the remote content, or hold it until the
    /// handshake completes. Only the latest held mode is sent.
    pub fn push_color_mode(&mut self, mode: ColorMode) {
        let Some(handle) = self.live.as_mut() else {
            log::debug!("[channel] no live session, color push dropped");
            return;
        };
        if handle.status == ChannelStatus::Connected {
            let frame = handle.frame;
            self.send(frame, &OutboundMessage::set_color_mode(mode));
        } else {
            handle.pending_push = Some(mode);
        }
    }

    /// Handle one raw message posted by `frame`.
    ///
    /// Replies and handshake acks are sent from here; the returned event, if
    /// any, is for the caller.
    pub fn receive(&mut self, frame: FrameId, raw: &Value) -> Option<ChannelEvent> {
        let Some(handle) = self.live.as_ref() else {
            log::debug!("[channel] message with no live session dropped");
            return None;
        };
        if handle.frame != frame {
            log::debug!("[channel] message from unbound frame {} dropped", frame.0);
            return None;
        }

        let Some(message) = InboundMessage::decode(raw) else {
            if raw.get("type").is_some_and(Value::is_string) {
                log::warn!("[channel] malformed protocol message ignored");
            }
            return None;
        };

        match message {
            InboundMessage::Syn => {
                self.send(frame, &OutboundMessage::Ack);
                self.mark_connected();
                None
            }
            InboundMessage::Call { id, method, args } => {
                let call = HostCall::from_call(&method, &args);
                if call.is_none() {
                    log::warn!("[channel] rejected call to {method:?}");
                }
                if let Some(id) = id {
                    self.send(
                        frame,
                        &OutboundMessage::Reply {
                            id,
                            ok: call.is_some(),
                        },
                    );
                }
                // a call proves the remote side is live
                self.mark_connected();
                call.map(ChannelEvent::Call)
            }
            InboundMessage::FocusTrap { event } => Some(ChannelEvent::Focus(event)),
        }
    }

    fn mark_connected(&mut self) {
        let Some(handle) = self.live.as_mut() else {
            return;
        };
        if handle.status == ChannelStatus::Connected {
            return;
        }
        handle.status = ChannelStatus::Connected;
        log::info!("[channel] session {} connected", handle.session.0);

        let frame = handle.frame;
        let pending = handle.pending_push.take();
        if let Some(mode) = pending {
            self.send(frame, &OutboundMessage::set_color_mode(mode));
        }
    }

    fn send(&self, frame: FrameId, message: &OutboundMessage) {
        let result = message
            .to_value()
            .and_then(|value| self.transport.post(frame, &value));
        if let Err(e) = result {
            if e.is_expected() {
                log::warn!("[channel] post to frame {} failed: {e}", frame.0);
            } else {
                log::error!("[channel] post to frame {} failed: {e}", frame.0);
            }
        }
    }
}
