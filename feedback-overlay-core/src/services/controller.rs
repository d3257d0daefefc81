//! Frame lifecycle state machine
//!
//! The controller is pure: each operation updates its state and returns the
//! [`Effect`]s the driver must execute, in order. It never sleeps and never
//! touches the page. Timers are requested with [`Effect::Schedule`] and come
//! back through [`FrameLifecycleController::timer_fired`]; a ticket that is
//! no longer current is ignored, so a cancelled timer that fires anyway
//! cannot corrupt state.
//!
//! ```text
//! Closed --open(Lookup)--> Resolving --resolved--> Opening --reveal/setLoaded--> Open
//!   ^  \--open(Ready)------------------------------^                              |
//!   |                                                                          close()
//!   +------------------------- settle timer <-------------- Closing <-------------+
//! ```

use std::collections::HashMap;
use std::time::Duration;

use crate::types::{
    CloseReason, ColorMode, DisplayStyle, HostCall, InvalidTargetNotice, OverlayState,
    ResolutionPlan, ResolvedEndpoint, RuntimeOptions, SessionId, TimerTicket, TransitionEdge,
    WidgetConfig,
};

/// Side effect requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the org-upsert lookup for `identifier` and report back.
    Resolve { identifier: String },
    /// Attach a hidden frame pointed at `url`.
    MountFrame { url: String },
    UnmountFrame,
    SetFrameVisible(bool),
    SetPanelOpen(bool),
    ShowNotice(Option<InvalidTargetNotice>),
    /// Reflect the mode in the host chrome.
    ApplyColorMode(ColorMode),
    /// Send the mode to the remote content.
    PushColorMode(ColorMode),
    ConnectChannel(SessionId),
    DisconnectChannel(SessionId),
    Schedule {
        edge: TransitionEdge,
        ticket: TimerTicket,
        delay: Duration,
    },
    CancelTimer {
        edge: TransitionEdge,
        ticket: TimerTicket,
    },
    AcquireViewport,
    ReleaseViewport,
    Navigate { url: String, new_tab: bool },
}

/// Owns [`OverlayState`] for one overlay instance.
pub struct FrameLifecycleController {
    config: WidgetConfig,
    open_delay: Duration,
    close_duration: Duration,
    keep_frame_mounted: bool,

    state: OverlayState,
    color_mode: ColorMode,
    endpoint: Option<ResolvedEndpoint>,
    notice: Option<InvalidTargetNotice>,
    mounted_url: Option<String>,
    frame_visible: bool,
    viewport_held: bool,

    session: Option<SessionId>,
    next_session: u64,
    timers: HashMap<TransitionEdge, TimerTicket>,
    next_ticket: u64,
    lookup_in_flight: Option<String>,
}

impl FrameLifecycleController {
    #[must_use]
    pub fn new(config: WidgetConfig, options: &RuntimeOptions) -> Self {
        Self {
            color_mode: config.color_mode,
            config,
            open_delay: options.open_delay(),
            close_duration: options.close_duration(),
            keep_frame_mounted: options.keep_frame_mounted,
            state: OverlayState::Closed,
            endpoint: None,
            notice: None,
            mounted_url: None,
            frame_visible: false,
            viewport_held: false,
            session: None,
            next_session: 0,
            timers: HashMap::new(),
            next_ticket: 0,
            lookup_in_flight: None,
        }
    }

    // ===== 状态查询 =====

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<&ResolvedEndpoint> {
        self.endpoint.as_ref()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&InvalidTargetNotice> {
        self.notice.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    #[must_use]
    pub fn frame_mounted(&self) -> bool {
        self.mounted_url.is_some()
    }

    #[must_use]
    pub fn frame_visible(&self) -> bool {
        self.frame_visible
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether a trigger toggle would open (rather than close) the overlay.
    #[must_use]
    pub fn toggle_opens(&self) -> bool {
        matches!(self.state, OverlayState::Closed | OverlayState::Closing)
    }

    // ===== 用户操作 =====

    /// Open the overlay following `plan`.
    ///
    /// No-op while `Resolving`, `Opening` or `Open`. From `Closing` the settle
    /// timer is cancelled and a fresh session starts.
    pub fn open(&mut self, plan: ResolutionPlan) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.toggle_opens() {
            log::debug!("[overlay] open() ignored in {}", self.state);
            return effects;
        }

        match plan {
            ResolutionPlan::DirectLink { url, new_tab } => {
                log::debug!("[overlay] direct link, new_tab={new_tab}");
                effects.push(Effect::Navigate { url, new_tab });
            }
            ResolutionPlan::Lookup { identifier } => {
                if self.state == OverlayState::Closing {
                    self.settle_now(&mut effects);
                }
                self.transition(OverlayState::Resolving);
                if self.lookup_in_flight.as_deref() == Some(identifier.as_str()) {
                    log::debug!("[overlay] lookup already in flight, waiting for it");
                } else {
                    self.lookup_in_flight = Some(identifier.clone());
                    effects.push(Effect::Resolve { identifier });
                }
            }
            ResolutionPlan::Ready(endpoint) => {
                self.begin_opening(Some(endpoint), None, &mut effects);
            }
            ResolutionPlan::Invalid(notice) => {
                self.begin_opening(None, Some(notice), &mut effects);
            }
        }
        effects
    }

    /// Close the overlay. No-op while `Closed` or `Closing`.
    ///
    /// While `Resolving` the overlay returns to `Closed` at once; the lookup
    /// keeps running and its result is cached without opening the panel.
    pub fn close(&mut self, reason: CloseReason) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.state {
            OverlayState::Closed | OverlayState::Closing => {
                log::debug!("[overlay] close({reason:?}) ignored in {}", self.state);
            }
            OverlayState::Resolving => {
                log::info!("[overlay] closed during resolution ({reason:?}), result will only be cached");
                self.transition(OverlayState::Closed);
            }
            OverlayState::Opening | OverlayState::Open => {
                self.begin_closing(reason, true, &mut effects);
            }
        }
        effects
    }

    /// Trigger click: close when open or resolving, open otherwise.
    pub fn toggle(&mut self, plan: ResolutionPlan) -> Vec<Effect> {
        if self.toggle_opens() {
            self.open(plan)
        } else {
            self.close(CloseReason::Trigger)
        }
    }

    // ===== 异步结果回调 =====

    /// A lookup finished. Opens the overlay only if it is still `Resolving`
    /// for the same identifier.
    pub fn resolution_succeeded(
        &mut self,
        identifier: &str,
        endpoint: ResolvedEndpoint,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.lookup_in_flight.as_deref() == Some(identifier) {
            self.lookup_in_flight = None;
        }
        if identifier != self.config.identifier || self.config.explicit_url.is_some() {
            log::debug!("[overlay] stale resolution for {identifier} ignored");
            return effects;
        }
        if self.state != OverlayState::Resolving {
            log::debug!("[overlay] resolution cached, overlay stays {}", self.state);
            return effects;
        }
        // the mode may have changed while the lookup was in flight
        let endpoint = endpoint.with_mode(self.color_mode);
        self.begin_opening(Some(endpoint), None, &mut effects);
        effects
    }

    /// The driver could not attach the frame it was asked to mount.
    ///
    /// Forgets the frame and the session bound to it, so the next `open()`
    /// mounts again instead of reusing a frame that never existed.
    pub fn frame_lost(&mut self) {
        if let Some(url) = self.mounted_url.take() {
            log::warn!("[overlay] frame for {url} was not attached");
        }
        self.frame_visible = false;
        self.session = None;
    }

    /// A lookup failed. The open request is dropped without visible change.
    pub fn resolution_failed(&mut self, identifier: &str) -> Vec<Effect> {
        if self.lookup_in_flight.as_deref() == Some(identifier) {
            self.lookup_in_flight = None;
        }
        if self.state == OverlayState::Resolving && identifier == self.config.identifier {
            self.transition(OverlayState::Closed);
        }
        Vec::new()
    }

    /// A scheduled timer fired.
    pub fn timer_fired(&mut self, edge: TransitionEdge, ticket: TimerTicket) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.timers.get(&edge) != Some(&ticket) {
            log::debug!("[overlay] stale {edge:?} timer #{} ignored", ticket.0);
            return effects;
        }
        self.timers.remove(&edge);

        match edge {
            TransitionEdge::Reveal => self.reveal(&mut effects),
            TransitionEdge::Settle => {
                if self.state == OverlayState::Closing {
                    self.settle(&mut effects);
                }
            }
        }
        effects
    }

    /// An allow-listed call arrived over the control channel.
    pub fn remote_call(&mut self, call: HostCall) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.is_active() {
            log::debug!("[overlay] remote {call:?} ignored in {}", self.state);
            return effects;
        }
        match call {
            HostCall::SetColorMode(mode) => {
                if mode != self.color_mode {
                    self.color_mode = mode;
                    effects.push(Effect::ApplyColorMode(mode));
                }
            }
            HostCall::SetLoaded(true) => self.reveal(&mut effects),
            HostCall::SetLoaded(false) => {}
            HostCall::RequestClose => return self.close(CloseReason::RemoteRequest),
        }
        effects
    }

    /// Swap the embed configuration.
    ///
    /// A different board (identifier, explicit URL, or a switch to or from the
    /// plain link style) closes the overlay immediately and drops the frame.
    /// A color change alone is applied in place and pushed to live content.
    pub fn reconfigure(&mut self, config: WidgetConfig) -> Vec<Effect> {
        let mut effects = Vec::new();
        if config == self.config {
            return effects;
        }

        let was_link = self.config.display_style == DisplayStyle::ExternalLink;
        let is_link = config.display_style == DisplayStyle::ExternalLink;
        if !self.config.same_target(&config) || was_link != is_link {
            log::info!("[overlay] board changed, resetting overlay");
            self.force_closed(CloseReason::Reconfigure, &mut effects);
            if self.mounted_url.take().is_some() {
                effects.push(Effect::UnmountFrame);
            }
            self.frame_visible = false;
            self.endpoint = None;
            self.color_mode = config.color_mode;
            effects.push(Effect::ApplyColorMode(config.color_mode));
            self.config = config;
            return effects;
        }

        let mode_changed = config.color_mode != self.config.color_mode;
        self.config = config;
        if mode_changed {
            self.color_mode = self.config.color_mode;
            effects.push(Effect::ApplyColorMode(self.color_mode));
            if self.state.is_active() && self.session.is_some() {
                effects.push(Effect::PushColorMode(self.color_mode));
            }
        }
        effects
    }

    /// Tear everything down: channel, viewport guard, timers and frame.
    pub fn shutdown(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.force_closed(CloseReason::Shutdown, &mut effects);
        for (edge, ticket) in self.timers.drain() {
            effects.push(Effect::CancelTimer { edge, ticket });
        }
        if self.mounted_url.take().is_some() {
            effects.push(Effect::UnmountFrame);
        }
        self.frame_visible = false;
        self.lookup_in_flight = None;
        effects
    }

    // ===== 内部转换 =====

    fn transition(&mut self, to: OverlayState) {
        if self.state != to {
            log::debug!("[overlay] {} -> {to}", self.state);
            self.state = to;
        }
    }

    fn schedule(&mut self, edge: TransitionEdge, delay: Duration, effects: &mut Vec<Effect>) {
        self.cancel(edge, effects);
        self.next_ticket += 1;
        let ticket = TimerTicket(self.next_ticket);
        self.timers.insert(edge, ticket);
        effects.push(Effect::Schedule {
            edge,
            ticket,
            delay,
        });
    }

    fn cancel(&mut self, edge: TransitionEdge, effects: &mut Vec<Effect>) {
        if let Some(ticket) = self.timers.remove(&edge) {
            effects.push(Effect::CancelTimer { edge, ticket });
        }
    }

    fn begin_opening(
        &mut self,
        endpoint: Option<ResolvedEndpoint>,
        notice: Option<InvalidTargetNotice>,
        effects: &mut Vec<Effect>,
    ) {
        self.cancel(TransitionEdge::Settle, effects);

        if self.notice != notice {
            effects.push(Effect::ShowNotice(notice.clone()));
            self.notice = notice;
        }

        let has_frame = endpoint.is_some();
        match &endpoint {
            Some(endpoint) if self.mounted_url.as_deref() != Some(endpoint.url.as_str()) => {
                if self.mounted_url.take().is_some() {
                    effects.push(Effect::UnmountFrame);
                }
                effects.push(Effect::MountFrame {
                    url: endpoint.url.clone(),
                });
                self.mounted_url = Some(endpoint.url.clone());
                self.frame_visible = false;
            }
            Some(_) => {}
            None => {
                if self.mounted_url.take().is_some() {
                    effects.push(Effect::UnmountFrame);
                }
                self.frame_visible = false;
            }
        }
        self.endpoint = endpoint;

        effects.push(Effect::SetPanelOpen(true));
        effects.push(Effect::ApplyColorMode(self.color_mode));

        if has_frame {
            self.next_session += 1;
            let session = SessionId(self.next_session);
            self.session = Some(session);
            effects.push(Effect::ConnectChannel(session));
        }

        if !self.viewport_held {
            self.viewport_held = true;
            effects.push(Effect::AcquireViewport);
        }

        self.transition(OverlayState::Opening);
        if has_frame {
            self.schedule(TransitionEdge::Reveal, self.open_delay, effects);
        } else {
            // 无 frame 可等待，直接展示提示
            self.transition(OverlayState::Open);
        }
    }

    fn reveal(&mut self, effects: &mut Vec<Effect>) {
        if self.state != OverlayState::Opening {
            return;
        }
        self.cancel(TransitionEdge::Reveal, effects);
        if self.mounted_url.is_some() && !self.frame_visible {
            self.frame_visible = true;
            effects.push(Effect::SetFrameVisible(true));
        }
        self.transition(OverlayState::Open);
    }

    fn begin_closing(
        &mut self,
        reason: CloseReason,
        schedule_settle: bool,
        effects: &mut Vec<Effect>,
    ) {
        log::debug!("[overlay] closing ({reason:?})");
        self.cancel(TransitionEdge::Reveal, effects);
        // channel first: the frame must still be addressable while it tears down
        if let Some(session) = self.session.take() {
            effects.push(Effect::DisconnectChannel(session));
        }
        if self.viewport_held {
            self.viewport_held = false;
            effects.push(Effect::ReleaseViewport);
        }
        effects.push(Effect::SetPanelOpen(false));
        self.transition(OverlayState::Closing);
        if schedule_settle {
            self.schedule(TransitionEdge::Settle, self.close_duration, effects);
        }
    }

    fn settle(&mut self, effects: &mut Vec<Effect>) {
        let recolored = self.color_mode != self.config.color_mode;
        if self.mounted_url.is_some() {
            // A frame the remote re-themed would reopen in the wrong mode.
            if self.keep_frame_mounted && !recolored {
                if self.frame_visible {
                    effects.push(Effect::SetFrameVisible(false));
                }
            } else {
                self.mounted_url = None;
                effects.push(Effect::UnmountFrame);
            }
        }
        self.frame_visible = false;

        if self.notice.take().is_some() {
            effects.push(Effect::ShowNotice(None));
        }
        if recolored {
            self.color_mode = self.config.color_mode;
            effects.push(Effect::ApplyColorMode(self.color_mode));
        }
        self.transition(OverlayState::Closed);
    }

    fn settle_now(&mut self, effects: &mut Vec<Effect>) {
        self.cancel(TransitionEdge::Settle, effects);
        self.settle(effects);
    }

    fn force_closed(&mut self, reason: CloseReason, effects: &mut Vec<Effect>) {
        match self.state {
            OverlayState::Opening | OverlayState::Open => {
                self.begin_closing(reason, false, effects);
                self.settle(effects);
            }
            OverlayState::Closing => self.settle_now(effects),
            OverlayState::Resolving => self.transition(OverlayState::Closed),
            OverlayState::Closed => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "cc10380b-6f5f-41fc-b28b-4000c021bc3b";
    const BASE: &str = "https://acme.feedbackland.com";
    const URL: &str = "https://acme.feedbackland.com?mode=light";

    fn endpoint() -> ResolvedEndpoint {
        ResolvedEndpoint::new(BASE, ColorMode::Light)
    }

    fn controller() -> FrameLifecycleController {
        controller_with(RuntimeOptions::default())
    }

    fn controller_with(options: RuntimeOptions) -> FrameLifecycleController {
        let config = WidgetConfig::new(ID).with_color_mode(ColorMode::Light);
        FrameLifecycleController::new(config, &options)
    }

    fn ready() -> ResolutionPlan {
        ResolutionPlan::Ready(endpoint())
    }

    fn lookup() -> ResolutionPlan {
        ResolutionPlan::Lookup {
            identifier: ID.to_string(),
        }
    }

    fn scheduled(effects: &[Effect], edge: TransitionEdge) -> TimerTicket {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Schedule { edge: ed, ticket, .. } if *ed == edge => Some(*ticket),
                _ => None,
            })
            .unwrap()
    }

    fn open_fully(c: &mut FrameLifecycleController) {
        let effects = c.open(ready());
        let ticket = scheduled(&effects, TransitionEdge::Reveal);
        c.timer_fired(TransitionEdge::Reveal, ticket);
        assert_eq!(c.state(), OverlayState::Open);
    }

    #[test]
    fn open_with_cached_endpoint() {
        let mut c = controller();
        let effects = c.open(ready());

        assert_eq!(c.state(), OverlayState::Opening);
        assert_eq!(
            effects,
            vec![
                Effect::MountFrame {
                    url: URL.to_string()
                },
                Effect::SetPanelOpen(true),
                Effect::ApplyColorMode(ColorMode::Light),
                Effect::ConnectChannel(SessionId(1)),
                Effect::AcquireViewport,
                Effect::Schedule {
                    edge: TransitionEdge::Reveal,
                    ticket: TimerTicket(1),
                    delay: Duration::from_millis(150),
                },
            ]
        );
        assert!(!c.frame_visible());

        let effects = c.timer_fired(TransitionEdge::Reveal, TimerTicket(1));
        assert_eq!(effects, vec![Effect::SetFrameVisible(true)]);
        assert_eq!(c.state(), OverlayState::Open);
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn close_when_closed_is_noop() {
        let mut c = controller();
        assert!(c.close(CloseReason::Escape).is_empty());
        assert_eq!(c.state(), OverlayState::Closed);
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn second_open_is_noop() {
        let mut c = controller();
        c.open(ready());
        assert!(c.open(ready()).is_empty());
        assert_eq!(c.session(), Some(SessionId(1)));
        assert_eq!(c.pending_timers(), 1);
    }

    #[test]
    fn close_tears_down_channel_before_frame() {
        let mut c = controller();
        open_fully(&mut c);

        let effects = c.close(CloseReason::Backdrop);
        assert_eq!(c.state(), OverlayState::Closing);
        assert_eq!(effects[0], Effect::DisconnectChannel(SessionId(1)));
        assert!(effects.contains(&Effect::ReleaseViewport));
        assert!(!effects.contains(&Effect::SetFrameVisible(false)));

        let settle = scheduled(&effects, TransitionEdge::Settle);
        let effects = c.timer_fired(TransitionEdge::Settle, settle);
        assert_eq!(effects, vec![Effect::SetFrameVisible(false)]);
        assert_eq!(c.state(), OverlayState::Closed);
        assert!(c.frame_mounted());
        assert!(c.close(CloseReason::Backdrop).is_empty());
    }

    #[test]
    fn rapid_toggle_settles_open() {
        let mut c = controller();
        let first = c.open(ready());
        let stale_reveal = scheduled(&first, TransitionEdge::Reveal);
        let closing = c.close(CloseReason::Trigger);
        assert!(closing.contains(&Effect::CancelTimer {
            edge: TransitionEdge::Reveal,
            ticket: stale_reveal,
        }));
        let stale_settle = scheduled(&closing, TransitionEdge::Settle);

        let reopening = c.open(ready());
        assert!(reopening.contains(&Effect::CancelTimer {
            edge: TransitionEdge::Settle,
            ticket: stale_settle,
        }));
        assert!(reopening.contains(&Effect::ConnectChannel(SessionId(2))));
        // frame URL unchanged, no remount
        assert!(!reopening
            .iter()
            .any(|e| matches!(e, Effect::MountFrame { .. })));
        assert_eq!(c.state(), OverlayState::Opening);

        assert!(c.timer_fired(TransitionEdge::Reveal, stale_reveal).is_empty());
        assert!(c.timer_fired(TransitionEdge::Settle, stale_settle).is_empty());
        assert_eq!(c.state(), OverlayState::Opening);

        let reveal = scheduled(&reopening, TransitionEdge::Reveal);
        c.timer_fired(TransitionEdge::Reveal, reveal);
        assert_eq!(c.state(), OverlayState::Open);
        assert_eq!(c.session(), Some(SessionId(2)));
        assert_eq!(c.pending_timers(), 0);
    }

    #[test]
    fn lookup_deduplicated_across_reopen() {
        let mut c = controller();
        let effects = c.open(lookup());
        assert_eq!(
            effects,
            vec![Effect::Resolve {
                identifier: ID.to_string()
            }]
        );
        assert_eq!(c.state(), OverlayState::Resolving);
        assert!(c.open(lookup()).is_empty());

        c.close(CloseReason::Trigger);
        assert_eq!(c.state(), OverlayState::Closed);
        assert!(c.open(lookup()).is_empty());
        assert_eq!(c.state(), OverlayState::Resolving);

        let effects = c.resolution_succeeded(ID, endpoint());
        assert!(effects.contains(&Effect::MountFrame {
            url: URL.to_string()
        }));
        assert_eq!(c.state(), OverlayState::Opening);
    }

    #[test]
    fn close_during_resolution_suppresses_open() {
        let mut c = controller();
        c.open(lookup());
        assert!(c.close(CloseReason::Escape).is_empty());

        let effects = c.resolution_succeeded(ID, endpoint());
        assert!(effects.is_empty());
        assert_eq!(c.state(), OverlayState::Closed);

        // next lookup is issued again since the previous one completed
        assert_eq!(c.open(lookup()).len(), 1);
    }

    #[test]
    fn resolution_uses_mode_current_at_completion() {
        let mut c = controller();
        c.open(lookup());
        let dark = WidgetConfig::new(ID).with_color_mode(ColorMode::Dark);
        c.reconfigure(dark);
        assert_eq!(c.state(), OverlayState::Resolving);

        // lookup was issued while the config still said light
        let effects = c.resolution_succeeded(ID, endpoint());
        assert!(effects.contains(&Effect::MountFrame {
            url: format!("{BASE}?mode=dark")
        }));
        assert!(effects.contains(&Effect::ApplyColorMode(ColorMode::Dark)));
    }

    #[test]
    fn lost_frame_is_mounted_again_on_next_open() {
        let mut c = controller();
        let effects = c.open(ready());
        let reveal = scheduled(&effects, TransitionEdge::Reveal);
        c.frame_lost();
        assert!(!c.frame_mounted());
        assert_eq!(c.session(), None);

        let effects = c.timer_fired(TransitionEdge::Reveal, reveal);
        assert!(!effects.contains(&Effect::SetFrameVisible(true)));
        assert_eq!(c.state(), OverlayState::Open);

        let effects = c.close(CloseReason::Trigger);
        assert!(!effects.iter().any(|e| matches!(e, Effect::DisconnectChannel(_))));
        let settle = scheduled(&effects, TransitionEdge::Settle);
        assert!(!c.timer_fired(TransitionEdge::Settle, settle).contains(&Effect::UnmountFrame));

        let effects = c.open(ready());
        assert!(effects.contains(&Effect::MountFrame {
            url: URL.to_string()
        }));
        assert_eq!(c.session(), Some(SessionId(2)));
    }

    #[test]
    fn failed_resolution_returns_to_closed() {
        let mut c = controller();
        c.open(lookup());
        assert!(c.resolution_failed(ID).is_empty());
        assert_eq!(c.state(), OverlayState::Closed);
        assert_eq!(c.open(lookup()).len(), 1);
    }

    #[test]
    fn invalid_plan_shows_notice_without_frame() {
        let mut c = controller();
        let notice = InvalidTargetNotice::invalid_identifier();
        let effects = c.open(ResolutionPlan::Invalid(notice.clone()));

        assert_eq!(c.state(), OverlayState::Open);
        assert!(effects.contains(&Effect::ShowNotice(Some(notice))));
        assert!(effects.contains(&Effect::AcquireViewport));
        assert!(!effects.iter().any(|e| matches!(
            e,
            Effect::MountFrame { .. } | Effect::ConnectChannel(_) | Effect::Schedule { .. }
        )));

        let effects = c.close(CloseReason::Escape);
        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::DisconnectChannel(_))));
        let settle = scheduled(&effects, TransitionEdge::Settle);
        let effects = c.timer_fired(TransitionEdge::Settle, settle);
        assert_eq!(effects, vec![Effect::ShowNotice(None)]);
    }

    #[test]
    fn set_loaded_reveals_early() {
        let mut c = controller();
        let effects = c.open(ready());
        let reveal = scheduled(&effects, TransitionEdge::Reveal);

        let effects = c.remote_call(HostCall::SetLoaded(true));
        assert_eq!(
            effects,
            vec![
                Effect::CancelTimer {
                    edge: TransitionEdge::Reveal,
                    ticket: reveal,
                },
                Effect::SetFrameVisible(true),
            ]
        );
        assert_eq!(c.state(), OverlayState::Open);
        assert!(c.remote_call(HostCall::SetLoaded(true)).is_empty());
    }

    #[test]
    fn remote_color_mode_reset_on_full_close() {
        let mut c = controller();
        open_fully(&mut c);

        let effects = c.remote_call(HostCall::SetColorMode(ColorMode::Dark));
        assert_eq!(effects, vec![Effect::ApplyColorMode(ColorMode::Dark)]);
        assert_eq!(c.color_mode(), ColorMode::Dark);

        let effects = c.remote_call(HostCall::RequestClose);
        assert_eq!(c.state(), OverlayState::Closing);
        assert_eq!(c.color_mode(), ColorMode::Dark);

        let settle = scheduled(&effects, TransitionEdge::Settle);
        let effects = c.timer_fired(TransitionEdge::Settle, settle);
        assert_eq!(
            effects,
            vec![
                Effect::UnmountFrame,
                Effect::ApplyColorMode(ColorMode::Light)
            ]
        );
        assert_eq!(c.color_mode(), ColorMode::Light);
        assert!(!c.frame_mounted());
    }

    #[test]
    fn remote_calls_ignored_when_closed() {
        let mut c = controller();
        assert!(c.remote_call(HostCall::SetColorMode(ColorMode::Dark)).is_empty());
        assert!(c.remote_call(HostCall::RequestClose).is_empty());
        assert_eq!(c.color_mode(), ColorMode::Light);
    }

    #[test]
    fn frame_detached_when_not_kept() {
        let options = RuntimeOptions {
            keep_frame_mounted: false,
            ..RuntimeOptions::default()
        };
        let mut c = controller_with(options);
        open_fully(&mut c);
        let effects = c.close(CloseReason::Trigger);
        let settle = scheduled(&effects, TransitionEdge::Settle);
        assert_eq!(
            c.timer_fired(TransitionEdge::Settle, settle),
            vec![Effect::UnmountFrame]
        );
    }

    #[test]
    fn direct_link_navigates_without_state_change() {
        let mut c = controller();
        let effects = c.open(ResolutionPlan::DirectLink {
            url: "https://x.feedbackland.com".to_string(),
            new_tab: true,
        });
        assert_eq!(
            effects,
            vec![Effect::Navigate {
                url: "https://x.feedbackland.com".to_string(),
                new_tab: true,
            }]
        );
        assert_eq!(c.state(), OverlayState::Closed);
    }

    #[test]
    fn reconfigure_to_other_board_resets() {
        let mut c = controller();
        open_fully(&mut c);

        let other = WidgetConfig::new("0f8fad5b-d9cb-469f-a165-70867728950e");
        let effects = c.reconfigure(other);
        assert_eq!(c.state(), OverlayState::Closed);
        assert!(effects.contains(&Effect::DisconnectChannel(SessionId(1))));
        assert!(effects.contains(&Effect::ReleaseViewport));
        assert!(effects.contains(&Effect::UnmountFrame));
        assert_eq!(c.pending_timers(), 0);
        assert!(c.endpoint().is_none());

        // late result for the old identifier
        assert!(c
            .resolution_succeeded(ID, endpoint())
            .is_empty());
    }

    #[test]
    fn reconfigure_color_pushes_to_live_content() {
        let mut c = controller();
        open_fully(&mut c);
        let config = c.config().clone().with_color_mode(ColorMode::Dark);
        let effects = c.reconfigure(config);
        assert_eq!(
            effects,
            vec![
                Effect::ApplyColorMode(ColorMode::Dark),
                Effect::PushColorMode(ColorMode::Dark)
            ]
        );
        assert_eq!(c.state(), OverlayState::Open);
    }

    #[test]
    fn shutdown_from_open_releases_everything() {
        let mut c = controller();
        c.open(ready());
        let effects = c.shutdown();
        assert!(effects.contains(&Effect::DisconnectChannel(SessionId(1))));
        assert!(effects.contains(&Effect::ReleaseViewport));
        assert_eq!(effects.last(), Some(&Effect::UnmountFrame));
        assert_eq!(c.state(), OverlayState::Closed);
        assert_eq!(c.pending_timers(), 0);
    }
}
