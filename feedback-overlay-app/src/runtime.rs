//! Overlay event loop
//!
//! One task per overlay owns the controller, the control channel, the
//! viewport lease and the transition timers. Everything reaches it as a
//! message: user commands through [`OverlayHandle`], lookup results and
//! timer expiries through an internal queue. User commands are drained
//! first, so a `close()` issued while a lookup is in flight is always seen
//! before the lookup's result.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;

use feedback_overlay_core::error::{CoreError, CoreResult};
use feedback_overlay_core::services::{
    ChannelEvent, ControlChannel, Effect, FeedbackService, FocusTrap, FrameLifecycleController,
    IdentifierResolver, OverlayContext, ViewportLease,
};
use feedback_overlay_core::types::{
    CloseReason, DisplayStyle, FocusTarget, FrameId, OverlaySnapshot, ResolvedEndpoint,
    RuntimeOptions, TimerTicket, TransitionEdge, WidgetConfig,
};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum Command {
    Open,
    Close(CloseReason),
    Toggle,
    Tab { backwards: bool },
    FocusIn(FocusTarget),
    Deliver { frame: FrameId, message: Value },
    Reconfigure(WidgetConfig),
    Submit {
        description: String,
        reply: oneshot::Sender<CoreResult<()>>,
    },
    Snapshot(oneshot::Sender<OverlaySnapshot>),
    Shutdown(oneshot::Sender<()>),
}

enum Internal {
    Resolved {
        identifier: String,
        result: CoreResult<ResolvedEndpoint>,
    },
    TimerFired {
        edge: TransitionEdge,
        ticket: TimerTicket,
    },
}

/// An assembled overlay, not yet running.
pub struct OverlayRuntime {
    ctx: OverlayContext,
    config: WidgetConfig,
    options: RuntimeOptions,
}

impl OverlayRuntime {
    pub(crate) fn new(ctx: OverlayContext, config: WidgetConfig, options: RuntimeOptions) -> Self {
        Self {
            ctx,
            config,
            options,
        }
    }

    /// Spawn the event loop on the current tokio runtime.
    ///
    /// The loop stops on [`OverlayHandle::shutdown`] or once every handle is
    /// dropped; either way the page is restored.
    #[must_use]
    pub fn start(self) -> OverlayHandle {
        let (tx, commands) = mpsc::unbounded_channel();
        let (internal_tx, internal) = mpsc::unbounded_channel();

        let actor = OverlayActor {
            resolver: Arc::new(IdentifierResolver::new(
                Arc::clone(&self.ctx.api),
                &self.options,
            )),
            feedback: Arc::new(FeedbackService::new(Arc::clone(&self.ctx.api))),
            controller: FrameLifecycleController::new(self.config, &self.options),
            channel: ControlChannel::new(Arc::clone(&self.ctx.transport)),
            focus: FocusTrap::new(self.options.frame_focus),
            ctx: self.ctx,
            frame: None,
            lease: None,
            timers: HashMap::new(),
            internal_tx,
        };
        tokio::spawn(actor.run(commands, internal));

        OverlayHandle { tx }
    }
}

/// Cloneable handle to a running overlay.
///
/// Fire-and-forget methods are silently dropped once the runtime has
/// stopped; the async ones report [`CoreError::RuntimeStopped`].
#[derive(Clone)]
pub struct OverlayHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl OverlayHandle {
    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            log::debug!("[runtime] command dropped, overlay stopped");
        }
    }

    pub fn open(&self) {
        self.send(Command::Open);
    }

    pub fn close(&self) {
        self.send(Command::Close(CloseReason::Trigger));
    }

    /// Trigger click.
    pub fn toggle(&self) {
        self.send(Command::Toggle);
    }

    /// Escape key.
    pub fn escape(&self) {
        self.send(Command::Close(CloseReason::Escape));
    }

    /// Click on the backdrop outside the panel.
    pub fn backdrop_click(&self) {
        self.send(Command::Close(CloseReason::Backdrop));
    }

    /// Tab (`backwards` for Shift+Tab) while the overlay has focus.
    pub fn tab(&self, backwards: bool) {
        self.send(Command::Tab { backwards });
    }

    /// Focus landed on `target` somewhere on the page.
    pub fn focus_in(&self, target: FocusTarget) {
        self.send(Command::FocusIn(target));
    }

    /// A `message` event whose source is `frame`.
    pub fn deliver(&self, frame: FrameId, message: Value) {
        self.send(Command::Deliver { frame, message });
    }

    pub fn reconfigure(&self, config: WidgetConfig) {
        self.send(Command::Reconfigure(config));
    }

    /// Submit quick feedback for the configured identifier.
    pub async fn submit_feedback(&self, description: impl Into<String>) -> CoreResult<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Submit {
                description: description.into(),
                reply,
            })
            .map_err(|_| CoreError::RuntimeStopped)?;
        rx.await.map_err(|_| CoreError::RuntimeStopped)?
    }

    pub async fn snapshot(&self) -> CoreResult<OverlaySnapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot(reply))
            .map_err(|_| CoreError::RuntimeStopped)?;
        rx.await.map_err(|_| CoreError::RuntimeStopped)
    }

    /// Stop the loop: close, release the viewport guard, drop the frame.
    /// Returns once the page has been restored.
    pub async fn shutdown(&self) {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Command::Shutdown(reply)).is_ok() {
            let _ = rx.await;
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.tx.is_closed()
    }
}

struct OverlayActor {
    ctx: OverlayContext,
    resolver: Arc<IdentifierResolver>,
    feedback: Arc<FeedbackService>,
    controller: FrameLifecycleController,
    channel: ControlChannel,
    focus: FocusTrap,
    frame: Option<FrameId>,
    lease: Option<ViewportLease>,
    timers: HashMap<TransitionEdge, (TimerTicket, JoinHandle<()>)>,
    internal_tx: mpsc::UnboundedSender<Internal>,
}

impl OverlayActor {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut internal: mpsc::UnboundedReceiver<Internal>,
    ) {
        log::debug!("[runtime] overlay started");
        loop {
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => {
                        if self.handle_command(command).await.is_break() {
                            break;
                        }
                    }
                    None => {
                        log::debug!("[runtime] all handles dropped");
                        self.teardown();
                        break;
                    }
                },
                Some(event) = internal.recv() => self.handle_internal(event),
            }
        }
        log::debug!("[runtime] overlay stopped");
    }

    async fn handle_command(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Open => {
                if self.controller.toggle_opens() {
                    self.open().await;
                } else {
                    log::debug!("[runtime] open ignored in {}", self.controller.state());
                }
            }
            Command::Toggle => {
                if self.controller.toggle_opens() {
                    self.open().await;
                } else {
                    let effects = self.controller.close(CloseReason::Trigger);
                    self.apply(effects);
                }
            }
            Command::Close(reason) => {
                let effects = self.controller.close(reason);
                self.apply(effects);
            }
            Command::Tab { backwards } => {
                if self.controller.state().is_active() {
                    let current = self.ctx.document.active_element();
                    let next = self.focus.next_target(
                        self.ctx.surface.as_ref(),
                        current.as_ref(),
                        backwards,
                    );
                    self.ctx.document.focus(&next);
                }
            }
            Command::FocusIn(target) => {
                if self.controller.state().is_active() {
                    let redirect = self.focus.on_focus_in(self.ctx.surface.as_ref(), &target);
                    if let Some(redirect) = redirect {
                        self.ctx.document.focus(&redirect);
                    }
                }
            }
            Command::Deliver { frame, message } => match self.channel.receive(frame, &message) {
                Some(ChannelEvent::Call(call)) => {
                    let effects = self.controller.remote_call(call);
                    self.apply(effects);
                }
                Some(ChannelEvent::Focus(signal)) => {
                    if self.controller.state().is_active() {
                        if let Some(target) =
                            self.focus.on_frame_signal(self.ctx.surface.as_ref(), signal)
                        {
                            self.ctx.document.focus(&target);
                        }
                    }
                }
                None => {}
            },
            Command::Reconfigure(config) => {
                if config.identifier != self.controller.config().identifier {
                    self.resolver.invalidate_except(&config.identifier).await;
                }
                let effects = self.controller.reconfigure(config);
                self.apply(effects);
            }
            Command::Submit { description, reply } => {
                let feedback = Arc::clone(&self.feedback);
                let identifier = self.controller.config().identifier.clone();
                tokio::spawn(async move {
                    let result = feedback.submit(&identifier, &description).await;
                    let _ = reply.send(result);
                });
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot().await);
            }
            Command::Shutdown(done) => {
                self.teardown();
                let _ = done.send(());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    async fn open(&mut self) {
        let config = self.controller.config().clone();
        if config.display_style == DisplayStyle::Popover {
            self.feedback.reset().await;
        }
        let plan = self.resolver.plan(&config).await;
        let effects = self.controller.open(plan);
        self.apply(effects);
    }

    fn handle_internal(&mut self, event: Internal) {
        let effects = match event {
            Internal::Resolved { identifier, result } => match result {
                Ok(endpoint) => self.controller.resolution_succeeded(&identifier, endpoint),
                Err(e) => {
                    log::debug!("[runtime] resolution failed, trigger stays inert: {e}");
                    self.controller.resolution_failed(&identifier)
                }
            },
            Internal::TimerFired { edge, ticket } => {
                if self.timers.get(&edge).is_some_and(|(t, _)| *t == ticket) {
                    self.timers.remove(&edge);
                }
                self.controller.timer_fired(edge, ticket)
            }
        };
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            log::debug!("[runtime] {effect:?}");
            if let Err(e) = self.apply_one(effect) {
                if e.is_expected() {
                    log::warn!("[runtime] {e}");
                } else {
                    log::error!("[runtime] {e}");
                }
            }
        }
    }

    fn apply_one(&mut self, effect: Effect) -> CoreResult<()> {
        let surface = Arc::clone(&self.ctx.surface);
        match effect {
            Effect::Resolve { identifier } => {
                let resolver = Arc::clone(&self.resolver);
                let tx = self.internal_tx.clone();
                let mode = self.controller.config().color_mode;
                tokio::spawn(async move {
                    let result = resolver.resolve(&identifier, mode).await;
                    let _ = tx.send(Internal::Resolved { identifier, result });
                });
            }
            Effect::MountFrame { url } => match surface.mount_frame(&url) {
                Ok(frame) => self.frame = Some(frame),
                Err(e) => {
                    self.controller.frame_lost();
                    return Err(e);
                }
            },
            Effect::UnmountFrame => {
                if let Some(frame) = self.frame.take() {
                    surface.unmount_frame(frame)?;
                }
            }
            Effect::SetFrameVisible(visible) => {
                if let Some(frame) = self.frame {
                    surface.set_frame_visible(frame, visible)?;
                }
            }
            Effect::SetPanelOpen(open) => surface.set_panel_open(open)?,
            Effect::ShowNotice(notice) => surface.show_notice(notice.as_ref())?,
            Effect::ApplyColorMode(mode) => surface.apply_color_mode(mode)?,
            Effect::PushColorMode(mode) => self.channel.push_color_mode(mode),
            Effect::ConnectChannel(session) => {
                if self.controller.session() != Some(session) {
                    log::debug!("[runtime] session {} dropped before connect", session.0);
                    return Ok(());
                }
                let frame = self.frame.ok_or_else(|| {
                    CoreError::FrameUnavailable(format!("no frame for session {}", session.0))
                })?;
                self.channel.connect(session, frame)?;
            }
            Effect::DisconnectChannel(session) => {
                self.channel.disconnect(session);
            }
            Effect::Schedule {
                edge,
                ticket,
                delay,
            } => {
                if let Some((_, stale)) = self.timers.remove(&edge) {
                    stale.abort();
                }
                let tx = self.internal_tx.clone();
                let task = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Internal::TimerFired { edge, ticket });
                });
                self.timers.insert(edge, (ticket, task));
            }
            Effect::CancelTimer { edge, ticket } => {
                if self.timers.get(&edge).is_some_and(|(t, _)| *t == ticket) {
                    if let Some((_, task)) = self.timers.remove(&edge) {
                        task.abort();
                    }
                }
            }
            Effect::AcquireViewport => {
                if self.lease.is_none() {
                    self.lease = Some(self.ctx.viewport.acquire());
                    let target = self.focus.initial_target(surface.as_ref());
                    self.ctx.document.focus(&target);
                }
            }
            Effect::ReleaseViewport => {
                if let Some(lease) = self.lease.take() {
                    lease.release();
                }
            }
            Effect::Navigate { url, new_tab } => surface.navigate(&url, new_tab)?,
        }
        Ok(())
    }

    async fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            state: self.controller.state(),
            color_mode: self.controller.color_mode(),
            endpoint: self.controller.endpoint().cloned(),
            frame_mounted: self.frame.is_some(),
            frame_visible: self.frame.is_some() && self.controller.frame_visible(),
            channel: self.channel.status(),
            notice: self.controller.notice().cloned(),
            pending_timers: self.timers.len(),
            viewport_locked: self.lease.is_some(),
            submission: self.feedback.status().await,
        }
    }

    fn teardown(&mut self) {
        let effects = self.controller.shutdown();
        self.apply(effects);
        for (_, (_, task)) in self.timers.drain() {
            task.abort();
        }
        self.lease = None;
    }
}
