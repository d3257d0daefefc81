//! Platform-agnostic runtime assembly for the feedback overlay.
//!
//! Provides `OverlayRuntimeBuilder` (adapter injection), `OverlayRuntime` /
//! `OverlayHandle` (the per-overlay event loop and its control handle), and
//! the presentation constants shared by every platform binding.

pub mod adapters;
mod runtime;
pub mod shell;

use std::sync::Arc;

use feedback_overlay_core::client::{ApiConfig, FeedbackApi, HttpFeedbackApi};
use feedback_overlay_core::error::{CoreError, CoreResult};
use feedback_overlay_core::services::{OverlayContext, ViewportCoordinator};
use feedback_overlay_core::traits::{FrameTransport, OverlaySurface, PageDocument};
use feedback_overlay_core::types::{RuntimeOptions, WidgetConfig};

pub use runtime::{OverlayHandle, OverlayRuntime};

/// Builder for constructing an `OverlayRuntime` with platform-specific adapters.
///
/// # Required
/// - `config`: which board to embed and how
/// - `surface`: the overlay's own subtree
/// - `transport`: `postMessage` into the frame
/// - `document`: the host page document
///
/// # Optional
/// - `options`: defaults to `RuntimeOptions::default()`
/// - `api`: defaults to `HttpFeedbackApi` against `options.api_base_url`
/// - `viewport`: share a guard with other overlays on the same page;
///   defaults to a guard of its own over `document`
pub struct OverlayRuntimeBuilder {
    config: Option<WidgetConfig>,
    options: RuntimeOptions,
    api: Option<Arc<dyn FeedbackApi>>,
    surface: Option<Arc<dyn OverlaySurface>>,
    transport: Option<Arc<dyn FrameTransport>>,
    document: Option<Arc<dyn PageDocument>>,
    viewport: Option<Arc<ViewportCoordinator>>,
}

impl OverlayRuntimeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: None,
            options: RuntimeOptions::default(),
            api: None,
            surface: None,
            transport: None,
            document: None,
            viewport: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: WidgetConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn options(mut self, options: RuntimeOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn api(mut self, api: Arc<dyn FeedbackApi>) -> Self {
        self.api = Some(api);
        self
    }

    #[must_use]
    pub fn surface(mut self, surface: Arc<dyn OverlaySurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn FrameTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn document(mut self, document: Arc<dyn PageDocument>) -> Self {
        self.document = Some(document);
        self
    }

    #[must_use]
    pub fn viewport(mut self, viewport: Arc<ViewportCoordinator>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Build the `OverlayRuntime`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if a required adapter is missing or
    /// the options are out of range, and `CoreError::Api` if the default HTTP
    /// client cannot be constructed.
    pub fn build(self) -> CoreResult<OverlayRuntime> {
        let config = self
            .config
            .ok_or_else(|| CoreError::ValidationError("config is required".to_string()))?;
        self.options.validate()?;

        let surface = self
            .surface
            .ok_or_else(|| CoreError::ValidationError("surface is required".to_string()))?;
        let transport = self
            .transport
            .ok_or_else(|| CoreError::ValidationError("transport is required".to_string()))?;
        let document = self
            .document
            .ok_or_else(|| CoreError::ValidationError("document is required".to_string()))?;

        let api: Arc<dyn FeedbackApi> = match self.api {
            Some(api) => api,
            None => {
                let api_config = ApiConfig::new(&self.options.api_base_url)
                    .with_timeout(self.options.request_timeout());
                Arc::new(HttpFeedbackApi::new(api_config)?)
            }
        };

        let mut ctx = OverlayContext::new(api, surface, transport, document);
        if let Some(viewport) = self.viewport {
            ctx = ctx.with_viewport(viewport);
        }

        log::debug!(
            "[runtime] built overlay for {:?} ({:?})",
            config.identifier,
            config.display_style
        );
        Ok(OverlayRuntime::new(ctx, config, self.options))
    }
}

impl Default for OverlayRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
