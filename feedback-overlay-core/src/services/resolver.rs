//! Identifier resolution
//!
//! Decides what an `open()` should load and runs the org-upsert lookup when
//! a routing token is not cached yet.
//!
//! Order of precedence in [`IdentifierResolver::plan`]:
//! 1. explicit URL (validated, `mode` appended)
//! 2. invalid identifier -> notice
//! 3. external-link style -> `https://<identifier>.<domain>` in a new tab
//! 4. mobile viewport -> same-tab link with `mode`, no round trip
//! 5. cached routing token -> ready
//! 6. otherwise -> lookup

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use feedback_overlay_client::FeedbackApi;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    ColorMode, DisplayStyle, InvalidTargetNotice, ResolutionPlan, ResolvedEndpoint,
    RuntimeOptions, WidgetConfig,
};
use crate::utils::identifier::{is_valid_identifier, validate_identifier};
use crate::utils::url::{append_mode_param, board_origin, validate_explicit_url};

struct CachedToken {
    token: String,
    resolved_at: DateTime<Utc>,
}

/// Identifier resolver service
pub struct IdentifierResolver {
    api: Arc<dyn FeedbackApi>,
    product_domain: String,
    mobile_viewport: bool,
    cache: RwLock<HashMap<String, CachedToken>>,
}

impl IdentifierResolver {
    #[must_use]
    pub fn new(api: Arc<dyn FeedbackApi>, options: &RuntimeOptions) -> Self {
        Self {
            api,
            product_domain: options.product_domain.clone(),
            mobile_viewport: options.mobile_viewport,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Decide how to satisfy an open request for `config`. Never touches the network.
    pub async fn plan(&self, config: &WidgetConfig) -> ResolutionPlan {
        let mode = config.color_mode;

        if let Some(raw) = config.explicit_url.as_deref() {
            return match validate_explicit_url(raw) {
                Ok(url) if config.display_style == DisplayStyle::ExternalLink => {
                    ResolutionPlan::DirectLink {
                        url: url.to_string(),
                        new_tab: true,
                    }
                }
                Ok(url) => ResolutionPlan::Ready(ResolvedEndpoint::new(url, mode)),
                Err(e) => {
                    log::warn!("[resolver] {e}");
                    ResolutionPlan::Invalid(InvalidTargetNotice::invalid_url(raw))
                }
            };
        }

        let identifier = config.identifier.as_str();
        if !is_valid_identifier(identifier) {
            log::warn!("[resolver] invalid identifier {identifier:?}");
            return ResolutionPlan::Invalid(InvalidTargetNotice::invalid_identifier());
        }

        if config.display_style == DisplayStyle::ExternalLink {
            return ResolutionPlan::DirectLink {
                url: self.identifier_origin(identifier),
                new_tab: true,
            };
        }

        if self.mobile_viewport {
            return ResolutionPlan::DirectLink {
                url: append_mode_param(&self.identifier_origin(identifier), mode),
                new_tab: false,
            };
        }

        if let Some(endpoint) = self.cached_endpoint(identifier, mode).await {
            return ResolutionPlan::Ready(endpoint);
        }

        ResolutionPlan::Lookup {
            identifier: identifier.to_string(),
        }
    }

    /// Resolve `identifier` to a board URL, calling org-upsert on a cache miss.
    ///
    /// Invalid identifiers fail without a network call. Failures are not
    /// retried; the next open attempt tries again.
    pub async fn resolve(&self, identifier: &str, mode: ColorMode) -> CoreResult<ResolvedEndpoint> {
        validate_identifier(identifier)?;

        if let Some(endpoint) = self.cached_endpoint(identifier, mode).await {
            return Ok(endpoint);
        }

        let token = match self.api.upsert_org(identifier).await {
            Ok(token) => token,
            Err(e) => {
                if e.is_expected() {
                    log::warn!("[resolver] lookup for {identifier} failed: {e}");
                } else {
                    log::error!("[resolver] lookup for {identifier} failed: {e}");
                }
                return Err(CoreError::ResolutionNetworkFailure(e.to_string()));
            }
        };

        let resolved_at = Utc::now();
        let endpoint = ResolvedEndpoint::at(
            board_origin(&token, &self.product_domain),
            mode,
            resolved_at,
        );
        log::info!("[resolver] {identifier} resolved to {}", endpoint.url);

        self.cache.write().await.insert(
            identifier.to_string(),
            CachedToken { token, resolved_at },
        );
        Ok(endpoint)
    }

    /// Cached routing token for `identifier`.
    pub async fn cached_token(&self, identifier: &str) -> Option<String> {
        self.cache
            .read()
            .await
            .get(identifier)
            .map(|cached| cached.token.clone())
    }

    /// Forget every cached token except the one for `identifier`.
    pub async fn invalidate_except(&self, identifier: &str) {
        let mut cache = self.cache.write().await;
        let before = cache.len();
        cache.retain(|key, _| key == identifier);
        if cache.len() != before {
            log::debug!("[resolver] dropped {} cached token(s)", before - cache.len());
        }
    }

    async fn cached_endpoint(&self, identifier: &str, mode: ColorMode) -> Option<ResolvedEndpoint> {
        let cache = self.cache.read().await;
        let cached = cache.get(identifier)?;
        Some(ResolvedEndpoint::at(
            board_origin(&cached.token, &self.product_domain),
            mode,
            cached.resolved_at,
        ))
    }

    fn identifier_origin(&self, identifier: &str) -> String {
        board_origin(identifier, &self.product_domain)
    }
}
