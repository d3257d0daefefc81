//! Presentation shell view model
//!
//! Platform bindings render the panel chrome from an [`OverlaySnapshot`];
//! this module decides what that chrome looks like so every binding agrees
//! on layering, colors and transition timing.

use std::time::Duration;

use feedback_overlay_core::types::{
    ColorMode, DisplayStyle, InvalidTargetNotice, OverlaySnapshot, OverlayState, RuntimeOptions,
};
use serde::Serialize;

/// Panel layer, the highest z-index browsers honour.
pub const PANEL_Z_INDEX: i64 = 2_147_483_647;
/// Backdrop layer, directly below the panel.
pub const BACKDROP_Z_INDEX: i64 = 2_147_483_646;

pub const DARK_BACKGROUND: &str = "#0A0A0A";
pub const LIGHT_BACKGROUND: &str = "#FFFFFF";

/// Maximum panel width in CSS pixels on wide viewports.
pub const PANEL_MAX_WIDTH_PX: u32 = 600;
/// Popover width in CSS pixels.
pub const POPOVER_WIDTH_PX: u32 = 500;

/// Where the chrome is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelAnchor {
    /// Full-height drawer on the right edge.
    RightEdge,
    /// Floating next to the trigger.
    Trigger,
}

/// Rendering instructions for one frame of the panel chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelChrome {
    pub anchor: PanelAnchor,
    pub width_px: u32,
    pub background: &'static str,
    pub z_index: i64,
    /// Slid in (`true`) or translated off-screen.
    pub expanded: bool,
    /// Pointer events and tab stops enabled.
    pub interactive: bool,
    pub show_backdrop: bool,
    pub backdrop_z_index: i64,
    pub show_frame: bool,
    pub notice: Option<InvalidTargetNotice>,
    #[serde(serialize_with = "serialize_millis")]
    pub transition: Duration,
}

impl PanelChrome {
    /// Chrome for `snapshot`. `None` for the external-link style, which has
    /// no overlay at all.
    #[must_use]
    pub fn for_snapshot(
        snapshot: &OverlaySnapshot,
        style: DisplayStyle,
        options: &RuntimeOptions,
    ) -> Option<Self> {
        let (anchor, width_px) = match style {
            DisplayStyle::Panel => (PanelAnchor::RightEdge, PANEL_MAX_WIDTH_PX),
            DisplayStyle::Popover => (PanelAnchor::Trigger, POPOVER_WIDTH_PX),
            DisplayStyle::ExternalLink => return None,
        };

        // Closing keeps the chrome mounted while the exit transition plays.
        let expanded = snapshot.state.is_active();
        let visible = expanded || snapshot.state == OverlayState::Closing;

        Some(Self {
            anchor,
            width_px,
            background: background_for(snapshot.color_mode),
            z_index: if visible { PANEL_Z_INDEX } else { -BACKDROP_Z_INDEX },
            expanded,
            interactive: expanded,
            show_backdrop: expanded && style == DisplayStyle::Panel,
            backdrop_z_index: BACKDROP_Z_INDEX,
            show_frame: snapshot.frame_visible,
            notice: snapshot.notice.clone(),
            transition: options.close_duration(),
        })
    }
}

#[must_use]
pub fn background_for(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Dark => DARK_BACKGROUND,
        ColorMode::Light => LIGHT_BACKGROUND,
    }
}

/// Popover chrome mode: the integrator's forced mode, else the host page's.
#[must_use]
pub fn popover_color_mode(forced: Option<ColorMode>, host_classes: &str) -> ColorMode {
    forced.unwrap_or_else(|| ColorMode::from_host_classes(host_classes))
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
