//! 宿主页面文档抽象 Trait

use crate::types::FocusTarget;

/// Page-wide document state shared by every overlay instance on the page.
///
/// Only the viewport guard touches it.
pub trait PageDocument: Send + Sync {
    /// Current inline `overflow` of the scroll container (`""` when unset).
    fn body_overflow(&self) -> String;

    fn set_body_overflow(&self, value: &str);

    /// Current inline `padding-right` of the scroll container.
    fn body_padding_right(&self) -> String;

    fn set_body_padding_right(&self, value: &str);

    /// Width of the vertical scrollbar in CSS pixels (0 when none is shown).
    fn scrollbar_width(&self) -> u32;

    /// Element that currently has keyboard focus.
    fn active_element(&self) -> Option<FocusTarget>;

    /// Move keyboard focus.
    fn focus(&self, target: &FocusTarget);
}
