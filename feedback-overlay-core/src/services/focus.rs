//! Focus containment inside the overlay subtree

use crate::traits::OverlaySurface;
use crate::types::{FocusSignal, FocusTarget, FrameFocusPolicy};

/// Keeps keyboard focus inside the overlay while it is active.
///
/// Under [`FrameFocusPolicy::Trap`] the frame is skipped by the Tab cycle
/// and focus that lands on it is pulled back. Under `Allow` and
/// `Cooperative` the frame is a normal stop; once focus is inside it the
/// host cannot see Tab presses, so only `Cooperative` content can hand
/// focus back with a `blur` signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTrap {
    policy: FrameFocusPolicy,
}

impl FocusTrap {
    #[must_use]
    pub fn new(policy: FrameFocusPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> FrameFocusPolicy {
        self.policy
    }

    fn cycle(&self, surface: &dyn OverlaySurface) -> Vec<FocusTarget> {
        let allow_frame = self.policy.frame_tabbable();
        surface
            .tabbable_elements()
            .into_iter()
            .filter(|t| allow_frame || !t.is_frame())
            .collect()
    }

    /// Where focus goes when the overlay opens.
    #[must_use]
    pub fn initial_target(&self, surface: &dyn OverlaySurface) -> FocusTarget {
        self.cycle(surface)
            .into_iter()
            .next()
            .unwrap_or_else(|| surface.container())
    }

    /// Tab (or Shift+Tab when `backwards`) from `current`, wrapping at the ends.
    #[must_use]
    pub fn next_target(
        &self,
        surface: &dyn OverlaySurface,
        current: Option<&FocusTarget>,
        backwards: bool,
    ) -> FocusTarget {
        let cycle = self.cycle(surface);
        if cycle.is_empty() {
            return surface.container();
        }
        let len = cycle.len();
        let idx = match current.and_then(|c| cycle.iter().position(|t| t == c)) {
            Some(i) if backwards => (i + len - 1) % len,
            Some(i) => (i + 1) % len,
            None if backwards => len - 1,
            None => 0,
        };
        cycle[idx].clone()
    }

    /// Focus moved to `target`; returns where it must be moved instead, if anywhere.
    #[must_use]
    pub fn on_focus_in(
        &self,
        surface: &dyn OverlaySurface,
        target: &FocusTarget,
    ) -> Option<FocusTarget> {
        if *target == surface.container() {
            return None;
        }
        let inside = surface.tabbable_elements().contains(target);
        if inside && (!target.is_frame() || self.policy.frame_tabbable()) {
            return None;
        }
        Some(self.initial_target(surface))
    }

    /// Cooperative focus report from the frame content.
    ///
    /// `blur` means focus left the content's last stop, so the host resumes
    /// the cycle after the frame. Ignored unless the policy is `Cooperative`.
    #[must_use]
    pub fn on_frame_signal(
        &self,
        surface: &dyn OverlaySurface,
        signal: FocusSignal,
    ) -> Option<FocusTarget> {
        if self.policy != FrameFocusPolicy::Cooperative || signal == FocusSignal::Focus {
            return None;
        }
        let frame = surface
            .tabbable_elements()
            .into_iter()
            .find(FocusTarget::is_frame)?;
        Some(self.next_target(surface, Some(&frame), false))
    }
}
