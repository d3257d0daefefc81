//! Viewport guard: scroll lock and focus restoration shared by every overlay
//! on the page.
//!
//! Each overlay that becomes active takes a [`ViewportLease`]. The first
//! lease saves the scroll container's inline `overflow` and `padding-right`
//! and locks scrolling; the last one to go restores exactly what was saved.
//! Leases release on drop, so an overlay torn down abruptly still unlocks
//! the page.
//!
//! Focus: every lease remembers the element focused when it was taken.
//! Releasing the top-most lease moves focus back there. Releasing a lease
//! below the top hands its remembered element to the lease above it, since
//! that lease's own target lived inside the overlay that just closed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::traits::PageDocument;
use crate::types::FocusTarget;

struct SavedStyles {
    overflow: String,
    padding_right: String,
}

struct LeaseEntry {
    id: u64,
    restore_focus: Option<FocusTarget>,
}

#[derive(Default)]
struct GuardState {
    next_id: u64,
    saved: Option<SavedStyles>,
    leases: Vec<LeaseEntry>,
}

pub struct ViewportCoordinator {
    document: Arc<dyn PageDocument>,
    state: Mutex<GuardState>,
}

impl ViewportCoordinator {
    #[must_use]
    pub fn new(document: Arc<dyn PageDocument>) -> Self {
        Self {
            document,
            state: Mutex::new(GuardState::default()),
        }
    }

    /// Lock the page for one more overlay.
    #[must_use]
    pub fn acquire(self: &Arc<Self>) -> ViewportLease {
        let mut state = self.lock();

        if state.leases.is_empty() {
            let saved = SavedStyles {
                overflow: self.document.body_overflow(),
                padding_right: self.document.body_padding_right(),
            };
            self.document.set_body_overflow("hidden");
            let width = self.document.scrollbar_width();
            if width > 0 {
                // 补偿滚动条消失造成的布局偏移
                self.document.set_body_padding_right(&format!("{width}px"));
            }
            log::debug!("[viewport] scroll locked");
            state.saved = Some(saved);
        }

        state.next_id += 1;
        let id = state.next_id;
        state.leases.push(LeaseEntry {
            id,
            restore_focus: self.document.active_element(),
        });

        ViewportLease {
            coordinator: Arc::clone(self),
            id,
        }
    }

    /// Number of live leases.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.lock().leases.len()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.holders() > 0
    }

    fn release(&self, id: u64) {
        let mut state = self.lock();
        let Some(idx) = state.leases.iter().position(|l| l.id == id) else {
            return;
        };
        let entry = state.leases.remove(idx);

        if idx == state.leases.len() {
            if let Some(target) = entry.restore_focus {
                self.document.focus(&target);
            }
        } else if let Some(above) = state.leases.get_mut(idx) {
            above.restore_focus = entry.restore_focus;
        }

        if state.leases.is_empty() {
            if let Some(saved) = state.saved.take() {
                self.document.set_body_overflow(&saved.overflow);
                self.document.set_body_padding_right(&saved.padding_right);
            }
            log::debug!("[viewport] scroll restored");
        }
    }

    fn lock(&self) -> MutexGuard<'_, GuardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Scoped hold on the viewport guard. Dropping it releases the hold.
pub struct ViewportLease {
    coordinator: Arc<ViewportCoordinator>,
    id: u64,
}

impl ViewportLease {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Release explicitly; same as dropping.
    pub fn release(self) {}
}

impl Drop for ViewportLease {
    fn drop(&mut self) {
        self.coordinator.release(self.id);
    }
}

impl std::fmt::Debug for ViewportLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportLease").field("id", &self.id).finish()
    }
}
