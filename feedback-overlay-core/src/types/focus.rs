use serde::{Deserialize, Serialize};

/// Whether keyboard focus may enter the embedded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFocusPolicy {
    /// Tab never reaches the frame.
    #[default]
    Trap,
    /// Focus may enter the frame; the host regains control only on user action.
    Allow,
    /// Like `Allow`, plus the frame reports focus/blur over the control channel.
    Cooperative,
}

impl FrameFocusPolicy {
    /// Whether the frame takes part in the Tab cycle.
    #[must_use]
    pub fn frame_tabbable(self) -> bool {
        !matches!(self, Self::Trap)
    }
}

/// Kind of a focusable node in the overlay subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusKind {
    Element,
    Frame,
    Container,
}

/// Opaque reference to a focusable node, minted by the surface adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusTarget {
    pub id: String,
    pub kind: FocusKind,
}

impl FocusTarget {
    #[must_use]
    pub fn element(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: FocusKind::Element,
        }
    }

    #[must_use]
    pub fn frame(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: FocusKind::Frame,
        }
    }

    #[must_use]
    pub fn container(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: FocusKind::Container,
        }
    }

    #[must_use]
    pub fn is_frame(&self) -> bool {
        self.kind == FocusKind::Frame
    }
}

/// Cooperative focus report sent by the embedded content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusSignal {
    Focus,
    Blur,
}
