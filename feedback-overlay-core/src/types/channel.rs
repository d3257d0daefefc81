//! Control channel wire messages
//!
//! Remote content talks to the host with JSON objects tagged by `type`:
//!
//! | Direction | Message |
//! |-----------|---------|
//! | remote -> host | `{"type":"syn"}` |
//! | host -> remote | `{"type":"ack"}` |
//! | remote -> host | `{"type":"call","id":1,"method":"setLoaded","args":[true]}` |
//! | host -> remote | `{"type":"reply","id":1,"ok":true}` |
//! | host -> remote | `{"type":"call","method":"setColorMode","args":["dark"]}` |
//! | remote -> host | `{"type":"focus-trap","event":"blur"}` |

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ColorMode, FocusSignal};
use crate::error::{CoreError, CoreResult};

/// Message received from the embedded content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundMessage {
    Syn,
    Call {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    FocusTrap {
        event: FocusSignal,
    },
}

impl InboundMessage {
    /// Decode a raw message; anything that is not protocol traffic yields `None`.
    #[must_use]
    pub fn decode(raw: &Value) -> Option<Self> {
        serde_json::from_value(raw.clone()).ok()
    }
}

/// Message sent to the embedded content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OutboundMessage {
    Ack,
    Reply { id: u64, ok: bool },
    Call { method: String, args: Vec<Value> },
}

impl OutboundMessage {
    #[must_use]
    pub fn set_color_mode(mode: ColorMode) -> Self {
        Self::Call {
            method: "setColorMode".to_string(),
            args: vec![Value::String(mode.as_str().to_string())],
        }
    }

    pub fn to_value(&self) -> CoreResult<Value> {
        serde_json::to_value(self).map_err(|e| CoreError::SerializationError(e.to_string()))
    }
}

/// The host operations remote content may invoke. Nothing else is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    SetColorMode(ColorMode),
    SetLoaded(bool),
    RequestClose,
}

impl HostCall {
    /// Map a method call onto the allow-list.
    ///
    /// Returns `None` for unknown methods and for known methods with unusable
    /// arguments. `setLoaded()` without an argument means `true`; `close` is
    /// accepted as an alias of `requestClose`.
    #[must_use]
    pub fn from_call(method: &str, args: &[Value]) -> Option<Self> {
        match method {
            "setColorMode" => args
                .first()
                .and_then(Value::as_str)
                .and_then(ColorMode::parse)
                .map(Self::SetColorMode),
            "setLoaded" => match args.first() {
                None | Some(Value::Null) => Some(Self::SetLoaded(true)),
                Some(Value::Bool(flag)) => Some(Self::SetLoaded(*flag)),
                Some(_) => None,
            },
            "requestClose" | "close" => Some(Self::RequestClose),
            _ => None,
        }
    }
}
