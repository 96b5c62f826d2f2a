use serde::Serialize;
use std::fmt;

/// Session id as assigned by the log producer. Ids are reused over time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    ConnectionOpen { id: SessionId, backend: String },
    ConnectionClose { id: SessionId },
    RequestStart { id: SessionId },
    RequestUrl { id: SessionId, url: String },
    RequestHeader { id: SessionId, name: String, value: String },
    ResponseReceived { id: SessionId, status: String },
}

impl LogEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            LogEvent::ConnectionOpen { id, .. }
            | LogEvent::ConnectionClose { id }
            | LogEvent::RequestStart { id }
            | LogEvent::RequestUrl { id, .. }
            | LogEvent::RequestHeader { id, .. }
            | LogEvent::ResponseReceived { id, .. } => id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LogEvent::ConnectionOpen { .. } => "ConnectionOpen",
            LogEvent::ConnectionClose { .. } => "ConnectionClose",
            LogEvent::RequestStart { .. } => "RequestStart",
            LogEvent::RequestUrl { .. } => "RequestURL",
            LogEvent::RequestHeader { .. } => "RequestHeader",
            LogEvent::ResponseReceived { .. } => "ResponseReceived",
        }
    }
}
