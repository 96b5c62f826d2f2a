use crate::monitor::constants::BACKEND_DIRECTION;
use crate::monitor::types::{LogEvent, SessionId};

const HOST_HEADER: &str = "Host";

/// Parse one line of the backend event stream.
///
/// Returns `None` for anything that is not a backend-side event we track:
/// unrelated output (no numeric session id), short lines, client-side
/// entries, unknown operation codes and headers other than `Host`.
pub fn parse_line(line: &str) -> Option<LogEvent> {
    let [id, op, direction, rest] = split_fields(line)?;

    if !is_session_id(id) || direction != BACKEND_DIRECTION {
        return None;
    }

    let id = SessionId::from(id);

    match op {
        "ConnectionOpen" => {
            let backend = rest.split_whitespace().next()?.to_string();
            Some(LogEvent::ConnectionOpen { id, backend })
        }
        "ConnectionClose" => Some(LogEvent::ConnectionClose { id }),
        "RequestStart" => Some(LogEvent::RequestStart { id }),
        "RequestURL" => Some(LogEvent::RequestUrl {
            id,
            url: rest.to_string(),
        }),
        "RequestHeader" => {
            let (name, value) = rest.split_once(':')?;
            let name = name.trim();
            if name != HOST_HEADER {
                return None;
            }
            Some(LogEvent::RequestHeader {
                id,
                name: name.to_string(),
                value: value.trim().to_string(),
            })
        }
        "ResponseReceived" => Some(LogEvent::ResponseReceived {
            id,
            status: rest.to_string(),
        }),
        _ => None,
    }
}

fn is_session_id(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

/// Split into id, operation, direction and the remainder. The remainder keeps
/// its inner whitespace.
fn split_fields(line: &str) -> Option<[&str; 4]> {
    let mut rest = line.trim();
    let mut fields = [""; 4];

    for slot in fields.iter_mut().take(3) {
        let end = rest.find(char::is_whitespace)?;
        *slot = &rest[..end];
        rest = rest[end..].trim_start();
    }

    if rest.is_empty() {
        return None;
    }
    fields[3] = rest;

    Some(fields)
}
