use crate::monitor::types::LogEvent;
use chrono::{DateTime, Local, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

pub fn render_event(event: &LogEvent, at: DateTime<Local>, color: bool) -> String {
    let ts = at.format("%H:%M:%S%.3f");
    let id = event.session_id();
    let name = event.name();

    let detail = match event {
        LogEvent::ConnectionOpen { backend, .. } => format!("backend={backend}"),
        LogEvent::ConnectionClose { .. } | LogEvent::RequestStart { .. } => String::new(),
        LogEvent::RequestUrl { url, .. } => url.clone(),
        LogEvent::RequestHeader { name, value, .. } => format!("{name}: {value}"),
        LogEvent::ResponseReceived { status, .. } if color => paint_status(status),
        LogEvent::ResponseReceived { status, .. } => status.clone(),
    };

    let name = if color {
        name.bold().to_string()
    } else {
        name.to_string()
    };

    if detail.is_empty() {
        format!("[{ts}] {id} {name}")
    } else {
        format!("[{ts}] {id} {name} {detail}")
    }
}

fn paint_status(status: &str) -> String {
    match status.as_bytes().first() {
        Some(b'2') => status.green().to_string(),
        Some(b'3') => status.cyan().to_string(),
        Some(b'4') => status.yellow().to_string(),
        Some(b'5') => status.red().to_string(),
        _ => status.to_string(),
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a LogEvent,
}

pub fn render_event_json(event: &LogEvent, at: DateTime<Utc>) -> serde_json::Result<String> {
    serde_json::to_string(&JsonEvent {
        timestamp: at,
        event,
    })
}
