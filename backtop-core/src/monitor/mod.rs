//! Backend Traffic Monitor
//!
//! This module follows the backend side of a cache's traffic log and shows what
//! every backend is doing right now.
//!
//! The log producer writes one event per line: a connection to a backend was
//! opened or closed, a request was sent over it, its URL and `Host` header, and
//! the response status. We rebuild each backend connection (a session) and the
//! requests it carried from those events.
//!
//! Once a second the finished sessions and requests that are older than the
//! retention window are swept away, and once a second the remaining state is
//! printed as a table grouped by backend, with live timings for requests that
//! are still waiting on a response.
//!
//! The stream may start in the middle of a session, so events for unknown
//! sessions are expected and dropped without complaint.
//!
//! The overall data processing architecture is:
//!
//! log command stdout (or stdin)
//! parse_line
//! LogEvent
//! SessionTable
//! sweep
//! render_table
//!

mod config;
mod constants;
mod error;
mod parse;
mod pretty;
mod render;
mod run;
mod source;
mod state;
mod sweep;
mod ticker;
mod types;

#[cfg(test)]
mod tests;

pub use config::{LogSource, MonitorConfig, ViewMode};
pub use constants::DEFAULT_LOG_COMMAND;
pub use error::MonitorError;
pub use parse::parse_line;
pub use pretty::{render_event, render_event_json};
pub use render::{redraw, render_table};
pub use run::{LineStats, Monitor, run_monitor};
pub use state::{Applied, IgnoreReason, Request, Session, SessionKey, SessionTable};
pub use source::{LogCommand, install_shutdown_handler};
pub use sweep::{SweepStats, sweep};
pub use ticker::{Clock, SystemClock, Ticker};
pub use types::{LogEvent, SessionId};
