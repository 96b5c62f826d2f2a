use crate::monitor::constants::{RENDER_TICK, RETENTION, SWEEP_TICK};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Periodically redrawn per-backend table.
    #[default]
    Table,
    /// One human-readable line per parsed event.
    Events,
    /// One JSON object per parsed event.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// How long finished sessions and requests stay visible.
    pub retention: Duration,
    pub render_interval: Duration,
    pub sweep_interval: Duration,
    pub view: ViewMode,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            retention: RETENTION,
            render_interval: RENDER_TICK,
            sweep_interval: SWEEP_TICK,
            view: ViewMode::default(),
        }
    }
}

impl MonitorConfig {
    /// Finished items disappear at the next sweep.
    pub fn in_progress_only(mut self) -> Self {
        self.retention = Duration::ZERO;
        self
    }
}

/// Where the event stream comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    Stdin,
    Command { program: String, args: Vec<String> },
}

impl LogSource {
    pub fn command(program: impl Into<String>, args: Vec<String>) -> Self {
        Self::Command {
            program: program.into(),
            args,
        }
    }
}
