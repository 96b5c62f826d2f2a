use std::time::Duration;

pub const RETENTION: Duration = Duration::from_secs(3);
pub const RENDER_TICK: Duration = Duration::from_secs(1);
pub const SWEEP_TICK: Duration = Duration::from_secs(1);

/// Blank lines emitted to scroll the previous frame out of view.
pub const SCROLL_LINES: usize = 100;

/// Direction marker for entries where the cache is talking to a backend.
pub const BACKEND_DIRECTION: &str = "b";

pub const DEFAULT_LOG_COMMAND: &str = "varnishlog";

pub const BACKEND_WIDTH: usize = 20;
pub const SESSION_WIDTH: usize = 5;
pub const URL_WIDTH: usize = 50;
pub const TIME_WIDTH: usize = 5;
pub const RESPONSE_WIDTH: usize = 15;

pub const IN_PROGRESS: &str = "In progress";
