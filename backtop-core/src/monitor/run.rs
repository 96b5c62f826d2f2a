use crate::monitor::config::{LogSource, MonitorConfig, ViewMode};
use crate::monitor::error::MonitorError;
use crate::monitor::parse::parse_line;
use crate::monitor::pretty::{render_event, render_event_json};
use crate::monitor::render::{redraw, render_table};
use crate::monitor::source::{LogCommand, install_shutdown_handler};
use crate::monitor::state::{Applied, SessionTable};
use crate::monitor::sweep::sweep;
use crate::monitor::ticker::{Clock, SystemClock, Ticker};
use crate::monitor::types::LogEvent;
use std::io::{self, BufRead, IsTerminal, Write};

/// Attach to `source` and run until the stream ends.
pub fn run_monitor(config: MonitorConfig, source: LogSource) -> Result<(), MonitorError> {
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();

    let mut monitor = Monitor::new(config).with_color(color);

    match source {
        LogSource::Stdin => {
            install_shutdown_handler(None)?;
            monitor.run(io::stdin().lock(), &mut out)
        }
        LogSource::Command { program, args } => {
            let mut command = LogCommand::spawn(&program, &args)?;
            install_shutdown_handler(Some(command.pid()))?;

            let result = monitor.run(command.reader(), &mut out);
            if result.is_err() {
                command.terminate();
            }
            command.finish();
            result
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    pub lines: u64,
    pub events: u64,
    pub applied: u64,
}

/// The single consumer of the event stream.
///
/// Each line is parsed and applied before the next read. Sweeping and
/// rendering run from the same loop on their own tickers.
pub struct Monitor<C: Clock = SystemClock> {
    config: MonitorConfig,
    table: SessionTable,
    sweep_tick: Ticker,
    render_tick: Ticker,
    clock: C,
    color: bool,
    stats: LineStats,
}

impl Monitor<SystemClock> {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Monitor<C> {
    pub fn with_clock(config: MonitorConfig, clock: C) -> Self {
        let now = clock.now();
        Self {
            sweep_tick: Ticker::new(config.sweep_interval, now),
            render_tick: Ticker::new(config.render_interval, now),
            table: SessionTable::new(),
            config,
            clock,
            color: false,
            stats: LineStats::default(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn table(&self) -> &SessionTable {
        &self.table
    }

    pub fn stats(&self) -> LineStats {
        self.stats
    }

    pub fn run<R: BufRead, W: Write>(&mut self, mut reader: R, out: &mut W) -> Result<(), MonitorError> {
        tracing::info!(
            retention_ms = self.config.retention.as_millis() as u64,
            view = ?self.config.view,
            "monitor attached"
        );

        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(MonitorError::Read)?;
            if n == 0 {
                break;
            }

            // Producers may log raw request bytes; keep going on invalid UTF-8.
            let line = String::from_utf8_lossy(&buf);
            self.handle_line(&line, out)?;
            self.tick(out)?;
        }

        tracing::info!(
            lines = self.stats.lines,
            events = self.stats.events,
            applied = self.stats.applied,
            "log stream ended"
        );
        Ok(())
    }

    /// Parse one line and apply it. Blank and unrecognised lines are dropped.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<(), MonitorError> {
        if line.trim().is_empty() {
            return Ok(());
        }
        self.stats.lines += 1;

        let Some(event) = parse_line(line) else {
            return Ok(());
        };
        self.stats.events += 1;

        match self.config.view {
            ViewMode::Table => self.apply(event),
            ViewMode::Events => {
                let text = render_event(&event, chrono::Local::now(), self.color);
                writeln!(out, "{text}").map_err(MonitorError::Write)?;
            }
            ViewMode::Json => {
                let text = render_event_json(&event, chrono::Utc::now())?;
                writeln!(out, "{text}").map_err(MonitorError::Write)?;
            }
        }

        Ok(())
    }

    /// Run whichever of sweep and render is due.
    pub fn tick<W: Write>(&mut self, out: &mut W) -> Result<(), MonitorError> {
        let now = self.clock.now();

        if self.sweep_tick.poll(now) {
            sweep(&mut self.table, now, self.config.retention);
        }

        if self.config.view == ViewMode::Table && self.render_tick.poll(now) {
            redraw(out, &render_table(&self.table, now)).map_err(MonitorError::Write)?;
        }

        Ok(())
    }

    fn apply(&mut self, event: LogEvent) {
        let now = self.clock.now();
        let op = event.name();
        let id = event.session_id().clone();

        match self.table.apply(event, now) {
            Applied::Changed => self.stats.applied += 1,
            Applied::Ignored(reason) => {
                tracing::trace!(session = %id, op, ?reason, "event ignored");
            }
        }
    }
}
