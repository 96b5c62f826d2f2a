use anyhow::Context;
use backtop_core::logging::init_logging;
use backtop_core::monitor::{
    DEFAULT_LOG_COMMAND, LogSource, MonitorConfig, ViewMode, run_monitor,
};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "backtop",
    version,
    about = "backtop: live view of cache-to-backend sessions and requests"
)]
struct Cli {
    /// Show only requests that are still in progress
    #[arg(short, long)]
    in_progress: bool,

    /// Seconds a finished session or request stays visible
    #[arg(long, default_value_t = 3, conflicts_with = "in_progress")]
    retention: u64,

    /// Milliseconds between table redraws
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Milliseconds between sweeps of finished entries
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval: u64,

    /// Read the event stream from stdin instead of starting the log command
    #[arg(long, conflicts_with = "command")]
    stdin: bool,

    /// Print each parsed event instead of the table
    #[arg(long)]
    events: bool,

    /// Print each parsed event as JSON
    #[arg(long, conflicts_with = "events")]
    json: bool,

    /// Log command and its arguments [default: varnishlog]
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "PROGRAM")]
    command: Vec<String>,
}

impl Cli {
    fn config(&self) -> MonitorConfig {
        let view = if self.json {
            ViewMode::Json
        } else if self.events {
            ViewMode::Events
        } else {
            ViewMode::Table
        };

        let config = MonitorConfig {
            retention: Duration::from_secs(self.retention),
            render_interval: Duration::from_millis(self.interval),
            sweep_interval: Duration::from_millis(self.sweep_interval),
            view,
        };

        if self.in_progress {
            config.in_progress_only()
        } else {
            config
        }
    }

    fn source(&self) -> LogSource {
        if self.stdin {
            return LogSource::Stdin;
        }

        match self.command.split_first() {
            Some((program, args)) => LogSource::command(program.as_str(), args.to_vec()),
            None => LogSource::command(DEFAULT_LOG_COMMAND, Vec::new()),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging();

    if let Err(e) = run(&cli) {
        eprintln!("backtop: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.config();
    let source = cli.source();

    tracing::debug!(?config, ?source, "starting monitor");

    run_monitor(config, source).context("monitor stopped")
}
