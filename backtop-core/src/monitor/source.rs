use crate::monitor::error::MonitorError;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::io::BufReader;
use std::process::{Child, ChildStdout, Command, Stdio};

/// The log-producing child process and a reader over its stdout.
pub struct LogCommand {
    command: String,
    child: Child,
    reader: BufReader<ChildStdout>,
}

impl LogCommand {
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, MonitorError> {
        let command = display_command(program, args);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| MonitorError::spawn(&command, e))?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(MonitorError::MissingStdout { command });
        };

        tracing::info!(command = %command, pid = child.id(), "log command started");

        Ok(Self {
            command,
            child,
            reader: BufReader::new(stdout),
        })
    }

    pub fn reader(&mut self) -> &mut BufReader<ChildStdout> {
        &mut self.reader
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Stop the child early, e.g. when we can no longer consume its output.
    pub fn terminate(&mut self) {
        if let Err(e) = self.child.kill() {
            tracing::debug!(command = %self.command, error = %e, "failed to kill log command");
        }
    }

    /// Reap the child once its stream has ended.
    pub fn finish(mut self) {
        match self.child.wait() {
            Ok(status) if status.success() => {
                tracing::info!(command = %self.command, "log command exited");
            }
            Ok(status) => {
                tracing::warn!(command = %self.command, %status, "log command exited with failure");
            }
            Err(e) => {
                tracing::warn!(command = %self.command, error = %e, "failed to wait for log command");
            }
        }
    }
}

/// Exit cleanly on SIGINT/SIGTERM, taking the log command down with us.
pub fn install_shutdown_handler(child: Option<u32>) -> Result<(), MonitorError> {
    ctrlc::set_handler(move || {
        tracing::info!("shutdown requested");

        if let Some(pid) = child {
            // Best-effort: the child may already be gone.
            let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }

        std::process::exit(0);
    })?;

    Ok(())
}

fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
