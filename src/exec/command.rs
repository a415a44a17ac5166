// src/exec/command.rs

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A command handed off by a watcher, fire-and-forget.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRequest {
    /// Shell command line to run.
    pub command: String,

    /// Seconds before the command is force-terminated; 0 means no timeout.
    pub timeout_secs: f64,
}

/// Spawn the background executor loop.
///
/// The returned sender is what the watchers use to hand off commands. Each
/// request is executed in its own Tokio task, so a slow command never delays
/// later ones or the poll loop that produced it.
pub fn spawn_executor() -> mpsc::Sender<CommandRequest> {
    let (tx, mut rx) = mpsc::channel::<CommandRequest>(32);

    tokio::spawn(async move {
        info!("executor loop started");
        while let Some(request) = rx.recv().await {
            tokio::spawn(async move {
                run_command(request).await;
            });
        }
        info!("executor loop finished (channel closed)");
    });

    tx
}

/// Hand a command to the executor without blocking the calling watcher.
///
/// A full channel means commands are being produced far faster than they can
/// be spawned; the request is dropped with a warning rather than stalling the
/// poll loop.
pub fn dispatch(tx: &mpsc::Sender<CommandRequest>, command: &str, timeout_secs: f64) {
    let request = CommandRequest {
        command: command.to_string(),
        timeout_secs,
    };
    if let Err(err) = tx.try_send(request) {
        warn!(command, error = %err, "dropping command, executor queue unavailable");
    }
}

/// Run a single command; all errors end up in the log, never at the watcher.
async fn run_command(request: CommandRequest) {
    let command = request.command.clone();
    if let Err(err) = run_command_inner(request).await {
        warn!(command = %command, error = %err, "command execution error");
    }
}

async fn run_command_inner(request: CommandRequest) -> Result<()> {
    info!(
        command = %request.command,
        timeout_secs = request.timeout_secs,
        "starting command"
    );

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&request.command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&request.command);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for command '{}'", request.command))?;

    // Always consume output so buffers don't fill; log at debug.
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("stdout: {}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("stderr: {}", line);
            }
        });
    }

    let waited = if request.timeout_secs > 0.0 {
        let limit = Duration::from_secs_f64(request.timeout_secs);
        match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                warn!(
                    command = %request.command,
                    timeout_secs = request.timeout_secs,
                    "command timed out, killing"
                );
                child
                    .kill()
                    .await
                    .with_context(|| format!("killing timed-out command '{}'", request.command))?;
                child.wait().await
            }
        }
    } else {
        child.wait().await
    };
    let status =
        waited.with_context(|| format!("waiting for command '{}'", request.command))?;

    info!(
        command = %request.command,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "command exited"
    );

    Ok(())
}
