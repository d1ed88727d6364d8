//! Runtime command builder and output capture.
//!
//! Children run with exactly the variables of their `ChildEnv`, stdin closed,
//! stdout captured whole and stderr forwarded line by line to tracing at
//! warn level.

use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use binmap_core::ChildEnv;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// What a finished child left behind.
#[derive(Debug)]
pub(crate) struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
}

#[derive(Debug, Error)]
pub(crate) enum RunError {
    #[error("failed to start: {0}")]
    Spawn(#[source] io::Error),

    #[error("timed out after {0}s")]
    TimedOut(u64),

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

/// `<program> -e <script>` with the environment replaced by `env`.
pub(crate) fn runtime_command(
    program: &str,
    script: &str,
    env: &ChildEnv,
    cwd: Option<&Path>,
) -> Command {
    let mut cmd = Command::new(program);
    cmd.arg("-e")
        .arg(script)
        .env_clear()
        .envs(env.iter())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd
}

/// Spawn `cmd`, drain its stdout and wait for it to exit.
///
/// On timeout the child is killed and its remaining output discarded.
pub(crate) async fn run_captured(
    mut cmd: Command,
    label: &str,
    timeout: Option<Duration>,
) -> Result<Captured, RunError> {
    let mut child = cmd.spawn().map_err(RunError::Spawn)?;
    debug!(label, pid = ?child.id(), "Spawned child");

    let stderr_task = child.stderr.take().map(|stderr| {
        let label = label.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!(source = %label, "{}", line);
            }
        })
    });
    let mut stdout = child.stdout.take();

    let run = async {
        let mut buf = Vec::new();
        if let Some(out) = stdout.as_mut() {
            out.read_to_end(&mut buf).await?;
        }
        let status = child.wait().await?;
        Ok::<_, io::Error>((status, buf))
    };

    let finished = match timeout {
        Some(limit) => tokio::time::timeout(limit, run).await.ok(),
        None => Some(run.await),
    };

    let Some(result) = finished else {
        let _ = child.kill().await;
        if let Some(task) = stderr_task {
            task.abort();
        }
        return Err(RunError::TimedOut(timeout.map_or(0, |limit| limit.as_secs())));
    };

    let (status, buf) = result.map_err(RunError::Io)?;
    if let Some(task) = stderr_task {
        let _ = task.await;
    }

    Ok(Captured {
        status,
        stdout: String::from_utf8_lossy(&buf).into_owned(),
    })
}
