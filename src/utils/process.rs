//! External tool execution with a hard deadline
//!
//! Both the SNMP transport and the SSH probe sessions drive command-line
//! tools. Every invocation is bounded: the child is spawned with
//! `kill_on_drop`, so when the deadline fires and the future is dropped the
//! process is killed instead of lingering.

use crate::{FactError, Result};
use log::{debug, warn};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;

/// Captured result of one finished process
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub success: bool,
    pub truncated: bool,
    pub duration: Duration,
}

impl ProcessOutput {
    /// Best diagnostic text for a failed run
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.exit_code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Run `program args...` with stdin closed and both output streams captured,
/// killing it if it has not finished within `deadline`
pub async fn run_with_timeout(
    program: &str,
    args: &[String],
    envs: &[(String, String)],
    deadline: Duration,
    max_output: usize,
) -> Result<ProcessOutput> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for (key, value) in envs {
        command.env(key, value);
    }

    match timeout(deadline, run_command(command, program, max_output)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("{} timed out after {:?}", program, deadline);
            Err(FactError::TimeoutError)
        }
    }
}

async fn run_command(mut command: Command, program: &str, max_output: usize) -> Result<ProcessOutput> {
    let start_time = Instant::now();

    let mut child = command
        .spawn()
        .map_err(|e| FactError::ProcessError(format!("Failed to spawn {}: {}", program, e)))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| FactError::ProcessError("Failed to capture stdout".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| FactError::ProcessError("Failed to capture stderr".to_string()))?;

    // Drain both pipes together so neither side can block the child
    let (stdout_result, stderr_result) = tokio::join!(
        read_stream_with_limit(stdout, max_output),
        read_stream_with_limit(stderr, 64 * 1024)
    );

    let (stdout_output, truncated) = stdout_result?;
    let (stderr_output, _) = stderr_result.unwrap_or_else(|e| {
        warn!("Failed to read stderr of {}: {}", program, e);
        (String::new(), false)
    });

    let exit_status = child
        .wait()
        .await
        .map_err(|e| FactError::ProcessError(format!("Failed to wait for {}: {}", program, e)))?;

    let duration = start_time.elapsed();
    debug!(
        "{} finished in {:?} with status {:?} ({} bytes)",
        program,
        duration,
        exit_status.code(),
        stdout_output.len()
    );

    Ok(ProcessOutput {
        stdout: stdout_output,
        stderr: stderr_output,
        exit_code: exit_status.code(),
        success: exit_status.success(),
        truncated,
        duration,
    })
}

/// Read a stream to the end, keeping at most `max_size` bytes
async fn read_stream_with_limit<R>(mut reader: R, max_size: usize) -> Result<(String, bool)>
where
    R: AsyncRead + Unpin,
{
    let mut output = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut truncated = false;

    loop {
        let bytes_read = reader.read(&mut chunk).await?;
        if bytes_read == 0 {
            break; // EOF
        }

        if output.len() < max_size {
            let room = max_size - output.len();
            output.extend_from_slice(&chunk[..bytes_read.min(room)]);
            if bytes_read > room {
                truncated = true;
            }
        } else {
            // keep draining so the child is not blocked on a full pipe
            truncated = true;
        }
    }

    Ok((String::from_utf8_lossy(&output).into_owned(), truncated))
}
