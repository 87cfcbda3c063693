//! External tool invocation with interrupt-safe subprocess handling.

use crate::bundler::error::{Error, Result};
use std::ffi::OsStr;
use std::process::Stdio;
use tokio::process::Command;

/// Whether a nonzero exit aborts the pipeline.
///
/// Most rewrite invocations are hard failures; the exceptions are directive
/// add/delete operations where "already present" or "not present" is the
/// desired end state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Fatality {
    /// Nonzero exit fails the build
    Hard,
    /// Nonzero exit is logged and tolerated
    Soft,
}

/// Run an external tool to completion, killing it if the build is
/// interrupted so no orphaned subprocess outlives the pipeline.
///
/// Returns `Ok(true)` on success and `Ok(false)` on a tolerated soft
/// failure.
pub async fn run_tool<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    fatality: Fatality,
) -> Result<bool> {
    let mut child = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::GenericError(format!("failed to spawn {program}: {e}")))?;

    let status = tokio::select! {
        status = child.wait() => status
            .map_err(|e| Error::GenericError(format!("failed to wait for {program}: {e}")))?,
        _ = tokio::signal::ctrl_c() => {
            let _ = child.kill().await;
            return Err(Error::Interrupted(program.to_string()));
        }
    };

    if status.success() {
        return Ok(true);
    }

    match fatality {
        Fatality::Hard => Err(Error::ToolFailure {
            tool: program.to_string(),
            code: status.code(),
        }),
        Fatality::Soft => {
            log::debug!("{program} exited with {:?} (tolerated)", status.code());
            Ok(false)
        }
    }
}

/// Run an external tool and capture its stdout.
///
/// Interrupt handling matches [`run_tool`]: the child is killed before the
/// interruption propagates, so inspection subprocesses never outlive the
/// pipeline either. A nonzero exit is always fatal here.
pub async fn run_capture<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<String> {
    let child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::GenericError(format!("failed to spawn {program}: {e}")))?;

    // Dropping the wait future on interrupt kills the child via kill_on_drop
    let output = tokio::select! {
        output = child.wait_with_output() => output
            .map_err(|e| Error::GenericError(format!("failed to wait for {program}: {e}")))?,
        _ = tokio::signal::ctrl_c() => {
            return Err(Error::Interrupted(program.to_string()));
        }
    };

    if !output.status.success() {
        return Err(Error::ToolFailure {
            tool: program.to_string(),
            code: output.status.code(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
