use super::error::OrchestratorError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::{debug, error, warn};

/// Captured output of an external tool that exited with status 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run `program args...` in `dir` to completion, capturing both streams
///
/// Non-zero exit becomes [`OrchestratorError::ExternalToolFailure`]; a
/// process that can't be started becomes [`OrchestratorError::Invocation`].
pub fn run_tool<I, S>(program: &Path, args: I, dir: &Path) -> Result<ToolOutput, OrchestratorError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir);
    debug!(command = ?cmd, "invoking external tool");

    let output = cmd.output().map_err(|e| {
        error!(program = %program.display(), error = %e, "failed to launch external tool");
        OrchestratorError::Invocation {
            program: program.display().to_string(),
            message: e.to_string(),
        }
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        warn!(
            program = %program.display(),
            exit_code = ?output.status.code(),
            "external tool failed"
        );
        return Err(OrchestratorError::ExternalToolFailure {
            exit_code: output.status.code(),
            stdout,
            stderr,
        });
    }
    Ok(ToolOutput { stdout, stderr })
}
