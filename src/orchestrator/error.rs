use crate::spec::ParseError;
use std::fmt;

/// Why an orchestrator operation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// Input rejected before any external tool ran
    Parse(ParseError),
    /// A service name was required but empty
    EmptyServiceName,
    /// The external tool ran and exited non-zero
    ///
    /// Both streams are kept verbatim; `Display` shows stderr only.
    ExternalToolFailure {
        /// `None` when the process was killed by a signal
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The external tool could not be started at all
    Invocation { program: String, message: String },
}

impl OrchestratorError {
    /// Stable machine-readable kind, used in logs and JSON output
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            OrchestratorError::Parse(e) => e.kind(),
            OrchestratorError::EmptyServiceName => "EmptyServiceName",
            OrchestratorError::ExternalToolFailure { .. } => "ExternalToolFailure",
            OrchestratorError::Invocation { .. } => "InvocationError",
        }
    }

    /// Standard output captured from a failed tool run, if any
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            OrchestratorError::ExternalToolFailure { stdout, .. } => Some(stdout),
            _ => None,
        }
    }
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestratorError::Parse(e) => write!(f, "{e}"),
            OrchestratorError::EmptyServiceName => f.write_str("service name must not be empty"),
            OrchestratorError::ExternalToolFailure { stderr, .. } => f.write_str(stderr),
            OrchestratorError::Invocation { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrchestratorError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for OrchestratorError {
    fn from(e: ParseError) -> Self {
        OrchestratorError::Parse(e)
    }
}
