use thiserror::Error;

/// Main error type for Dockpane
#[derive(Error, Debug)]
pub enum DockpaneError {
    /// Container runtime CLI errors
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Errors raised while talking to the container runtime tool
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The tool ran but exited non-zero
    #[error("`{program} {command}` failed ({status}): {message}")]
    ExternalTool {
        program: String,
        command: String,
        status: String,
        message: String,
    },

    /// The tool could not be started at all
    #[error("Failed to invoke `{program}`: {reason}")]
    Spawn { program: String, reason: String },

    /// The tool did not finish in time
    #[error("`{program} {command}` timed out after {seconds}s")]
    Timeout {
        program: String,
        command: String,
        seconds: u64,
    },

    /// The tool's output did not have the expected shape
    #[error("Unexpected output from `{command}` at line {line}: {reason}")]
    Parse {
        command: String,
        line: usize,
        reason: String,
    },
}

/// Errors for user-supplied form input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{field} must be a port number (1-65535), got '{value}'")]
    InvalidPort { field: &'static str, value: String },
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Parse errors
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Validation errors
    #[error("Configuration validation failed: {0}")]
    Validation(String),

    /// File not found
    #[error("Configuration file not found: {0}")]
    NotFound(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DockpaneError>;

impl DockpaneError {
    /// Output-format contract violations between us and the runtime tool
    pub fn is_parse(&self) -> bool {
        matches!(self, DockpaneError::Runtime(RuntimeError::Parse { .. }))
    }

    /// Failures of the runtime tool itself (not started, non-zero exit, hung)
    pub fn is_external_tool(&self) -> bool {
        matches!(
            self,
            DockpaneError::Runtime(
                RuntimeError::ExternalTool { .. }
                    | RuntimeError::Spawn { .. }
                    | RuntimeError::Timeout { .. }
            )
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            DockpaneError::Runtime(RuntimeError::Spawn { program, .. }) => {
                format!("Could not run '{}'. Is it installed and on PATH?", program)
            }
            DockpaneError::Runtime(RuntimeError::ExternalTool { message, .. }) => {
                if message.contains("permission denied") {
                    "Permission denied. Please check your container runtime permissions."
                        .to_string()
                } else if message.contains("Cannot connect") || message.contains("daemon") {
                    "Could not reach the container runtime. Please ensure it is running."
                        .to_string()
                } else {
                    message.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}
