use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Required project file not found: {}", path.display())]
    MissingProjectFile { path: PathBuf },

    #[error("Build output not found (searched: {})", searched.join(", "))]
    BuildOutputNotFound { searched: Vec<String> },

    #[error("Command `{command}` exited with code {code:?}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Could not start `{command}`: {source}")]
    CommandSpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Step '{step}' failed: {details}")]
    StepFailed { step: String, details: String },
}

impl DeployError {
    /// 外部命令失敗或找不到建置輸出時整個流程必須中止
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DeployError::CommandFailed { .. }
                | DeployError::CommandSpawnError { .. }
                | DeployError::BuildOutputNotFound { .. }
                | DeployError::MissingProjectFile { .. }
                | DeployError::ConfigValidationError { .. }
                | DeployError::InvalidConfigValueError { .. }
                | DeployError::TomlError(_)
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DeployError::CommandFailed {
                command, stderr, ..
            } => {
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    format!("`{}` failed", command)
                } else {
                    format!("`{}` failed:\n{}", command, stderr)
                }
            }
            DeployError::BuildOutputNotFound { .. } => {
                "No build output found. Run the build first.".to_string()
            }
            DeployError::MissingProjectFile { path } => {
                format!("{} not found. Please run from project root.", path.display())
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DeployError::CommandFailed { .. } => {
                "Run the build command manually to see the full compiler output"
            }
            DeployError::CommandSpawnError { .. } => {
                "Make sure npm (or the configured build tool) is installed and on PATH"
            }
            DeployError::BuildOutputNotFound { .. } => {
                "Run `npm run build` or drop --skip-build"
            }
            DeployError::MissingProjectFile { .. } => "Use --root to point at the project directory",
            DeployError::TomlError(_)
            | DeployError::ConfigValidationError { .. }
            | DeployError::InvalidConfigValueError { .. } => {
                "Check deploy.toml against the documented sections"
            }
            DeployError::PatternError(_) => "Check clean.extra_patterns for invalid glob syntax",
            _ => "Re-run with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failure_is_fatal_and_shows_stderr() {
        let err = DeployError::CommandFailed {
            command: "npm run build".to_string(),
            code: Some(1),
            stderr: "  error TS2304: Cannot find name 'foo'\n".to_string(),
        };

        assert!(err.is_fatal());
        let message = err.user_friendly_message();
        assert!(message.contains("npm run build"));
        assert!(message.contains("TS2304"));
    }

    #[test]
    fn test_step_failure_is_not_fatal() {
        let err = DeployError::StepFailed {
            step: "verify".to_string(),
            details: "missing index.html".to_string(),
        };

        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Step 'verify' failed: missing index.html");
    }
}
