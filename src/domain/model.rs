use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Skipped,
    Failed,
}

/// 單一步驟的執行結果
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub status: StepStatus,
    pub message: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl StepOutcome {
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Completed,
            message: message.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Skipped,
            message: reason.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Failed,
            message: message.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn metadata_u64(&self, key: &str) -> Option<u64> {
        self.metadata.get(key).and_then(|v| v.as_u64())
    }
}

/// 字面字串替換規則
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

impl RewriteRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: current_dir.into(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// 以 `["npm", "ci"]` 形式的陣列建立命令
    pub fn from_argv(argv: &[String], current_dir: impl Into<PathBuf>) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), current_dir).args(args.iter().cloned()))
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}
