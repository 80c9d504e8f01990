use crate::domain::model::{CommandOutput, CommandSpec};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{DeployError, Result};
use async_trait::async_trait;

/// 以子程序執行命令並擷取輸出
///
/// future 被釋放時子程序隨之終止 (kill_on_drop)
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        tracing::info!("   $ {}", spec.display());

        let output = tokio::process::Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.current_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| DeployError::CommandSpawnError {
                command: spec.display(),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
