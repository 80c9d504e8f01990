use crate::domain::model::{CommandOutput, CommandSpec};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 執行外部命令 (npm 等) 並擷取輸出
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}
