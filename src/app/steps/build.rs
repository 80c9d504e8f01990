use crate::core::{CommandRunner, DeployContext, Step, StepOutcome};
use crate::domain::model::{CommandOutput, CommandSpec};
use crate::utils::error::{DeployError, Result};
use std::sync::Arc;

fn ensure_success(spec: &CommandSpec, output: CommandOutput) -> Result<CommandOutput> {
    if output.success() {
        return Ok(output);
    }
    Err(DeployError::CommandFailed {
        command: spec.display(),
        code: output.code,
        stderr: output.stderr,
    })
}

/// 缺少 `node_modules/` 時安裝依賴
pub struct InstallDepsStep {
    runner: Arc<dyn CommandRunner>,
}

impl InstallDepsStep {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait::async_trait]
impl Step for InstallDepsStep {
    fn name(&self) -> &str {
        "install-deps"
    }

    fn should_execute(&self, context: &DeployContext) -> bool {
        !context.skip_build
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let workspace = &context.workspace;
        if workspace.node_modules().is_dir() {
            return Ok(StepOutcome::skipped("Dependencies already installed"));
        }

        let spec = CommandSpec::from_argv(&context.config.build.install_command, workspace.root())
            .ok_or_else(|| DeployError::ConfigValidationError {
                field: "build.install_command".to_string(),
                message: "Install command cannot be empty".to_string(),
            })?;

        ensure_success(&spec, self.runner.run(&spec).await?)?;
        Ok(StepOutcome::completed("Installed packages"))
    }
}

/// 以部署目標的 base href 執行正式建置
pub struct BuildStep {
    runner: Arc<dyn CommandRunner>,
}

impl BuildStep {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub fn command_for(context: &DeployContext) -> CommandSpec {
        let build = &context.config.build;
        CommandSpec::new(build.command.clone(), context.workspace.root())
            .args(build.args.iter().cloned())
            .args([build.base_href_flag.clone(), context.profile.base_href.clone()])
    }
}

#[async_trait::async_trait]
impl Step for BuildStep {
    fn name(&self) -> &str {
        "build"
    }

    fn should_execute(&self, context: &DeployContext) -> bool {
        !context.skip_build
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let spec = Self::command_for(context);
        let output = ensure_success(&spec, self.runner.run(&spec).await?)?;
        tracing::debug!("Build stdout:\n{}", output.stdout);

        // 建置成功但沒有輸出同樣視為致命錯誤
        let build_output = context.workspace.locate_build_output()?;

        Ok(StepOutcome::completed(format!(
            "Production build written to {}",
            build_output.display()
        ))
        .with_metadata("build_output", build_output.display().to_string()))
    }
}
