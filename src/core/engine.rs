use crate::app::steps;
use crate::core::context::DeployContext;
use crate::core::sequence::{PlannedStep, StepResult, StepSequence};
use crate::domain::ports::CommandRunner;
use crate::utils::error::{DeployError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct DeployReport {
    pub results: Vec<StepResult>,
    pub elapsed: Duration,
}

impl DeployReport {
    pub fn summary(&self) -> HashMap<String, serde_json::Value> {
        StepSequence::get_execution_summary(&self.results)
    }

    pub fn result(&self, step_name: &str) -> Option<&StepResult> {
        self.results.iter().find(|r| r.step_name == step_name)
    }
}

pub struct DeployEngine {
    context: DeployContext,
    sequence: StepSequence,
}

impl DeployEngine {
    /// 以標準步驟建立引擎
    pub fn new(context: DeployContext, runner: Arc<dyn CommandRunner>) -> Self {
        let mut sequence = StepSequence::new();
        for step in steps::standard_steps(runner) {
            sequence.add_step(step);
        }
        Self { context, sequence }
    }

    pub fn with_sequence(context: DeployContext, sequence: StepSequence) -> Self {
        Self { context, sequence }
    }

    pub fn context(&self) -> &DeployContext {
        &self.context
    }

    pub fn plan(&self) -> Vec<PlannedStep> {
        self.sequence.plan(&self.context)
    }

    pub async fn run(&self) -> Result<DeployReport> {
        let start = Instant::now();
        tracing::info!(
            "🚀 Deploying to target '{}' (base href {})",
            self.context.profile.target,
            self.context.profile.base_href
        );

        self.preflight()?;

        let results = self.sequence.execute_all(&self.context).await?;
        let elapsed = start.elapsed();

        tracing::info!("✨ Deployment ready in {:.1}s", elapsed.as_secs_f64());
        Ok(DeployReport { results, elapsed })
    }

    /// 在任何檔案被刪除之前確認前置條件
    fn preflight(&self) -> Result<()> {
        let workspace = &self.context.workspace;

        if self.context.skip_build {
            let output = workspace.locate_build_output()?;
            tracing::info!("📦 Reusing build output at {}", output.display());
        } else if !workspace.package_json().is_file() {
            return Err(DeployError::MissingProjectFile {
                path: workspace.package_json(),
            });
        }

        Ok(())
    }
}
