use crate::core::{DeployContext, Step, StepOutcome};
use crate::utils::error::Result;
use std::fs;

/// GitHub Pages 不經 Jekyll 處理
pub struct GithubPagesMarkerStep;

#[async_trait::async_trait]
impl Step for GithubPagesMarkerStep {
    fn name(&self) -> &str {
        "github-pages-marker"
    }

    fn should_execute(&self, context: &DeployContext) -> bool {
        context.profile.nojekyll
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        fs::write(context.workspace.path(".nojekyll"), b"")?;
        Ok(StepOutcome::completed(".nojekyll file created"))
    }
}
