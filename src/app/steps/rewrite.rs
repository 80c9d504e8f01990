use crate::core::{DeployContext, Step, StepOutcome};
use crate::domain::services::rewrite::{apply_rewrites, set_base_href};
use crate::utils::error::Result;
use crate::utils::fs::{has_extension, top_level_files};
use std::fs;

/// 依部署目標調整頂層 HTML 與 JS 中的路徑
pub struct RewritePathsStep;

#[async_trait::async_trait]
impl Step for RewritePathsStep {
    fn name(&self) -> &str {
        "rewrite-paths"
    }

    fn is_critical(&self) -> bool {
        false
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let build_output = context.workspace.locate_build_output()?;
        let profile = &context.profile;
        let html_ext = [".html".to_string()];
        let js_ext = [".js".to_string()];

        let mut files_changed = 0u64;
        let mut replacements = 0u64;

        for path in top_level_files(&build_output)? {
            let is_html = has_extension(&path, &html_ext);
            if !is_html && !has_extension(&path, &js_ext) {
                continue;
            }

            let original = fs::read_to_string(&path)?;
            let mut content = if is_html {
                set_base_href(&original, &profile.base_href)
            } else {
                original.clone()
            };

            let (rewritten, hits) = apply_rewrites(&content, &profile.rewrites);
            content = rewritten;
            replacements += hits as u64;

            if content != original {
                fs::write(&path, &content)?;
                files_changed += 1;
                tracing::debug!("Rewrote paths in {}", path.display());
            }
        }

        Ok(StepOutcome::completed(format!(
            "Base href set to {} ({} files changed, {} path replacements)",
            profile.base_href, files_changed, replacements
        ))
        .with_metadata("files_changed", files_changed)
        .with_metadata("replacements", replacements))
    }
}
