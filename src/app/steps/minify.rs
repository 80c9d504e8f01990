use crate::core::{DeployContext, Step, StepOutcome};
use crate::domain::services::minify::{minify_html, minify_json};
use crate::utils::error::Result;
use crate::utils::fs::{files_recursive, has_extension, top_level_files};
use std::fs;

/// 將建置輸出中的 JSON 改寫為緊湊格式
pub struct MinifyJsonStep;

#[async_trait::async_trait]
impl Step for MinifyJsonStep {
    fn name(&self) -> &str {
        "minify-json"
    }

    fn should_execute(&self, context: &DeployContext) -> bool {
        context.profile.minify_json
    }

    fn is_critical(&self) -> bool {
        false
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let build_output = context.workspace.locate_build_output()?;
        let json_ext = [".json".to_string()];

        let mut minified = 0u64;
        let mut saved = 0u64;

        for path in files_recursive(&build_output)? {
            if !has_extension(&path, &json_ext) {
                continue;
            }

            // 最佳化失敗不影響部署
            let original = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            let compact = match minify_json(&original) {
                Ok(compact) => compact,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            if compact.len() < original.len() {
                if let Err(e) = fs::write(&path, &compact) {
                    tracing::debug!("Could not write {}: {}", path.display(), e);
                    continue;
                }
                saved += (original.len() - compact.len()) as u64;
                minified += 1;
            }
        }

        Ok(StepOutcome::completed(format!(
            "Minified {} JSON files, saved {:.1} KB",
            minified,
            saved as f64 / 1024.0
        ))
        .with_metadata("files", minified)
        .with_metadata("bytes_saved", saved))
    }
}

/// 壓縮頂層 HTML 檔案
pub struct MinifyHtmlStep;

#[async_trait::async_trait]
impl Step for MinifyHtmlStep {
    fn name(&self) -> &str {
        "minify-html"
    }

    fn should_execute(&self, context: &DeployContext) -> bool {
        context.profile.minify_html
    }

    fn is_critical(&self) -> bool {
        false
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let build_output = context.workspace.locate_build_output()?;
        let html_ext = [".html".to_string()];

        let mut files = 0u64;
        let mut original_total = 0usize;
        let mut minified_total = 0usize;

        for path in top_level_files(&build_output)? {
            if !has_extension(&path, &html_ext) {
                continue;
            }
            let original = fs::read_to_string(&path)?;
            let minified = minify_html(&original);
            fs::write(&path, &minified)?;

            original_total += original.len();
            minified_total += minified.len();
            files += 1;
        }

        if files == 0 {
            return Ok(StepOutcome::skipped("No HTML files in build output"));
        }

        let reduction = if original_total > 0 {
            (original_total.saturating_sub(minified_total)) as f64 / original_total as f64 * 100.0
        } else {
            0.0
        };

        Ok(StepOutcome::completed(format!(
            "HTML minified (reduced by {:.1}%)",
            reduction
        ))
        .with_metadata("files", files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::target::DeploymentTarget;
    use crate::config::toml_config::DeployConfig;
    use crate::core::StepStatus;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn setup(target: DeploymentTarget) -> (TempDir, DeployContext, PathBuf) {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("dist/site/browser");
        fs::create_dir_all(out.join("assets/i18n")).unwrap();
        fs::write(out.join("index.html"), "<html>\n  <!-- x -->\n  <body></body>\n</html>\n").unwrap();
        let ctx = DeployContext::resolve(temp.path(), target, DeployConfig::default(), true).unwrap();
        (temp, ctx, out)
    }

    #[tokio::test]
    async fn test_minify_json_rewrites_nested_files() {
        let (_temp, ctx, out) = setup(DeploymentTarget::Root);
        let pretty = "{\n    \"nav\": {\n        \"home\": \"Strona główna\"\n    }\n}\n";
        fs::write(out.join("assets/i18n/pl.json"), pretty).unwrap();
        fs::write(out.join("manifest.json"), "{\"name\":\"a\"}").unwrap();

        let outcome = MinifyJsonStep.execute(&ctx).await.unwrap();

        assert_eq!(
            fs::read_to_string(out.join("assets/i18n/pl.json")).unwrap(),
            r#"{"nav":{"home":"Strona główna"}}"#
        );
        assert_eq!(outcome.metadata_u64("files"), Some(1));
        assert!(outcome.metadata_u64("bytes_saved").unwrap() > 0);
    }

    #[tokio::test]
    async fn test_minify_json_swallows_invalid_files() {
        let (_temp, ctx, out) = setup(DeploymentTarget::Root);
        fs::write(out.join("broken.json"), "{ \"a\": ").unwrap();

        let outcome = MinifyJsonStep.execute(&ctx).await.unwrap();

        assert_eq!(outcome.status, StepStatus::Completed);
        assert_eq!(fs::read_to_string(out.join("broken.json")).unwrap(), "{ \"a\": ");
    }

    #[tokio::test]
    async fn test_minify_html_top_level_only() {
        let (_temp, ctx, out) = setup(DeploymentTarget::GithubPages);
        let nested = "<div>\n  <!-- keep -->\n</div>";
        fs::write(out.join("assets/partial.html"), nested).unwrap();

        let outcome = MinifyHtmlStep.execute(&ctx).await.unwrap();

        assert_eq!(
            fs::read_to_string(out.join("index.html")).unwrap(),
            "<html><body></body></html>"
        );
        assert_eq!(fs::read_to_string(out.join("assets/partial.html")).unwrap(), nested);
        assert!(outcome.message.contains("reduced by"));
    }
}
