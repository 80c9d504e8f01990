use crate::core::{DeployContext, Step, StepOutcome};
use crate::utils::error::Result;
use crate::utils::fs::{has_extension, remove_if_exists, top_level_files};
use std::fs;

/// 以 `src/assets/i18n/` 的 JSON 取代已部署的翻譯檔
pub struct SyncTranslationsStep;

#[async_trait::async_trait]
impl Step for SyncTranslationsStep {
    fn name(&self) -> &str {
        "sync-translations"
    }

    fn should_execute(&self, context: &DeployContext) -> bool {
        context.profile.sync_translations
    }

    fn is_critical(&self) -> bool {
        false
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let source = context.workspace.i18n_source_dir();
        if !source.is_dir() {
            tracing::warn!("⚠️ No i18n source files found in src/assets/i18n");
            return Ok(StepOutcome::skipped("No i18n source files found"));
        }

        let target = context.workspace.path("assets/i18n");
        if remove_if_exists(&target)? {
            tracing::info!("   Removed old translations");
        }
        fs::create_dir_all(&target)?;

        let json_ext = [".json".to_string()];
        let mut copied = 0u64;
        for file in top_level_files(&source)? {
            if !has_extension(&file, &json_ext) {
                continue;
            }
            if let Some(name) = file.file_name() {
                fs::copy(&file, target.join(name))?;
                tracing::info!("   ✓ Copied {}", name.to_string_lossy());
                copied += 1;
            }
        }

        Ok(StepOutcome::completed(format!("{} translation files updated", copied))
            .with_metadata("files", copied))
    }
}
