use crate::core::{DeployContext, Step, StepOutcome};
use crate::domain::services::compress::{gzip_bytes, gzip_path_for};
use crate::utils::error::Result;
use crate::utils::fs::{files_recursive, has_extension, remove_if_exists, top_level_files};
use std::fs;

/// 為建置輸出中可壓縮的檔案產生 `.gz`
pub struct CompressStep;

#[async_trait::async_trait]
impl Step for CompressStep {
    fn name(&self) -> &str {
        "compress"
    }

    fn should_execute(&self, context: &DeployContext) -> bool {
        context.profile.compress.is_some()
    }

    fn is_critical(&self) -> bool {
        false
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let Some(settings) = &context.profile.compress else {
            return Ok(StepOutcome::skipped("Compression disabled for this target"));
        };
        let build_output = context.workspace.locate_build_output()?;

        let files = if settings.recursive {
            files_recursive(&build_output)?
        } else {
            top_level_files(&build_output)?
        };

        let mut created = 0u64;
        let mut saved = 0u64;

        for path in files {
            if !has_extension(&path, &settings.extensions) {
                continue;
            }

            let original = fs::read(&path)?;
            if original.len() as u64 <= settings.min_size {
                continue;
            }

            let compressed = gzip_bytes(&original, settings.level)?;
            let gz_path = gzip_path_for(&path);

            if compressed.len() < original.len() {
                fs::write(&gz_path, &compressed)?;
                saved += (original.len() - compressed.len()) as u64;
                created += 1;
            } else {
                // 壓縮後沒有變小，不保留 .gz
                remove_if_exists(&gz_path)?;
                tracing::debug!("Not compressing {} (no gain)", path.display());
            }
        }

        Ok(StepOutcome::completed(format!(
            "Created {} gzip files, saved {:.2} MB",
            created,
            saved as f64 / 1024.0 / 1024.0
        ))
        .with_metadata("files", created)
        .with_metadata("bytes_saved", saved))
    }
}
