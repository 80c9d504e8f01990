use crate::config::target::FolderSelection;
use crate::config::toml_config::RESERVED_DIRS;
use crate::core::{DeployContext, Step, StepOutcome};
use crate::utils::error::Result;
use crate::utils::fs::{replace_dir, top_level_dirs, top_level_files};
use std::fs;
use std::path::PathBuf;

/// 將建置輸出複製到專案根目錄
pub struct CopyToRootStep;

impl CopyToRootStep {
    /// (來源, 目的地名稱) 清單
    fn folders_to_copy(context: &DeployContext, build_output: &std::path::Path) -> Result<Vec<(PathBuf, String)>> {
        let workspace = &context.workspace;
        let mut folders = Vec::new();

        match &context.profile.copy_folders {
            FolderSelection::Named(names) => {
                for name in names {
                    let mut src = build_output.join(name);
                    // dist 中沒有翻譯檔時使用 public/translations
                    if !src.is_dir() && name == "translations" {
                        src = workspace.public_dir().join("translations");
                    }
                    if src.is_dir() {
                        folders.push((src, name.clone()));
                    } else {
                        tracing::debug!("Optional folder {}/ not in build output", name);
                    }
                }
            }
            FolderSelection::All => {
                for dir in top_level_dirs(build_output)? {
                    let name = dir
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    if name.is_empty() || RESERVED_DIRS.contains(&name.as_str()) {
                        tracing::warn!("⚠️ Not copying reserved folder {}/", name);
                        continue;
                    }
                    folders.push((dir, name));
                }
            }
        }

        Ok(folders)
    }
}

#[async_trait::async_trait]
impl Step for CopyToRootStep {
    fn name(&self) -> &str {
        "copy"
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let workspace = &context.workspace;
        let root = workspace.root();
        let build_output = workspace.locate_build_output()?;

        let mut files_copied = 0u64;
        for file in top_level_files(&build_output)? {
            if let Some(name) = file.file_name() {
                fs::copy(&file, root.join(name))?;
                files_copied += 1;
            }
        }
        tracing::info!("   📄 Copied {} root files", files_copied);

        let mut folders_copied = 0u64;
        for (src, name) in Self::folders_to_copy(context, &build_output)? {
            let copied = replace_dir(&src, &root.join(&name), context.config.copy.backup_existing)?;
            tracing::info!("   📁 Copied folder: {}/ ({} files)", name, copied);
            folders_copied += 1;
        }

        // public/ 中的備援檔案只在根目錄缺少時複製
        let public = workspace.public_dir();
        let mut fallbacks = 0u64;
        for name in &context.config.copy.public_files {
            let src = public.join(name);
            let dst = root.join(name);
            if src.is_file() && !dst.exists() {
                fs::copy(&src, &dst)?;
                tracing::info!("   📄 {} (from public)", name);
                fallbacks += 1;
            }
        }

        Ok(StepOutcome::completed(format!(
            "Copied {} files, {} folders and {} public fallbacks to root",
            files_copied, folders_copied, fallbacks
        ))
        .with_metadata("files", files_copied)
        .with_metadata("folders", folders_copied)
        .with_metadata("public_fallbacks", fallbacks))
    }
}
