use crate::config::toml_config::RESERVED_DIRS;
use crate::core::{DeployContext, Step, StepOutcome};
use crate::utils::error::Result;
use crate::utils::fs::remove_if_exists;

/// 建置與快取目錄，只有在會重新建置時才刪除
const BUILD_DIRS: &[&str] = &["dist", ".angular", "node_modules/.cache"];

/// 清除根目錄中上一次部署的檔案
pub struct CleanStep;

impl CleanStep {
    fn is_protected(name: &str, protected: &[glob::Pattern]) -> bool {
        protected.iter().any(|pattern| pattern.matches(name))
    }
}

#[async_trait::async_trait]
impl Step for CleanStep {
    fn name(&self) -> &str {
        "clean"
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let workspace = &context.workspace;
        let root = workspace.root();
        let mut removed_dirs = 0u64;

        if !context.skip_build {
            for dir in BUILD_DIRS {
                if remove_if_exists(&workspace.path(dir))? {
                    tracing::debug!("🗑️ Removed {}", dir);
                    removed_dirs += 1;
                }
            }
        }

        let protected = context
            .config
            .clean
            .protected
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
        let mut removed_files = 0u64;
        for pattern in &context.profile.clean_patterns {
            let full_pattern = format!("{}/{}", escaped_root, pattern);
            for entry in glob::glob(&full_pattern)? {
                let path = entry.map_err(std::io::Error::from)?;
                if !path.is_file() {
                    continue;
                }
                let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
                if Self::is_protected(&name, &protected) {
                    tracing::debug!("Keeping protected file {}", name);
                    continue;
                }
                // 同一檔案可能符合多個樣式
                if remove_if_exists(&path)? {
                    removed_files += 1;
                }
            }
        }

        for folder in &context.config.copy.folders {
            if RESERVED_DIRS.contains(&folder.as_str()) {
                continue;
            }
            if remove_if_exists(&workspace.path(folder))? {
                tracing::debug!("🗑️ Removed folder: {}/", folder);
                removed_dirs += 1;
            }
        }

        remove_if_exists(&workspace.path(".nojekyll"))?;

        Ok(StepOutcome::completed(format!(
            "Removed {} old build files and {} folders",
            removed_files, removed_dirs
        ))
        .with_metadata("files_removed", removed_files)
        .with_metadata("dirs_removed", removed_dirs))
    }
}
