use crate::utils::error::{DeployError, Result};
use std::path::{Path, PathBuf};

/// 專案根目錄以及建置輸出位置
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    app_name: Option<String>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, app_name: Option<String>) -> Self {
        Self {
            root: root.into(),
            app_name,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.path("dist")
    }

    pub fn package_json(&self) -> PathBuf {
        self.path("package.json")
    }

    pub fn node_modules(&self) -> PathBuf {
        self.path("node_modules")
    }

    pub fn public_dir(&self) -> PathBuf {
        self.path("public")
    }

    pub fn i18n_source_dir(&self) -> PathBuf {
        self.path("src/assets/i18n")
    }

    /// IDE 開發伺服器以目錄名稱作為 URL 前綴
    pub fn project_name(&self) -> String {
        let resolved = self.root.canonicalize().unwrap_or_else(|_| self.root.clone());
        resolved
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string())
    }

    /// 依優先順序排列的建置輸出候選目錄
    pub fn build_output_candidates(&self) -> Vec<PathBuf> {
        let dist = self.dist_dir();
        let mut candidates = Vec::new();

        match &self.app_name {
            Some(app) => {
                candidates.push(dist.join(app).join("browser"));
                candidates.push(dist.join(app));
            }
            None => {
                // 未指定 app 名稱時掃描 dist/*/browser
                if let Ok(entries) = std::fs::read_dir(&dist) {
                    let mut apps: Vec<PathBuf> = entries
                        .filter_map(|e| e.ok())
                        .map(|e| e.path())
                        .filter(|p| p.is_dir() && p.file_name().is_some_and(|n| n != "browser"))
                        .collect();
                    apps.sort();
                    for app in apps {
                        candidates.push(app.join("browser"));
                        candidates.push(app);
                    }
                }
            }
        }

        candidates.push(dist.join("browser"));
        candidates.push(dist);
        candidates
    }

    /// 第一個含有 index.html 的候選目錄
    pub fn locate_build_output(&self) -> Result<PathBuf> {
        let candidates = self.build_output_candidates();

        candidates
            .iter()
            .find(|dir| dir.join("index.html").is_file())
            .cloned()
            .ok_or_else(|| DeployError::BuildOutputNotFound {
                searched: candidates
                    .iter()
                    .map(|p| {
                        p.strip_prefix(&self.root)
                            .unwrap_or(p)
                            .display()
                            .to_string()
                    })
                    .collect(),
            })
    }
}
