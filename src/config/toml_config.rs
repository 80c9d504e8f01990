use crate::domain::model::RewriteRule;
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

/// 不可被清除或以複製取代的目錄
pub const RESERVED_DIRS: &[&str] = &["src", "public", "node_modules", "dist", ".git", ".angular"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub project: ProjectConfig,
    pub build: BuildConfig,
    pub clean: CleanConfig,
    pub copy: CopyConfig,
    pub compress: CompressConfig,
    pub verify: VerifyConfig,
    pub ide: IdeConfig,
    pub rewrites: Vec<RewriteRule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// `dist/<app_name>/browser`；未設定時自動偵測
    pub app_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub command: String,
    pub args: Vec<String>,
    pub base_href_flag: String,
    pub install_command: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: "npm".to_string(),
            args: ["run", "build", "--", "--configuration", "production"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            base_href_flag: "--base-href".to_string(),
            install_command: vec!["npm".to_string(), "ci".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub extra_patterns: Vec<String>,
    pub protected: Vec<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            extra_patterns: Vec::new(),
            protected: [
                "test-server.js",
                "package.json",
                "package-lock.json",
                "angular.json",
                "tsconfig*.json",
                "deploy.toml",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub folders: Vec<String>,
    pub public_files: Vec<String>,
    pub backup_existing: bool,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            folders: ["assets", "data", "translations", "resources", "cv_en", "cv_pl"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            public_files: ["cv_en.pdf", "cv_pl.pdf", "manifest.json", "favicon.ico"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            backup_existing: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    /// 覆寫目標預設的副檔名清單
    pub extensions: Option<Vec<String>>,
    pub min_size: u64,
    pub level: u32,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            extensions: None,
            min_size: 1024,
            level: 9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    pub locales: Vec<String>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string(), "pl".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeConfig {
    pub project_name: Option<String>,
}

impl DeployConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${APP_NAME})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(app_name) = &self.project.app_name {
            validation::validate_path_segment("project.app_name", app_name)?;
        }

        validation::validate_non_empty_string("build.command", &self.build.command)?;
        validation::validate_non_empty_string("build.base_href_flag", &self.build.base_href_flag)?;
        if self.build.install_command.is_empty() {
            return Err(DeployError::ConfigValidationError {
                field: "build.install_command".to_string(),
                message: "Install command cannot be empty".to_string(),
            });
        }

        for folder in &self.copy.folders {
            validation::validate_path_segment("copy.folders", folder)?;
            if RESERVED_DIRS.contains(&folder.as_str()) {
                return Err(DeployError::InvalidConfigValueError {
                    field: "copy.folders".to_string(),
                    value: folder.clone(),
                    reason: "Source and tooling directories cannot be deploy targets".to_string(),
                });
            }
        }
        for file in &self.copy.public_files {
            validation::validate_path_segment("copy.public_files", file)?;
        }

        for pattern in self.clean.extra_patterns.iter().chain(&self.clean.protected) {
            glob::Pattern::new(pattern)?;
        }

        if let Some(extensions) = &self.compress.extensions {
            validation::validate_extensions("compress.extensions", extensions)?;
        }
        validation::validate_range("compress.level", self.compress.level, 1, 9)?;

        for locale in &self.verify.locales {
            validation::validate_path_segment("verify.locales", locale)?;
        }

        if let Some(project_name) = &self.ide.project_name {
            validation::validate_path_segment("ide.project_name", project_name)?;
        }

        for rule in &self.rewrites {
            validation::validate_non_empty_string("rewrites.from", &rule.from)?;
        }

        Ok(())
    }
}

impl Validate for DeployConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
