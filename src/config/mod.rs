pub mod target;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::target::DeploymentTarget;
#[cfg(feature = "cli")]
use crate::config::toml_config::DeployConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "spa-deploy")]
#[command(about = "Build, post-process and deploy a single-page app into the repository root")]
pub struct CliConfig {
    /// Hosting context to prepare the site for
    #[arg(short, long, value_enum, default_value_t = DeploymentTarget::Root)]
    pub target: DeploymentTarget,

    /// Path to TOML configuration file (relative to --root)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Project root the site is deployed into
    #[arg(long, default_value = ".")]
    pub root: String,

    /// Reuse an existing build output instead of running the build
    #[arg(long)]
    pub skip_build: bool,

    /// Show the step plan without touching any file
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    pub fn config_path(&self) -> PathBuf {
        Path::new(&self.root).join(&self.config)
    }

    /// 載入配置檔；預設檔名不存在時使用內建預設值
    pub fn load_config(&self) -> Result<DeployConfig> {
        let path = self.config_path();
        if path.exists() {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            DeployConfig::from_file(&path)
        } else if self.config == DEFAULT_CONFIG_FILE {
            tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
            Ok(DeployConfig::default())
        } else {
            Err(crate::utils::error::DeployError::MissingProjectFile { path })
        }
    }
}
