use crate::adapters::Workspace;
use crate::config::target::{DeploymentTarget, TargetProfile};
use crate::config::toml_config::DeployConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::PathBuf;

/// 所有步驟共用的唯讀執行上下文
#[derive(Debug, Clone)]
pub struct DeployContext {
    pub workspace: Workspace,
    pub profile: TargetProfile,
    pub config: DeployConfig,
    pub skip_build: bool,
}

impl DeployContext {
    /// 驗證配置並解析部署目標
    pub fn resolve(
        root: impl Into<PathBuf>,
        target: DeploymentTarget,
        config: DeployConfig,
        skip_build: bool,
    ) -> Result<Self> {
        config.validate()?;

        let workspace = Workspace::new(root, config.project.app_name.clone());
        let project_name = config
            .ide
            .project_name
            .clone()
            .unwrap_or_else(|| workspace.project_name());
        let profile = TargetProfile::resolve(target, &config, &project_name);

        Ok(Self {
            workspace,
            profile,
            config,
            skip_build,
        })
    }
}
