pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ProcessRunner, Workspace};
pub use config::target::{DeploymentTarget, TargetProfile};
pub use config::toml_config::DeployConfig;
pub use core::engine::{DeployEngine, DeployReport};
pub use core::DeployContext;
pub use utils::error::{DeployError, Result};
