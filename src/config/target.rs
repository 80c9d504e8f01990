//! Deployment targets and the per-target profile every step reads from.
//!
//! Each target is a hosting context with its own absolute-path conventions:
//! the site root (relative paths), GitHub Pages (absolute `/`), and an IDE's
//! built-in dev server, which serves the project under `/<project>/`.

use crate::config::toml_config::DeployConfig;
use crate::domain::model::RewriteRule;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentTarget {
    Root,
    GithubPages,
    Ide,
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeploymentTarget::Root => "root",
            DeploymentTarget::GithubPages => "github-pages",
            DeploymentTarget::Ide => "ide",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderSelection {
    Named(Vec<String>),
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressSettings {
    pub extensions: Vec<String>,
    pub min_size: u64,
    pub level: u32,
    pub recursive: bool,
}

#[derive(Debug, Clone)]
pub struct TargetProfile {
    pub target: DeploymentTarget,
    pub base_href: String,
    pub rewrites: Vec<RewriteRule>,
    pub minify_json: bool,
    pub minify_html: bool,
    pub compress: Option<CompressSettings>,
    pub copy_folders: FolderSelection,
    pub clean_patterns: Vec<String>,
    pub sync_translations: bool,
    pub nojekyll: bool,
    pub verify: bool,
    pub write_report: bool,
}

const DEFAULT_COMPRESS_EXTENSIONS: &[&str] =
    &[".js", ".css", ".html", ".json", ".svg", ".xml", ".txt"];

const ROOT_CLEAN_PATTERNS: &[&str] = &[
    "chunk-*.js",
    "main-*.js",
    "polyfills-*.js",
    "styles-*.css",
    "*.js.gz",
    "*.css.gz",
    "*.html.gz",
    "*.json.gz",
    "*.txt.gz",
    "*.svg.gz",
    "*.xml.gz",
    "ngsw-worker.js",
    "safety-worker.js",
    "worker-basic.min.js",
    "ngsw.json",
    "index.html",
    "manifest.json",
    "3rdpartylicenses.txt",
];

const GITHUB_PAGES_CLEAN_PATTERNS: &[&str] = &[
    "*.js",
    "*.css",
    "*.map",
    "*.txt",
    "*.gz",
    "index.html",
    "ngsw.json",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl TargetProfile {
    /// 依部署目標與配置解析出完整設定。`project_name` 只用於 IDE 目標。
    pub fn resolve(target: DeploymentTarget, config: &DeployConfig, project_name: &str) -> Self {
        let compress_extensions = |defaults: &[&str]| {
            config
                .compress
                .extensions
                .clone()
                .unwrap_or_else(|| owned(defaults))
        };

        let mut profile = match target {
            DeploymentTarget::Root => Self {
                target,
                base_href: "./".to_string(),
                rewrites: Vec::new(),
                minify_json: true,
                minify_html: false,
                compress: Some(CompressSettings {
                    extensions: compress_extensions(DEFAULT_COMPRESS_EXTENSIONS),
                    min_size: config.compress.min_size,
                    level: config.compress.level,
                    recursive: true,
                }),
                copy_folders: FolderSelection::Named(config.copy.folders.clone()),
                clean_patterns: owned(ROOT_CLEAN_PATTERNS),
                sync_translations: false,
                nojekyll: false,
                verify: false,
                write_report: false,
            },
            DeploymentTarget::GithubPages => Self {
                target,
                base_href: "/".to_string(),
                rewrites: Vec::new(),
                minify_json: false,
                minify_html: true,
                compress: Some(CompressSettings {
                    extensions: compress_extensions(&[".js", ".css"]),
                    min_size: config.compress.min_size,
                    level: config.compress.level,
                    recursive: false,
                }),
                copy_folders: FolderSelection::All,
                clean_patterns: owned(GITHUB_PAGES_CLEAN_PATTERNS),
                sync_translations: true,
                nojekyll: true,
                verify: true,
                write_report: true,
            },
            DeploymentTarget::Ide => {
                let prefix = format!("/{}/", project_name);
                let mut rewrites = Vec::new();
                for folder in &config.copy.folders {
                    for quote in ['"', '\''] {
                        rewrites.push(RewriteRule::new(
                            format!("{quote}/{folder}/"),
                            format!("{quote}{prefix}{folder}/"),
                        ));
                    }
                }

                Self {
                    target,
                    base_href: prefix.clone(),
                    rewrites,
                    minify_json: false,
                    minify_html: false,
                    compress: None,
                    copy_folders: FolderSelection::Named(config.copy.folders.clone()),
                    clean_patterns: owned(ROOT_CLEAN_PATTERNS),
                    sync_translations: false,
                    nojekyll: false,
                    verify: false,
                    write_report: false,
                }
            }
        };

        profile.rewrites.extend(config.rewrites.iter().cloned());
        profile
            .clean_patterns
            .extend(config.clean.extra_patterns.iter().cloned());
        profile
    }
}
