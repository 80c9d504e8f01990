use crate::config::target::DeploymentTarget;
use crate::core::{DeployContext, Step, StepOutcome};
use crate::utils::error::Result;
use crate::utils::fs::{file_size, files_recursive, has_extension, top_level_files};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEPLOYMENT_INFO_FILE: &str = "DEPLOYMENT_INFO.txt";

/// 建置輸出統計
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub total_bytes: u64,
    pub js_files: usize,
    pub css_files: usize,
    pub gz_files: usize,
    pub largest: Vec<(PathBuf, u64)>,
}

impl BuildSummary {
    pub fn collect(dir: &Path, top: usize) -> Result<Self> {
        let js = [".js".to_string()];
        let css = [".css".to_string()];
        let compressed = [".gz".to_string(), ".br".to_string()];

        let top_level = top_level_files(dir)?;
        let all = files_recursive(dir)?;

        let mut sized: Vec<(PathBuf, u64)> = all
            .iter()
            .filter(|p| !has_extension(p, &compressed))
            .map(|p| {
                let relative = p.strip_prefix(dir).unwrap_or(p).to_path_buf();
                (relative, file_size(p))
            })
            .collect();
        sized.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sized.truncate(top);

        Ok(Self {
            total_bytes: all.iter().map(|p| file_size(p)).sum(),
            js_files: top_level.iter().filter(|p| has_extension(p, &js)).count(),
            css_files: top_level.iter().filter(|p| has_extension(p, &css)).count(),
            gz_files: all
                .iter()
                .filter(|p| has_extension(p, &[".gz".to_string()]))
                .count(),
            largest: sized,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentInfo {
    pub generated: String,
    pub target: DeploymentTarget,
    pub base_href: String,
    pub js_files: usize,
    pub js_bytes: u64,
    pub css_files: usize,
    pub css_bytes: u64,
}

impl DeploymentInfo {
    pub fn collect(context: &DeployContext) -> Result<Self> {
        let root_files = top_level_files(context.workspace.root())?;
        let js: Vec<&PathBuf> = root_files
            .iter()
            .filter(|p| has_extension(p, &[".js".to_string()]))
            .collect();
        let css: Vec<&PathBuf> = root_files
            .iter()
            .filter(|p| has_extension(p, &[".css".to_string()]))
            .collect();

        Ok(Self {
            generated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            target: context.profile.target,
            base_href: context.profile.base_href.clone(),
            js_files: js.len(),
            js_bytes: js.iter().map(|p| file_size(p)).sum(),
            css_files: css.len(),
            css_bytes: css.iter().map(|p| file_size(p)).sum(),
        })
    }

    pub fn render(&self) -> String {
        let site = match self.target {
            DeploymentTarget::GithubPages => "https://[your-username].github.io/".to_string(),
            DeploymentTarget::Ide => format!("http://localhost:63342{}", self.base_href),
            DeploymentTarget::Root => "http://localhost:8080/".to_string(),
        };

        format!(
            "=====================================\n\
             Deployment Info ({target})\n\
             =====================================\n\
             Generated: {generated}\n\
             Base href: {base_href}\n\
             \n\
             Files deployed:\n\
             - index.html\n\
             - {js} JavaScript files ({js_mb:.2} MB)\n\
             - {css} CSS files ({css_kb:.1} KB)\n\
             - Assets folder with images and translations\n\
             \n\
             To deploy:\n\
             1. git add .\n\
             2. git commit -m \"Deploy\"\n\
             3. git push\n\
             \n\
             Your site will be available at:\n\
             {site}\n\
             \n\
             To test locally:\n\
             - python3 -m http.server 8080\n\
             - Open: http://localhost:8080\n",
            target = self.target,
            generated = self.generated,
            base_href = self.base_href,
            js = self.js_files,
            js_mb = self.js_bytes as f64 / 1024.0 / 1024.0,
            css = self.css_files,
            css_kb = self.css_bytes as f64 / 1024.0,
            site = site,
        )
    }
}

/// 輸出建置摘要，並依部署目標寫入部署資訊檔
pub struct ReportStep;

#[async_trait::async_trait]
impl Step for ReportStep {
    fn name(&self) -> &str {
        "report"
    }

    fn is_critical(&self) -> bool {
        false
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let build_output = context.workspace.locate_build_output()?;
        let summary = BuildSummary::collect(&build_output, 5)?;

        tracing::info!("📊 Build location: {}", build_output.display());
        tracing::info!(
            "📦 Total size: {:.2} MB",
            summary.total_bytes as f64 / 1024.0 / 1024.0
        );
        tracing::info!("📜 JavaScript files: {}", summary.js_files);
        tracing::info!("🎨 CSS files: {}", summary.css_files);
        tracing::info!("🗜️ Gzip files: {}", summary.gz_files);
        tracing::info!("Largest files:");
        for (path, size) in &summary.largest {
            tracing::info!("   - {}: {:.2} MB", path.display(), *size as f64 / 1024.0 / 1024.0);
        }

        let mut outcome = StepOutcome::completed(format!(
            "{} JS, {} CSS, {} gzip files",
            summary.js_files, summary.css_files, summary.gz_files
        ))
        .with_metadata("total_bytes", summary.total_bytes)
        .with_metadata("gz_files", summary.gz_files as u64);

        if context.profile.write_report {
            let info = DeploymentInfo::collect(context)?;
            fs::write(context.workspace.path(DEPLOYMENT_INFO_FILE), info.render())?;
            tracing::info!("📝 Deployment info saved to {}", DEPLOYMENT_INFO_FILE);
            outcome = outcome.with_metadata("report_file", DEPLOYMENT_INFO_FILE);
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::DeployConfig;
    use tempfile::TempDir;

    fn seed(temp: &TempDir) -> PathBuf {
        let out = temp.path().join("dist/site/browser");
        fs::create_dir_all(out.join("assets")).unwrap();
        fs::write(out.join("index.html"), "x".repeat(10)).unwrap();
        fs::write(out.join("main-A.js"), "x".repeat(3000)).unwrap();
        fs::write(out.join("main-A.js.gz"), "x".repeat(5000)).unwrap();
        fs::write(out.join("styles-B.css"), "x".repeat(200)).unwrap();
        fs::write(out.join("assets/hero.webp"), "x".repeat(4000)).unwrap();
        out
    }

    #[test]
    fn test_build_summary() {
        let temp = TempDir::new().unwrap();
        let out = seed(&temp);

        let summary = BuildSummary::collect(&out, 2).unwrap();

        assert_eq!(summary.total_bytes, 12210);
        assert_eq!(summary.js_files, 1);
        assert_eq!(summary.css_files, 1);
        assert_eq!(summary.gz_files, 1);
        assert_eq!(
            summary.largest,
            vec![
                (PathBuf::from("assets/hero.webp"), 4000),
                (PathBuf::from("main-A.js"), 3000)
            ]
        );
    }

    #[test]
    fn test_render_deployment_info() {
        let info = DeploymentInfo {
            generated: "2026-01-01 12:00:00".to_string(),
            target: DeploymentTarget::GithubPages,
            base_href: "/".to_string(),
            js_files: 4,
            js_bytes: 2 * 1024 * 1024,
            css_files: 1,
            css_bytes: 2048,
        };

        let text = info.render();

        assert!(text.contains("Deployment Info (github-pages)"));
        assert!(text.contains("Generated: 2026-01-01 12:00:00"));
        assert!(text.contains("- 4 JavaScript files (2.00 MB)"));
        assert!(text.contains("- 1 CSS files (2.0 KB)"));
        assert!(text.contains("github.io"));
    }

    #[tokio::test]
    async fn test_report_file_only_when_target_requests_it() {
        let temp = TempDir::new().unwrap();
        seed(&temp);

        let root_ctx =
            DeployContext::resolve(temp.path(), DeploymentTarget::Root, DeployConfig::default(), true)
                .unwrap();
        ReportStep.execute(&root_ctx).await.unwrap();
        assert!(!temp.path().join(DEPLOYMENT_INFO_FILE).exists());

        let pages_ctx = DeployContext::resolve(
            temp.path(),
            DeploymentTarget::GithubPages,
            DeployConfig::default(),
            true,
        )
        .unwrap();
        let outcome = ReportStep.execute(&pages_ctx).await.unwrap();
        assert!(temp.path().join(DEPLOYMENT_INFO_FILE).exists());
        assert_eq!(outcome.metadata_u64("gz_files"), Some(1));
    }
}
