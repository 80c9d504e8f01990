use crate::core::{DeployContext, Step, StepOutcome};
use crate::utils::error::{DeployError, Result};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub label: String,
    pub passed: bool,
}

/// 符合樣式的根目錄檔案數
fn count_matching(root: &Path, pattern: &str) -> Result<usize> {
    let full = format!("{}/{}", glob::Pattern::escape(&root.to_string_lossy()), pattern);
    let mut count = 0;
    for entry in glob::glob(&full)? {
        if entry.map_err(std::io::Error::from)?.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

/// 檢查根目錄是否具備網站運作所需檔案
pub struct VerifyStep;

impl VerifyStep {
    pub fn run_checks(context: &DeployContext) -> Result<Vec<Check>> {
        let root = context.workspace.root();
        let mut checks = vec![
            Check {
                label: "index.html".to_string(),
                passed: root.join("index.html").is_file(),
            },
            Check {
                label: "CSS files".to_string(),
                passed: count_matching(root, "styles-*.css")? > 0,
            },
            Check {
                label: "Main JS bundle".to_string(),
                passed: count_matching(root, "main-*.js")? > 0,
            },
        ];

        let chunks = count_matching(root, "chunk-*.js")?;
        checks.push(Check {
            label: format!("{} JavaScript chunks", chunks),
            passed: chunks > 0,
        });
        checks.push(Check {
            label: "Assets folder".to_string(),
            passed: root.join("assets").is_dir(),
        });
        checks.push(Check {
            label: "Translations".to_string(),
            passed: context
                .config
                .verify
                .locales
                .iter()
                .all(|locale| root.join(format!("assets/i18n/{}.json", locale)).is_file()),
        });

        Ok(checks)
    }
}

#[async_trait::async_trait]
impl Step for VerifyStep {
    fn name(&self) -> &str {
        "verify"
    }

    fn should_execute(&self, context: &DeployContext) -> bool {
        context.profile.verify
    }

    fn is_critical(&self) -> bool {
        false
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome> {
        let checks = Self::run_checks(context)?;

        for check in &checks {
            if check.passed {
                tracing::info!("  ✓ {}", check.label);
            } else {
                tracing::warn!("  ✗ {} MISSING!", check.label);
            }
        }

        let missing: Vec<&str> = checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.label.as_str())
            .collect();

        if !missing.is_empty() {
            tracing::warn!("⚠️ Deployment may not work properly!");
            return Err(DeployError::StepFailed {
                step: "verify".to_string(),
                details: format!("missing {}", missing.join(", ")),
            });
        }

        Ok(StepOutcome::completed("All critical files verified")
            .with_metadata("checks", checks.len() as u64))
    }
}
