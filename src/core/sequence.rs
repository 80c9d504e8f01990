use crate::core::context::DeployContext;
use crate::domain::model::{StepOutcome, StepStatus};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// 部署流程中的一個步驟
#[async_trait::async_trait]
pub trait Step: Send + Sync {
    /// 用於標識步驟名稱
    fn name(&self) -> &str;

    /// 根據部署目標決定是否執行
    fn should_execute(&self, _context: &DeployContext) -> bool {
        true
    }

    /// 關鍵步驟失敗時中止整個流程；非關鍵步驟只記錄警告
    fn is_critical(&self) -> bool {
        true
    }

    async fn execute(&self, context: &DeployContext) -> Result<StepOutcome>;
}

/// 步驟執行結果
#[derive(Debug, Clone)]
pub struct StepResult {
    pub step_name: String,
    pub outcome: StepOutcome,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub name: String,
    pub will_run: bool,
    pub critical: bool,
}

/// 步驟序列，依序執行並在關鍵失敗時立即中止
#[derive(Default)]
pub struct StepSequence {
    steps: Vec<Box<dyn Step>>,
}

impl StepSequence {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn add_step(&mut self, step: Box<dyn Step>) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn plan(&self, context: &DeployContext) -> Vec<PlannedStep> {
        self.steps
            .iter()
            .map(|step| PlannedStep {
                name: step.name().to_string(),
                will_run: step.should_execute(context),
                critical: step.is_critical(),
            })
            .collect()
    }

    /// 執行所有步驟
    pub async fn execute_all(&self, context: &DeployContext) -> Result<Vec<StepResult>> {
        let mut results = Vec::new();

        for step in &self.steps {
            // 步驟多為同步檔案 I/O；每步之前讓出執行權，中止請求才能在步驟之間生效
            tokio::task::yield_now().await;

            if !step.should_execute(context) {
                tracing::debug!(
                    "⏭️ Skipping step: {} (not used by target {})",
                    step.name(),
                    context.profile.target
                );
                continue;
            }

            tracing::info!("▶️ {}", step.name());
            let start_time = Instant::now();

            let outcome = match step.execute(context).await {
                Ok(outcome) => outcome,
                Err(e) if step.is_critical() || e.is_fatal() => {
                    tracing::error!("❌ Step '{}' failed: {}", step.name(), e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("⚠️ Step '{}' failed, continuing: {}", step.name(), e);
                    StepOutcome::failed(e.to_string())
                }
            };

            let result = StepResult {
                step_name: step.name().to_string(),
                outcome,
                duration: start_time.elapsed(),
            };

            match result.outcome.status {
                StepStatus::Completed => tracing::info!(
                    "✅ {} - {} ({:?})",
                    result.step_name,
                    result.outcome.message,
                    result.duration
                ),
                StepStatus::Skipped => {
                    tracing::info!("ℹ️ {} - skipped: {}", result.step_name, result.outcome.message)
                }
                StepStatus::Failed => {}
            }

            results.push(result);
        }

        Ok(results)
    }

    /// 獲取執行摘要
    pub fn get_execution_summary(results: &[StepResult]) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let count = |status: StepStatus| results.iter().filter(|r| r.outcome.status == status).count();
        let total_duration: Duration = results.iter().map(|r| r.duration).sum();

        summary.insert("executed_steps".to_string(), results.len().into());
        summary.insert("completed".to_string(), count(StepStatus::Completed).into());
        summary.insert("skipped".to_string(), count(StepStatus::Skipped).into());
        summary.insert("failed".to_string(), count(StepStatus::Failed).into());
        summary.insert(
            "total_duration_ms".to_string(),
            (total_duration.as_millis() as u64).into(),
        );

        let step_names: Vec<serde_json::Value> = results
            .iter()
            .map(|r| serde_json::Value::String(r.step_name.clone()))
            .collect();
        summary.insert("steps".to_string(), serde_json::Value::Array(step_names));

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::target::DeploymentTarget;
    use crate::config::toml_config::DeployConfig;
    use crate::utils::error::DeployError;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    struct MockStep {
        name: String,
        critical: bool,
        should_execute: bool,
        fail_with: Option<fn() -> DeployError>,
        busy_for: Option<Duration>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl MockStep {
        fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name: name.to_string(),
                critical: true,
                should_execute: true,
                fail_with: None,
                busy_for: None,
                log: log.clone(),
            }
        }

        fn non_critical(mut self) -> Self {
            self.critical = false;
            self
        }

        fn with_execution_condition(mut self, should_execute: bool) -> Self {
            self.should_execute = should_execute;
            self
        }

        fn failing(mut self, error: fn() -> DeployError) -> Self {
            self.fail_with = Some(error);
            self
        }

        /// 模擬不讓出執行權的同步檔案操作
        fn blocking(mut self, duration: Duration) -> Self {
            self.busy_for = Some(duration);
            self
        }
    }

    #[async_trait::async_trait]
    impl Step for MockStep {
        fn name(&self) -> &str {
            &self.name
        }

        fn should_execute(&self, _context: &DeployContext) -> bool {
            self.should_execute
        }

        fn is_critical(&self) -> bool {
            self.critical
        }

        async fn execute(&self, _context: &DeployContext) -> Result<StepOutcome> {
            self.log.lock().unwrap().push(self.name.clone());
            if let Some(duration) = self.busy_for {
                std::thread::sleep(duration);
            }
            match self.fail_with {
                Some(error) => Err(error()),
                None => Ok(StepOutcome::completed(format!("{} done", self.name))),
            }
        }
    }

    fn context(temp: &TempDir) -> DeployContext {
        DeployContext::resolve(temp.path(), DeploymentTarget::Root, DeployConfig::default(), false)
            .unwrap()
    }

    fn step_failure() -> DeployError {
        DeployError::StepFailed {
            step: "verify".to_string(),
            details: "missing files".to_string(),
        }
    }

    fn build_failure() -> DeployError {
        DeployError::CommandFailed {
            command: "npm run build".to_string(),
            code: Some(1),
            stderr: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let temp = TempDir::new().unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sequence = StepSequence::new();
        sequence.add_step(Box::new(MockStep::new("clean", &log)));
        sequence.add_step(Box::new(MockStep::new("build", &log)));
        sequence.add_step(Box::new(MockStep::new("copy", &log)));

        let results = sequence.execute_all(&context(&temp)).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["clean", "build", "copy"]);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.outcome.status == StepStatus::Completed));
    }

    #[tokio::test]
    async fn test_critical_failure_stops_sequence() {
        let temp = TempDir::new().unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sequence = StepSequence::new();
        sequence.add_step(Box::new(MockStep::new("build", &log).failing(build_failure)));
        sequence.add_step(Box::new(MockStep::new("copy", &log)));

        let result = sequence.execute_all(&context(&temp)).await;

        assert!(matches!(result, Err(DeployError::CommandFailed { .. })));
        assert_eq!(*log.lock().unwrap(), vec!["build"]);
    }

    #[tokio::test]
    async fn test_non_critical_failure_continues() {
        let temp = TempDir::new().unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sequence = StepSequence::new();
        sequence.add_step(Box::new(
            MockStep::new("verify", &log).non_critical().failing(step_failure),
        ));
        sequence.add_step(Box::new(MockStep::new("report", &log)));

        let results = sequence.execute_all(&context(&temp)).await.unwrap();

        assert_eq!(results[0].outcome.status, StepStatus::Failed);
        assert_eq!(results[1].outcome.status, StepStatus::Completed);
    }

    #[tokio::test]
    async fn test_fatal_error_aborts_even_non_critical_step() {
        let temp = TempDir::new().unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sequence = StepSequence::new();
        sequence.add_step(Box::new(
            MockStep::new("compress", &log).non_critical().failing(build_failure),
        ));
        sequence.add_step(Box::new(MockStep::new("copy", &log)));

        assert!(sequence.execute_all(&context(&temp)).await.is_err());
        assert_eq!(*log.lock().unwrap(), vec!["compress"]);
    }

    #[tokio::test]
    async fn test_skipped_steps_are_planned_but_not_run() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sequence = StepSequence::new();
        sequence.add_step(Box::new(MockStep::new("clean", &log)));
        sequence.add_step(Box::new(
            MockStep::new("github-pages-marker", &log).with_execution_condition(false),
        ));

        let plan = sequence.plan(&ctx);
        assert_eq!(plan.len(), 2);
        assert!(!plan[1].will_run);

        let results = sequence.execute_all(&ctx).await.unwrap();
        assert_eq!(results.len(), 1);

        let summary = StepSequence::get_execution_summary(&results);
        assert_eq!(summary["executed_steps"], serde_json::json!(1));
        assert_eq!(summary["steps"], serde_json::json!(["clean"]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_abort_stops_between_blocking_steps() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut sequence = StepSequence::new();
        for name in ["clean", "minify-json", "compress", "copy", "report"] {
            sequence.add_step(Box::new(
                MockStep::new(name, &log).blocking(Duration::from_millis(300)),
            ));
        }

        let handle = tokio::spawn(async move { sequence.execute_all(&ctx).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();
        let joined = handle.await;

        assert!(joined.unwrap_err().is_cancelled());
        let ran = log.lock().unwrap().clone();
        assert!(ran.len() <= 1, "steps ran after abort: {:?}", ran);
        assert!(!ran.contains(&"copy".to_string()));
    }
}
