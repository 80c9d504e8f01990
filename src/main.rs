use anyhow::Context;
use clap::Parser;
use spa_deploy::utils::logger;
use spa_deploy::{CliConfig, DeployContext, DeployEngine, DeployError, ProcessRunner};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("❌ Deployment failed: {:#}", e);

        match e.downcast_ref::<DeployError>() {
            Some(deploy_error) => {
                eprintln!("❌ {}", deploy_error.user_friendly_message());
                eprintln!("💡 {}", deploy_error.recovery_suggestion());
            }
            None => eprintln!("❌ {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let config = cli
        .load_config()
        .with_context(|| format!("loading {}", cli.config_path().display()))?;
    let context = DeployContext::resolve(cli.root_path(), cli.target, config, cli.skip_build)?;
    let engine = DeployEngine::new(context, Arc::new(ProcessRunner));

    if cli.dry_run {
        println!("Deployment plan for target '{}':", cli.target);
        for (index, step) in engine.plan().iter().enumerate() {
            let status = if step.will_run { "run" } else { "skip" };
            let critical = if step.critical { " (critical)" } else { "" };
            println!("  {:>2}. {:<20} {}{}", index + 1, step.name, status, critical);
        }
        return Ok(());
    }

    let mut handle = tokio::spawn(async move { engine.run().await });

    let report = tokio::select! {
        joined = &mut handle => joined.context("deployment task panicked")??,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("⚠️ Deployment interrupted by user");
            // 中止任務會釋放子程序 (kill_on_drop)
            handle.abort();
            let _ = handle.await;
            eprintln!("⚠️ Deployment interrupted by user");
            std::process::exit(1);
        }
    };

    let summary = report.summary();
    tracing::info!("📊 Execution summary: {}", serde_json::to_string(&summary)?);
    println!(
        "✅ Deployment completed in {:.1}s ({} steps)",
        report.elapsed.as_secs_f64(),
        report.results.len()
    );

    Ok(())
}
