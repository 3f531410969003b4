use clap::Parser;
use procurement_dash::app::session::{SessionReply, HELP_TEXT};
use procurement_dash::core::{ConfigProvider, DatasetSource};
use procurement_dash::utils::error::{DashError, ErrorSeverity};
use procurement_dash::utils::{logger, validation::Validate};
use procurement_dash::{
    CliConfig, DashboardConfig, DashboardEngine, DashboardPipeline, LocalStorage, Session,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting procurement dashboard");
    tracing::debug!("CLI config: {:?}", cli);

    let result = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => {
            tracing::info!("✅ Configuration loaded and validated successfully");
            if cli.interactive {
                run_interactive(config).await
            } else {
                run_once(config).await
            }
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        report_and_exit(e);
    }
}

async fn run_once(config: DashboardConfig) -> procurement_dash::Result<()> {
    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let source = config.dataset_source();
    let pipeline = DashboardPipeline::new(storage, config, source);

    let engine = DashboardEngine::new_with_monitoring(pipeline, monitor_enabled);
    let output_path = engine.run().await?;

    println!("📁 Dashboard saved to: {}", output_path);
    Ok(())
}

async fn run_interactive(config: DashboardConfig) -> procurement_dash::Result<()> {
    let dataset = Arc::new(config.dataset_source().load()?);
    tracing::info!("📥 Dataset ready with {} records", dataset.len());

    let storage = LocalStorage::new(config.output_path().to_string());
    let mut session = Session::new(dataset, storage, &config)?;

    println!("{}\n", HELP_TEXT);
    print_reply(&session.render().await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match session.handle_line(&line).await {
            Ok(SessionReply::Quit) => break,
            Ok(reply) => print_reply(&reply),
            // 輸入錯誤只提示，不結束工作階段
            Err(e) if e.severity() <= ErrorSeverity::Medium => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!("👋 Session finished");
    Ok(())
}

fn print_reply(reply: &SessionReply) {
    match reply {
        SessionReply::Rendered { summary, path } => {
            println!("{}", summary);
            println!("📁 Dashboard saved to: {}", path);
        }
        SessionReply::Text(text) => println!("{}", text),
        SessionReply::Quit => {}
    }
}

fn report_and_exit(e: DashError) -> ! {
    tracing::error!(
        "❌ Dashboard failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
