use clap::Parser;
use earnings_etl::config::toml_config::TomlConfig;
use earnings_etl::domain::ports::ConfigProvider;
use earnings_etl::utils::{logger, validation::Validate};
use earnings_etl::{EarningsPipeline, EtlEngine, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Earnings report runs driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "report-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the aggregation period from config
    #[arg(long)]
    period: Option<String>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based earnings report tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(period) = &args.period {
        config.transform = Some(earnings_etl::config::toml_config::TransformConfig {
            period: Some(period.clone()),
        });
        tracing::info!("🔧 Period overridden to: {}", period);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 創建存儲和管道
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = EarningsPipeline::new(storage, config);

    // 創建 ETL 引擎並運行
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Earnings report completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Earnings report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                earnings_etl::utils::error::ErrorSeverity::Low => 0,
                earnings_etl::utils::error::ErrorSeverity::Medium => 2,
                earnings_etl::utils::error::ErrorSeverity::High => 1,
                earnings_etl::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!(
        "  Report: {} v{}",
        config.report.name,
        config.report.version
    );
    tracing::info!("  Source: {}", config.source_path());
    tracing::info!("  Payout column: {}", config.payout_column());
    tracing::info!("  Period: {}", config.period());
    tracing::info!("  Output: {}", config.output_path());
    tracing::info!("  Formats: {}", config.load.output_formats.join(", "));
    tracing::info!("  Compression: {}", config.compression_enabled());

    if args.dry_run {
        tracing::info!("  🔍 DRY RUN MODE ENABLED");
    }
}
