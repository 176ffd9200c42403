use clap::Parser;
use std::path::PathBuf;
use whisper_launch::config::toml_config::TomlConfig;
use whisper_launch::domain::ports::EnvironmentActivator;
use whisper_launch::utils::error::ErrorSeverity;
use whisper_launch::utils::{logger, validation::Validate};
use whisper_launch::{
    CliConfig, CondaEnvironment, LaunchEngine, SimpleLaunch, StdinTerminal, TokioProcessRunner,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("🚀 Starting WhisperWriter launcher");
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(pause) = cli.pause {
        config.terminal.get_or_insert_with(Default::default).pause_on_exit = Some(pause);
        tracing::info!("🔧 Pause on exit overridden to: {}", pause);
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
    display_config_summary(&config, &cli);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - Nothing will be launched");
        perform_dry_run(&config).await;
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = cli.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 創建配接器與啟動序列
    let activator = CondaEnvironment::new(config.conda_root().map(PathBuf::from));
    let runner = TokioProcessRunner::new();
    let terminal = StdinTerminal::new(config.prompt().to_string());
    let pause_on_exit = config.pause_on_exit();
    let sequence = SimpleLaunch::new(activator, runner, config);

    // 創建啟動引擎並運行
    let engine = LaunchEngine::new_with_monitoring(sequence, terminal, pause_on_exit, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            if outcome.success() {
                println!("✅ WhisperWriter exited normally");
            } else {
                // 子行程的結束碼只記錄，不作為啟動器自身的結束碼
                println!(
                    "⚠️ WhisperWriter exited with code {}",
                    outcome
                        .exit_code
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "unknown".to_string())
                );
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Launch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, cli: &CliConfig) {
    println!("📋 Configuration Summary:");
    println!(
        "  Launcher: {} v{}",
        config.launcher.name, config.launcher.version
    );
    println!("  Project: {}", config.project_dir());
    println!("  Environment: {}", config.environment_name());
    println!(
        "  Entry: {} {}",
        config.entry_program(),
        config.entry_script()
    );
    println!("  Pause on exit: {}", config.pause_on_exit());

    if cli.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

/// 檢查主機上的前置條件，不實際啟動任何東西
async fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📂 Project:");
    let project_dir = PathBuf::from(config.project_dir());
    if project_dir.is_dir() {
        println!("  ✅ Directory exists: {}", project_dir.display());

        let entry = project_dir.join(config.entry_script());
        if entry.is_file() {
            println!("  ✅ Entry script found: {}", config.entry_script());
        } else {
            println!("  ❌ Entry script missing: {}", entry.display());
        }

        let dotenv = project_dir.join(config.dotenv_file());
        if dotenv.is_file() {
            println!("  ✅ Dotenv file found: {}", config.dotenv_file());
        } else {
            println!("  ℹ️ No dotenv file ({})", config.dotenv_file());
        }
    } else {
        println!("  ❌ Directory missing: {}", project_dir.display());
    }

    println!();
    println!("🐍 Environment:");
    let activator = CondaEnvironment::new(config.conda_root().map(PathBuf::from));
    match activator.activate(config.environment_name()).await {
        Ok(environment) => {
            println!(
                "  ✅ Environment '{}' at {}",
                environment.name,
                environment.prefix.display()
            );
            match environment.resolve_program(config.entry_program()) {
                Some(program) => println!("  ✅ Entry program: {}", program.display()),
                None => println!(
                    "  ⚠️ '{}' not found inside the environment, PATH lookup will be used",
                    config.entry_program()
                ),
            }
        }
        Err(e) => {
            println!("  ❌ {}", e.user_friendly_message());
            println!("  💡 {}", e.recovery_suggestion());
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Run without --dry-run to launch.");
}
