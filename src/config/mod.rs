pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "whisper-launch")]
#[command(about = "Configuration-driven launcher for the WhisperWriter application")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "launcher.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Report what would be launched without spawning anything
    #[arg(long)]
    pub dry_run: bool,

    /// Override pause-on-exit setting from config
    #[arg(long)]
    pub pause: Option<bool>,

    /// Override monitoring setting from config
    #[arg(long)]
    pub monitor: Option<bool>,
}
