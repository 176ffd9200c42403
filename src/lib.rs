pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::environment::CondaEnvironment;
pub use adapters::process::TokioProcessRunner;
pub use adapters::terminal::StdinTerminal;
pub use config::toml_config::TomlConfig;
pub use core::{engine::LaunchEngine, launch::SimpleLaunch};
pub use domain::model::{ActivatedEnvironment, LaunchOutcome, LaunchPlan};
pub use utils::error::{LauncherError, Result};
