pub mod engine;
pub mod launch;

pub use crate::domain::model::{ActivatedEnvironment, LaunchOutcome, LaunchPlan};
pub use crate::domain::ports::{
    ConfigProvider, EnvironmentActivator, LaunchSequence, ProcessRunner, Terminal,
};
pub use crate::utils::error::Result;
