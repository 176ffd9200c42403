use crate::domain::model::{ActivatedEnvironment, LaunchOutcome, LaunchPlan};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait ConfigProvider: Send + Sync {
    fn project_dir(&self) -> &str;
    fn dotenv_file(&self) -> &str;
    fn environment_name(&self) -> &str;
    fn entry_program(&self) -> &str;
    fn entry_script(&self) -> &str;
}

pub trait EnvironmentActivator: Send + Sync {
    fn activate(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<ActivatedEnvironment>> + Send;
}

pub trait ProcessRunner: Send + Sync {
    fn run(
        &self,
        plan: &LaunchPlan,
    ) -> impl std::future::Future<Output = Result<LaunchOutcome>> + Send;
}

pub trait Terminal: Send + Sync {
    fn hold_open(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait LaunchSequence: Send + Sync {
    async fn prepare(&self) -> Result<PathBuf>;
    async fn activate(&self, project_dir: &Path) -> Result<ActivatedEnvironment>;
    async fn invoke(
        &self,
        project_dir: &Path,
        environment: ActivatedEnvironment,
    ) -> Result<LaunchOutcome>;
}
