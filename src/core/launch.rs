use crate::core::{
    ActivatedEnvironment, ConfigProvider, EnvironmentActivator, LaunchOutcome, LaunchPlan,
    LaunchSequence, ProcessRunner,
};
use crate::utils::error::{LauncherError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct SimpleLaunch<A: EnvironmentActivator, R: ProcessRunner, C: ConfigProvider> {
    activator: A,
    runner: R,
    config: C,
}

impl<A: EnvironmentActivator, R: ProcessRunner, C: ConfigProvider> SimpleLaunch<A, R, C> {
    pub fn new(activator: A, runner: R, config: C) -> Self {
        Self {
            activator,
            runner,
            config,
        }
    }
}

#[async_trait]
impl<A: EnvironmentActivator, R: ProcessRunner, C: ConfigProvider> LaunchSequence
    for SimpleLaunch<A, R, C>
{
    async fn prepare(&self) -> Result<PathBuf> {
        let dir = PathBuf::from(self.config.project_dir());

        if !dir.is_dir() {
            return Err(LauncherError::ProjectDirNotFoundError {
                path: self.config.project_dir().to_string(),
            });
        }

        let dir = dir.canonicalize()?;
        tracing::debug!("Project directory resolved to {}", dir.display());
        Ok(dir)
    }

    async fn activate(&self, project_dir: &Path) -> Result<ActivatedEnvironment> {
        let mut environment = self
            .activator
            .activate(self.config.environment_name())
            .await?;

        // 合併專案的 .env 變數，不覆蓋啟動器已有的環境變數
        let dotenv_path = project_dir.join(self.config.dotenv_file());
        if dotenv_path.is_file() {
            let mut loaded = 0usize;
            for item in dotenvy::from_path_iter(&dotenv_path)? {
                let (key, value) = item?;
                if std::env::var_os(&key).is_none() && !environment.vars.contains_key(&key) {
                    environment.vars.insert(key, value);
                    loaded += 1;
                }
            }
            tracing::debug!(
                "Loaded {} variables from {}",
                loaded,
                dotenv_path.display()
            );
        }

        Ok(environment)
    }

    async fn invoke(
        &self,
        project_dir: &Path,
        environment: ActivatedEnvironment,
    ) -> Result<LaunchOutcome> {
        // 入口程式優先從已啟用環境解析，找不到時退回 PATH 查找
        let program = environment
            .resolve_program(self.config.entry_program())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| self.config.entry_program().to_string());

        let plan = LaunchPlan {
            program,
            args: vec![self.config.entry_script().to_string()],
            working_dir: project_dir.to_path_buf(),
            path_prepend: environment.path_prepend.clone(),
            env_vars: environment.vars.clone(),
        };

        self.runner.run(&plan).await
    }
}
