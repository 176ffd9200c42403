use crate::domain::model::ActivatedEnvironment;
use crate::domain::ports::EnvironmentActivator;
use crate::utils::error::{LauncherError, Result};
use crate::utils::validation;
use std::collections::HashMap;
use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;

/// Resolves a named conda environment into an env-var overlay for the child process.
#[derive(Debug, Clone, Default)]
pub struct CondaEnvironment {
    conda_root: Option<PathBuf>,
}

impl CondaEnvironment {
    pub fn new(conda_root: Option<PathBuf>) -> Self {
        Self { conda_root }
    }

    /// Candidate install roots, most specific first: explicit config, then
    /// CONDA_ROOT / CONDA_PREFIX / CONDA_EXE, then well-known home locations.
    fn candidate_roots(&self) -> Vec<PathBuf> {
        let mut roots = Vec::new();

        if let Some(root) = &self.conda_root {
            roots.push(root.clone());
        }

        if let Some(root) = env::var_os("CONDA_ROOT") {
            roots.push(PathBuf::from(root));
        }

        if let Some(prefix) = env::var_os("CONDA_PREFIX") {
            let prefix = PathBuf::from(prefix);
            // CONDA_PREFIX points at the active env; when it sits under envs/
            // the install root is two levels up.
            match prefix.parent() {
                Some(parent) if parent.file_name() == Some(OsStr::new("envs")) => {
                    if let Some(root) = parent.parent() {
                        roots.push(root.to_path_buf());
                    }
                }
                _ => roots.push(prefix),
            }
        }

        if let Some(exe) = env::var_os("CONDA_EXE") {
            // <root>/bin/conda or <root>/Scripts/conda.exe
            if let Some(root) = PathBuf::from(exe).parent().and_then(|p| p.parent()) {
                roots.push(root.to_path_buf());
            }
        }

        if let Some(home) = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE")) {
            let home = PathBuf::from(home);
            roots.push(home.join("miniconda3"));
            roots.push(home.join("anaconda3"));
        }

        roots
    }

    fn overlay(name: &str, prefix: PathBuf) -> ActivatedEnvironment {
        let mut path_prepend = Vec::new();

        #[cfg(windows)]
        {
            path_prepend.push(prefix.clone());
            path_prepend.push(prefix.join("Scripts"));
            path_prepend.push(prefix.join("Library").join("bin"));
        }

        #[cfg(not(windows))]
        path_prepend.push(prefix.join("bin"));

        let mut vars = HashMap::new();
        vars.insert("CONDA_DEFAULT_ENV".to_string(), name.to_string());
        vars.insert("CONDA_PREFIX".to_string(), prefix.display().to_string());

        ActivatedEnvironment {
            name: name.to_string(),
            prefix,
            path_prepend,
            vars,
        }
    }
}

impl EnvironmentActivator for CondaEnvironment {
    async fn activate(&self, name: &str) -> Result<ActivatedEnvironment> {
        validation::validate_environment_name("environment.name", name)?;

        let mut searched = Vec::new();
        for root in self.candidate_roots() {
            let prefix = root.join("envs").join(name);
            if prefix.is_dir() {
                tracing::info!("Activating environment '{}' at {}", name, prefix.display());
                return Ok(Self::overlay(name, prefix));
            }
            searched.push(prefix.display().to_string());
        }

        Err(LauncherError::EnvironmentNotFoundError {
            name: name.to_string(),
            searched: searched.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_activate_builds_overlay_for_existing_environment() {
        let conda = TempDir::new().unwrap();
        let prefix = conda.path().join("envs").join("whisper");
        fs::create_dir_all(prefix.join("bin")).unwrap();

        let activator = CondaEnvironment::new(Some(conda.path().to_path_buf()));
        let environment = activator.activate("whisper").await.unwrap();

        assert_eq!(environment.name, "whisper");
        assert_eq!(environment.prefix, prefix);
        assert!(environment
            .path_prepend
            .iter()
            .all(|p| p.starts_with(&prefix)));
        assert_eq!(
            environment.vars.get("CONDA_DEFAULT_ENV"),
            Some(&"whisper".to_string())
        );
        assert_eq!(
            environment.vars.get("CONDA_PREFIX"),
            Some(&prefix.display().to_string())
        );
    }

    #[tokio::test]
    async fn test_activate_missing_environment_reports_searched_paths() {
        let conda = TempDir::new().unwrap();
        fs::create_dir_all(conda.path().join("envs")).unwrap();

        let activator = CondaEnvironment::new(Some(conda.path().to_path_buf()));
        let result = activator.activate("whisper").await;

        match result {
            Err(LauncherError::EnvironmentNotFoundError { name, searched }) => {
                assert_eq!(name, "whisper");
                assert!(searched.contains("whisper"));
            }
            other => panic!("Expected EnvironmentNotFoundError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_activate_rejects_unsafe_names_before_touching_the_filesystem() {
        let activator = CondaEnvironment::new(None);
        let result = activator.activate("../../etc").await;

        assert!(matches!(
            result,
            Err(LauncherError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_configured_root_is_first_candidate() {
        let activator = CondaEnvironment::new(Some(PathBuf::from("/opt/conda")));
        let roots = activator.candidate_roots();

        assert_eq!(roots[0], PathBuf::from("/opt/conda"));
    }
}
