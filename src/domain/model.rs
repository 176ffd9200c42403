use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 已啟用環境的結果：子行程需要的 PATH 前綴與環境變數
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivatedEnvironment {
    pub name: String,
    pub prefix: PathBuf,
    pub path_prepend: Vec<PathBuf>,
    pub vars: HashMap<String, String>,
}

impl ActivatedEnvironment {
    /// 在環境的 PATH 前綴目錄中解析程式的絕對路徑
    pub fn resolve_program(&self, program: &str) -> Option<PathBuf> {
        if Path::new(program).is_absolute() {
            return Some(PathBuf::from(program));
        }

        for dir in &self.path_prepend {
            let candidate = dir.join(program);
            if candidate.is_file() {
                return Some(candidate);
            }

            #[cfg(windows)]
            {
                let candidate = dir.join(format!("{}.exe", program));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub path_prepend: Vec<PathBuf>,
    pub env_vars: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchOutcome {
    pub exit_code: Option<i32>,
    pub started_at: DateTime<Local>,
    pub duration: Duration,
}

impl LaunchOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
