use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LauncherError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_ENTRY_PROGRAM: &str = "python";
const DEFAULT_ENTRY_SCRIPT: &str = "run.py";
const DEFAULT_DOTENV_FILE: &str = ".env";
// 與 Windows 的 pause 指令相同的提示文字
const DEFAULT_PROMPT: &str = "Press any key to continue . . .";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub launcher: LauncherSection,
    pub project: ProjectSection,
    pub environment: EnvironmentSection,
    pub entry: Option<EntrySection>,
    pub terminal: Option<TerminalSection>,
    pub monitoring: Option<MonitoringSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherSection {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    pub dir: String,
    pub dotenv: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentSection {
    pub name: Option<String>,
    pub conda_root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySection {
    pub program: Option<String>,
    pub script: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalSection {
    pub pause_on_exit: Option<bool>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSection {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LauncherError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LauncherError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WHISPER_WRITER_HOME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("project.dir", &self.project.dir)?;

        let name = validation::validate_required_field("environment.name", &self.environment.name)?;
        validation::validate_environment_name("environment.name", name)?;

        if let Some(root) = &self.environment.conda_root {
            validation::validate_path("environment.conda_root", root)?;
        }

        validation::validate_non_empty_string("entry.program", self.entry_program())?;
        validation::validate_non_empty_string("entry.script", self.entry_script())?;

        Ok(())
    }

    /// 取得專案目錄
    pub fn project_dir(&self) -> &str {
        &self.project.dir
    }

    /// 取得 .env 檔名
    pub fn dotenv_file(&self) -> &str {
        self.project.dotenv.as_deref().unwrap_or(DEFAULT_DOTENV_FILE)
    }

    /// 取得環境名稱（驗證後保證存在）
    pub fn environment_name(&self) -> &str {
        self.environment.name.as_deref().unwrap_or_default()
    }

    /// 取得 conda 安裝根目錄
    pub fn conda_root(&self) -> Option<&str> {
        self.environment.conda_root.as_deref()
    }

    /// 取得入口程式
    pub fn entry_program(&self) -> &str {
        self.entry
            .as_ref()
            .and_then(|e| e.program.as_deref())
            .unwrap_or(DEFAULT_ENTRY_PROGRAM)
    }

    /// 取得入口腳本
    pub fn entry_script(&self) -> &str {
        self.entry
            .as_ref()
            .and_then(|e| e.script.as_deref())
            .unwrap_or(DEFAULT_ENTRY_SCRIPT)
    }

    /// 是否在結束時暫停
    pub fn pause_on_exit(&self) -> bool {
        self.terminal
            .as_ref()
            .and_then(|t| t.pause_on_exit)
            .unwrap_or(true)
    }

    /// 取得暫停提示文字
    pub fn prompt(&self) -> &str {
        self.terminal
            .as_ref()
            .and_then(|t| t.prompt.as_deref())
            .unwrap_or(DEFAULT_PROMPT)
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn project_dir(&self) -> &str {
        self.project_dir()
    }

    fn dotenv_file(&self) -> &str {
        self.dotenv_file()
    }

    fn environment_name(&self) -> &str {
        self.environment_name()
    }

    fn entry_program(&self) -> &str {
        self.entry_program()
    }

    fn entry_script(&self) -> &str {
        self.entry_script()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
