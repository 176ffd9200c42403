use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Dotenv file error: {0}")]
    DotenvError(#[from] dotenvy::Error),

    #[error("Configuration error: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Project directory not found: {path}")]
    ProjectDirNotFoundError { path: String },

    #[error("Environment '{name}' not found (searched: {searched})")]
    EnvironmentNotFoundError { name: String, searched: String },

    #[error("Environment activation failed: {message}")]
    ActivationError { message: String },

    #[error("Failed to invoke '{program}': {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Environment,
    Process,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LauncherError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LauncherError::ConfigValidationError { .. }
            | LauncherError::InvalidConfigValueError { .. }
            | LauncherError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LauncherError::ProjectDirNotFoundError { .. }
            | LauncherError::EnvironmentNotFoundError { .. }
            | LauncherError::ActivationError { .. }
            | LauncherError::DotenvError(_) => ErrorCategory::Environment,
            LauncherError::SpawnError { .. } => ErrorCategory::Process,
            LauncherError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LauncherError::DotenvError(_) => ErrorSeverity::Medium,
            LauncherError::ConfigValidationError { .. }
            | LauncherError::InvalidConfigValueError { .. }
            | LauncherError::MissingConfigError { .. }
            | LauncherError::ProjectDirNotFoundError { .. }
            | LauncherError::EnvironmentNotFoundError { .. }
            | LauncherError::ActivationError { .. }
            | LauncherError::SpawnError { .. } => ErrorSeverity::High,
            LauncherError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LauncherError::ConfigValidationError { field, .. }
            | LauncherError::InvalidConfigValueError { field, .. }
            | LauncherError::MissingConfigError { field } => {
                format!("Check the '{}' entry in launcher.toml", field)
            }
            LauncherError::ProjectDirNotFoundError { .. } => {
                "Update [project].dir in launcher.toml to the WhisperWriter checkout location"
                    .to_string()
            }
            LauncherError::EnvironmentNotFoundError { name, .. } => format!(
                "Create the environment first: conda create -n {} python",
                name
            ),
            LauncherError::ActivationError { .. } => {
                "Verify the conda installation and the [environment] section".to_string()
            }
            LauncherError::DotenvError(_) => {
                "Fix the malformed line in the project's .env file".to_string()
            }
            LauncherError::SpawnError { program, .. } => format!(
                "Make sure '{}' exists inside the activated environment",
                program
            ),
            LauncherError::IoError(_) => {
                "Check filesystem permissions and available disk space".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LauncherError::ConfigValidationError { .. }
            | LauncherError::InvalidConfigValueError { .. }
            | LauncherError::MissingConfigError { .. } => {
                format!("The launcher configuration is invalid: {}", self)
            }
            LauncherError::ProjectDirNotFoundError { path } => {
                format!("The WhisperWriter project directory '{}' does not exist", path)
            }
            LauncherError::EnvironmentNotFoundError { name, .. } => {
                format!("The conda environment '{}' is not installed on this machine", name)
            }
            LauncherError::ActivationError { message } => {
                format!("Could not activate the environment: {}", message)
            }
            LauncherError::DotenvError(e) => {
                format!("Could not read the project's .env file: {}", e)
            }
            LauncherError::SpawnError { program, .. } => {
                format!("Could not start '{}'", program)
            }
            LauncherError::IoError(e) => format!("A system error occurred: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
