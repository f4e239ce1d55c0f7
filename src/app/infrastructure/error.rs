use thiserror::Error;

use crate::app::controllers::form::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("No project is open")]
    NoActiveProject,
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_config_parse_conversion() {
        let parse_err = "[project\nname = ".parse::<toml::Table>().unwrap_err();
        let app_err: AppError = parse_err.into();
        assert!(matches!(app_err, AppError::ConfigParse(_)));
        assert!(app_err.to_string().starts_with("Config parse error"));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Validation(ValidationError::NameEmpty);
        assert_eq!(err.to_string(), "The specified project name is too short.");

        assert_eq!(AppError::NoActiveProject.to_string(), "No project is open");
    }
}
