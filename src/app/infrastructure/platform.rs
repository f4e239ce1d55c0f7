use std::path::PathBuf;

/// Sub-directory of the home directory suggested for new projects.
pub const PROJECT_DIR: &str = "projects";

pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Default location for project files: `$HOME/projects`.
pub fn default_project_dir() -> PathBuf {
    home_dir().join(PROJECT_DIR)
}

/// Per-user configuration directory: config_dir/projectpad/
pub fn config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("projectpad");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_project_dir_is_under_home() {
        let dir = default_project_dir();
        assert!(dir.starts_with(home_dir()));
        assert!(dir.ends_with(PROJECT_DIR));
    }

    #[test]
    fn test_config_dir_name() {
        assert!(config_dir().ends_with("projectpad"));
    }
}
