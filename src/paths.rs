use std::path::PathBuf;

use directories::ProjectDirs;

/// Returns the root data directory holding config and durable storage.
///
/// Resolution order:
/// 1. `YOGA_CATALOGUE_ROOT` environment variable (if set)
/// 2. The platform data directory for the application
/// 3. Current working directory + `.yoga-catalogue`
pub fn data_root() -> PathBuf {
    if let Ok(root) = std::env::var("YOGA_CATALOGUE_ROOT")
        && !root.is_empty()
    {
        return PathBuf::from(root);
    }

    ProjectDirs::from("org", "yoga-catalogue", "yoga-catalogue")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".yoga-catalogue"))
}

/// Returns the path to the config file.
pub fn config_path() -> PathBuf {
    data_root().join("config.yaml")
}

/// Returns the path to the durable key-value storage file.
pub fn storage_path() -> PathBuf {
    data_root().join("storage.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_data_root_with_env_var() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var("YOGA_CATALOGUE_ROOT", "/custom/path/yoga") };
        assert_eq!(data_root(), PathBuf::from("/custom/path/yoga"));
        assert_eq!(
            config_path(),
            PathBuf::from("/custom/path/yoga/config.yaml")
        );
        assert_eq!(
            storage_path(),
            PathBuf::from("/custom/path/yoga/storage.json")
        );
        unsafe { std::env::remove_var("YOGA_CATALOGUE_ROOT") };
    }

    #[test]
    #[serial]
    fn test_empty_env_var_is_ignored() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var("YOGA_CATALOGUE_ROOT", "") };
        assert_ne!(data_root(), PathBuf::from(""));
        unsafe { std::env::remove_var("YOGA_CATALOGUE_ROOT") };
    }
}
