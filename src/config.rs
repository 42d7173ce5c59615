use std::env;
use std::path::PathBuf;

/// Environment variable consulted when no folder argument is given.
pub const FOLDER_ENV_VAR: &str = "DICOM_VIEWER_FOLDER";

/// Folder used when neither an argument nor the environment names one.
pub const DEFAULT_FOLDER: &str = "dicom";

/// Startup configuration, resolved once and passed explicitly to the display
/// surface.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Folder containing the slice files.
    pub folder: PathBuf,
    /// Export destination; surfaces fall back to their own default when
    /// unset.
    pub output: Option<PathBuf>,
}

impl ViewerConfig {
    /// Resolve the folder from an explicit argument, then the
    /// [`FOLDER_ENV_VAR`] environment variable, then [`DEFAULT_FOLDER`].
    pub fn resolve(folder: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        let folder = folder
            .or_else(|| env::var_os(FOLDER_ENV_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FOLDER));
        Self { folder, output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_folder_wins() {
        let config = ViewerConfig::resolve(Some(PathBuf::from("/data/series")), None);
        assert_eq!(config.folder, PathBuf::from("/data/series"));
    }

    #[test]
    fn defaults_apply_without_argument_or_environment() {
        // Leave FOLDER_ENV_VAR untouched; when it is unset the built-in
        // default applies.
        if env::var_os(FOLDER_ENV_VAR).is_none() {
            let config = ViewerConfig::resolve(None, None);
            assert_eq!(config.folder, PathBuf::from(DEFAULT_FOLDER));
        }
    }
}
