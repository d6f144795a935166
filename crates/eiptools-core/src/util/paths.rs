//! Generic path utilities.

use std::path::PathBuf;

/// Expand a leading `~` (and `$VARS`) in a path string.
///
/// Falls back to the input unchanged when expansion fails.
///
/// ```
/// use eiptools_core::util::paths::expand_tilde;
///
/// assert_eq!(expand_tilde("/abs/path"), std::path::PathBuf::from("/abs/path"));
/// ```
pub fn expand_tilde(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            log::debug!("Could not expand path '{path}': {e}");
            PathBuf::from(path)
        }
    }
}

/// Platform config directory for a project, e.g. `~/.config/eiptools`.
pub fn project_config_dir(project_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(project_name))
}

/// Platform data directory for a project, e.g. `~/.local/share/eiptools`.
pub fn project_data_dir(project_name: &str) -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(project_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_home() {
        let expanded = expand_tilde("~/notes");
        assert!(expanded.ends_with("notes"));
    }

    #[test]
    fn test_expand_relative_unchanged() {
        assert_eq!(expand_tilde("data/graph.json"), PathBuf::from("data/graph.json"));
    }

    #[test]
    fn test_project_dirs_end_with_name() {
        if let Some(dir) = project_config_dir("eiptools") {
            assert!(dir.ends_with("eiptools"));
        }
        if let Some(dir) = project_data_dir("eiptools") {
            assert!(dir.ends_with("eiptools"));
        }
    }
}
