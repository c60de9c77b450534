use std::path::{Path, PathBuf};

use crate::error::Result;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "reposite.toml";

/// Manages where the config file lives and what relative paths resolve against
#[derive(Debug, Clone)]
pub struct Paths {
    /// Directory that relative cache and output paths are anchored to
    pub root: PathBuf,
    /// Configuration file path (./reposite.toml by default)
    pub config_file: PathBuf,
}

impl Paths {
    /// Create a Paths instance rooted at the current working directory
    pub fn new() -> Result<Self> {
        let root = std::env::current_dir()?;

        Ok(Self {
            config_file: root.join(CONFIG_FILE_NAME),
            root,
        })
    }

    /// Use an explicit config file; its directory becomes the root
    pub fn from_config_file(config_file: &Path) -> Result<Self> {
        let config_file = if config_file.is_absolute() {
            config_file.to_path_buf()
        } else {
            std::env::current_dir()?.join(config_file)
        };

        let root = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { root, config_file })
    }

    /// Resolve from an optional `--config` override
    pub fn resolve(config_override: Option<&Path>) -> Result<Self> {
        match config_override {
            Some(path) => Self::from_config_file(path),
            None => Self::new(),
        }
    }

    /// Anchor a possibly-relative path at the root
    pub fn anchor(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Check if the config file exists
    pub fn config_exists(&self) -> bool {
        self.config_file.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_file_uses_parent_as_root() {
        let paths = Paths::from_config_file(Path::new("/srv/site/reposite.toml")).unwrap();
        assert_eq!(paths.root, PathBuf::from("/srv/site"));
        assert_eq!(paths.config_file, PathBuf::from("/srv/site/reposite.toml"));
    }

    #[test]
    fn test_anchor_keeps_absolute_paths() {
        let paths = Paths::from_config_file(Path::new("/srv/site/reposite.toml")).unwrap();
        assert_eq!(paths.anchor(Path::new("/tmp/out.html")), PathBuf::from("/tmp/out.html"));
        assert_eq!(
            paths.anchor(Path::new("languages")),
            PathBuf::from("/srv/site/languages")
        );
    }

    #[test]
    fn test_new_uses_default_file_name() {
        let paths = Paths::new().unwrap();
        assert!(paths.config_file.ends_with(CONFIG_FILE_NAME));
    }
}
