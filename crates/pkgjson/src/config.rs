//! Options for opening a package.json

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canonical manifest file name
pub const PACKAGE_JSON: &str = "package.json";

/// Where to find the package.json and how strictly to load it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Path to the package.json itself or to the folder holding it
    pub path: PathBuf,

    /// Type-check the document on load
    #[serde(default = "default_validate")]
    pub validate: bool,

    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_validate() -> bool {
    true
}

fn default_file_name() -> String {
    PACKAGE_JSON.to_string()
}

impl LoadOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LoadOptions {
            path: path.into(),
            validate: default_validate(),
            file_name: default_file_name(),
        }
    }

    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// The manifest file path, joining `file_name` when `path` does not already end with it
    pub fn resolved_path(&self) -> PathBuf {
        resolve_manifest_path(&self.path, &self.file_name)
    }
}

pub fn resolve_manifest_path(path: &Path, file_name: &str) -> PathBuf {
    if path.to_string_lossy().ends_with(file_name) {
        path.to_path_buf()
    } else {
        path.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_directory() {
        let options = LoadOptions::new("/repos/widgets");
        assert_eq!(options.resolved_path(), PathBuf::from("/repos/widgets/package.json"));
    }

    #[test]
    fn test_resolve_file() {
        let options = LoadOptions::new("/repos/widgets/package.json");
        assert_eq!(options.resolved_path(), PathBuf::from("/repos/widgets/package.json"));
    }

    #[test]
    fn test_custom_file_name() {
        let options = LoadOptions::new("fixtures").file_name("manifest.json");
        assert_eq!(options.resolved_path(), PathBuf::from("fixtures").join("manifest.json"));
    }

    #[test]
    fn test_defaults_from_json() -> anyhow::Result<()> {
        let options: LoadOptions = serde_json::from_str(r#"{"path": "apps/web"}"#)?;
        assert!(options.validate);
        assert_eq!(options.file_name, PACKAGE_JSON);

        let options: LoadOptions = serde_json::from_str(r#"{"path": "apps/web", "validate": false}"#)?;
        assert!(!options.validate);
        Ok(())
    }
}
