//! Typed forms of a package.json and of its scripts
//!
//! This module provides:
//! - `RawPackageJson`, the validated document with required and optional fields
//! - `Script`, one named command tagged with its section header
//! - `ScriptCheck`, a declarative expectation about a script

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Open-ended string to string map whose key order follows the document
pub type StringMap = IndexMap<String, String>;

// =============================================================================
// DOCUMENT
// =============================================================================

/// A package.json that satisfies the required shape for a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPackageJson {
    pub name: String,
    pub version: String,
    pub description: String,
    pub homepage: String,
    /// Bug reporting URL
    pub bugs: String,
    pub license: String,
    pub author: String,
    pub repository: Repository,
    /// Entry path of the package
    pub main: String,
    pub private: bool,
    pub engines: StringMap,
    pub module_system: ModuleSystem,
    pub scripts: StringMap,
    pub dependencies: StringMap,
    pub dev_dependencies: StringMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Local port the server runs on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributors: Option<Vec<String>>,
    /// Files included when publishing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<StringMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub man: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_dependencies: Option<StringMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_dependencies: Option<StringMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_checks: Option<Vec<String>>,

    /// Fields outside the schema, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Usually `git`
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The module system a package is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleSystem {
    #[serde(rename = "es6")]
    Es6,
    #[serde(rename = "commonJs")]
    CommonJs,
    #[serde(rename = "typescript")]
    Typescript,
}

impl ModuleSystem {
    pub const ALL: [ModuleSystem; 3] = [
        ModuleSystem::Es6,
        ModuleSystem::CommonJs,
        ModuleSystem::Typescript,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ModuleSystem::Es6 => "es6",
            ModuleSystem::CommonJs => "commonJs",
            ModuleSystem::Typescript => "typescript",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

// =============================================================================
// SCRIPTS
// =============================================================================

/// A script together with the section header it was declared under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// The command name, i.e. the key in `scripts`
    pub name: Arc<str>,
    /// Text of the nearest preceding section marker, empty if none
    pub header: Arc<str>,
    /// The command that is run
    pub value: Arc<str>,
}

/// An expectation that a script exists under a header, optionally with a given command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptCheck {
    pub name: String,
    #[serde(default)]
    pub header: String,
    /// Exact command expected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// The command must contain this string; wins over `value` when matching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_includes: Option<String>,
    /// Insert the script right after this one when it is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl ScriptCheck {
    pub fn new(name: impl Into<String>, header: impl Into<String>) -> Self {
        ScriptCheck {
            name: name.into(),
            header: header.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_value_includes(mut self, needle: impl Into<String>) -> Self {
        self.value_includes = Some(needle.into());
        self
    }

    pub fn after(mut self, anchor: impl Into<String>) -> Self {
        self.after = Some(anchor.into());
        self
    }

    /// The exact-value expectation, ignoring empty strings
    pub(crate) fn expected_value(&self) -> Option<&str> {
        non_empty(self.value.as_deref())
    }

    /// The substring expectation, ignoring empty strings
    pub(crate) fn expected_substring(&self) -> Option<&str> {
        non_empty(self.value_includes.as_deref())
    }

    pub(crate) fn anchor(&self) -> Option<&str> {
        non_empty(self.after.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_system_names() {
        assert_eq!(ModuleSystem::parse("es6"), Some(ModuleSystem::Es6));
        assert_eq!(ModuleSystem::parse("commonJs"), Some(ModuleSystem::CommonJs));
        assert_eq!(ModuleSystem::parse("typescript"), Some(ModuleSystem::Typescript));
        assert_eq!(ModuleSystem::parse("amd"), None);
        assert_eq!(ModuleSystem::parse("commonjs"), None);
    }

    #[test]
    fn test_script_check_from_json() -> anyhow::Result<()> {
        let check: ScriptCheck = serde_json::from_str(
            r#"{"name": "lint", "header": "Quality", "valueIncludes": "eslint", "after": "build"}"#,
        )?;

        assert_eq!(
            check,
            ScriptCheck::new("lint", "Quality")
                .with_value_includes("eslint")
                .after("build")
        );
        Ok(())
    }

    #[test]
    fn test_empty_expectations_are_ignored() {
        let check = ScriptCheck::new("build", "")
            .with_value("")
            .with_value_includes("")
            .after("");
        assert_eq!(check.expected_value(), None);
        assert_eq!(check.expected_substring(), None);
        assert_eq!(check.anchor(), None);
    }
}
