//! Package.json controller - loading, querying, and writing back
//!
//! [`PackageJson`] owns the live document and the script index derived from
//! it. Every mutation goes through [`PackageJson::write`], which rebuilds the
//! index before persisting so the index and the file agree afterwards.

use crate::config::LoadOptions;
use crate::document;
use crate::errors::{ManifestError, Result};
use crate::fs::{FileSystem, LocalFs};
use crate::schema;
use crate::scripts::{self, ScriptIndex};
use crate::types::{RawPackageJson, Script, ScriptCheck};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Read and modify a package.json file
#[derive(Debug)]
pub struct PackageJson<F: FileSystem = LocalFs> {
    path: PathBuf,
    value: Value,
    script_index: ScriptIndex,
    fs: F,
}

impl PackageJson<LocalFs> {
    /// Open and validate the package.json at `path`, a file or the folder holding it
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(LoadOptions::new(path))
    }

    pub fn open(options: LoadOptions) -> Result<Self> {
        Self::open_with(options, LocalFs)
    }

    /// Decode package.json text into its typed form, logging each invalid field
    pub fn decode(text: &str) -> Result<RawPackageJson> {
        let value: Value = serde_json::from_str(text)?;
        check_schema(&value)?;
        schema::from_validated(value)
    }
}

impl<F: FileSystem> PackageJson<F> {
    /// Open a package.json through a custom file system
    pub fn open_with(options: LoadOptions, fs: F) -> Result<Self> {
        let path = options.resolved_path();
        if !fs.exists(&path) {
            return Err(ManifestError::NotFound(path));
        }

        debug!("Reading package.json from: {:?}", path);
        let text = fs.read_text(&path)?;
        let value: Value = serde_json::from_str(&text)?;

        if options.validate {
            check_schema(&value)?;
        } else {
            debug!("Skipping package.json validation for: {:?}", path);
        }

        let script_index = index_scripts(&value);
        Ok(PackageJson {
            path,
            value,
            script_index,
            fs,
        })
    }

    /// Resolved path of the package.json file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The live, untyped document
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Direct access to the document
    ///
    /// Changes made here are not reflected in [`Self::script`] or the
    /// `*_scripts` queries until [`Self::rebuild_index`] or [`Self::write`].
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Typed view of the live document; fails if earlier edits broke the schema
    pub fn document(&self) -> Result<RawPackageJson> {
        schema::decode_value(self.value.clone())
    }

    /// Scripts with their section headers, in declaration order
    pub fn list_scripts(&self) -> Vec<Script> {
        self.value
            .get("scripts")
            .and_then(Value::as_object)
            .map(scripts::list_scripts)
            .unwrap_or_default()
    }

    pub fn script(&self, name: &str) -> Option<&Script> {
        self.script_index.get(name)
    }

    pub fn script_index(&self) -> &ScriptIndex {
        &self.script_index
    }

    pub fn rebuild_index(&mut self) {
        self.script_index = index_scripts(&self.value);
    }

    /// True if every check is satisfied
    pub fn has_scripts(&self, checks: &[ScriptCheck]) -> bool {
        self.script_index.has_all(checks)
    }

    /// The checks that are not satisfied by the current scripts
    pub fn missing_scripts<'c>(&self, checks: &'c [ScriptCheck]) -> Vec<&'c ScriptCheck> {
        self.script_index.missing(checks)
    }

    /// Overwrite or insert the checked scripts, then write to disk
    pub fn set_scripts(&mut self, checks: &[ScriptCheck]) -> Result<()> {
        match self.value.get_mut("scripts").and_then(Value::as_object_mut) {
            Some(script_map) => {
                let applied = scripts::apply_checks(script_map, checks);
                debug!("Applied {} of {} script checks", applied, checks.len());
            }
            None => debug!("No scripts section, skipping {} script checks", checks.len()),
        }
        self.write()
    }

    /// Set a nested value, e.g. `["devDependencies", "typescript"]`, then write to disk
    pub fn set_path<S, T>(&mut self, path: &[S], value: T) -> Result<&Value>
    where
        S: AsRef<str>,
        T: Serialize,
    {
        let value = serde_json::to_value(value)?;
        document::set_path(&mut self.value, path, value)?;
        self.write()?;
        Ok(&self.value)
    }

    /// Rebuild the script index and write the document with 2-space indentation
    pub fn write(&mut self) -> Result<()> {
        self.rebuild_index();

        let mut text = serde_json::to_string_pretty(&self.value)?;
        text.push('\n');
        self.fs.write_text(&self.path, &text)?;

        info!("package.json written to: {:?}", self.path);
        Ok(())
    }
}

fn index_scripts(value: &Value) -> ScriptIndex {
    value
        .get("scripts")
        .and_then(Value::as_object)
        .map(ScriptIndex::build)
        .unwrap_or_default()
}

/// Validate against the schema, logging every invalid field before failing
fn check_schema(value: &Value) -> Result<()> {
    schema::validate(value).map_err(|err| {
        for failure in err.failures() {
            error!("Invalid package.json field {}", failure);
        }
        ManifestError::from(err)
    })
}
