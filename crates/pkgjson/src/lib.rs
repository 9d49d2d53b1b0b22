//! Package.json validation and script management
//!
//! This crate checks that a repository's package.json has the shape an
//! organization requires, and inspects or rewrites its scripts while keeping
//! the section headers encoded as `"####### Header"` marker keys.
//!
//! ```no_run
//! use pkgjson::{PackageJson, ScriptCheck};
//!
//! # fn main() -> pkgjson::Result<()> {
//! let mut pkg = PackageJson::load("path/to/repo")?;
//! let lint = ScriptCheck::new("lint", "Quality")
//!     .with_value("eslint .")
//!     .after("build");
//! if !pkg.has_scripts(std::slice::from_ref(&lint)) {
//!     pkg.set_scripts(&[lint])?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod errors;
pub mod fs;
pub mod package_json;
pub mod schema;
pub mod scripts;
pub mod types;

pub use config::{LoadOptions, PACKAGE_JSON};
pub use errors::{FieldFailure, ManifestError, Result, ValidationError};
pub use fs::{FileSystem, LocalFs};
pub use package_json::PackageJson;
pub use scripts::{ScriptIndex, SECTION_MARKER};
pub use types::{ModuleSystem, RawPackageJson, Repository, Script, ScriptCheck, StringMap};
