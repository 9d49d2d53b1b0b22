//! Grouped view over the `scripts` section
//!
//! Scripts are grouped by section markers: entries whose key contains
//! [`SECTION_MARKER`]. A marker only sets the header for the entries that
//! follow it and never shows up as a script itself.
//!
//! ```json
//! "scripts": {
//!   "####### Build": "",
//!   "build": "tsc",
//!   "####### Test": "",
//!   "test": "mocha"
//! }
//! ```

use crate::types::{Script, ScriptCheck};
use ahash::AHashMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Substring that turns a script key into a section marker
pub const SECTION_MARKER: &str = "####### ";

const MARKER_SPLIT: &str = "#######";

/// Header text carried by a marker key, `None` for regular scripts
pub fn marker_header(name: &str) -> Option<&str> {
    if !name.contains(SECTION_MARKER) {
        return None;
    }
    name.split(MARKER_SPLIT).nth(1).map(str::trim)
}

/// Scripts in declaration order, each tagged with its header
pub fn list_scripts(scripts: &Map<String, Value>) -> Vec<Script> {
    let mut listed = Vec::with_capacity(scripts.len());
    let mut header: Arc<str> = Arc::from("");

    for (name, value) in scripts {
        if let Some(text) = marker_header(name) {
            header = Arc::from(text);
            continue;
        }

        let Some(command) = value.as_str() else {
            warn!("Skipping script '{}' with non-string value", name);
            continue;
        };

        listed.push(Script {
            name: Arc::from(name.as_str()),
            header: header.clone(),
            value: Arc::from(command),
        });
    }

    listed
}

// =============================================================================
// SCRIPT INDEX
// =============================================================================

/// Name lookup over the listed scripts, rebuilt wholesale and never patched
#[derive(Debug, Clone, Default)]
pub struct ScriptIndex {
    scripts: Vec<Script>,
    index: AHashMap<Arc<str>, usize>,
}

impl ScriptIndex {
    pub fn build(scripts: &Map<String, Value>) -> Self {
        let scripts = list_scripts(scripts);
        let index = scripts
            .iter()
            .enumerate()
            .map(|(idx, script)| (script.name.clone(), idx))
            .collect();
        debug!("Indexed {} scripts", scripts.len());
        ScriptIndex { scripts, index }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Script> {
        self.index.get(name).map(|&idx| &self.scripts[idx])
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Checks that are not satisfied by the indexed scripts
    pub fn missing<'c>(&self, checks: &'c [ScriptCheck]) -> Vec<&'c ScriptCheck> {
        checks.iter().filter(|check| !self.satisfies(check)).collect()
    }

    pub fn has_all(&self, checks: &[ScriptCheck]) -> bool {
        checks.iter().all(|check| self.satisfies(check))
    }

    fn satisfies(&self, check: &ScriptCheck) -> bool {
        let Some(script) = self.get(&check.name) else {
            return false;
        };
        if *script.header != *check.header {
            return false;
        }
        match (check.expected_substring(), check.expected_value()) {
            (Some(needle), _) => script.value.contains(needle),
            (None, Some(expected)) => *script.value == *expected,
            (None, None) => true,
        }
    }
}

/// Upsert the checked scripts into `scripts`
///
/// An existing script gets its command overwritten where it stands. A missing
/// one is inserted right after the `after` anchor. Checks without a value,
/// and missing scripts without an anchor present in the map, are skipped.
/// Returns how many checks changed the map.
pub fn apply_checks(scripts: &mut Map<String, Value>, checks: &[ScriptCheck]) -> usize {
    let mut applied = 0;

    for check in checks {
        let Some(value) = check.expected_value() else {
            debug!("Skipping script '{}': no value to set", check.name);
            continue;
        };

        if let Some(existing) = scripts.get_mut(&check.name) {
            *existing = Value::String(value.to_string());
            applied += 1;
            continue;
        }

        let Some(anchor) = check.anchor().filter(|a| scripts.contains_key(*a)) else {
            debug!("Skipping script '{}': no anchor to insert after", check.name);
            continue;
        };

        let previous = std::mem::take(scripts);
        for (key, old_value) in previous {
            let is_anchor = key == anchor;
            scripts.insert(key, old_value);
            if is_anchor {
                scripts.insert(check.name.clone(), Value::String(value.to_string()));
            }
        }
        applied += 1;
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scripts(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn names(map: &Map<String, Value>) -> Vec<&str> {
        map.keys().map(String::as_str).collect()
    }

    fn grouped() -> Map<String, Value> {
        scripts(json!({
            "####### Build": "",
            "build": "tsc",
            "####### Test": "",
            "test": "mocha",
            "test:watch": "mocha --watch"
        }))
    }

    #[test]
    fn test_marker_header() {
        assert_eq!(marker_header("####### Build"), Some("Build"));
        assert_eq!(marker_header("#######   Spaced Out  "), Some("Spaced Out"));
        assert_eq!(marker_header("####### Build ####### notes"), Some("Build"));
        assert_eq!(marker_header("####### Release #######"), Some("Release"));
        assert_eq!(marker_header("## Build"), None);
        assert_eq!(marker_header("#######Build"), None);
        assert_eq!(marker_header("build"), None);
    }

    #[test]
    fn test_list_assigns_nearest_header() {
        let listed = list_scripts(&grouped());
        let flat: Vec<(&str, &str, &str)> = listed
            .iter()
            .map(|s| (&*s.name, &*s.header, &*s.value))
            .collect();

        assert_eq!(
            flat,
            vec![
                ("build", "Build", "tsc"),
                ("test", "Test", "mocha"),
                ("test:watch", "Test", "mocha --watch"),
            ]
        );
    }

    #[test]
    fn test_scripts_before_any_marker_have_no_header() {
        let listed = list_scripts(&scripts(json!({
            "start": "node .",
            "####### Build": "",
            "build": "tsc"
        })));
        assert_eq!(&*listed[0].header, "");
        assert_eq!(&*listed[1].header, "Build");
    }

    #[test]
    fn test_non_string_values_are_skipped() {
        let listed = list_scripts(&scripts(json!({ "build": "tsc", "broken": 3 })));
        assert_eq!(listed.len(), 1);
        assert_eq!(&*listed[0].name, "build");
    }

    #[test]
    fn test_index_lookup() {
        let index = ScriptIndex::build(&grouped());
        assert_eq!(index.len(), 3);
        assert!(index.get("test").is_some_and(|s| &*s.header == "Test"));
        assert!(index.get("####### Build").is_none());
    }

    #[test]
    fn test_missing_script() {
        let index = ScriptIndex::build(&grouped());
        let checks = vec![ScriptCheck::new("lint", "Quality").with_value("eslint .")];

        assert_eq!(index.missing(&checks), vec![&checks[0]]);
        assert!(!index.has_all(&checks));
    }

    #[test]
    fn test_wrong_header_is_missing() {
        let index = ScriptIndex::build(&grouped());
        let checks = vec![ScriptCheck::new("build", "Test")];
        assert_eq!(index.missing(&checks).len(), 1);
    }

    #[test]
    fn test_value_checks() {
        let index = ScriptIndex::build(&grouped());

        assert!(index.has_all(&[ScriptCheck::new("build", "Build")]));
        assert!(index.has_all(&[ScriptCheck::new("build", "Build").with_value("tsc")]));
        assert!(!index.has_all(&[ScriptCheck::new("build", "Build").with_value("tsc -b")]));
        assert!(index.has_all(&[ScriptCheck::new("test:watch", "Test").with_value_includes("--watch")]));
    }

    #[test]
    fn test_substring_wins_over_value() {
        let index = ScriptIndex::build(&grouped());
        let check = ScriptCheck::new("test:watch", "Test")
            .with_value("something else")
            .with_value_includes("mocha");
        assert!(index.has_all(&[check]));

        let check = ScriptCheck::new("test:watch", "Test")
            .with_value("mocha --watch")
            .with_value_includes("jest");
        assert!(!index.has_all(&[check]));
    }

    #[test]
    fn test_apply_inserts_after_anchor() {
        let mut map = scripts(json!({ "build": "tsc", "test": "mocha" }));
        let applied = apply_checks(&mut map, &[ScriptCheck::new("new", "").with_value("x").after("build")]);

        assert_eq!(applied, 1);
        assert_eq!(names(&map), vec!["build", "new", "test"]);
        assert_eq!(map["new"], "x");
    }

    #[test]
    fn test_apply_overwrites_in_place() {
        let mut map = scripts(json!({ "build": "tsc", "test": "mocha" }));
        apply_checks(&mut map, &[ScriptCheck::new("build", "").with_value("tsc -b").after("test")]);

        assert_eq!(names(&map), vec!["build", "test"]);
        assert_eq!(map["build"], "tsc -b");
    }

    #[test]
    fn test_apply_without_anchor_is_skipped() {
        let original = scripts(json!({ "build": "tsc", "test": "mocha" }));

        let mut map = original.clone();
        let applied = apply_checks(&mut map, &[ScriptCheck::new("new", "").with_value("x")]);
        assert_eq!(applied, 0);
        assert_eq!(map, original);

        let applied = apply_checks(&mut map, &[ScriptCheck::new("new", "").with_value("x").after("lint")]);
        assert_eq!(applied, 0);
        assert_eq!(names(&map), vec!["build", "test"]);
    }

    #[test]
    fn test_apply_without_value_is_skipped() {
        let mut map = scripts(json!({ "build": "tsc" }));
        let applied = apply_checks(&mut map, &[ScriptCheck::new("build", "").with_value_includes("tsc")]);
        assert_eq!(applied, 0);
        assert_eq!(map["build"], "tsc");
    }

    #[test]
    fn test_apply_chains_inserts() {
        let mut map = grouped();
        apply_checks(
            &mut map,
            &[
                ScriptCheck::new("build:watch", "Build").with_value("tsc -w").after("build"),
                ScriptCheck::new("build:clean", "Build").with_value("rm -rf build").after("build:watch"),
            ],
        );

        let index = ScriptIndex::build(&map);
        let order: Vec<&str> = index.scripts().iter().map(|s| &*s.name).collect();
        assert_eq!(order, vec!["build", "build:watch", "build:clean", "test", "test:watch"]);
        assert!(index.get("build:clean").is_some_and(|s| &*s.header == "Build"));
    }
}
