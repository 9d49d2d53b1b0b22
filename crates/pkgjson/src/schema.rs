//! Runtime shape check for package.json documents
//!
//! The schema is a static table of [`FieldSpec`]s. Validation walks the whole
//! document and collects every failing field path instead of stopping at the
//! first one, so callers can report all problems at once.

use crate::errors::{FieldFailure, Result, ValidationError};
use crate::types::{ModuleSystem, RawPackageJson};
use serde_json::Value;
use smallvec::SmallVec;

/// Shape a field value must have
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    String,
    Boolean,
    Number,
    StringList,
    /// Object with arbitrary keys and string values
    StringMap,
    /// String restricted to a fixed set of values
    OneOf(&'static [&'static str]),
    /// Nested object with its own field table
    Object(&'static [FieldSpec]),
}

impl FieldType {
    fn describe(self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Number => "number".to_string(),
            FieldType::StringList => "list of strings".to_string(),
            FieldType::StringMap => "map of strings".to_string(),
            FieldType::OneOf(options) => {
                let quoted: Vec<String> = options.iter().map(|o| format!("\"{}\"", o)).collect();
                format!("one of {}", quoted.join(" | "))
            }
            FieldType::Object(_) => "object".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

const fn required(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        field_type,
        required: true,
    }
}

const fn optional(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        field_type,
        required: false,
    }
}

const MODULE_SYSTEMS: &[&str] = &[
    ModuleSystem::Es6.as_str(),
    ModuleSystem::CommonJs.as_str(),
    ModuleSystem::Typescript.as_str(),
];

pub const REPOSITORY_FIELDS: &[FieldSpec] = &[
    required("type", FieldType::String),
    required("url", FieldType::String),
];

/// Fields of a package.json, required ones first
pub const PACKAGE_JSON_FIELDS: &[FieldSpec] = &[
    required("name", FieldType::String),
    required("version", FieldType::String),
    required("description", FieldType::String),
    required("homepage", FieldType::String),
    required("bugs", FieldType::String),
    required("license", FieldType::String),
    required("author", FieldType::String),
    required("repository", FieldType::Object(REPOSITORY_FIELDS)),
    required("main", FieldType::String),
    required("private", FieldType::Boolean),
    required("engines", FieldType::StringMap),
    required("moduleSystem", FieldType::OneOf(MODULE_SYSTEMS)),
    required("scripts", FieldType::StringMap),
    required("dependencies", FieldType::StringMap),
    required("devDependencies", FieldType::StringMap),
    optional("keywords", FieldType::StringList),
    optional("port", FieldType::Number),
    optional("contributors", FieldType::StringList),
    optional("files", FieldType::StringList),
    optional("bin", FieldType::StringMap),
    optional("man", FieldType::String),
    optional("optionalDependencies", FieldType::StringMap),
    optional("peerDependencies", FieldType::StringMap),
    optional("optionalChecks", FieldType::StringList),
];

type FieldPath<'a> = SmallVec<[&'a str; 4]>;

/// Check a parsed document against [`PACKAGE_JSON_FIELDS`]
pub fn validate(value: &Value) -> std::result::Result<(), ValidationError> {
    let mut failures = Vec::new();
    let mut path = FieldPath::new();
    check_fields(PACKAGE_JSON_FIELDS, value, &mut path, &mut failures);

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(failures))
    }
}

/// Parse and validate package.json text into its typed form
pub fn decode(text: &str) -> Result<RawPackageJson> {
    let value: Value = serde_json::from_str(text)?;
    decode_value(value)
}

/// Validate an already parsed document and convert it into its typed form
pub fn decode_value(value: Value) -> Result<RawPackageJson> {
    validate(&value)?;
    from_validated(value)
}

/// Convert a document that already passed [`validate`]
pub(crate) fn from_validated(value: Value) -> Result<RawPackageJson> {
    Ok(serde_json::from_value(value)?)
}

/// JSON type name used in failure reports
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_fields<'a>(
    fields: &'static [FieldSpec],
    value: &'a Value,
    path: &mut FieldPath<'a>,
    failures: &mut Vec<FieldFailure>,
) {
    let Some(object) = value.as_object() else {
        failures.push(failure(path, "object".to_string(), json_kind(value)));
        return;
    };

    for field in fields {
        path.push(field.name);
        match object.get(field.name) {
            Some(field_value) => check_type(field.field_type, field_value, path, failures),
            None if field.required => {
                failures.push(failure(path, field.field_type.describe(), "missing"));
            }
            None => {}
        }
        path.pop();
    }
}

fn check_type<'a>(
    field_type: FieldType,
    value: &'a Value,
    path: &mut FieldPath<'a>,
    failures: &mut Vec<FieldFailure>,
) {
    let matches = match field_type {
        FieldType::String => value.is_string(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Number => value.is_number(),
        FieldType::OneOf(options) => value.as_str().is_some_and(|s| options.contains(&s)),
        FieldType::Object(fields) => {
            check_fields(fields, value, path, failures);
            return;
        }
        FieldType::StringList => match value.as_array() {
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        let index = idx.to_string();
                        let mut item_path: Vec<&str> = path.iter().copied().collect();
                        item_path.push(&index);
                        failures.push(failure(&item_path, "string".to_string(), json_kind(item)));
                    }
                }
                true
            }
            None => false,
        },
        FieldType::StringMap => match value.as_object() {
            Some(entries) => {
                for (key, entry) in entries {
                    if !entry.is_string() {
                        path.push(key);
                        failures.push(failure(path, "string".to_string(), json_kind(entry)));
                        path.pop();
                    }
                }
                true
            }
            None => false,
        },
    };

    if !matches {
        failures.push(failure(path, field_type.describe(), json_kind(value)));
    }
}

fn failure(path: &[&str], expected: String, found: &'static str) -> FieldFailure {
    FieldFailure {
        path: path.join("."),
        expected,
        found,
    }
}
