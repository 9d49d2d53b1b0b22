//! Path based mutation of the untyped document tree
//!
//! Writes go straight into the `serde_json::Value` the controller owns. The
//! schema is not re-run afterwards, so a caller can leave the document in a
//! shape that would no longer validate.

use crate::errors::{ManifestError, Result};
use serde_json::{Map, Value};

/// Set `value` at `path`, creating intermediate containers that are absent or `null`
///
/// A created container is a list when the key that descends into it is a
/// list index, otherwise an object. A list index may overwrite an existing
/// item or equal the length to append; anything past the end is rejected.
pub fn set_path<S: AsRef<str>>(root: &mut Value, path: &[S], value: Value) -> Result<()> {
    let Some((last, parents)) = path.split_last() else {
        return Err(invalid(path, "path is empty"));
    };

    let mut current = root;
    for (depth, key) in parents.iter().enumerate() {
        let next_key = path[depth + 1].as_ref();
        let slot = child_slot(current, key.as_ref(), path)?;
        if slot.is_null() {
            *slot = empty_container_for(next_key);
        } else if !slot.is_object() && !slot.is_array() {
            return Err(invalid(
                path,
                &format!("'{}' holds a scalar and cannot be descended into", key.as_ref()),
            ));
        }
        current = slot;
    }

    *child_slot(current, last.as_ref(), path)? = value;
    Ok(())
}

/// Read the value at `path`, if every key along it exists
pub fn get_path<'a, S: AsRef<str>>(root: &'a Value, path: &[S]) -> Option<&'a Value> {
    path.iter().try_fold(root, |current, key| match current {
        Value::Object(map) => map.get(key.as_ref()),
        Value::Array(items) => list_index(key.as_ref()).and_then(|idx| items.get(idx)),
        _ => None,
    })
}

/// Mutable slot for `key` inside `container`, inserted as `null` when absent
fn child_slot<'a, S: AsRef<str>>(
    container: &'a mut Value,
    key: &str,
    path: &[S],
) -> Result<&'a mut Value> {
    match container {
        Value::Object(map) => Ok(map.entry(key.to_string()).or_insert(Value::Null)),
        Value::Array(items) => {
            let Some(idx) = list_index(key) else {
                return Err(invalid(path, &format!("'{}' is not a list index", key)));
            };
            if idx > items.len() {
                return Err(invalid(
                    path,
                    &format!("index {} is past the end of a list of {}", idx, items.len()),
                ));
            }
            if idx == items.len() {
                items.push(Value::Null);
            }
            Ok(&mut items[idx])
        }
        _ => Err(invalid(path, &format!("cannot set '{}' on a scalar", key))),
    }
}

fn empty_container_for(next_key: &str) -> Value {
    if list_index(next_key).is_some() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn list_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

fn invalid<S: AsRef<str>>(path: &[S], reason: &str) -> ManifestError {
    let joined: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
    ManifestError::InvalidPath {
        path: joined.join("."),
        reason: reason.to_string(),
    }
}
