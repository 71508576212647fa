//! Result extraction from JSON trees
//!
//! Navigates a path of object keys and materializes the located value as a
//! typed object. A missing key is an expected outcome of optional response
//! fields and yields `Ok(None)`, as does an explicit `null`; a value of the
//! wrong shape is a deserialization error.

use crate::decode::JsonDeserializer;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Locate the value at `path`, or `None` if any key is absent.
///
/// An empty path locates the whole tree. Walking into anything other than
/// an object counts as an absent key.
pub fn locate<'a, S: AsRef<str>>(tree: &'a Value, path: &[S]) -> Option<&'a Value> {
    path.iter().try_fold(tree, |current, key| match current {
        Value::Object(map) => map.get(key.as_ref()),
        _ => None,
    })
}

/// Extract the value at `path` as `T`.
///
/// An absent key and an explicit `null` both yield `Ok(None)`.
pub fn extract<T, S>(tree: &Value, path: &[S]) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: AsRef<str>,
{
    match locate(tree, path) {
        None | Some(Value::Null) => Ok(None),
        Some(node) => JsonDeserializer::new().convert(node).map(Some),
    }
}
