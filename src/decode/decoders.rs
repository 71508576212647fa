//! Deserializer and built-in converters

use super::dates;
use super::types::{ConverterSet, JsonConverter};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;

// ============================================================================
// JSON Deserializer
// ============================================================================

/// Converts raw response text into JSON trees or typed values
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDeserializer;

impl JsonDeserializer {
    /// Create a new deserializer
    pub fn new() -> Self {
        Self
    }

    /// Parse response text into a JSON tree
    pub fn parse_tree(&self, text: &str) -> Result<Value> {
        Ok(serde_json::from_str(text)?)
    }

    /// Deserialize response text into `T`, applying `converters` first
    pub fn deserialize<T: DeserializeOwned>(&self, text: &str, converters: &ConverterSet) -> Result<T> {
        if converters.is_empty() {
            return Ok(serde_json::from_str(text)?);
        }

        let tree = converters.apply(self.parse_tree(text)?)?;
        Ok(serde_json::from_value(tree)?)
    }

    /// Convert a JSON tree node into `T`
    pub fn convert<T: DeserializeOwned>(&self, node: &Value) -> Result<T> {
        Ok(T::deserialize(node)?)
    }
}

// ============================================================================
// Date Converter
// ============================================================================

/// Rewrites wire-format dates on the named fields to RFC 3339 UTC
#[derive(Debug, Clone)]
pub struct TwitterDateConverter {
    fields: HashSet<String>,
}

impl TwitterDateConverter {
    /// Create a converter for the given field names
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl JsonConverter for TwitterDateConverter {
    fn applies_to(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    fn convert(&self, field: &str, value: Value) -> Result<Value> {
        match value {
            Value::String(raw) => dates::parse(&raw)
                .map(|dt| Value::String(dates::to_rfc3339(&dt)))
                .ok_or_else(|| Error::conversion(field, format!("unrecognized date '{raw}'"))),
            Value::Null => Ok(Value::Null),
            other => Err(Error::conversion(
                field,
                format!("expected a date string, got {other}"),
            )),
        }
    }
}
