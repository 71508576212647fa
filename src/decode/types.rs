//! Converter types and traits
//!
//! Defines the custom conversion abstraction applied during deserialization.

use crate::error::Result;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A custom conversion rule for individual object fields
pub trait JsonConverter: Send + Sync {
    /// Check if this converter handles the field with this name
    fn applies_to(&self, field: &str) -> bool;

    /// Convert the value of a matching field
    fn convert(&self, field: &str, value: Value) -> Result<Value>;
}

/// Ordered set of converters, cheap to clone
#[derive(Clone, Default)]
pub struct ConverterSet {
    converters: Vec<Arc<dyn JsonConverter>>,
}

impl ConverterSet {
    /// Create an empty converter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a converter
    #[must_use]
    pub fn with(mut self, converter: impl JsonConverter + 'static) -> Self {
        self.converters.push(Arc::new(converter));
        self
    }

    /// Converters used for cursor page responses
    pub fn cursor_defaults() -> Self {
        Self::new().with(super::TwitterDateConverter::new(["created_at"]))
    }

    /// Check if the set has no converters
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Number of converters
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Apply every converter to every matching field of the tree, depth first
    pub fn apply(&self, value: Value) -> Result<Value> {
        if self.is_empty() {
            return Ok(value);
        }

        match value {
            Value::Object(map) => {
                let mut converted = serde_json::Map::with_capacity(map.len());
                for (key, child) in map {
                    let mut child = self.apply(child)?;
                    for converter in &self.converters {
                        if converter.applies_to(&key) {
                            child = converter.convert(&key, child)?;
                        }
                    }
                    converted.insert(key, child);
                }
                Ok(Value::Object(converted))
            }
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.apply(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Ok(other),
        }
    }
}

impl fmt::Debug for ConverterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterSet")
            .field("len", &self.converters.len())
            .finish()
    }
}
