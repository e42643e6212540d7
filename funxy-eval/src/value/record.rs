//! Record and DataInstance values.

use super::core::Value;
use std::sync::Arc;

/// A field map keyed by name, stored in key-sorted order for canonical
/// display and O(log n) lookup. May carry a nominal type name.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    pub type_name: Option<Arc<str>>,
    /// Invariant: sorted by field name.
    fields: Arc<Vec<(Arc<str>, Value)>>,
}

impl RecordValue {
    pub fn new(type_name: Option<Arc<str>>, mut fields: Vec<(Arc<str>, Value)>) -> Self {
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            type_name,
            fields: Arc::new(fields),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        // Sorted, so a binary search would do; linear is fine at the field
        // counts records actually carry and keeps this readable.
        self.fields.iter().find(|(k, _)| k.as_ref() == name).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn with_field(&self, name: Arc<str>, value: Value) -> Self {
        let mut fields: Vec<_> = self.fields.iter().cloned().collect();
        if let Some(slot) = fields.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            fields.push((name, value));
        }
        Self::new(self.type_name.clone(), fields)
    }
}

/// A tagged algebraic data value: constructor name, ordered field list, and
/// owning type name. A zero-field constructor is still distinct per
/// constructor name.
#[derive(Debug, Clone, PartialEq)]
pub struct DataInstanceValue {
    pub type_name: Arc<str>,
    pub constructor: Arc<str>,
    pub fields: Arc<Vec<Value>>,
    pub type_args: Arc<Vec<String>>,
}

impl DataInstanceValue {
    pub fn new(type_name: Arc<str>, constructor: Arc<str>, fields: Vec<Value>) -> Self {
        Self {
            type_name,
            constructor,
            fields: Arc::new(fields),
            type_args: Arc::new(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorValue {
    pub type_name: Arc<str>,
    pub name: Arc<str>,
    pub arity: usize,
}
