//! Field discovery for arrays of JSON documents.
//!
//! The field set comes from the keys of the **first** document only, in the
//! order they appear there. Keys that only occur in later documents cannot be
//! reached by name or position; keys missing from a later document read as
//! null.

use std::collections::HashMap;

use serde_json::{Map, Value as Json};

use super::FieldDescriptor;

/// Field layout of a document array.
#[derive(Debug, Clone, Default)]
pub struct DocumentFields {
    descriptors: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl DocumentFields {
    pub fn discover(documents: &[Map<String, Json>]) -> Self {
        let Some(first) = documents.first() else {
            return Self::default();
        };

        let descriptors: Vec<FieldDescriptor> = first
            .keys()
            .enumerate()
            .map(|(position, name)| FieldDescriptor::new(name.clone(), position))
            .collect();
        let index = descriptors
            .iter()
            .map(|d| (d.name.clone(), d.position))
            .collect();

        Self { descriptors, index }
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.descriptors.get(position).map(|d| d.name.as_str())
    }
}
