//! Document backend: an array of JSON objects.

use serde_json::{Map, Value as Json};

use super::{CursorError, RowSource};
use crate::field::DocumentFields;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct DocumentRows {
    documents: Vec<Map<String, Json>>,
    fields: DocumentFields,
}

impl DocumentRows {
    pub fn new(documents: Vec<Map<String, Json>>) -> Self {
        let fields = DocumentFields::discover(&documents);
        Self { documents, fields }
    }

    /// Accept a parsed JSON payload; it must be an array of objects.
    pub fn from_json(payload: Json) -> Result<Self, CursorError> {
        let items = match payload {
            Json::Array(items) => items,
            other => {
                return Err(CursorError::InvalidDocument {
                    index: 0,
                    found: json_type_name(&other),
                });
            }
        };

        let documents = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Json::Object(map) => Ok(map),
                other => Err(CursorError::InvalidDocument {
                    index,
                    found: json_type_name(&other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(documents))
    }
}

fn json_type_name(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

impl RowSource for DocumentRows {
    fn backend_name(&self) -> &'static str {
        "document"
    }

    fn row_count(&self) -> usize {
        self.documents.len()
    }

    fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn field_name(&self, field: usize) -> Option<&str> {
        self.fields.name_at(field)
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.resolve(name)
    }

    /// A key missing from this particular document reads as null.
    fn value(&self, row: usize, field: usize) -> Result<Value, CursorError> {
        let value = self
            .fields
            .name_at(field)
            .and_then(|name| self.documents.get(row)?.get(name))
            .map(Value::from)
            .unwrap_or(Value::Null);
        Ok(value)
    }

    fn supports_positional(&self) -> bool {
        false
    }
}
