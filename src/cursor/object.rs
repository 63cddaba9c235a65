//! Object backend: a vector of records read through registered getters.

use std::sync::Arc;

use super::{CursorError, RowSource};
use crate::field::{DiagnosticSink, InvocationPolicy, Record, RecordFields, TracingSink};
use crate::value::Value;

pub struct ObjectRows<T> {
    records: Vec<T>,
    fields: Arc<RecordFields<T>>,
    policy: InvocationPolicy,
    sink: Arc<dyn DiagnosticSink>,
}

impl<T: Record> ObjectRows<T> {
    /// Discover the fields of `T` and wrap `records`.
    pub fn new(records: Vec<T>) -> Self {
        Self::with_fields(records, Arc::new(RecordFields::discover()))
    }

    /// Wrap `records` with fields discovered earlier, sharing their lookup
    /// cache with other row-sets of the same type.
    pub fn with_fields(records: Vec<T>, fields: Arc<RecordFields<T>>) -> Self {
        Self {
            records,
            fields,
            policy: InvocationPolicy::default(),
            sink: Arc::new(TracingSink),
        }
    }
}

impl<T> ObjectRows<T> {
    pub fn with_policy(mut self, policy: InvocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }
}

impl<T> RowSource for ObjectRows<T> {
    fn backend_name(&self) -> &'static str {
        "object"
    }

    fn row_count(&self) -> usize {
        self.records.len()
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

    fn value(&self, row: usize, field: usize) -> Result<Value, CursorError> {
        let Some(record) = self.records.get(row) else {
            return Ok(Value::Null);
        };
        match self.fields.invoke(field, record) {
            Ok(value) => Ok(value),
            Err(error) => {
                let name = self.fields.name_at(field).unwrap_or_default();
                match self.policy {
                    InvocationPolicy::LogAndNull => {
                        self.sink.invocation_failed(name, &error);
                        Ok(Value::Null)
                    }
                    InvocationPolicy::Propagate => Err(CursorError::Invocation {
                        field: name.to_string(),
                        source: error,
                    }),
                }
            }
        }
    }
}
