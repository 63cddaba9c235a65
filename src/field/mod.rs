//! Field discovery for object and document row-sets.
//!
//! Both discovery strategies produce the same contract: a dense, stable list
//! of [`FieldDescriptor`]s (positions `0..N`) with unique names, plus
//! name -> position resolution.
//!
//! - [`record`]: fields registered on a Rust type through [`Record`]
//!   (usually via the [`record_fields!`](crate::record_fields) macro).
//! - [`document`]: fields taken from the keys of the first JSON document.

pub mod document;
pub mod record;
pub mod sink;

pub use document::DocumentFields;
pub use record::{AccessError, Accessor, IntoFieldValue, Record, RecordFields};
pub use sink::{DiagnosticSink, InvocationPolicy, TracingSink};

/// Name and position of a field within a row-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub position: usize,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}
