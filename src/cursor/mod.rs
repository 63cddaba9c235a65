//! Typed, null-safe access over positionable row-sets.
//!
//! [`TypedCursor`] wraps one of three [`RowSource`] backends and exposes the
//! same accessor families for each:
//!
//! | accessor                  | missing field   | null value        | conversion failure |
//! |---------------------------|-----------------|-------------------|--------------------|
//! | `get_<type>(name)`        | `FieldNotFound` | type default      | `Conversion` error |
//! | `opt_<type>(name)`        | type default    | type default      | type default       |
//! | `opt_<type>_or(name, fb)` | `fb`            | type default      | `fb`               |
//! | `opt_<type>_as_option`    | `None`          | `None`            | `None`             |
//!
//! Type defaults are `false`, `0`, `0.0`, and `None` for strings and bytes.
//! A null value yields the type default even when a fallback is given, which
//! lets callers tell an absent field from a present but empty one.
//!
//! # Backends
//!
//! - [`SqlRows`]: rows of a SQLite query result.
//! - [`ObjectRows`]: records registered through [`crate::field::Record`].
//! - [`DocumentRows`]: JSON documents. Positional accessors are unsupported
//!   because document field order carries no meaning.
//!
//! # Identifier alias
//!
//! Consumers that insist on a `_id` column can be served by aliasing it to a
//! real field with [`TypedCursor::with_id_alias`]. Only `_id` can be aliased.
//!
//! # Position
//!
//! A cursor starts before the first row (position -1). Moves clamp to
//! `-1..=count` and report whether the new position is on a row.

pub mod document;
pub mod object;
pub mod sql;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::boolean::{BooleanPolicy, IntegerOne, RowView};
use crate::convert::{ConversionError, Converter};
use crate::field::AccessError;
use crate::value::{Value, ValueKind};

pub use document::DocumentRows;
pub use object::ObjectRows;
pub use sql::SqlRows;

/// The one field name that can be aliased.
pub const ID_COLUMN: &str = "_id";

pub type SqlCursor = TypedCursor<SqlRows>;
pub type ObjectCursor<T> = TypedCursor<ObjectRows<T>>;
pub type DocumentCursor = TypedCursor<DocumentRows>;

#[derive(Error, Debug)]
pub enum CursorError {
    #[error("Field '{name}' does not exist")]
    FieldNotFound { name: String },

    #[error("Field index {index} is out of range for {count} fields")]
    FieldIndexOutOfRange { index: usize, count: usize },

    #[error("Position {position} is not on a row (count {count})")]
    PositionOutOfRange { position: isize, count: usize },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        operation: &'static str,
        backend: &'static str,
    },

    #[error("Cursor is closed")]
    Closed,

    #[error("Getter for field '{field}' failed: {source}")]
    Invocation {
        field: String,
        #[source]
        source: AccessError,
    },

    #[error("Document {index} is not a JSON object (found {found})")]
    InvalidDocument { index: usize, found: &'static str },
}

/// Backend storage behind a [`TypedCursor`].
pub trait RowSource {
    /// Backend name for error messages.
    fn backend_name(&self) -> &'static str;

    fn row_count(&self) -> usize;

    fn field_count(&self) -> usize;

    fn field_name(&self, field: usize) -> Option<&str>;

    fn field_index(&self, name: &str) -> Option<usize>;

    /// Stored value at `row`/`field`. Both are in range.
    fn value(&self, row: usize, field: usize) -> Result<Value, CursorError>;

    /// Whether fields can be addressed by position.
    fn supports_positional(&self) -> bool {
        true
    }
}

type ConvertFn<T> = fn(&Converter, &Value) -> Result<T, ConversionError>;

/// Typed accessor facade over a row-set.
pub struct TypedCursor<S> {
    source: Option<S>,
    position: isize,
    converter: Converter,
    boolean_policy: Arc<dyn BooleanPolicy>,
    id_alias: Option<String>,
}

impl<S: RowSource> fmt::Debug for TypedCursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCursor")
            .field("backend", &self.source.as_ref().map(|s| s.backend_name()))
            .field("position", &self.position)
            .field("count", &self.count())
            .field("id_alias", &self.id_alias)
            .finish()
    }
}

/// Name-addressed and position-addressed getters for one numeric type.
macro_rules! typed_accessors {
    (
        $ty:ty, $default:expr, $conv:path,
        get: $get:ident,
        get_at: $get_at:ident,
        opt: $opt:ident,
        opt_or: $opt_or:ident,
        as_option: $as_option:ident $(,)?
    ) => {
        pub fn $get(&self, name: &str) -> Result<$ty, CursorError> {
            let value = self.read_named(name)?;
            self.coerce(&value, $default, $conv)
        }

        pub fn $get_at(&self, index: usize) -> Result<$ty, CursorError> {
            let value = self.read_positional(index)?;
            self.coerce(&value, $default, $conv)
        }

        pub fn $opt(&self, name: &str) -> $ty {
            self.$opt_or(name, $default)
        }

        pub fn $opt_or(&self, name: &str, fallback: $ty) -> $ty {
            self.opt_with(name, fallback, $default, $conv)
        }

        pub fn $as_option(&self, name: &str) -> Option<$ty> {
            self.as_option_with(name, $conv)
        }
    };
}

impl<S: RowSource> TypedCursor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            position: -1,
            converter: Converter::default(),
            boolean_policy: Arc::new(IntegerOne),
            id_alias: None,
        }
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    pub fn with_boolean_policy(mut self, policy: impl BooleanPolicy + 'static) -> Self {
        self.boolean_policy = Arc::new(policy);
        self
    }

    /// Make `_id` resolve to `field`.
    pub fn with_id_alias(mut self, field: impl Into<String>) -> Self {
        self.id_alias = Some(field.into());
        self
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Release the backing rows. Every later access fails with
    /// [`CursorError::Closed`].
    pub fn close(&mut self) {
        self.source = None;
        self.position = -1;
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    fn source(&self) -> Result<&S, CursorError> {
        self.source.as_ref().ok_or(CursorError::Closed)
    }

    // ------------------------------------------------------------------
    // Position
    // ------------------------------------------------------------------

    pub fn count(&self) -> usize {
        self.source.as_ref().map_or(0, |s| s.row_count())
    }

    pub fn position(&self) -> isize {
        self.position
    }

    /// Move to `position`, clamped to `-1..=count`.
    pub fn move_to_position(&mut self, position: isize) -> bool {
        let count = self.count() as isize;
        self.position = position.clamp(-1, count);
        self.is_on_row()
    }

    pub fn move_by(&mut self, offset: isize) -> bool {
        self.move_to_position(self.position.saturating_add(offset))
    }

    pub fn move_to_first(&mut self) -> bool {
        self.move_to_position(0)
    }

    pub fn move_to_last(&mut self) -> bool {
        let last = self.count() as isize - 1;
        self.move_to_position(last)
    }

    pub fn move_to_next(&mut self) -> bool {
        self.move_by(1)
    }

    pub fn move_to_previous(&mut self) -> bool {
        self.move_by(-1)
    }

    pub fn is_before_first(&self) -> bool {
        self.count() == 0 || self.position < 0
    }

    pub fn is_after_last(&self) -> bool {
        self.count() == 0 || self.position >= self.count() as isize
    }

    pub fn is_first(&self) -> bool {
        self.count() > 0 && self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.count() > 0 && self.position == self.count() as isize - 1
    }

    fn is_on_row(&self) -> bool {
        self.position >= 0 && self.position < self.count() as isize
    }

    fn row(&self) -> Result<usize, CursorError> {
        if self.is_on_row() {
            Ok(self.position as usize)
        } else {
            Err(CursorError::PositionOutOfRange {
                position: self.position,
                count: self.count(),
            })
        }
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    pub fn column_count(&self) -> usize {
        self.source.as_ref().map_or(0, |s| s.field_count())
    }

    /// Position of the field `name`, or `None` when there is no such field.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let source = self.source.as_ref()?;
        let lookup = match (&self.id_alias, name) {
            (Some(real), ID_COLUMN) => real.as_str(),
            _ => name,
        };
        source.field_index(lookup)
    }

    pub fn column_index_or_err(&self, name: &str) -> Result<usize, CursorError> {
        self.source()?;
        self.column_index(name)
            .ok_or_else(|| CursorError::FieldNotFound {
                name: name.to_string(),
            })
    }

    /// Name of the field at `index`. The aliased field reports `_id`.
    pub fn column_name(&self, index: usize) -> Option<&str> {
        let source = self.source.as_ref()?;
        let name = source.field_name(index)?;
        match &self.id_alias {
            Some(real) if source.field_index(real) == Some(index) => Some(ID_COLUMN),
            _ => Some(name),
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        (0..self.column_count())
            .filter_map(|i| self.column_name(i).map(str::to_string))
            .collect()
    }

    // ------------------------------------------------------------------
    // Raw reads
    // ------------------------------------------------------------------

    fn current(&self, field: usize) -> Result<Value, CursorError> {
        let source = self.source()?;
        let count = source.field_count();
        if field >= count {
            return Err(CursorError::FieldIndexOutOfRange { index: field, count });
        }
        source.value(self.row()?, field)
    }

    fn read_named(&self, name: &str) -> Result<Value, CursorError> {
        let field = self.column_index_or_err(name)?;
        self.current(field)
    }

    fn read_positional(&self, index: usize) -> Result<Value, CursorError> {
        let source = self.source()?;
        if !source.supports_positional() {
            return Err(CursorError::Unsupported {
                operation: "positional access",
                backend: source.backend_name(),
            });
        }
        self.current(index)
    }

    /// Stored value of `name` in the current row, unconverted.
    pub fn get_value(&self, name: &str) -> Result<Value, CursorError> {
        self.read_named(name)
    }

    pub fn get_value_at(&self, index: usize) -> Result<Value, CursorError> {
        self.read_positional(index)
    }

    pub fn is_null(&self, name: &str) -> Result<bool, CursorError> {
        Ok(self.read_named(name)?.is_null())
    }

    pub fn is_null_at(&self, index: usize) -> Result<bool, CursorError> {
        Ok(self.read_positional(index)?.is_null())
    }

    pub fn kind(&self, name: &str) -> Result<ValueKind, CursorError> {
        Ok(self.read_named(name)?.kind())
    }

    pub fn kind_at(&self, index: usize) -> Result<ValueKind, CursorError> {
        Ok(self.read_positional(index)?.kind())
    }

    // ------------------------------------------------------------------
    // Conversion plumbing
    // ------------------------------------------------------------------

    fn coerce<T>(&self, value: &Value, default: T, conv: ConvertFn<T>) -> Result<T, CursorError> {
        if value.is_null() {
            return Ok(default);
        }
        Ok(conv(&self.converter, value)?)
    }

    /// `fallback` when the field is missing or fails to convert, `default`
    /// when it is null.
    fn opt_with<T>(&self, name: &str, fallback: T, default: T, conv: ConvertFn<T>) -> T {
        let Some(field) = self.column_index(name) else {
            return fallback;
        };
        match self.current(field) {
            Ok(Value::Null) => default,
            Ok(value) => conv(&self.converter, &value).unwrap_or(fallback),
            Err(_) => fallback,
        }
    }

    fn as_option_with<T>(&self, name: &str, conv: ConvertFn<T>) -> Option<T> {
        let field = self.column_index(name)?;
        match self.current(field).ok()? {
            Value::Null => None,
            value => conv(&self.converter, &value).ok(),
        }
    }

    // ------------------------------------------------------------------
    // Boolean
    // ------------------------------------------------------------------

    fn resolve_bool(&self, field: usize) -> Result<bool, CursorError> {
        if self.current(field)?.is_null() {
            return Ok(false);
        }
        self.boolean_policy.is_true(self, field)
    }

    pub fn get_boolean(&self, name: &str) -> Result<bool, CursorError> {
        let field = self.column_index_or_err(name)?;
        self.resolve_bool(field)
    }

    pub fn get_boolean_at(&self, index: usize) -> Result<bool, CursorError> {
        let value = self.read_positional(index)?;
        if value.is_null() {
            return Ok(false);
        }
        self.boolean_policy.is_true(self, index)
    }

    pub fn opt_boolean(&self, name: &str) -> bool {
        self.opt_boolean_or(name, false)
    }

    pub fn opt_boolean_or(&self, name: &str, fallback: bool) -> bool {
        let Some(field) = self.column_index(name) else {
            return fallback;
        };
        match self.current(field) {
            Ok(Value::Null) => false,
            Ok(_) => self.boolean_policy.is_true(self, field).unwrap_or(fallback),
            Err(_) => fallback,
        }
    }

    pub fn opt_boolean_as_option(&self, name: &str) -> Option<bool> {
        let field = self.column_index(name)?;
        match self.current(field).ok()? {
            Value::Null => None,
            _ => self.boolean_policy.is_true(self, field).ok(),
        }
    }

    // ------------------------------------------------------------------
    // Numeric
    // ------------------------------------------------------------------

    typed_accessors!(i16, 0, Converter::to_i16,
        get: get_short, get_at: get_short_at,
        opt: opt_short, opt_or: opt_short_or, as_option: opt_short_as_option);

    typed_accessors!(i32, 0, Converter::to_i32,
        get: get_int, get_at: get_int_at,
        opt: opt_int, opt_or: opt_int_or, as_option: opt_int_as_option);

    typed_accessors!(i64, 0, Converter::to_i64,
        get: get_long, get_at: get_long_at,
        opt: opt_long, opt_or: opt_long_or, as_option: opt_long_as_option);

    typed_accessors!(f32, 0.0, Converter::to_f32,
        get: get_float, get_at: get_float_at,
        opt: opt_float, opt_or: opt_float_or, as_option: opt_float_as_option);

    typed_accessors!(f64, 0.0, Converter::to_f64,
        get: get_double, get_at: get_double_at,
        opt: opt_double, opt_or: opt_double_or, as_option: opt_double_as_option);

    // ------------------------------------------------------------------
    // String and bytes (already nullable)
    // ------------------------------------------------------------------

    pub fn get_string(&self, name: &str) -> Result<Option<String>, CursorError> {
        let value = self.read_named(name)?;
        self.coerce(&value, None, Converter::to_text)
    }

    pub fn get_string_at(&self, index: usize) -> Result<Option<String>, CursorError> {
        let value = self.read_positional(index)?;
        self.coerce(&value, None, Converter::to_text)
    }

    /// `None` when the field is missing, null, or unreadable as text.
    pub fn opt_string(&self, name: &str) -> Option<String> {
        self.opt_with(name, None, None, Converter::to_text)
    }

    /// `fallback` when the field is missing or unreadable; `None` when null.
    pub fn opt_string_or(&self, name: &str, fallback: &str) -> Option<String> {
        self.opt_with(name, Some(fallback.to_string()), None, Converter::to_text)
    }

    pub fn get_bytes(&self, name: &str) -> Result<Option<Vec<u8>>, CursorError> {
        let value = self.read_named(name)?;
        self.coerce(&value, None, Converter::to_bytes)
    }

    pub fn get_bytes_at(&self, index: usize) -> Result<Option<Vec<u8>>, CursorError> {
        let value = self.read_positional(index)?;
        self.coerce(&value, None, Converter::to_bytes)
    }

    pub fn opt_bytes(&self, name: &str) -> Option<Vec<u8>> {
        self.opt_with(name, None, None, Converter::to_bytes)
    }

    pub fn opt_bytes_or(&self, name: &str, fallback: &[u8]) -> Option<Vec<u8>> {
        self.opt_with(name, Some(fallback.to_vec()), None, Converter::to_bytes)
    }
}

impl<S: RowSource> RowView for TypedCursor<S> {
    fn value(&self, field: usize) -> Result<Value, CursorError> {
        self.current(field)
    }

    fn converter(&self) -> &Converter {
        &self.converter
    }
}
