//! Boolean resolution policies.
//!
//! A typed cursor never converts a stored value to `bool` directly. It asks
//! its [`BooleanPolicy`], which sees the current row and the field position
//! and decides what counts as true. The default, [`IntegerOne`], reads the
//! field as an integer and compares it with 1.

use crate::convert::Converter;
use crate::cursor::CursorError;
use crate::value::Value;

/// Read access to the current row, handed to boolean policies.
pub trait RowView {
    /// Stored value of the field at `field` in the current row.
    fn value(&self, field: usize) -> Result<Value, CursorError>;

    /// Converter configured on the row-set.
    fn converter(&self) -> &Converter;
}

/// Strategy deciding whether a stored field is true.
pub trait BooleanPolicy: Send + Sync {
    fn is_true(&self, row: &dyn RowView, field: usize) -> Result<bool, CursorError>;
}

/// True when the field reads as the integer 1.
///
/// Native booleans (from JSON documents or record getters) are taken as they
/// are.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerOne;

impl BooleanPolicy for IntegerOne {
    fn is_true(&self, row: &dyn RowView, field: usize) -> Result<bool, CursorError> {
        match row.value(field)? {
            Value::Bool(b) => Ok(b),
            other => Ok(row.converter().to_i32(&other)? == 1),
        }
    }
}

/// Uses the converter's boolean rule: booleans as they are, text
/// `"true"`/`"false"` case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBoolean;

impl BooleanPolicy for TextBoolean {
    fn is_true(&self, row: &dyn RowView, field: usize) -> Result<bool, CursorError> {
        Ok(row.converter().to_bool(&row.value(field)?)?)
    }
}

impl<F> BooleanPolicy for F
where
    F: Fn(&dyn RowView, usize) -> Result<bool, CursorError> + Send + Sync,
{
    fn is_true(&self, row: &dyn RowView, field: usize) -> Result<bool, CursorError> {
        self(row, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct SingleRow {
        values: Vec<Value>,
        converter: Converter,
    }

    impl SingleRow {
        fn new(values: Vec<Value>) -> Self {
            Self {
                values,
                converter: Converter::default(),
            }
        }
    }

    impl RowView for SingleRow {
        fn value(&self, field: usize) -> Result<Value, CursorError> {
            Ok(self.values[field].clone())
        }

        fn converter(&self) -> &Converter {
            &self.converter
        }
    }

    #[rstest]
    #[case(Value::Long(1), true)]
    #[case(Value::Int(0), false)]
    #[case(Value::Long(2), false)]
    #[case(Value::Long(-1), false)]
    #[case(Value::Text("1".into()), true)]
    #[case(Value::Double(1.0), true)]
    #[case(Value::Bool(true), true)]
    #[case(Value::Bool(false), false)]
    fn test_integer_one(#[case] stored: Value, #[case] expected: bool) {
        let row = SingleRow::new(vec![stored]);
        assert_eq!(IntegerOne.is_true(&row, 0).unwrap(), expected);
    }

    #[rstest]
    fn test_integer_one_rejects_text() {
        let row = SingleRow::new(vec![Value::Text("true".into())]);
        assert!(matches!(
            IntegerOne.is_true(&row, 0),
            Err(CursorError::Conversion(_))
        ));
    }

    #[rstest]
    fn test_text_boolean() {
        let row = SingleRow::new(vec![Value::Text("True".into()), Value::Long(1)]);
        assert!(TextBoolean.is_true(&row, 0).unwrap());
        assert!(TextBoolean.is_true(&row, 1).is_err());
    }

    #[rstest]
    fn test_closure_policy_can_invert() {
        let inverted = |row: &dyn RowView, field: usize| IntegerOne.is_true(row, field).map(|b| !b);
        let row = SingleRow::new(vec![Value::Long(1), Value::Long(0)]);
        assert!(!inverted.is_true(&row, 0).unwrap());
        assert!(inverted.is_true(&row, 1).unwrap());
    }
}
