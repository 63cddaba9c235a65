//! Type coercion between stored values and requested accessor types.
//!
//! The converter is stateless apart from its [`ConverterConfig`], which only
//! matters when a byte sequence is involved. Rules by target:
//!
//! - **boolean**: booleans pass through; text parses `"true"`/`"false"`
//!   case-insensitively.
//! - **short/int/long/float/double**: any numeric value narrows or widens
//!   with `as` semantics; text parses as the target type; a byte sequence of
//!   exactly the target's width decodes in the configured byte order.
//! - **string**: null stays null; bytes decode with the configured encoding;
//!   anything else uses its `Display` form.
//! - **bytes**: null stays null; bytes pass through; text encodes with the
//!   configured encoding; numerics encode to their fixed width
//!   (short=2, int/float=4, long/double=8).
//!
//! Everything else is a [`ConversionError`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

/// Accessor types a value can be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    Boolean,
    Bytes,
    Double,
    Float,
    Int,
    Long,
    Short,
    Text,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetType::Boolean => "boolean",
            TargetType::Bytes => "bytes",
            TargetType::Double => "double",
            TargetType::Float => "float",
            TargetType::Int => "int",
            TargetType::Long => "long",
            TargetType::Short => "short",
            TargetType::Text => "string",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Cannot convert {from} to {to}")]
    Unsupported { from: &'static str, to: TargetType },

    #[error("Cannot parse {input:?} as {to}")]
    Malformed { input: String, to: TargetType },

    #[error("Expected {expected} bytes for {to}, got {actual}")]
    ByteLength {
        to: TargetType,
        expected: usize,
        actual: usize,
    },

    #[error("{encoding} cannot represent the value: {message}")]
    Encoding {
        encoding: TextEncoding,
        message: String,
    },
}

/// Text encoding used for string <-> byte sequence conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16be")]
    Utf16Be,
    #[serde(rename = "utf-16le")]
    Utf16Le,
    #[serde(rename = "iso-8859-1")]
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Latin1 => "ISO-8859-1",
        };
        f.write_str(name)
    }
}

impl TextEncoding {
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, ConversionError> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            TextEncoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| ConversionError::Encoding {
                        encoding: *self,
                        message: format!("character {:?} is outside the Latin-1 range", c),
                    })
                })
                .collect(),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String, ConversionError> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
                ConversionError::Encoding {
                    encoding: *self,
                    message: e.to_string(),
                }
            }),
            TextEncoding::Utf16Be | TextEncoding::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(ConversionError::Encoding {
                        encoding: *self,
                        message: format!("odd byte count {}", bytes.len()),
                    });
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| {
                        let pair = [pair[0], pair[1]];
                        if *self == TextEncoding::Utf16Be {
                            u16::from_be_bytes(pair)
                        } else {
                            u16::from_le_bytes(pair)
                        }
                    })
                    .collect();
                String::from_utf16(&units).map_err(|e| ConversionError::Encoding {
                    encoding: *self,
                    message: e.to_string(),
                })
            }
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

/// Byte order for numeric <-> byte sequence conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteOrder {
    #[default]
    BigEndian,
    LittleEndian,
}

/// Converter settings, loadable from the sample application's config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub encoding: TextEncoding,
    #[serde(default)]
    pub byte_order: ByteOrder,
}

/// Converts loosely typed values into accessor types.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    config: ConverterConfig,
}

/// Fixed-width decode of a byte sequence in the configured order.
macro_rules! decode_fixed {
    ($self:ident, $bytes:expr, $ty:ty, $target:expr) => {{
        const WIDTH: usize = std::mem::size_of::<$ty>();
        let arr: [u8; WIDTH] = $bytes.try_into().map_err(|_| ConversionError::ByteLength {
            to: $target,
            expected: WIDTH,
            actual: $bytes.len(),
        })?;
        Ok(match $self.config.byte_order {
            ByteOrder::BigEndian => <$ty>::from_be_bytes(arr),
            ByteOrder::LittleEndian => <$ty>::from_le_bytes(arr),
        })
    }};
}

/// Numeric conversion: `as` casts between numerics, parse from text,
/// fixed-width decode from bytes.
macro_rules! numeric_conversion {
    ($name:ident, $ty:ty, $target:expr) => {
        pub fn $name(&self, value: &Value) -> Result<$ty, ConversionError> {
            match value {
                Value::Short(v) => Ok(*v as $ty),
                Value::Int(v) => Ok(*v as $ty),
                Value::Long(v) => Ok(*v as $ty),
                Value::Float(v) => Ok(*v as $ty),
                Value::Double(v) => Ok(*v as $ty),
                Value::Text(s) => s.parse::<$ty>().map_err(|_| ConversionError::Malformed {
                    input: s.clone(),
                    to: $target,
                }),
                Value::Bytes(b) => decode_fixed!(self, b.as_slice(), $ty, $target),
                other => Err(ConversionError::Unsupported {
                    from: other.type_name(),
                    to: $target,
                }),
            }
        }
    };
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Convert `value` into `target`, wrapping the result back into a [`Value`].
    pub fn convert(&self, target: TargetType, value: &Value) -> Result<Value, ConversionError> {
        Ok(match target {
            TargetType::Boolean => Value::Bool(self.to_bool(value)?),
            TargetType::Short => Value::Short(self.to_i16(value)?),
            TargetType::Int => Value::Int(self.to_i32(value)?),
            TargetType::Long => Value::Long(self.to_i64(value)?),
            TargetType::Float => Value::Float(self.to_f32(value)?),
            TargetType::Double => Value::Double(self.to_f64(value)?),
            TargetType::Text => self.to_text(value)?.into(),
            TargetType::Bytes => self.to_bytes(value)?.into(),
        })
    }

    pub fn to_bool(&self, value: &Value) -> Result<bool, ConversionError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Text(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::Text(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            Value::Text(s) => Err(ConversionError::Malformed {
                input: s.clone(),
                to: TargetType::Boolean,
            }),
            other => Err(ConversionError::Unsupported {
                from: other.type_name(),
                to: TargetType::Boolean,
            }),
        }
    }

    numeric_conversion!(to_i16, i16, TargetType::Short);
    numeric_conversion!(to_i32, i32, TargetType::Int);
    numeric_conversion!(to_i64, i64, TargetType::Long);
    numeric_conversion!(to_f32, f32, TargetType::Float);
    numeric_conversion!(to_f64, f64, TargetType::Double);

    pub fn to_text(&self, value: &Value) -> Result<Option<String>, ConversionError> {
        match value {
            Value::Null => Ok(None),
            Value::Bytes(b) => self.config.encoding.decode(b).map(Some),
            other => Ok(Some(other.to_string())),
        }
    }

    pub fn to_bytes(&self, value: &Value) -> Result<Option<Vec<u8>>, ConversionError> {
        let big = self.config.byte_order == ByteOrder::BigEndian;
        let bytes = match value {
            Value::Null => return Ok(None),
            Value::Bytes(b) => b.clone(),
            Value::Text(s) => self.config.encoding.encode(s)?,
            Value::Short(v) => if big { v.to_be_bytes().to_vec() } else { v.to_le_bytes().to_vec() },
            Value::Int(v) => if big { v.to_be_bytes().to_vec() } else { v.to_le_bytes().to_vec() },
            Value::Long(v) => if big { v.to_be_bytes().to_vec() } else { v.to_le_bytes().to_vec() },
            Value::Float(v) => if big { v.to_be_bytes().to_vec() } else { v.to_le_bytes().to_vec() },
            Value::Double(v) => if big { v.to_be_bytes().to_vec() } else { v.to_le_bytes().to_vec() },
            Value::Bool(_) => {
                return Err(ConversionError::Unsupported {
                    from: "bool",
                    to: TargetType::Bytes,
                });
            }
        };
        Ok(Some(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn converter() -> Converter {
        Converter::default()
    }

    #[fixture]
    fn little_endian() -> Converter {
        Converter::new(ConverterConfig {
            encoding: TextEncoding::Utf16Le,
            byte_order: ByteOrder::LittleEndian,
        })
    }

    #[rstest]
    #[case(Value::Bool(true), true)]
    #[case(Value::Text("TRUE".into()), true)]
    #[case(Value::Text("fAlSe".into()), false)]
    fn test_to_bool(converter: Converter, #[case] input: Value, #[case] expected: bool) {
        assert_eq!(converter.to_bool(&input), Ok(expected));
    }

    #[rstest]
    #[case(Value::Int(1))]
    #[case(Value::Text("yes".into()))]
    #[case(Value::Null)]
    fn test_to_bool_rejects(converter: Converter, #[case] input: Value) {
        assert!(converter.to_bool(&input).is_err());
    }

    #[rstest]
    fn test_numeric_narrowing_wraps_like_a_cast(converter: Converter) {
        assert_eq!(converter.to_i32(&Value::Long(i64::from(i32::MAX) + 1)), Ok(i32::MIN));
        assert_eq!(converter.to_i16(&Value::Int(70_000)), Ok(70_000i32 as i16));
        assert_eq!(converter.to_i64(&Value::Double(42.9)), Ok(42));
        assert_eq!(converter.to_f32(&Value::Long(3)), Ok(3.0));
    }

    #[rstest]
    fn test_numeric_parse(converter: Converter) {
        assert_eq!(converter.to_i32(&Value::Text("-17".into())), Ok(-17));
        assert_eq!(converter.to_f64(&Value::Text("2.5".into())), Ok(2.5));
        assert_eq!(
            converter.to_i32(&Value::Text("2.5".into())),
            Err(ConversionError::Malformed {
                input: "2.5".into(),
                to: TargetType::Int
            })
        );
    }

    #[rstest]
    fn test_numeric_rejects_bool_and_null(converter: Converter) {
        assert_eq!(
            converter.to_i64(&Value::Bool(true)),
            Err(ConversionError::Unsupported {
                from: "bool",
                to: TargetType::Long
            })
        );
        assert!(converter.to_f64(&Value::Null).is_err());
    }

    #[rstest]
    fn test_long_round_trips_through_eight_bytes(converter: Converter) {
        let bytes = converter.to_bytes(&Value::Long(i64::MIN + 7)).unwrap().unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(converter.to_i64(&Value::Bytes(bytes)), Ok(i64::MIN + 7));
    }

    #[rstest]
    fn test_byte_width_mismatch(converter: Converter) {
        assert_eq!(
            converter.to_i64(&Value::Bytes(vec![0, 1])),
            Err(ConversionError::ByteLength {
                to: TargetType::Long,
                expected: 8,
                actual: 2
            })
        );
    }

    #[rstest]
    fn test_fixed_widths(converter: Converter) {
        for (value, width) in [
            (Value::Short(1), 2),
            (Value::Int(1), 4),
            (Value::Float(1.0), 4),
            (Value::Long(1), 8),
            (Value::Double(1.0), 8),
        ] {
            assert_eq!(converter.to_bytes(&value).unwrap().unwrap().len(), width);
        }
    }

    #[rstest]
    fn test_byte_order(converter: Converter, little_endian: Converter) {
        assert_eq!(converter.to_bytes(&Value::Short(0x0102)), Ok(Some(vec![1, 2])));
        assert_eq!(little_endian.to_bytes(&Value::Short(0x0102)), Ok(Some(vec![2, 1])));
        assert_eq!(little_endian.to_i16(&Value::Bytes(vec![2, 1])), Ok(0x0102));
    }

    #[rstest]
    fn test_text_conversions(converter: Converter, little_endian: Converter) {
        assert_eq!(converter.to_text(&Value::Null), Ok(None));
        assert_eq!(converter.to_text(&Value::Int(5)), Ok(Some("5".into())));
        assert_eq!(converter.to_text(&Value::Bytes(b"abc".to_vec())), Ok(Some("abc".into())));
        assert_eq!(little_endian.to_text(&Value::Bytes(vec![b'h', 0, b'i', 0])), Ok(Some("hi".into())));
        assert!(converter.to_text(&Value::Bytes(vec![0xff, 0xfe, 0xfd])).is_err());
    }

    #[rstest]
    fn test_bytes_from_text(converter: Converter) {
        assert_eq!(converter.to_bytes(&Value::Text("é".into())), Ok(Some(vec![0xc3, 0xa9])));
        assert_eq!(converter.to_bytes(&Value::Null), Ok(None));
        assert!(converter.to_bytes(&Value::Bool(false)).is_err());
    }

    #[rstest]
    fn test_latin1() {
        assert_eq!(TextEncoding::Latin1.encode("é"), Ok(vec![0xe9]));
        assert_eq!(TextEncoding::Latin1.decode(&[0xe9]), Ok("é".to_string()));
        assert!(TextEncoding::Latin1.encode("€").is_err());
    }

    #[rstest]
    fn test_convert_is_deterministic(converter: Converter) {
        let input = Value::Text("12".into());
        let first = converter.convert(TargetType::Long, &input);
        let second = converter.convert(TargetType::Long, &input);
        assert_eq!(first, Ok(Value::Long(12)));
        assert_eq!(first, second);
        assert_eq!(converter.convert(TargetType::Text, &Value::Null), Ok(Value::Null));
    }

    #[rstest]
    fn test_config_deserializes_with_defaults() {
        let config: ConverterConfig = serde_json::from_str(r#"{"byte_order": "little-endian"}"#).unwrap();
        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert_eq!(config.byte_order, ByteOrder::LittleEndian);

        let config: ConverterConfig = serde_json::from_str(r#"{"encoding": "utf-16be"}"#).unwrap();
        assert_eq!(config.encoding, TextEncoding::Utf16Be);
    }
}
