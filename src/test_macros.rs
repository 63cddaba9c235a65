//! Declarative macros for tests repeated across backends.
//!
//! Every backend must honour the same accessor contract. Instead of writing
//! the same test three times, each backend's test module invokes
//! [`cursor_contract_tests!`] with an rstest fixture returning a cursor over
//! the sample rows from `test_utils`.
//!
//! The CLI and output macros cover the argument parsing and rendering checks
//! each command repeats.

/// Generate the accessor contract tests for one backend.
///
/// The fixture must return a fresh cursor (positioned before the first row)
/// over the sample rows described in `test_utils`.
#[macro_export]
macro_rules! cursor_contract_tests {
    (
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty $(,)?
    ) => {
        // =====================================================================
        // Typed reads
        // =====================================================================

        #[rstest]
        fn test_get_int_reads_min_value(mut $fixture: $fixture_type) {
            assert!($fixture.move_to_first());
            assert_eq!($fixture.get_int("int").unwrap(), i32::MIN);
            assert_eq!($fixture.get_long("long").unwrap(), i64::MAX);
            assert_eq!($fixture.get_double("double").unwrap(), 1.5);
            assert_eq!($fixture.get_string("text").unwrap().as_deref(), Some("alpha"));
        }

        #[rstest]
        fn test_numeric_widths(mut $fixture: $fixture_type) {
            $fixture.move_to_position(1);
            assert_eq!($fixture.get_short("int").unwrap(), 42);
            assert_eq!($fixture.get_long("int").unwrap(), 42);
            assert_eq!($fixture.get_float("double").unwrap(), -0.25f32);
            assert_eq!($fixture.get_double("int").unwrap(), 42.0);
        }

        #[rstest]
        fn test_text_parses_as_number(mut $fixture: $fixture_type) {
            $fixture.move_to_position(1);
            assert_eq!($fixture.get_long("text").unwrap(), 17);
            assert_eq!($fixture.get_double("text").unwrap(), 17.0);
        }

        #[rstest]
        fn test_numbers_read_as_text(mut $fixture: $fixture_type) {
            $fixture.move_to_first();
            assert_eq!($fixture.get_string("int").unwrap().as_deref(), Some("-2147483648"));
            assert_eq!($fixture.opt_string("double").as_deref(), Some("1.5"));
        }

        // =====================================================================
        // Null values: type default vs None
        // =====================================================================

        #[rstest]
        fn test_null_reads_type_default(mut $fixture: $fixture_type) {
            $fixture.move_to_position(2);
            assert_eq!($fixture.get_int("int").unwrap(), 0);
            assert_eq!($fixture.get_long("long").unwrap(), 0);
            assert_eq!($fixture.get_double("double").unwrap(), 0.0);
            assert_eq!($fixture.get_string("text").unwrap(), None);
            assert!(!$fixture.get_boolean("flag").unwrap());
            assert!($fixture.is_null("int").unwrap());
        }

        #[rstest]
        fn test_null_as_option_is_none(mut $fixture: $fixture_type) {
            $fixture.move_to_position(2);
            assert_eq!($fixture.opt_int_as_option("int"), None);
            assert_eq!($fixture.opt_long_as_option("long"), None);
            assert_eq!($fixture.opt_double_as_option("double"), None);
            assert_eq!($fixture.opt_boolean_as_option("flag"), None);
        }

        #[rstest]
        fn test_null_ignores_fallback(mut $fixture: $fixture_type) {
            $fixture.move_to_position(2);
            assert_eq!($fixture.opt_int_or("int", 99), 0);
            assert_eq!($fixture.opt_double_or("double", 9.5), 0.0);
            assert!(!$fixture.opt_boolean_or("flag", true));
            assert_eq!($fixture.opt_string_or("text", "fallback"), None);
        }

        // =====================================================================
        // Missing fields
        // =====================================================================

        #[rstest]
        fn test_opt_missing_field_returns_defaults(mut $fixture: $fixture_type) {
            $fixture.move_to_first();
            assert!(!$fixture.opt_boolean("missing_field"));
            assert_eq!($fixture.opt_int("missing_field"), 0);
            assert_eq!($fixture.opt_long("missing_field"), 0);
            assert_eq!($fixture.opt_double("missing_field"), 0.0);
            assert_eq!($fixture.opt_string("missing_field"), None);
            assert_eq!($fixture.opt_int_as_option("missing_field"), None);
        }

        #[rstest]
        fn test_opt_missing_field_returns_fallback(mut $fixture: $fixture_type) {
            $fixture.move_to_first();
            assert!($fixture.opt_boolean_or("missing_field", true));
            assert_eq!($fixture.opt_int_or("missing_field", 7), 7);
            assert_eq!($fixture.opt_string_or("missing_field", "fb").as_deref(), Some("fb"));
        }

        #[rstest]
        fn test_get_missing_field_fails(mut $fixture: $fixture_type) {
            use $crate::cursor::CursorError;
            $fixture.move_to_first();
            assert!(matches!($fixture.get_boolean("missing_field"), Err(CursorError::FieldNotFound { .. })));
            assert!(matches!($fixture.get_int("missing_field"), Err(CursorError::FieldNotFound { .. })));
            assert!(matches!($fixture.get_string("missing_field"), Err(CursorError::FieldNotFound { .. })));
            assert!(matches!($fixture.is_null("missing_field"), Err(CursorError::FieldNotFound { .. })));
            assert!(matches!($fixture.column_index_or_err("missing_field"), Err(CursorError::FieldNotFound { .. })));
            assert_eq!($fixture.column_index("missing_field"), None);
        }

        // =====================================================================
        // Conversion failures
        // =====================================================================

        #[rstest]
        fn test_conversion_failure_raised_by_get(mut $fixture: $fixture_type) {
            use $crate::cursor::CursorError;
            $fixture.move_to_first();
            assert!(matches!($fixture.get_int("text"), Err(CursorError::Conversion(_))));
        }

        #[rstest]
        fn test_conversion_failure_swallowed_by_opt(mut $fixture: $fixture_type) {
            $fixture.move_to_first();
            assert_eq!($fixture.opt_int("text"), 0);
            assert_eq!($fixture.opt_int_or("text", 5), 5);
            assert_eq!($fixture.opt_int_as_option("text"), None);
            assert!($fixture.opt_boolean_or("text", true));
        }

        // =====================================================================
        // Boolean policy
        // =====================================================================

        #[rstest]
        fn test_default_boolean_policy(mut $fixture: $fixture_type) {
            $fixture.move_to_first();
            assert!($fixture.get_boolean("flag").unwrap());
            $fixture.move_to_next();
            assert!(!$fixture.get_boolean("flag").unwrap());
            assert_eq!($fixture.opt_boolean_as_option("flag"), Some(false));
        }

        #[rstest]
        fn test_injected_boolean_policy($fixture: $fixture_type) {
            use $crate::boolean::{BooleanPolicy, IntegerOne, RowView};
            let mut cursor = $fixture.with_boolean_policy(|row: &dyn RowView, field: usize| {
                IntegerOne.is_true(row, field).map(|b| !b)
            });
            cursor.move_to_first();
            assert!(!cursor.get_boolean("flag").unwrap());
            cursor.move_to_next();
            assert!(cursor.get_boolean("flag").unwrap());
        }

        // =====================================================================
        // Columns and the _id alias
        // =====================================================================

        #[rstest]
        fn test_column_names($fixture: $fixture_type) {
            assert_eq!($fixture.column_names(), $crate::test_utils::SAMPLE_COLUMNS);
            assert_eq!($fixture.column_count(), 6);
            assert_eq!($fixture.column_index("text"), Some(4));
            assert_eq!($fixture.column_name(4), Some("text"));
            assert_eq!($fixture.column_name(6), None);
        }

        #[rstest]
        fn test_id_alias($fixture: $fixture_type) {
            let mut cursor = $fixture.with_id_alias("int");
            cursor.move_to_position(1);
            assert_eq!(cursor.column_index("_id"), Some(1));
            assert_eq!(cursor.column_name(1), Some("_id"));
            assert_eq!(cursor.get_long("_id").unwrap(), 42);
            assert_eq!(cursor.get_long("int").unwrap(), 42);
        }

        #[rstest]
        fn test_id_without_alias_is_missing($fixture: $fixture_type) {
            assert_eq!($fixture.column_index("_id"), None);
            assert!(!$fixture.opt_boolean("_id"));
        }

        // =====================================================================
        // Position and lifecycle
        // =====================================================================

        #[rstest]
        fn test_navigation(mut $fixture: $fixture_type) {
            assert_eq!($fixture.count(), 3);
            assert_eq!($fixture.position(), -1);
            assert!($fixture.is_before_first());
            assert!($fixture.move_to_next());
            assert!($fixture.is_first());
            assert!($fixture.move_to_last());
            assert!($fixture.is_last());
            assert_eq!($fixture.get_long("id").unwrap(), 3);
            assert!(!$fixture.move_to_next());
            assert!($fixture.is_after_last());
            assert!(!$fixture.move_to_next());
            assert_eq!($fixture.position(), 3);
            assert!($fixture.move_to_previous());
            assert_eq!($fixture.get_long("id").unwrap(), 3);
            assert!(!$fixture.move_to_position(-10));
            assert_eq!($fixture.position(), -1);
            assert!($fixture.move_by(2));
            assert_eq!($fixture.get_long("id").unwrap(), 2);
        }

        #[rstest]
        fn test_read_off_row_fails($fixture: $fixture_type) {
            use $crate::cursor::CursorError;
            assert!(matches!($fixture.get_int("int"), Err(CursorError::PositionOutOfRange { .. })));
            assert_eq!($fixture.opt_int_or("int", 4), 4);
        }

        #[rstest]
        fn test_close(mut $fixture: $fixture_type) {
            use $crate::cursor::CursorError;
            $fixture.move_to_first();
            $fixture.close();
            assert!($fixture.is_closed());
            assert_eq!($fixture.count(), 0);
            assert!(matches!($fixture.get_int("int"), Err(CursorError::Closed)));
            assert_eq!($fixture.opt_int_or("int", 3), 3);
            assert!($fixture.column_names().is_empty());
        }
    };
}

// =============================================================================
// CLI parsing
// =============================================================================

/// Assert that a subcommand fails to parse without one of its arguments.
#[macro_export]
macro_rules! cli_required_arg_test {
    (
        command: [$($cmd:literal),+],
        test_name: $test_name:ident,
        required_arg: $arg:literal $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let result = $crate::cli::Args::try_parse_from(["typed_cursor", $($cmd),+]);
            assert!(result.is_err(), concat!("Command should require ", $arg));
            assert!(
                result.unwrap_err().to_string().contains($arg),
                concat!("Error should mention ", $arg)
            );
        }
    };
}

/// Assert that parsing `args` sets `field` on the matched command variant.
#[macro_export]
macro_rules! cli_option_test {
    (
        args: [$($arg:literal),+],
        pattern: $pattern:pat => $cmd:ident,
        test_name: $test_name:ident,
        field: $field:ident,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name() {
            let args = $crate::cli::Args::try_parse_from(["typed_cursor", $($arg),+]).unwrap();
            match args.command {
                $pattern => {
                    assert_eq!($cmd.$field, $expected,
                        concat!("Field ", stringify!($field), " mismatch"));
                }
                #[allow(unreachable_patterns)]
                _ => panic!("Expected {}", stringify!($pattern)),
            }
        }
    };
}

// =============================================================================
// Output formatting
// =============================================================================

/// Compare a result's rendering against an expected string.
#[macro_export]
macro_rules! output_table_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        expected: $expected:expr,
        format: $format:ident $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use $crate::output::{OutputFormat, Outputable};
            assert_eq!($fixture.format(OutputFormat::$format), $expected);
        }
    };
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        expected: $expected:expr $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use $crate::output::Outputable;
            assert_eq!($fixture.to_table(), $expected);
        }
    };
}

/// Check individual fields of a result's JSON rendering.
#[macro_export]
macro_rules! output_json_test {
    (
        test_name: $test_name:ident,
        fixture: $fixture:ident,
        fixture_type: $fixture_type:ty,
        assertions: { $($pointer:literal : $expected:expr),* $(,)? } $(,)?
    ) => {
        #[rstest]
        fn $test_name($fixture: $fixture_type) {
            use $crate::output::{OutputFormat, Outputable};
            let output = $fixture.format(OutputFormat::Json);
            let parsed: serde_json::Value = serde_json::from_str(&output)
                .expect("Should produce valid JSON");
            $(
                assert_eq!(parsed.pointer($pointer), Some(&$expected),
                    concat!("JSON field mismatch: ", $pointer));
            )*
        }
    };
}
