//! Output formatting for spec command results.

use super::execute::SpecResult;
use crate::output::Outputable;

impl Outputable for SpecResult {
    /// The compact wire text, ready to save and pass to `run --spec`.
    fn to_table(&self) -> String {
        self.text.clone()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::SpecResult;
    use crate::cli::Args;
    use crate::commands::{Command, Context, Execute};

    #[fixture]
    fn result() -> SpecResult {
        let args = Args::try_parse_from([
            "typed_cursor", "spec", "raw", "--sql", "SELECT 1", "--tag", "one",
        ])
        .unwrap();
        let cmd = match args.command {
            Command::Spec(cmd) => cmd,
            _ => panic!("Expected spec command"),
        };
        cmd.execute(&Context::default()).unwrap()
    }

    crate::output_table_test! {
        test_name: test_spec_table_is_wire_text,
        fixture: result,
        fixture_type: SpecResult,
        expected: r#"{"queryType":2,"modelTag":"one","modelVersion":0,"rawSql":"SELECT 1"}"#,
    }

    crate::output_json_test! {
        test_name: test_spec_json_is_wire_object,
        fixture: result,
        fixture_type: SpecResult,
        assertions: {
            "/queryType": json!(2),
            "/modelTag": json!("one"),
            "/rawSql": json!("SELECT 1"),
        },
    }

    #[rstest]
    fn test_spec_json_round_trips(result: SpecResult) {
        use crate::output::{OutputFormat, Outputable};
        let pretty = result.format(OutputFormat::Json);
        let spec = crate::query::QuerySpec::from_text(&pretty).unwrap();
        assert_eq!(spec.tag(), Some("one"));
    }
}
