mod execute;
mod execute_tests;

use clap::Args;
use std::path::PathBuf;

/// Execute a serialized query specification
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  typed_cursor run --spec recent.json                    # Print every column
  typed_cursor run --spec recent.json -F id -F name      # Print selected fields
  typed_cursor --db :memory: run --spec recent.json      # Run against a fresh database")]
pub struct RunCmd {
    /// File holding the specification's JSON text
    #[arg(short, long)]
    pub spec: PathBuf,

    /// Fields to print, in order (all columns when omitted)
    #[arg(short = 'F', long = "field")]
    pub fields: Vec<String>,

    /// Column to expose under the `_id` alias
    #[arg(long)]
    pub id_column: Option<String>,
}
