mod execute;

use clap::Args;
use std::path::PathBuf;

/// Read a JSON array of documents through a typed cursor
///
/// Field names come from the first document's keys. Keys missing from a later
/// document read as null; keys only later documents have are not reachable.
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  typed_cursor documents --file people.json                  # Every field of the first document
  typed_cursor documents --file people.json -F name -F age   # Selected fields
  typed_cursor documents --file people.json --id-field key   # Expose `key` as `_id`")]
pub struct DocumentsCmd {
    /// JSON file holding an array of objects
    #[arg(short, long)]
    pub file: PathBuf,

    /// Fields to print, in order (all fields when omitted)
    #[arg(short = 'F', long = "field")]
    pub fields: Vec<String>,

    /// Field to expose under the `_id` alias
    #[arg(long)]
    pub id_field: Option<String>,
}
