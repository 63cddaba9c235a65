mod execute;
mod output;

pub use execute::SpecResult;

use clap::{Args, Subcommand};

/// Build a query specification and print its serialized form
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  typed_cursor spec raw --sql 'SELECT * FROM t WHERE a = ?' --arg 5 --tag x
  typed_cursor spec select --tables people -c id -c name --selection 'active = ?' --arg 1
  typed_cursor spec select --tables people --limit 10 > recent.json && typed_cursor run --spec recent.json")]
pub struct SpecCmd {
    #[command(subcommand)]
    pub kind: SpecKind,
}

#[derive(Subcommand, Debug)]
pub enum SpecKind {
    /// A raw SQL string with positional `?` parameters
    Raw(RawSpecArgs),

    /// A structured select
    Select(SelectSpecArgs),
}

/// Metadata common to both specification kinds
#[derive(Args, Debug, Clone, Default)]
pub struct MetadataArgs {
    /// Caller-defined tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Free-form comment
    #[arg(long)]
    pub comment: Option<String>,

    /// Caller-defined version
    #[arg(long, default_value_t = 0)]
    pub version: i32,
}

#[derive(Args, Debug)]
pub struct RawSpecArgs {
    /// SQL text
    #[arg(long)]
    pub sql: String,

    /// Positional parameter, repeat in order
    #[arg(long = "arg")]
    pub args: Vec<String>,

    #[command(flatten)]
    pub meta: MetadataArgs,
}

#[derive(Args, Debug)]
pub struct SelectSpecArgs {
    /// FROM clause: a table or join expression
    #[arg(long)]
    pub tables: String,

    /// Projected column, repeat in order (all columns when omitted)
    #[arg(short, long = "column")]
    pub columns: Vec<String>,

    /// WHERE clause without the keyword
    #[arg(long)]
    pub selection: Option<String>,

    /// Selection parameter, repeat in order
    #[arg(long = "arg")]
    pub args: Vec<String>,

    #[arg(long)]
    pub group_by: Option<String>,

    #[arg(long)]
    pub having: Option<String>,

    #[arg(long)]
    pub sort_order: Option<String>,

    /// `n` or `offset, n`
    #[arg(long)]
    pub limit: Option<String>,

    #[arg(long, default_value_t = false)]
    pub distinct: bool,

    /// Validate the selection on its own before running
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    #[command(flatten)]
    pub meta: MetadataArgs,
}
