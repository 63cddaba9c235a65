use std::error::Error;

use serde::Serialize;

use super::{MetadataArgs, RawSpecArgs, SelectSpecArgs, SpecCmd, SpecKind};
use crate::commands::{Context, Execute};
use crate::query::{QuerySpec, RawQueryBuilder, SelectQueryBuilder};

/// A built specification with its wire text.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct SpecResult {
    /// The wire form as JSON, so `--format json` output can be fed back to `run`.
    pub spec: serde_json::Value,
    #[serde(skip)]
    pub text: String,
}

impl SpecResult {
    fn new(spec: &QuerySpec) -> Result<Self, Box<dyn Error>> {
        // Fail on SQL the query could never run, before printing it.
        spec.compile()?;
        let text = spec.to_text()?;
        Ok(Self {
            spec: serde_json::from_str(&text)?,
            text,
        })
    }
}

macro_rules! apply_metadata {
    ($builder:expr, $meta:expr) => {{
        let MetadataArgs { tag, comment, version } = $meta;
        let mut builder = $builder.version(version);
        if let Some(tag) = tag {
            builder = builder.tag(tag);
        }
        if let Some(comment) = comment {
            builder = builder.comment(comment);
        }
        builder
    }};
}

fn raw_spec(args: RawSpecArgs) -> QuerySpec {
    let mut builder = RawQueryBuilder::new(args.sql);
    if !args.args.is_empty() {
        builder = builder.args(args.args);
    }
    apply_metadata!(builder, args.meta).build()
}

fn select_spec(args: SelectSpecArgs) -> QuerySpec {
    let mut builder = SelectQueryBuilder::new(args.tables)
        .distinct(args.distinct)
        .strict(args.strict);
    if !args.columns.is_empty() {
        builder = builder.columns(args.columns);
    }
    if !args.args.is_empty() {
        builder = builder.selection_args(args.args);
    }
    if let Some(selection) = args.selection {
        builder = builder.selection(selection);
    }
    if let Some(group_by) = args.group_by {
        builder = builder.group_by(group_by);
    }
    if let Some(having) = args.having {
        builder = builder.having(having);
    }
    if let Some(sort_order) = args.sort_order {
        builder = builder.sort_order(sort_order);
    }
    if let Some(limit) = args.limit {
        builder = builder.limit(limit);
    }
    apply_metadata!(builder, args.meta).build()
}

impl Execute for SpecCmd {
    type Output = SpecResult;

    fn execute(self, _ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        let spec = match self.kind {
            SpecKind::Raw(args) => raw_spec(args),
            SpecKind::Select(args) => select_spec(args),
        };
        SpecResult::new(&spec)
    }
}
