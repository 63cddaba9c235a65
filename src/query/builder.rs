//! Builders for the two specification variants.

use super::{QueryKind, QuerySpec, RawQuery, SelectQuery};

/// Metadata shared by both builders.
#[derive(Debug, Clone, Default)]
struct Metadata {
    tag: Option<String>,
    comment: Option<String>,
    version: i32,
}

impl Metadata {
    fn into_spec(self, kind: QueryKind) -> QuerySpec {
        QuerySpec {
            kind,
            tag: self.tag,
            comment: self.comment,
            version: self.version,
        }
    }
}

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

macro_rules! metadata_setters {
    () => {
        pub fn tag(mut self, tag: impl Into<String>) -> Self {
            self.meta.tag = Some(tag.into());
            self
        }

        pub fn comment(mut self, comment: impl Into<String>) -> Self {
            self.meta.comment = Some(comment.into());
            self
        }

        pub fn version(mut self, version: i32) -> Self {
            self.meta.version = version;
            self
        }
    };
}

/// Builds a [`QuerySpec`] holding a [`RawQuery`].
#[derive(Debug, Clone)]
pub struct RawQueryBuilder {
    query: RawQuery,
    meta: Metadata,
}

impl RawQueryBuilder {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            query: RawQuery {
                sql: sql.into(),
                selection_args: None,
            },
            meta: Metadata::default(),
        }
    }

    /// Values bound to the `?` placeholders, in order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.selection_args = Some(strings(args));
        self
    }

    metadata_setters!();

    pub fn build(self) -> QuerySpec {
        self.meta.into_spec(QueryKind::Raw(self.query))
    }
}

/// Builds a [`QuerySpec`] holding a [`SelectQuery`].
#[derive(Debug, Clone)]
pub struct SelectQueryBuilder {
    query: SelectQuery,
    meta: Metadata,
}

impl SelectQueryBuilder {
    /// `tables` is the FROM clause: one table or a join expression.
    pub fn new(tables: impl Into<String>) -> Self {
        Self {
            query: SelectQuery {
                tables: tables.into(),
                ..SelectQuery::default()
            },
            meta: Metadata::default(),
        }
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.query.distinct = distinct;
        self
    }

    /// Projection; all columns when never set.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.columns = Some(strings(columns));
        self
    }

    /// WHERE clause without the keyword, with `?` placeholders.
    pub fn selection(mut self, selection: impl Into<String>) -> Self {
        self.query.selection = Some(selection.into());
        self
    }

    pub fn selection_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.selection_args = Some(strings(args));
        self
    }

    pub fn group_by(mut self, group_by: impl Into<String>) -> Self {
        self.query.group_by = Some(group_by.into());
        self
    }

    pub fn having(mut self, having: impl Into<String>) -> Self {
        self.query.having = Some(having.into());
        self
    }

    pub fn sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.query.sort_order = Some(sort_order.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<String>) -> Self {
        self.query.limit = Some(limit.into());
        self
    }

    /// Validate the selection on its own before running the query.
    pub fn strict(mut self, strict: bool) -> Self {
        self.query.strict = strict;
        self
    }

    metadata_setters!();

    pub fn build(self) -> QuerySpec {
        self.meta.into_spec(QueryKind::Select(self.query))
    }
}
