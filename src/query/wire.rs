//! JSON wire format for [`QuerySpec`].
//!
//! A flat object keyed in camelCase. String arrays are always JSON arrays of
//! strings. Keys absent from the input decode to their defaults: `None` for
//! strings and arrays, `0` for the version, `false` for the flags.

use serde::{Deserialize, Serialize};

use super::{QueryError, QueryKind, QuerySpec, QueryType, RawQuery, SelectQuery};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireSpec {
    query_type: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    model_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model_comment: Option<String>,
    #[serde(default)]
    model_version: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    raw_sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selection_args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    distinct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    having: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    projection_in: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strict: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tables: Option<String>,
}

impl TryFrom<&QuerySpec> for WireSpec {
    type Error = QueryError;

    fn try_from(spec: &QuerySpec) -> Result<Self, Self::Error> {
        let mut wire = WireSpec {
            query_type: spec.query_type().code(),
            model_tag: spec.tag.clone(),
            model_comment: spec.comment.clone(),
            model_version: spec.version,
            ..WireSpec::default()
        };

        match &spec.kind {
            QueryKind::Uninitialised => return Err(super::uninitialised("serialize")),
            QueryKind::Raw(raw) => {
                wire.raw_sql = Some(raw.sql.clone());
                wire.selection_args = raw.selection_args.clone();
            }
            QueryKind::Select(select) => {
                wire.distinct = Some(select.distinct);
                wire.group_by = select.group_by.clone();
                wire.having = select.having.clone();
                wire.limit = select.limit.clone();
                wire.projection_in = select.columns.clone();
                wire.selection = select.selection.clone();
                wire.selection_args = select.selection_args.clone();
                wire.sort_order = select.sort_order.clone();
                wire.strict = Some(select.strict);
                wire.tables = Some(select.tables.clone());
            }
        }
        Ok(wire)
    }
}

impl TryFrom<WireSpec> for QuerySpec {
    type Error = QueryError;

    fn try_from(wire: WireSpec) -> Result<Self, Self::Error> {
        let query_type = QueryType::from_code(wire.query_type).ok_or_else(|| {
            QueryError::InvalidSpecification(format!("unknown queryType {}", wire.query_type))
        })?;

        let kind = match query_type {
            QueryType::Uninitialised => QueryKind::Uninitialised,
            QueryType::Raw => QueryKind::Raw(RawQuery {
                sql: wire.raw_sql.unwrap_or_default(),
                selection_args: wire.selection_args,
            }),
            QueryType::Select => QueryKind::Select(SelectQuery {
                distinct: wire.distinct.unwrap_or(false),
                tables: wire.tables.unwrap_or_default(),
                columns: wire.projection_in,
                selection: wire.selection,
                selection_args: wire.selection_args,
                group_by: wire.group_by,
                having: wire.having,
                sort_order: wire.sort_order,
                limit: wire.limit,
                strict: wire.strict.unwrap_or(false),
            }),
        };

        Ok(QuerySpec {
            kind,
            tag: wire.model_tag,
            comment: wire.model_comment,
            version: wire.model_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value as Json, json};

    use crate::query::{QueryError, QueryKind, QuerySpec, QueryType, RawQueryBuilder, SelectQueryBuilder};

    #[rstest]
    fn test_raw_spec_wire_shape() {
        let spec = RawQueryBuilder::new("SELECT * FROM t WHERE a=?")
            .args(["5"])
            .tag("x")
            .version(3)
            .build();

        let text = spec.to_text().unwrap();
        let json: Json = serde_json::from_str(&text).unwrap();
        assert_eq!(
            json,
            json!({
                "queryType": 2,
                "modelTag": "x",
                "modelVersion": 3,
                "rawSql": "SELECT * FROM t WHERE a=?",
                "selectionArgs": ["5"]
            })
        );
        assert_eq!(QuerySpec::from_text(&text).unwrap(), spec);
    }

    #[rstest]
    fn test_select_spec_round_trips_every_field() {
        let spec = SelectQueryBuilder::new("t1 LEFT OUTER JOIN t2 ON t1.id=t2.id")
            .distinct(true)
            .columns(["t1.id", "t2.name"])
            .selection("t1.id > ?")
            .selection_args(["0"])
            .group_by("t1.id")
            .having("COUNT(*) > 0")
            .sort_order("t1.id")
            .limit("10")
            .strict(true)
            .tag("joined")
            .comment("both tables")
            .version(7)
            .build();

        let text = spec.to_text().unwrap();
        let json: Json = serde_json::from_str(&text).unwrap();
        assert_eq!(json["queryType"], 1);
        assert_eq!(json["projectionIn"], json!(["t1.id", "t2.name"]));
        assert_eq!(json["distinct"], true);
        assert_eq!(json["strict"], true);
        assert_eq!(QuerySpec::from_text(&text).unwrap(), spec);
    }

    #[rstest]
    fn test_absent_fields_decode_to_defaults() {
        let spec = QuerySpec::from_text(r#"{"queryType": 1, "tables": "data"}"#).unwrap();
        assert_eq!(spec.query_type(), QueryType::Select);
        assert_eq!(spec.tag(), None);
        assert_eq!(spec.comment(), None);
        assert_eq!(spec.version(), 0);
        let QueryKind::Select(select) = spec.kind() else {
            panic!("Expected select query");
        };
        assert!(!select.distinct());
        assert!(!select.strict());
        assert_eq!(select.columns(), None);
        assert_eq!(select.selection_args(), None);
        assert_eq!(select.limit(), None);
    }

    #[rstest]
    fn test_raw_without_args() {
        let spec = QuerySpec::from_text(r#"{"queryType": 2, "rawSql": "SELECT 1"}"#).unwrap();
        let QueryKind::Raw(raw) = spec.kind() else {
            panic!("Expected raw query");
        };
        assert_eq!(raw.sql(), "SELECT 1");
        assert_eq!(raw.selection_args(), None);
    }

    #[rstest]
    fn test_uninitialised_type_decodes() {
        let spec = QuerySpec::from_text(r#"{"queryType": 0}"#).unwrap();
        assert_eq!(spec.query_type(), QueryType::Uninitialised);
    }

    #[rstest]
    #[case(r#"{"queryType": 9}"#)]
    #[case(r#"{"queryType": -1, "rawSql": "SELECT 1"}"#)]
    fn test_unknown_type_rejected(#[case] text: &str) {
        assert!(matches!(
            QuerySpec::from_text(text),
            Err(QueryError::InvalidSpecification(_))
        ));
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"rawSql": "SELECT 1"}"#)]
    #[case(r#"{"queryType": 2, "selectionArgs": {"0": "a"}}"#)]
    fn test_malformed_text_rejected(#[case] text: &str) {
        assert!(matches!(QuerySpec::from_text(text), Err(QueryError::Json(_))));
    }
}
