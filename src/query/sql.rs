//! SQL text for structured selects.
//!
//! Clause rules follow SQLite's query builder conventions: empty clauses are
//! omitted, `HAVING` requires `GROUP BY`, and `LIMIT` must be `n` or `n, m`.

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::Connection;

use super::{QueryError, SelectQuery};

static LIMIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s*(,\s*\d+\s*)?$").expect("limit pattern is valid"));

fn non_empty(clause: Option<&str>) -> Option<&str> {
    clause.filter(|c| !c.trim().is_empty())
}

/// Build the SELECT statement for `select`, with `selection` as the filter.
fn build(select: &SelectQuery, selection: Option<&str>) -> Result<String, QueryError> {
    if select.tables.trim().is_empty() {
        return Err(QueryError::InvalidSql("a select needs at least one table".to_string()));
    }

    let group_by = non_empty(select.group_by.as_deref());
    let having = non_empty(select.having.as_deref());
    if having.is_some() && group_by.is_none() {
        return Err(QueryError::InvalidSql(
            "HAVING clauses are only permitted when using a GROUP BY clause".to_string(),
        ));
    }

    let limit = non_empty(select.limit.as_deref());
    if let Some(limit) = limit {
        if !LIMIT_PATTERN.is_match(limit) {
            return Err(QueryError::InvalidSql(format!("invalid LIMIT clause: {}", limit)));
        }
    }

    let mut sql = String::from("SELECT ");
    if select.distinct {
        sql.push_str("DISTINCT ");
    }
    match select.columns.as_deref() {
        Some(columns) if !columns.is_empty() => sql.push_str(&columns.join(", ")),
        _ => sql.push('*'),
    }
    sql.push_str(" FROM ");
    sql.push_str(&select.tables);

    let clauses = [
        (" WHERE ", selection),
        (" GROUP BY ", group_by),
        (" HAVING ", having),
        (" ORDER BY ", non_empty(select.sort_order.as_deref())),
        (" LIMIT ", limit),
    ];
    for (keyword, clause) in clauses {
        if let Some(clause) = clause {
            sql.push_str(keyword);
            sql.push_str(clause);
        }
    }
    Ok(sql)
}

/// SQL text executed for `select`.
pub fn compile_select(select: &SelectQuery) -> Result<String, QueryError> {
    build(select, non_empty(select.selection.as_deref()))
}

/// Compile the statement with the selection wrapped in parentheses.
///
/// Execution then compiles it again unwrapped. A selection that closes its
/// own parentheses to append clauses cannot be valid in both forms.
pub fn validate_selection(conn: &Connection, select: &SelectQuery) -> Result<(), QueryError> {
    let Some(selection) = non_empty(select.selection.as_deref()) else {
        return Ok(());
    };
    let wrapped = format!("({})", selection);
    let sql = build(select, Some(&wrapped))?;
    conn.prepare(&sql)
        .map_err(|e| QueryError::InvalidSql(format!("selection failed validation: {}", e)))?;
    Ok(())
}
