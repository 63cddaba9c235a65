//! Execute tests for the run command.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::super::RunCmd;
    use crate::commands::{Context, Execute};
    use crate::db::DatabaseConfig;
    use crate::query::{RawQueryBuilder, SelectQueryBuilder};
    use crate::value::Value;

    /// A database file holding a small `people` table.
    #[fixture]
    fn workspace() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let conn = crate::db::open_db(&dir.path().join("rows.sqlite")).unwrap();
        conn.execute_batch(
            "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT, active INTEGER);
             INSERT INTO people VALUES (1, 'ada', 1), (2, 'brian', 0), (3, 'chen', 1);",
        )
        .unwrap();
        dir
    }

    fn context(dir: &Path) -> Context {
        Context {
            database: DatabaseConfig::Sqlite { path: dir.join("rows.sqlite") },
            ..Context::default()
        }
    }

    fn write_spec(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("spec.json");
        fs::write(&path, text).unwrap();
        path
    }

    #[rstest]
    fn test_run_select_spec(workspace: TempDir) {
        let spec = SelectQueryBuilder::new("people")
            .columns(["id", "name"])
            .selection("active = ?")
            .selection_args(["1"])
            .sort_order("id")
            .tag("active")
            .build();
        let cmd = RunCmd {
            spec: write_spec(workspace.path(), &spec.to_text().unwrap()),
            fields: vec![],
            id_column: None,
        };

        let result = cmd.execute(&context(workspace.path())).unwrap();
        assert_eq!(result.source.as_deref(), Some("active"));
        assert_eq!(result.columns, ["id", "name"]);
        assert_eq!(result.cells.len(), 2);
        assert_eq!(result.cells[1][1], Value::from("chen"));
    }

    #[rstest]
    fn test_run_with_id_alias(workspace: TempDir) {
        let spec = RawQueryBuilder::new("SELECT id AS person, name FROM people ORDER BY id").build();
        let cmd = RunCmd {
            spec: write_spec(workspace.path(), &spec.to_text().unwrap()),
            fields: vec!["_id".to_string(), "name".to_string()],
            id_column: Some("person".to_string()),
        };

        let result = cmd.execute(&context(workspace.path())).unwrap();
        assert_eq!(result.cells[0], vec![Value::Long(1), Value::from("ada")]);
        assert!(result.source.unwrap().ends_with("spec.json"));
    }

    #[rstest]
    fn test_run_missing_spec_file(workspace: TempDir) {
        let cmd = RunCmd {
            spec: workspace.path().join("absent.json"),
            fields: vec![],
            id_column: None,
        };
        let err = cmd.execute(&context(workspace.path())).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[rstest]
    fn test_run_malformed_spec(workspace: TempDir) {
        let cmd = RunCmd {
            spec: write_spec(workspace.path(), r#"{"queryType": 7}"#),
            fields: vec![],
            id_column: None,
        };
        assert!(cmd.execute(&context(workspace.path())).is_err());
    }

    #[rstest]
    fn test_run_uninitialised_spec(workspace: TempDir) {
        let cmd = RunCmd {
            spec: write_spec(workspace.path(), r#"{"queryType": 0}"#),
            fields: vec![],
            id_column: None,
        };
        let err = cmd.execute(&context(workspace.path())).unwrap_err();
        assert!(err.to_string().contains("uninitialised"));
    }
}
