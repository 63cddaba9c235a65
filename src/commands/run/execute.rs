use std::error::Error;
use std::fs;

use super::RunCmd;
use crate::commands::{read_rows, Context, Execute};
use crate::output::RowsResult;
use crate::query::QuerySpec;

impl Execute for RunCmd {
    type Output = RowsResult;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        let text = fs::read_to_string(&self.spec)
            .map_err(|e| format!("Failed to read {}: {}", self.spec.display(), e))?;
        let spec = QuerySpec::from_text(&text)?;

        let conn = ctx.connect()?;
        let mut cursor = spec.execute(&conn)?.with_converter(ctx.converter);
        if let Some(id_column) = self.id_column {
            cursor = cursor.with_id_alias(id_column);
        }

        let source = spec
            .tag()
            .map(str::to_string)
            .unwrap_or_else(|| self.spec.display().to_string());
        Ok(read_rows(&mut cursor, &self.fields, Some(source))?)
    }
}
