use std::error::Error;
use std::fs;

use super::DocumentsCmd;
use crate::commands::{read_rows, Context, Execute};
use crate::cursor::{DocumentRows, TypedCursor};
use crate::output::RowsResult;

impl Execute for DocumentsCmd {
    type Output = RowsResult;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        let content = fs::read_to_string(&self.file)
            .map_err(|e| format!("Failed to read {}: {}", self.file.display(), e))?;
        let documents: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid JSON in {}: {}", self.file.display(), e))?;

        let mut cursor = TypedCursor::new(DocumentRows::from_json(documents)?).with_converter(ctx.converter);
        if let Some(id_field) = self.id_field {
            cursor = cursor.with_id_alias(id_field);
        }

        Ok(read_rows(&mut cursor, &self.fields, Some(self.file.display().to_string()))?)
    }
}
