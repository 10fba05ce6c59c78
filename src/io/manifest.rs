use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::WorkbookLayout;

/// Writes the laid-out workbook as pretty-printed JSON.
pub fn write_manifest(path: &Path, layout: &WorkbookLayout) -> Result<()> {
    let json_string = serde_json::to_string_pretty(layout)?;
    fs::write(path, json_string)?;
    Ok(())
}

/// Loads a manifest previously produced by [`write_manifest`].
pub fn read_manifest(path: &Path) -> Result<WorkbookLayout> {
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}
