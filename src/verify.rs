//! Checks a written workbook against the layout it was produced from.

use tracing::{debug, instrument};

use crate::error::{CalculatorError, Result};
use crate::io::excel_read::WorkbookSnapshot;
use crate::layout::reference::cell_address;
use crate::model::{CellValue, WorkbookLayout};

/// What a successful verification covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyReport {
    pub sheets: usize,
    /// Literal, formula and merged-title cells compared.
    pub cells_checked: usize,
    /// Cross-sheet references confirmed to land inside their target sheet.
    pub references_checked: usize,
}

/// Confirms that the snapshot holds the sheets of `layout` in order, that every
/// laid-out value reads back unchanged, and that every cross-sheet reference
/// points inside the populated range of an existing sheet.
#[instrument(level = "debug", skip_all, fields(sheet_count = layout.sheets.len()))]
pub fn verify_workbook(
    layout: &WorkbookLayout,
    snapshot: &WorkbookSnapshot,
) -> Result<VerifyReport> {
    let expected = layout.sheet_names();
    let found = snapshot.sheet_names();
    if expected != found {
        return Err(CalculatorError::InvalidWorkbook(format!(
            "expected sheets {expected:?}, found {found:?}"
        )));
    }

    let mut report = VerifyReport {
        sheets: layout.sheets.len(),
        cells_checked: 0,
        references_checked: 0,
    };

    for (sheet, read_back) in layout.sheets.iter().zip(&snapshot.sheets) {
        for cell in &sheet.cells {
            if cell.value == CellValue::Empty {
                continue;
            }
            let actual = read_back.get(cell.row, cell.col);
            if actual != Some(&cell.value) {
                return Err(CalculatorError::InvalidWorkbook(format!(
                    "{}!{}: expected {:?}, found {:?}",
                    sheet.name,
                    cell_address(cell.row, cell.col, false),
                    cell.value,
                    actual
                )));
            }
            report.cells_checked += 1;
        }

        for merge in &sheet.merges {
            let expected = CellValue::Text(merge.text.clone());
            let actual = read_back.get(merge.first_row, merge.first_col);
            if actual != Some(&expected) {
                return Err(CalculatorError::InvalidWorkbook(format!(
                    "{}!{}: expected merged text {:?}, found {:?}",
                    sheet.name,
                    cell_address(merge.first_row, merge.first_col, false),
                    merge.text,
                    actual
                )));
            }
            report.cells_checked += 1;
        }

        for reference in &sheet.references {
            let target = snapshot.sheet(&reference.sheet).ok_or_else(|| {
                CalculatorError::InvalidWorkbook(format!(
                    "{}!{} references missing sheet '{}'",
                    sheet.name,
                    cell_address(reference.from_row, reference.from_col, false),
                    reference.sheet
                ))
            })?;
            if !target.contains(reference.row, reference.col) {
                return Err(CalculatorError::InvalidWorkbook(format!(
                    "{}!{} references {}!{} outside the populated range",
                    sheet.name,
                    cell_address(reference.from_row, reference.from_col, false),
                    reference.sheet,
                    cell_address(reference.row, reference.col, false)
                )));
            }
            report.references_checked += 1;
        }

        debug!(sheet = sheet.name.as_str(), "sheet verified");
    }

    Ok(report)
}
