use std::collections::BTreeMap;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};

use crate::error::{CalculatorError, Result};
use crate::model::{CellValue, ColIndex, RowIndex};

/// Cells of one worksheet as read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    pub name: String,
    /// Non-empty cells keyed by zero-based `(row, col)`. Formula cells hold
    /// their formula text rather than the cached result.
    pub cells: BTreeMap<(RowIndex, ColIndex), CellValue>,
}

impl SheetSnapshot {
    /// Returns the value stored at the given address.
    pub fn get(&self, row: RowIndex, col: ColIndex) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Bottom-right corner of the populated range, or `None` for an empty
    /// sheet.
    pub fn extent(&self) -> Option<(RowIndex, ColIndex)> {
        let last_row = self.cells.keys().map(|(row, _)| *row).max()?;
        let last_col = self.cells.keys().map(|(_, col)| *col).max()?;
        Some((last_row, last_col))
    }

    /// Whether the address falls inside the populated range.
    pub fn contains(&self, row: RowIndex, col: ColIndex) -> bool {
        self.extent()
            .is_some_and(|(last_row, last_col)| row <= last_row && col <= last_col)
    }
}

/// Every worksheet of a workbook, in workbook order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookSnapshot {
    pub sheets: Vec<SheetSnapshot>,
}

impl WorkbookSnapshot {
    pub fn sheet(&self, name: &str) -> Option<&SheetSnapshot> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }
}

/// Reads values and formula text of every worksheet in the workbook.
pub fn read_workbook(path: &Path) -> Result<WorkbookSnapshot> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let names = workbook.sheet_names().to_owned();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let values = read_required_sheet(&mut workbook, &name)?;
        let formulas = read_required_formulas(&mut workbook, &name)?;

        let mut cells = BTreeMap::new();
        for (position, value) in absolute_cells(&values) {
            if let Some(value) = cell_to_value(value) {
                cells.insert(position, value);
            }
        }
        for (position, formula) in absolute_cells(&formulas) {
            if !formula.is_empty() {
                cells.insert(position, CellValue::Formula(format!("={formula}")));
            }
        }

        sheets.push(SheetSnapshot { name, cells });
    }

    Ok(WorkbookSnapshot { sheets })
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| CalculatorError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(CalculatorError::from)?;
    Ok(range)
}

fn read_required_formulas<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<Range<String>> {
    let range_result = workbook.worksheet_formula(name).ok_or_else(|| {
        CalculatorError::InvalidWorkbook(format!("missing formulas for sheet '{name}'"))
    })?;
    let range = range_result.map_err(CalculatorError::from)?;
    Ok(range)
}

/// Yields used cells with positions translated from range-relative to
/// worksheet-absolute coordinates.
fn absolute_cells<T>(range: &Range<T>) -> Vec<((RowIndex, ColIndex), &T)>
where
    T: calamine::CellType,
{
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    range
        .used_cells()
        .map(|(row, col, value)| {
            let position = (
                start_row + row as RowIndex,
                (start_col as usize + col) as ColIndex,
            );
            (position, value)
        })
        .collect()
}

fn cell_to_value(cell: &DataType) -> Option<CellValue> {
    match cell {
        DataType::Empty => None,
        DataType::String(value) => Some(CellValue::Text(value.clone())),
        DataType::Float(value) => Some(CellValue::Number(*value)),
        DataType::Int(value) => Some(CellValue::Number(*value as f64)),
        DataType::Bool(value) => Some(CellValue::Text(value.to_string())),
        other => Some(CellValue::Text(other.to_string())),
    }
}
