use serde::{Deserialize, Serialize};

/// Zero-based row index, matching the writer's coordinate system.
pub type RowIndex = u32;
/// Zero-based column index, matching the writer's coordinate system.
pub type ColIndex = u16;

/// Value stored in a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// Cell carries styling only.
    Empty,
    /// Plain string literal.
    Text(String),
    /// Floating point number literal.
    Number(f64),
    /// Formula text including the leading `=`. Never evaluated here.
    Formula(String),
}

impl CellValue {
    /// Returns `true` for literal text or numbers.
    pub fn is_literal(&self) -> bool {
        matches!(self, CellValue::Text(_) | CellValue::Number(_))
    }

    /// Returns the formula text when the cell holds one.
    pub fn formula(&self) -> Option<&str> {
        match self {
            CellValue::Formula(text) => Some(text),
            _ => None,
        }
    }
}

/// Presentation tag attached to a cell. The writer maps each tag to a
/// concrete format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CellStyle {
    /// Thin border, no fill.
    Bordered,
    /// Sheet title bar.
    Title { size: u8 },
    /// Column header or banner.
    Header,
    /// Row-group label.
    Section,
    /// Value meant to be edited by hand.
    Input,
    /// Value derived by a formula.
    Computed,
    /// Bold cell on the totals fill.
    Strong { size: u8 },
    /// Ratio shown as a percentage.
    Percent { emphasis: bool },
    /// Italic footnote.
    Note,
}

/// A cell placed at its final address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedCell {
    pub row: RowIndex,
    pub col: ColIndex,
    pub value: CellValue,
    pub style: CellStyle,
}

/// A rectangular block merged into one cell that displays `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRange {
    pub first_row: RowIndex,
    pub first_col: ColIndex,
    pub last_row: RowIndex,
    pub last_col: ColIndex,
    pub text: String,
    pub style: CellStyle,
}

/// A cross-sheet reference emitted by a formula, recorded for verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReference {
    pub from_row: RowIndex,
    pub from_col: ColIndex,
    pub sheet: String,
    pub row: RowIndex,
    pub col: ColIndex,
}

/// One fully laid-out worksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub name: String,
    pub description: String,
    /// Column widths in character units; the length is the sheet width.
    pub widths: Vec<f64>,
    pub cells: Vec<PlacedCell>,
    pub merges: Vec<MergedRange>,
    pub references: Vec<CellReference>,
    /// Last row that holds content.
    pub last_row: RowIndex,
}

impl SheetLayout {
    /// Number of columns the sheet spans.
    pub fn width(&self) -> ColIndex {
        self.widths.len() as ColIndex
    }

    /// Looks up the cell placed at the given address.
    pub fn cell(&self, row: RowIndex, col: ColIndex) -> Option<&PlacedCell> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.col == col)
    }
}

/// The complete workbook, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookLayout {
    pub sheets: Vec<SheetLayout>,
}

impl WorkbookLayout {
    /// Looks up a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    /// Total number of placed cells across all sheets.
    pub fn cell_count(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.cells.len()).sum()
    }
}
