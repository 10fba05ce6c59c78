//! Declarative description of the cost calculator workbook.
//!
//! A workbook is a list of [`SheetSchema`] values; each sheet is an ordered
//! list of [`RowSchema`] values, one per spreadsheet row. Formulas are written
//! as templates with symbolic `{sheet!key.column}` references that the
//! [`layout`](crate::layout) module resolves into A1 addresses, so rows can be
//! added or reordered without touching any formula.

mod tables;

pub use tables::cost_model;

use crate::model::{ColIndex, RowIndex};

/// Sheet holding the hand-edited inputs and the derived monthly volumes.
pub const CONTROL_SHEET: &str = "control-panel";
/// Sheet pricing the AI and generation services.
pub const AI_SHEET: &str = "AI-generation-costs";
/// Sheet pricing servers, databases and storage.
pub const INFRASTRUCTURE_SHEET: &str = "infrastructure-costs";
/// Sheet pricing notifications and integrations.
pub const TRAFFIC_SHEET: &str = "traffic-costs";
/// Sheet rolling the three category subtotals into a grand total.
pub const TOTALS_SHEET: &str = "totals-summary";
/// Sheet projecting users and costs month by month.
pub const FORECAST_SHEET: &str = "six-month-forecast";
/// Sheet comparing LLM providers by token price.
pub const TOKENS_SHEET: &str = "token-cost-calculator";

/// Sheet names in workbook order.
pub const SHEET_ORDER: [&str; 7] = [
    CONTROL_SHEET,
    AI_SHEET,
    INFRASTRUCTURE_SHEET,
    TRAFFIC_SHEET,
    TOTALS_SHEET,
    FORECAST_SHEET,
    TOKENS_SHEET,
];

/// Row holding the merged sheet title.
pub const TITLE_ROW: RowIndex = 0;
/// Row receiving the first entry of [`SheetSchema::rows`].
pub const FIRST_BODY_ROW: RowIndex = 2;
/// Number of month columns in a forecast [`Series`].
pub const FORECAST_MONTHS: ColIndex = 6;

/// A sheet as a title plus an ordered list of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSchema {
    pub name: &'static str,
    /// Human readable purpose, printed in the completion summary.
    pub description: &'static str,
    pub title: &'static str,
    pub title_size: u8,
    /// Column widths; the length defines how many columns the sheet spans.
    pub widths: Vec<f64>,
    pub rows: Vec<RowSchema>,
}

/// One spreadsheet row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowSchema {
    Blank,
    /// Column headers.
    Header(Vec<&'static str>),
    /// Full-width merged header bar.
    Banner(&'static str),
    /// Row-group label spanning the sheet width.
    Section(&'static str),
    Line(Line),
    Series(Series),
    Total(Total),
    /// Italic footnote in the first column.
    Note(&'static str),
}

/// Content of one cell in a [`Line`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Empty,
    Text(&'static str),
    Number(f64),
    /// Formula template; see [`crate::layout::reference`] for the syntax.
    Formula(&'static str),
}

impl From<f64> for Entry {
    fn from(value: f64) -> Self {
        Entry::Number(value)
    }
}

impl From<&'static str> for Entry {
    /// Empty strings become [`Entry::Empty`] and text starting with `=`
    /// becomes a formula template.
    fn from(value: &'static str) -> Self {
        if value.is_empty() {
            Entry::Empty
        } else if value.starts_with('=') {
            Entry::Formula(value)
        } else {
            Entry::Text(value)
        }
    }
}

/// Highlight applied to a single column of a [`Line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    /// Hand-edited input.
    Input,
    /// Derived value.
    Computed,
}

/// A data row. Keyed lines can be referenced from formula templates.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub key: Option<&'static str>,
    pub cells: Vec<Entry>,
    pub accents: Vec<(ColIndex, Accent)>,
}

impl Line {
    /// Creates a keyed line from its cells.
    pub fn new(key: &'static str, cells: Vec<Entry>) -> Self {
        Self {
            key: Some(key),
            cells,
            accents: Vec::new(),
        }
    }

    /// Creates a line that nothing refers to.
    pub fn anonymous(cells: Vec<Entry>) -> Self {
        Self {
            key: None,
            cells,
            accents: Vec::new(),
        }
    }

    /// Highlights one column.
    pub fn accent(mut self, col: ColIndex, accent: Accent) -> Self {
        self.accents.push((col, accent));
        self
    }
}

/// A forecast row: a label followed by one formula per month and an
/// optional growth column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub key: &'static str,
    pub label: &'static str,
    /// Template for the first month.
    pub first: &'static str,
    /// Template for every later month; `<` addresses the previous month.
    pub rest: &'static str,
    /// Appends `last / first - 1` as a percentage.
    pub growth: bool,
    /// Renders the row on the totals fill with a bold label.
    pub emphasis: bool,
}

/// A `SUM` over the data rows between the nearest header above and this row.
#[derive(Debug, Clone, PartialEq)]
pub struct Total {
    pub key: &'static str,
    pub label: &'static str,
    /// Column that is summed and receives the formula.
    pub column: ColIndex,
    /// Additional cells written on the same row.
    pub extras: Vec<(ColIndex, Entry)>,
    pub font_size: u8,
}

impl Total {
    pub fn new(key: &'static str, label: &'static str, column: ColIndex) -> Self {
        Self {
            key,
            label,
            column,
            extras: Vec::new(),
            font_size: 11,
        }
    }
}
