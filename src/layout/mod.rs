//! Places schema rows at fixed addresses and resolves formula templates.
//!
//! Layout runs in two passes. The first pass validates sheet names and maps
//! every row key to the row it will occupy. The second pass walks each sheet
//! top to bottom, emitting cells and rewriting `{...}` tokens into A1
//! addresses through the key index, so no address is ever written by hand.

pub mod reference;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{CalculatorError, Result};
use crate::model::{
    CellReference, CellStyle, CellValue, ColIndex, MergedRange, PlacedCell, RowIndex,
    SheetLayout, WorkbookLayout,
};
use crate::schema::{
    Accent, Entry, FIRST_BODY_ROW, FORECAST_MONTHS, Line, RowSchema, Series, SheetSchema,
    TITLE_ROW, Total,
};
use reference::{ColumnRef, RowRef, Segment, cell_address, column_name, quote_sheet_name};

/// Longest sheet name a workbook accepts.
const MAX_SHEET_NAME: usize = 31;
/// Font size of regular cells.
const BODY_FONT_SIZE: u8 = 11;

/// Lays out every sheet of the provided schema.
pub fn build_workbook(sheets: &[SheetSchema]) -> Result<WorkbookLayout> {
    let index = WorkbookIndex::new(sheets)?;

    let mut layouts = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let layout = SheetBuilder::new(sheet, &index).build()?;
        debug!(
            sheet = layout.name.as_str(),
            cells = layout.cells.len(),
            references = layout.references.len(),
            "sheet laid out"
        );
        layouts.push(layout);
    }

    Ok(WorkbookLayout { sheets: layouts })
}

/// Key → row lookup for every sheet.
struct WorkbookIndex<'a> {
    sheets: HashMap<&'a str, SheetIndex<'a>>,
}

struct SheetIndex<'a> {
    width: ColIndex,
    rows: HashMap<&'a str, RowIndex>,
}

impl<'a> WorkbookIndex<'a> {
    fn new(sheets: &'a [SheetSchema]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut indexed = HashMap::with_capacity(sheets.len());

        for sheet in sheets {
            validate_sheet_name(sheet.name)?;
            if !seen.insert(sheet.name.to_lowercase()) {
                return Err(CalculatorError::DuplicateSheet(sheet.name.to_string()));
            }

            let mut rows = HashMap::new();
            for (offset, row) in sheet.rows.iter().enumerate() {
                let Some(key) = row_key(row) else {
                    continue;
                };
                let position = FIRST_BODY_ROW + offset as RowIndex;
                if rows.insert(key, position).is_some() {
                    return Err(CalculatorError::DuplicateRowKey {
                        sheet: sheet.name.to_string(),
                        key: key.to_string(),
                    });
                }
            }

            indexed.insert(
                sheet.name,
                SheetIndex {
                    width: sheet.widths.len() as ColIndex,
                    rows,
                },
            );
        }

        Ok(Self { sheets: indexed })
    }
}

fn row_key(row: &RowSchema) -> Option<&str> {
    match row {
        RowSchema::Line(line) => line.key,
        RowSchema::Series(series) => Some(series.key),
        RowSchema::Total(total) => Some(total.key),
        _ => None,
    }
}

fn validate_sheet_name(name: &str) -> Result<()> {
    let invalid = [':', '\\', '/', '?', '*', '[', ']'];
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.chars().count() > MAX_SHEET_NAME {
        Some("name is longer than 31 characters")
    } else if name.chars().any(|ch| invalid.contains(&ch) || ch.is_control()) {
        Some("name contains a character that is not allowed")
    } else if name.starts_with('\'') || name.ends_with('\'') {
        Some("name starts or ends with an apostrophe")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CalculatorError::InvalidSheetName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Where the formula being resolved sits.
#[derive(Clone, Copy)]
struct Origin {
    row: RowIndex,
    col: ColIndex,
    /// Whether `#` and `<` columns are allowed.
    series: bool,
}

struct SheetBuilder<'s, 'i> {
    schema: &'s SheetSchema,
    index: &'i WorkbookIndex<'s>,
    width: ColIndex,
    cells: Vec<PlacedCell>,
    merges: Vec<MergedRange>,
    references: Vec<CellReference>,
    last_row: RowIndex,
    /// Data rows seen since the most recent header.
    table_rows: Vec<RowIndex>,
}

impl<'s, 'i> SheetBuilder<'s, 'i> {
    fn new(schema: &'s SheetSchema, index: &'i WorkbookIndex<'s>) -> Self {
        Self {
            schema,
            index,
            width: schema.widths.len() as ColIndex,
            cells: Vec::new(),
            merges: Vec::new(),
            references: Vec::new(),
            last_row: TITLE_ROW,
            table_rows: Vec::new(),
        }
    }

    fn build(mut self) -> Result<SheetLayout> {
        let schema = self.schema;
        self.merge(
            TITLE_ROW,
            schema.title,
            CellStyle::Title {
                size: schema.title_size,
            },
        );

        for (offset, row) in schema.rows.iter().enumerate() {
            let position = FIRST_BODY_ROW + offset as RowIndex;
            match row {
                RowSchema::Blank => continue,
                RowSchema::Header(labels) => self.header(position, labels),
                RowSchema::Banner(text) => self.merge(position, text, CellStyle::Header),
                RowSchema::Section(label) => self.section(position, label),
                RowSchema::Line(line) => self.line(position, line)?,
                RowSchema::Series(series) => self.series(position, series)?,
                RowSchema::Total(total) => self.total(position, total)?,
                RowSchema::Note(text) => {
                    self.place(position, 0, CellValue::Text(text.to_string()), CellStyle::Note)
                }
            }
            self.last_row = position;
        }

        Ok(SheetLayout {
            name: schema.name.to_string(),
            description: schema.description.to_string(),
            widths: schema.widths.clone(),
            cells: self.cells,
            merges: self.merges,
            references: self.references,
            last_row: self.last_row,
        })
    }

    fn place(&mut self, row: RowIndex, col: ColIndex, value: CellValue, style: CellStyle) {
        self.cells.push(PlacedCell {
            row,
            col,
            value,
            style,
        });
    }

    fn merge(&mut self, row: RowIndex, text: &str, style: CellStyle) {
        self.merges.push(MergedRange {
            first_row: row,
            first_col: 0,
            last_row: row,
            last_col: self.width.saturating_sub(1),
            text: text.to_string(),
            style,
        });
    }

    fn header(&mut self, row: RowIndex, labels: &[&str]) {
        for (col, label) in labels.iter().enumerate() {
            self.place(
                row,
                col as ColIndex,
                CellValue::Text(label.to_string()),
                CellStyle::Header,
            );
        }
        self.table_rows.clear();
    }

    fn section(&mut self, row: RowIndex, label: &str) {
        self.place(row, 0, CellValue::Text(label.to_string()), CellStyle::Section);
        for col in 1..self.width {
            self.place(row, col, CellValue::Empty, CellStyle::Section);
        }
    }

    fn line(&mut self, row: RowIndex, line: &Line) -> Result<()> {
        if line.cells.len() > self.width as usize {
            return Err(CalculatorError::ColumnOutOfRange {
                sheet: self.schema.name.to_string(),
                target: self.schema.name.to_string(),
                column: column_name(line.cells.len() as ColIndex - 1),
            });
        }

        for col in 0..self.width {
            let entry = line.cells.get(col as usize).unwrap_or(&Entry::Empty);
            let origin = Origin {
                row,
                col,
                series: false,
            };
            let value = self.entry_value(entry, origin)?;
            let style = line
                .accents
                .iter()
                .find(|(accented, _)| *accented == col)
                .map(|(_, accent)| match accent {
                    Accent::Input => CellStyle::Input,
                    Accent::Computed => CellStyle::Computed,
                })
                .unwrap_or(CellStyle::Bordered);
            self.place(row, col, value, style);
        }
        self.table_rows.push(row);
        Ok(())
    }

    fn series(&mut self, row: RowIndex, series: &Series) -> Result<()> {
        let growth_col = FORECAST_MONTHS + 1;
        if growth_col >= self.width {
            return Err(CalculatorError::ColumnOutOfRange {
                sheet: self.schema.name.to_string(),
                target: self.schema.name.to_string(),
                column: column_name(growth_col),
            });
        }

        let (label_style, body_style) = if series.emphasis {
            (
                CellStyle::Strong {
                    size: BODY_FONT_SIZE,
                },
                CellStyle::Computed,
            )
        } else {
            (CellStyle::Bordered, CellStyle::Bordered)
        };

        self.place(row, 0, CellValue::Text(series.label.to_string()), label_style);
        for col in 1..=FORECAST_MONTHS {
            let template = if col == 1 { series.first } else { series.rest };
            let origin = Origin {
                row,
                col,
                series: true,
            };
            let formula = self.resolve(template, origin)?;
            self.place(row, col, CellValue::Formula(formula), body_style);
        }

        if series.growth {
            let formula = format!(
                "={}/{}-1",
                cell_address(row, FORECAST_MONTHS, false),
                cell_address(row, 1, false)
            );
            self.place(
                row,
                growth_col,
                CellValue::Formula(formula),
                CellStyle::Percent {
                    emphasis: series.emphasis,
                },
            );
        } else {
            self.place(row, growth_col, CellValue::Empty, body_style);
        }

        self.table_rows.push(row);
        Ok(())
    }

    fn total(&mut self, row: RowIndex, total: &Total) -> Result<()> {
        let (Some(first), Some(last)) = (
            self.table_rows.iter().min().copied(),
            self.table_rows.iter().max().copied(),
        ) else {
            return Err(CalculatorError::EmptyTotal {
                sheet: self.schema.name.to_string(),
                key: total.key.to_string(),
            });
        };

        let strong = CellStyle::Strong {
            size: total.font_size,
        };
        let sum = format!(
            "=SUM({}:{})",
            cell_address(first, total.column, false),
            cell_address(last, total.column, false)
        );

        for col in 0..self.width {
            if col == 0 {
                self.place(row, col, CellValue::Text(total.label.to_string()), strong);
            } else if col == total.column {
                self.place(row, col, CellValue::Formula(sum.clone()), strong);
            } else {
                let entry = total
                    .extras
                    .iter()
                    .find(|(extra, _)| *extra == col)
                    .map(|(_, entry)| entry)
                    .unwrap_or(&Entry::Empty);
                let origin = Origin {
                    row,
                    col,
                    series: false,
                };
                let value = self.entry_value(entry, origin)?;
                self.place(row, col, value, CellStyle::Bordered);
            }
        }
        Ok(())
    }

    fn entry_value(&mut self, entry: &Entry, origin: Origin) -> Result<CellValue> {
        Ok(match entry {
            Entry::Empty => CellValue::Empty,
            Entry::Text(text) => CellValue::Text(text.to_string()),
            Entry::Number(value) => CellValue::Number(*value),
            Entry::Formula(template) => CellValue::Formula(self.resolve(template, origin)?),
        })
    }

    /// Rewrites every `{...}` token of a template into an A1 address.
    fn resolve(&mut self, template: &str, origin: Origin) -> Result<String> {
        let segments =
            reference::split_template(template).ok_or_else(|| self.malformed(template))?;

        let mut formula = String::with_capacity(template.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => formula.push_str(text),
                Segment::Reference(token) => {
                    let address = self.resolve_token(token, origin)?;
                    formula.push_str(&address);
                }
            }
        }
        Ok(formula)
    }

    fn resolve_token(&mut self, token: &str, origin: Origin) -> Result<String> {
        let parsed = reference::parse_reference(token).ok_or_else(|| self.malformed(token))?;
        let index = self.index;
        let own_name = self.schema.name;
        let target_name = parsed.sheet.as_deref().unwrap_or(own_name);
        let cross_sheet = target_name != own_name;

        let target = index.sheets.get(target_name).ok_or_else(|| {
            CalculatorError::UnresolvedSheet {
                sheet: own_name.to_string(),
                target: target_name.to_string(),
            }
        })?;

        let row = match &parsed.row {
            RowRef::Current if cross_sheet => return Err(self.malformed(token)),
            RowRef::Current => origin.row,
            RowRef::Key(key) => {
                *target
                    .rows
                    .get(key.as_str())
                    .ok_or_else(|| CalculatorError::UnresolvedRow {
                        sheet: own_name.to_string(),
                        target: target_name.to_string(),
                        key: key.clone(),
                    })?
            }
        };

        let col = match parsed.column {
            ColumnRef::Fixed(col) => col,
            ColumnRef::Current if origin.series => origin.col,
            ColumnRef::Previous if origin.series && origin.col > 1 => origin.col - 1,
            ColumnRef::Current | ColumnRef::Previous => return Err(self.malformed(token)),
        };

        if col >= target.width {
            return Err(CalculatorError::ColumnOutOfRange {
                sheet: own_name.to_string(),
                target: target_name.to_string(),
                column: column_name(col),
            });
        }

        let address = cell_address(row, col, parsed.absolute);
        if !cross_sheet {
            return Ok(address);
        }

        self.references.push(CellReference {
            from_row: origin.row,
            from_col: origin.col,
            sheet: target_name.to_string(),
            row,
            col,
        });
        Ok(format!("{}!{}", quote_sheet_name(target_name), address))
    }

    fn malformed(&self, token: &str) -> CalculatorError {
        CalculatorError::MalformedReference {
            sheet: self.schema.name.to_string(),
            token: token.to_string(),
        }
    }
}
