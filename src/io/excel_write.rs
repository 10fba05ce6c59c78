use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use crate::error::Result;
use crate::model::{CellStyle, CellValue, WorkbookLayout};

const HEADER_FILL: u32 = 0x1F4E79;
const SECTION_FILL: u32 = 0xD6DCE5;
const TOTAL_FILL: u32 = 0xE2EFDA;
const INPUT_FILL: u32 = 0xFFF2CC;
const NOTE_FONT: u32 = 0x666666;

/// Writes the laid-out workbook to the given path, replacing any existing
/// file.
pub fn write_workbook(path: &Path, layout: &WorkbookLayout) -> Result<()> {
    let mut workbook_writer = Workbook::new();

    for sheet in &layout.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col_idx, width) in sheet.widths.iter().enumerate() {
            worksheet.set_column_width(col_idx as u16, *width)?;
        }

        for merge in &sheet.merges {
            worksheet.merge_range(
                merge.first_row,
                merge.first_col,
                merge.last_row,
                merge.last_col,
                &merge.text,
                &cell_format(merge.style),
            )?;
        }

        for cell in &sheet.cells {
            let format = cell_format(cell.style);
            match &cell.value {
                CellValue::Empty => worksheet.write_blank(cell.row, cell.col, &format)?,
                CellValue::Text(text) => {
                    worksheet.write_string_with_format(cell.row, cell.col, text, &format)?
                }
                CellValue::Number(value) => {
                    worksheet.write_number_with_format(cell.row, cell.col, *value, &format)?
                }
                CellValue::Formula(formula) => worksheet.write_formula_with_format(
                    cell.row,
                    cell.col,
                    formula.as_str(),
                    &format,
                )?,
            };
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}

/// Maps a presentation tag to the writer's format.
fn cell_format(style: CellStyle) -> Format {
    let bordered = Format::new().set_border(FormatBorder::Thin);
    match style {
        CellStyle::Bordered => bordered,
        CellStyle::Title { size } => Format::new()
            .set_bold()
            .set_font_size(size)
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL)),
        CellStyle::Header => bordered
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter),
        CellStyle::Section => bordered.set_background_color(Color::RGB(SECTION_FILL)),
        CellStyle::Input => bordered.set_background_color(Color::RGB(INPUT_FILL)),
        CellStyle::Computed => bordered.set_background_color(Color::RGB(TOTAL_FILL)),
        CellStyle::Strong { size } => bordered
            .set_bold()
            .set_font_size(size)
            .set_background_color(Color::RGB(TOTAL_FILL)),
        CellStyle::Percent { emphasis } => {
            let percent = bordered.set_num_format("0.0%");
            if emphasis {
                percent.set_background_color(Color::RGB(TOTAL_FILL))
            } else {
                percent
            }
        }
        CellStyle::Note => Format::new()
            .set_italic()
            .set_font_color(Color::RGB(NOTE_FONT)),
    }
}
