//! Symbolic cell references used inside formula templates.
//!
//! A template is ordinary formula text in which every cell address is
//! replaced by a `{...}` token:
//!
//! ```text
//! {[$][sheet!]key.column}
//! ```
//!
//! * `key` is a row key of the target sheet, or `@` for the row holding the
//!   formula.
//! * `column` is a column letter, `#` for the column holding the formula or
//!   `<` for the column before it. The last two only make sense in forecast
//!   series rows.
//! * `sheet!` names another sheet; without it the reference stays local.
//! * A leading `$` renders an absolute address such as `$B$6`.

use rust_xlsxwriter::utility::{row_col_to_cell, row_col_to_cell_absolute};

use crate::model::{ColIndex, RowIndex};

/// Highest column index a worksheet accepts (`XFD`).
const MAX_COLUMN: u32 = 16_383;

/// Row half of a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRef {
    /// The row holding the formula.
    Current,
    Key(String),
}

/// Column half of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Fixed(ColIndex),
    /// The column holding the formula.
    Current,
    /// The column left of the formula.
    Previous,
}

/// A parsed `{...}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub sheet: Option<String>,
    pub row: RowRef,
    pub column: ColumnRef,
    pub absolute: bool,
}

/// A piece of a formula template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Formula text copied verbatim.
    Text(&'a str),
    /// Body of a `{...}` token, without the braces.
    Reference(&'a str),
}

/// Splits a template into verbatim text and reference tokens.
///
/// Returns `None` when braces are unbalanced or nested.
pub fn split_template(template: &str) -> Option<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return None;
        }
        if open > 0 {
            segments.push(Segment::Text(&rest[..open]));
        }
        let after_open = &rest[open + 1..];
        let close = after_open.find(['{', '}'])?;
        if after_open[close..].starts_with('{') {
            return None;
        }
        segments.push(Segment::Reference(&after_open[..close]));
        rest = &after_open[close + 1..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    Some(segments)
}

/// Parses the body of a `{...}` token.
pub fn parse_reference(token: &str) -> Option<Reference> {
    let (absolute, token) = match token.strip_prefix('$') {
        Some(stripped) => (true, stripped),
        None => (false, token),
    };

    let (sheet, address) = match token.rsplit_once('!') {
        Some((sheet, address)) => {
            if sheet.is_empty() {
                return None;
            }
            (Some(sheet.to_string()), address)
        }
        None => (None, token),
    };

    let (key, column) = address.rsplit_once('.')?;
    let row = match key {
        "@" => RowRef::Current,
        key if is_row_key(key) => RowRef::Key(key.to_string()),
        _ => return None,
    };

    let column = match column {
        "#" => ColumnRef::Current,
        "<" => ColumnRef::Previous,
        letters => ColumnRef::Fixed(column_index(letters)?),
    };

    Some(Reference {
        sheet,
        row,
        column,
        absolute,
    })
}

/// Converts column letters (`A`, `H`, `AB`) into a zero-based index.
pub fn column_index(letters: &str) -> Option<ColIndex> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut number: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        number = number * 26 + (ch as u32 - 'A' as u32 + 1);
    }
    let index = number - 1;
    if index > MAX_COLUMN {
        return None;
    }
    Some(index as ColIndex)
}

/// Converts a zero-based column index into its letters.
pub fn column_name(col: ColIndex) -> String {
    let mut number = u32::from(col) + 1;
    let mut letters = Vec::new();
    while number > 0 {
        let remainder = (number - 1) % 26;
        letters.push(char::from(b'A' + remainder as u8));
        number = (number - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Renders a zero-based address in A1 notation.
pub fn cell_address(row: RowIndex, col: ColIndex, absolute: bool) -> String {
    if absolute {
        row_col_to_cell_absolute(row, col)
    } else {
        row_col_to_cell(row, col)
    }
}

/// Quotes a sheet name for use in a formula when it contains anything other
/// than letters, digits and underscores, or could be mistaken for a cell.
pub fn quote_sheet_name(name: &str) -> String {
    let plain = !name.is_empty()
        && name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        && !name.starts_with(|ch: char| ch.is_ascii_digit())
        && !looks_like_cell(name);

    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

fn looks_like_cell(name: &str) -> bool {
    let digits_at = name.find(|ch: char| ch.is_ascii_digit());
    match digits_at {
        Some(split) => {
            let (letters, digits) = name.split_at(split);
            column_index(&letters.to_ascii_uppercase()).is_some()
                && digits.chars().all(|ch| ch.is_ascii_digit())
        }
        None => false,
    }
}

fn is_row_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
