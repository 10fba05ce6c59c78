use cost_calculator::CalculatorError;
use cost_calculator::generate::build_layout;
use cost_calculator::layout::build_workbook;
use cost_calculator::layout::reference::{
    ColumnRef, Reference, RowRef, Segment, column_index, column_name, parse_reference,
    quote_sheet_name, split_template,
};
use cost_calculator::model::{CellStyle, CellValue};
use cost_calculator::schema::{
    Entry, FORECAST_SHEET, Line, RowSchema, SheetSchema, TOKENS_SHEET, Total,
};

fn sheet(name: &'static str, rows: Vec<RowSchema>) -> SheetSchema {
    SheetSchema {
        name,
        description: "test sheet",
        title: "TEST",
        title_size: 14,
        widths: vec![20.0, 12.0, 12.0],
        rows,
    }
}

fn line(key: &'static str, value: &'static str) -> RowSchema {
    RowSchema::Line(Line::new(key, vec![Entry::Text(key), value.into()]))
}

#[test]
fn parses_absolute_cross_sheet_reference() {
    let parsed = parse_reference("$control-panel!growth.B").expect("reference parsed");
    assert_eq!(
        parsed,
        Reference {
            sheet: Some("control-panel".to_string()),
            row: RowRef::Key("growth".to_string()),
            column: ColumnRef::Fixed(1),
            absolute: true,
        }
    );
}

#[test]
fn parses_relative_series_columns() {
    let current = parse_reference("users.#").expect("current column");
    assert_eq!(current.column, ColumnRef::Current);
    assert_eq!(current.sheet, None);

    let previous = parse_reference("cumulative.<").expect("previous column");
    assert_eq!(previous.column, ColumnRef::Previous);

    let own_row = parse_reference("@.C").expect("own row");
    assert_eq!(own_row.row, RowRef::Current);
}

#[test]
fn rejects_malformed_reference_tokens() {
    for token in ["", "users", "users.", ".B", "users.b", "!users.B", "users.B1", "a-b.B"] {
        assert!(parse_reference(token).is_none(), "{token:?} should not parse");
    }
}

#[test]
fn splits_templates_into_segments() {
    let segments = split_template("=SUM({a.B},{b.B})*2").expect("template split");
    assert_eq!(
        segments,
        vec![
            Segment::Text("=SUM("),
            Segment::Reference("a.B"),
            Segment::Text(","),
            Segment::Reference("b.B"),
            Segment::Text(")*2"),
        ]
    );

    assert!(split_template("={a.B").is_none());
    assert!(split_template("=a.B}").is_none());
    assert!(split_template("={a{b}.B}").is_none());
    assert_eq!(split_template("=1+2"), Some(vec![Segment::Text("=1+2")]));
}

#[test]
fn converts_between_column_letters_and_indices() {
    assert_eq!(column_index("A"), Some(0));
    assert_eq!(column_index("H"), Some(7));
    assert_eq!(column_index("AA"), Some(26));
    assert_eq!(column_index("XFD"), Some(16_383));
    assert_eq!(column_index("XFE"), None);
    assert_eq!(column_name(0), "A");
    assert_eq!(column_name(25), "Z");
    assert_eq!(column_name(27), "AB");
}

#[test]
fn quotes_sheet_names_only_when_needed() {
    assert_eq!(quote_sheet_name("CONTROL"), "CONTROL");
    assert_eq!(quote_sheet_name("Token_Calculator"), "Token_Calculator");
    assert_eq!(quote_sheet_name("control-panel"), "'control-panel'");
    assert_eq!(quote_sheet_name("six month"), "'six month'");
    assert_eq!(quote_sheet_name("6M"), "'6M'");
    assert_eq!(quote_sheet_name("AB12"), "'AB12'");
    assert_eq!(quote_sheet_name("owner's"), "'owner''s'");
}

#[test]
fn forecast_rows_chain_months_and_report_growth() {
    let layout = build_layout().expect("layout built");
    let forecast = layout.sheet(FORECAST_SHEET).expect("forecast sheet");
    let formula = |row: u32, col: u16| {
        forecast
            .cell(row, col)
            .and_then(|cell| cell.value.formula())
            .unwrap_or_default()
            .to_string()
    };

    assert_eq!(formula(3, 1), "='control-panel'!B5");
    assert_eq!(formula(3, 2), "=B4*(1+'control-panel'!$B$6/100)");
    assert_eq!(formula(3, 6), "=F4*(1+'control-panel'!$B$6/100)");
    assert_eq!(formula(3, 7), "=G4/B4-1");
    assert_eq!(formula(4, 3), "=D4*'control-panel'!$B$10");
    assert_eq!(formula(11, 1), "=B8+B9+B10");
    assert_eq!(formula(12, 1), "=B12");
    assert_eq!(formula(12, 2), "=B13+C12");
    assert_eq!(formula(15, 4), "=E12/E4");
    assert_eq!(formula(16, 7), "=G17/B17-1");

    assert_eq!(
        formula(7, 1),
        "=B5*'AI-generation-costs'!$B$5\
+B4*'control-panel'!$B$11*'AI-generation-costs'!$B$8\
+B4*'control-panel'!$B$12*'AI-generation-costs'!$B$11*2"
    );

    assert_eq!(
        forecast.cell(3, 7).map(|cell| cell.style),
        Some(CellStyle::Percent { emphasis: false })
    );
    assert_eq!(
        forecast.cell(11, 7).map(|cell| cell.style),
        Some(CellStyle::Percent { emphasis: true })
    );
    assert_eq!(forecast.cell(12, 7).map(|cell| &cell.value), Some(&CellValue::Empty));
    assert_eq!(
        forecast.cell(11, 0).map(|cell| cell.style),
        Some(CellStyle::Strong { size: 11 })
    );
}

#[test]
fn token_rows_price_input_and_output_tokens() {
    let layout = build_layout().expect("layout built");
    let tokens = layout.sheet(TOKENS_SHEET).expect("token sheet");
    let formula = |row: u32, col: u16| {
        tokens
            .cell(row, col)
            .and_then(|cell| cell.value.formula())
            .unwrap_or_default()
            .to_string()
    };

    assert_eq!(formula(4, 5), "=(B5*D5/1000000+C5*D5/1000000)*E5");
    assert_eq!(formula(4, 4), "='control-panel'!B25");
    assert_eq!(formula(17, 5), "=B18*D18/1000000*E18");
    assert_eq!(formula(20, 5), "=SUM(F5:F19)");
    assert_eq!(
        tokens.cell(22, 0).map(|cell| cell.style),
        Some(CellStyle::Note)
    );
}

#[test]
fn titles_and_banners_are_merged_across_the_sheet() {
    let layout = build_layout().expect("layout built");
    for sheet in &layout.sheets {
        let title = sheet.merges.first().expect("title merge");
        assert_eq!((title.first_row, title.first_col), (0, 0));
        assert_eq!(title.last_col, sheet.width() - 1);
        assert!(matches!(title.style, CellStyle::Title { .. }));
    }

    let control = layout.sheet("control-panel").expect("control sheet");
    let banner = &control.merges[1];
    assert_eq!(banner.first_row, 20);
    assert_eq!(banner.text, "CALCULATED VALUES");
}

#[test]
fn references_follow_rows_when_rows_move() {
    let original = vec![sheet(
        "inputs",
        vec![line("price", ""), line("total", "={price.A}&{price.B}")],
    )];
    let shifted = vec![sheet(
        "inputs",
        vec![
            RowSchema::Blank,
            RowSchema::Section("MOVED"),
            line("price", ""),
            line("total", "={price.A}&{price.B}"),
        ],
    )];

    let before = build_workbook(&original).expect("original layout");
    let after = build_workbook(&shifted).expect("shifted layout");

    let formula = |layout: &cost_calculator::model::WorkbookLayout, row: u32| {
        layout.sheets[0]
            .cell(row, 1)
            .and_then(|cell| cell.value.formula())
            .map(str::to_string)
    };
    assert_eq!(formula(&before, 3).as_deref(), Some("=A3&B3"));
    assert_eq!(formula(&after, 5).as_deref(), Some("=A5&B5"));
}

#[test]
fn cross_sheet_references_are_recorded() {
    let sheets = vec![
        sheet("source", vec![line("value", "")]),
        sheet("consumer", vec![line("copy", "={$source!value.A}")]),
    ];
    let layout = build_workbook(&sheets).expect("layout built");

    let consumer = &layout.sheets[1];
    assert_eq!(
        consumer.cell(2, 1).map(|cell| &cell.value),
        Some(&CellValue::Formula("=source!$A$3".to_string()))
    );
    assert_eq!(consumer.references.len(), 1);
    assert_eq!(consumer.references[0].sheet, "source");
    assert_eq!((consumer.references[0].row, consumer.references[0].col), (2, 0));
    assert!(layout.sheets[0].references.is_empty());
}

#[test]
fn unknown_sheet_is_rejected() {
    let sheets = vec![sheet("only", vec![line("a", "={missing!a.B}")])];
    let error = build_workbook(&sheets).expect_err("layout fails");
    assert!(matches!(
        error,
        CalculatorError::UnresolvedSheet { ref target, .. } if target == "missing"
    ));
}

#[test]
fn unknown_row_is_rejected() {
    let sheets = vec![sheet("only", vec![line("a", "={b.B}")])];
    let error = build_workbook(&sheets).expect_err("layout fails");
    assert!(matches!(error, CalculatorError::UnresolvedRow { ref key, .. } if key == "b"));
}

#[test]
fn column_outside_target_sheet_is_rejected() {
    let sheets = vec![sheet("only", vec![line("a", "={a.D}")])];
    let error = build_workbook(&sheets).expect_err("layout fails");
    assert!(matches!(error, CalculatorError::ColumnOutOfRange { ref column, .. } if column == "D"));
}

#[test]
fn line_wider_than_sheet_is_rejected() {
    let wide = Line::anonymous(vec![
        Entry::Text("a"),
        Entry::Text("b"),
        Entry::Text("c"),
        Entry::Text("d"),
    ]);
    let sheets = vec![sheet("only", vec![RowSchema::Line(wide)])];
    let error = build_workbook(&sheets).expect_err("layout fails");
    assert!(matches!(error, CalculatorError::ColumnOutOfRange { .. }));
}

#[test]
fn series_columns_outside_series_rows_are_rejected() {
    let sheets = vec![sheet("only", vec![line("a", "={a.#}")])];
    let error = build_workbook(&sheets).expect_err("layout fails");
    assert!(matches!(
        error,
        CalculatorError::MalformedReference { ref token, .. } if token == "a.#"
    ));
}

#[test]
fn unbalanced_template_is_rejected() {
    let sheets = vec![sheet("only", vec![line("a", "={a.A")])];
    let error = build_workbook(&sheets).expect_err("layout fails");
    assert!(matches!(error, CalculatorError::MalformedReference { .. }));
}

#[test]
fn duplicate_row_keys_are_rejected() {
    let sheets = vec![sheet("only", vec![line("a", ""), line("a", "")])];
    let error = build_workbook(&sheets).expect_err("layout fails");
    assert!(matches!(error, CalculatorError::DuplicateRowKey { ref key, .. } if key == "a"));
}

#[test]
fn duplicate_sheet_names_are_rejected() {
    let sheets = vec![sheet("Costs", vec![]), sheet("costs", vec![])];
    let error = build_workbook(&sheets).expect_err("layout fails");
    assert!(matches!(error, CalculatorError::DuplicateSheet(ref name) if name == "costs"));
}

#[test]
fn invalid_sheet_names_are_rejected() {
    for name in ["", "a/b", "[costs]", "a name that is far too long to fit"] {
        let sheets = vec![sheet(name, vec![])];
        let error = build_workbook(&sheets).expect_err("layout fails");
        assert!(
            matches!(error, CalculatorError::InvalidSheetName { .. }),
            "{name:?} should be rejected"
        );
    }
}

#[test]
fn total_without_data_rows_is_rejected() {
    let sheets = vec![sheet(
        "only",
        vec![
            RowSchema::Header(vec!["Item", "Amount", "Note"]),
            RowSchema::Total(Total::new("sum", "TOTAL", 1)),
        ],
    )];
    let error = build_workbook(&sheets).expect_err("layout fails");
    assert!(matches!(error, CalculatorError::EmptyTotal { ref key, .. } if key == "sum"));
}

#[test]
fn total_sums_only_rows_after_the_latest_header() {
    let sheets = vec![sheet(
        "only",
        vec![
            line("before", ""),
            RowSchema::Header(vec!["Item", "Amount", "Note"]),
            RowSchema::Section("GROUP"),
            RowSchema::Line(Line::new("first", vec![Entry::Text("x"), Entry::Number(1.0)])),
            RowSchema::Line(Line::new("second", vec![Entry::Text("y"), Entry::Number(2.0)])),
            RowSchema::Blank,
            RowSchema::Total(Total::new("sum", "TOTAL", 1)),
        ],
    )];
    let layout = build_workbook(&sheets).expect("layout built");
    let total = layout.sheets[0].cell(8, 1).expect("total cell");
    assert_eq!(total.value, CellValue::Formula("=SUM(B6:B7)".to_string()));
    assert_eq!(total.style, CellStyle::Strong { size: 11 });
    assert_eq!(layout.sheets[0].last_row, 8);
}
