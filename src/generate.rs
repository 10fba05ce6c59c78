use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::io::{excel_read, excel_write, manifest};
use crate::layout::build_workbook;
use crate::model::WorkbookLayout;
use crate::schema::cost_model;
use crate::verify::{VerifyReport, verify_workbook};

/// File written when no output path is given.
pub const DEFAULT_OUTPUT: &str = "project_cost_calculator.xlsx";

/// What a generation run should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub output: PathBuf,
    /// Optional JSON dump of the laid-out workbook.
    pub manifest: Option<PathBuf>,
    /// Read the written file back and check it against the layout.
    pub verify: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            manifest: None,
            verify: false,
        }
    }
}

/// Name and purpose of one generated sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub name: String,
    pub description: String,
}

/// Outcome of a generation run, rendered as the completion message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub output: PathBuf,
    pub manifest: Option<PathBuf>,
    pub sheets: Vec<SheetSummary>,
    pub cell_count: usize,
    pub verification: Option<VerifyReport>,
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Calculator written: {}", self.output.display())?;
        writeln!(f)?;
        writeln!(f, "Workbook structure:")?;
        for (position, sheet) in self.sheets.iter().enumerate() {
            writeln!(f, "  {}. {} - {}", position + 1, sheet.name, sheet.description)?;
        }
        if let Some(path) = &self.manifest {
            writeln!(f)?;
            writeln!(f, "Manifest written: {}", path.display())?;
        }
        if let Some(report) = &self.verification {
            writeln!(f)?;
            writeln!(
                f,
                "Verified {} sheets: {} cells and {} cross-sheet references match",
                report.sheets, report.cells_checked, report.references_checked
            )?;
        }
        Ok(())
    }
}

/// Lays out the built-in cost model.
pub fn build_layout() -> Result<WorkbookLayout> {
    build_workbook(&cost_model())
}

/// Builds the cost calculator and writes it to disk.
#[instrument(
    level = "info",
    skip_all,
    fields(output = %options.output.display(), verify = options.verify)
)]
pub fn generate(options: &GenerateOptions) -> Result<GenerationSummary> {
    let layout = build_layout()?;
    info!(
        sheet_count = layout.sheets.len(),
        cell_count = layout.cell_count(),
        "workbook laid out"
    );

    excel_write::write_workbook(&options.output, &layout)?;
    debug!("workbook saved");

    if let Some(path) = &options.manifest {
        manifest::write_manifest(path, &layout)?;
        debug!(manifest = %path.display(), "manifest written");
    }

    let verification = if options.verify {
        Some(verify_file(&options.output, &layout)?)
    } else {
        None
    };

    Ok(GenerationSummary {
        output: options.output.clone(),
        manifest: options.manifest.clone(),
        sheets: layout
            .sheets
            .iter()
            .map(|sheet| SheetSummary {
                name: sheet.name.clone(),
                description: sheet.description.clone(),
            })
            .collect(),
        cell_count: layout.cell_count(),
        verification,
    })
}

/// Reads a written workbook back and compares it with `layout`.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn verify_file(path: &Path, layout: &WorkbookLayout) -> Result<VerifyReport> {
    let snapshot = excel_read::read_workbook(path)?;
    let report = verify_workbook(layout, &snapshot)?;
    info!(
        cells = report.cells_checked,
        references = report.references_checked,
        "workbook verified"
    );
    Ok(report)
}
