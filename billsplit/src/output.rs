use anyhow::Context;
use billsplit_domain::{BillDefinition, BillSplit};
use billsplit_presentation::{CsvReportPresenter, InvoicePresenter};
use std::{
    fs,
    path::{Path, PathBuf},
};

const FALLBACK_STEM: &str = "invoice";

/// Paths of the rendered invoice and report.
#[derive(Debug)]
pub struct WrittenOutputs {
    pub invoice: PathBuf,
    pub report: PathBuf,
}

/// Writes `<description>.svg` and `<description>_report.csv` into `dir`.
pub fn write_outputs(
    dir: &Path,
    bill: &BillDefinition,
    split: &BillSplit,
) -> anyhow::Result<WrittenOutputs> {
    let stem = file_stem(&bill.description);
    let invoice = dir.join(format!("{stem}.svg"));
    let report = dir.join(format!("{stem}_report.csv"));

    fs::write(&invoice, InvoicePresenter::render(bill, split))
        .with_context(|| format!("failed to write invoice {}", invoice.display()))?;
    tracing::info!(path = %invoice.display(), "Invoice written");

    let csv = CsvReportPresenter::render(bill, split).context("failed to render CSV report")?;
    fs::write(&report, csv)
        .with_context(|| format!("failed to write report {}", report.display()))?;
    tracing::info!(path = %report.display(), "Report written");

    Ok(WrittenOutputs { invoice, report })
}

// Descriptions are free text; path separators would escape the output directory.
fn file_stem(description: &str) -> String {
    let stem: String = description
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect();
    match stem.as_str() {
        "" | "." | ".." => FALLBACK_STEM.to_string(),
        _ => stem,
    }
}
