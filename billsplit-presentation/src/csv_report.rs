use crate::{
    error::ReportError,
    invoice_tables::{InvoiceTable, invoice_tables},
};
use billsplit_domain::{BillDefinition, BillSplit};
use csv::WriterBuilder;

/// Writes the invoice tables back to back in one CSV document.
///
/// The first header cell of every table is wrapped in `**` so spreadsheet
/// users can find where each table starts.
pub struct CsvReportPresenter;

impl CsvReportPresenter {
    pub fn render(bill: &BillDefinition, split: &BillSplit) -> Result<String, ReportError> {
        // Tables differ in width, so records are not all the same length.
        let mut writer = WriterBuilder::new().flexible(true).from_writer(vec![]);

        for table in invoice_tables(bill, split) {
            writer.write_record(marked_headers(&table))?;
            for row in &table.rows {
                writer.write_record(row)?;
            }
        }

        let data = writer
            .into_inner()
            .map_err(|err| ReportError::Flush(err.to_string()))?;
        Ok(String::from_utf8(data)?)
    }
}

fn marked_headers(table: &InvoiceTable) -> Vec<String> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| match idx {
            0 => format!("**{header}**"),
            _ => (*header).to_string(),
        })
        .collect()
}
