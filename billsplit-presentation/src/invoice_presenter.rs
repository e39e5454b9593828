use crate::{
    invoice_tables::{InvoiceTable, invoice_tables},
    svg_table::{SvgTableBuilder, combine_svgs_vertically},
};
use billsplit_domain::{BillDefinition, BillSplit};

pub struct InvoicePresenter;

impl InvoicePresenter {
    /// Renders the invoice as one SVG page with the tables stacked in print
    /// order.
    pub fn render(bill: &BillDefinition, split: &BillSplit) -> String {
        let tables = invoice_tables(bill, split).map(|table| Self::build_table_svg(&table));
        let parts: Vec<&str> = tables.iter().map(String::as_str).collect();

        // Every part comes from SvgTableBuilder with at least one header.
        combine_svgs_vertically(&parts).unwrap_or_default()
    }

    pub fn build_table_svg(table: &InvoiceTable) -> String {
        let mut builder = SvgTableBuilder::new()
            .caption(table.caption)
            .alignments(&table.alignments)
            .headers(table.headers.iter().copied())
            .emphasize_last_row(table.has_total_row);
        for row in &table.rows {
            builder = builder.row(row.iter().map(String::as_str));
        }
        builder.build()
    }
}
