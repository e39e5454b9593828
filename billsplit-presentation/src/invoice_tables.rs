use crate::{
    format::{format_money, format_percentage},
    svg_table::Alignment,
};
use billsplit_domain::{BillDefinition, BillSplit, Money, UsageCategory};
use rust_decimal::Decimal;

/// One table of the invoice, shared by the CSV and SVG renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceTable {
    pub caption: &'static str,
    pub headers: Vec<&'static str>,
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
    pub has_total_row: bool,
}

/// Builds the five invoice tables in print order: heading, usage, weighted
/// costs, shared costs and the per-device cost split.
pub fn invoice_tables(bill: &BillDefinition, split: &BillSplit) -> [InvoiceTable; 5] {
    [
        heading_table(bill, split),
        usage_table(bill, split),
        weighted_table(bill, split),
        shared_table(bill, split),
        cost_split_table(bill, split),
    ]
}

fn heading_table(bill: &BillDefinition, split: &BillSplit) -> InvoiceTable {
    InvoiceTable {
        caption: "Invoice",
        headers: vec![
            "Invoice with date",
            "Devices Qty",
            "$Total",
            "$Calc",
            "$Usage",
            "$Devices",
            "$Tax+Reg",
        ],
        alignments: vec![
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
        ],
        rows: vec![vec![
            bill.description.clone(),
            bill.devices.len().to_string(),
            format_money(bill.total),
            format_money(split.grand_total()),
            format_money(split.usage_subtotal()),
            format_money(bill.devices_cost),
            format_money(bill.fees),
        ]],
        has_total_row: false,
    }
}

fn usage_table(bill: &BillDefinition, split: &BillSplit) -> InvoiceTable {
    let minutes = split.category(UsageCategory::Minutes);
    let messages = split.category(UsageCategory::Messages);
    let megabytes = split.category(UsageCategory::Megabytes);

    let mut rows: Vec<Vec<String>> = bill
        .device_ids()
        .map(|id| {
            let id = id.as_str();
            vec![
                id.to_string(),
                bill.owner_by_id(id).to_string(),
                minutes.quantity(id).to_string(),
                messages.quantity(id).to_string(),
                megabytes.quantity(id).to_string(),
                format_percentage(minutes.percentage(id)),
                format_percentage(messages.percentage(id)),
                format_percentage(megabytes.percentage(id)),
            ]
        })
        .collect();

    let percentage_total = |category: UsageCategory| -> Decimal {
        split.category(category).percentages().values().sum()
    };
    rows.push(vec![
        String::new(),
        "Total".to_string(),
        minutes.total_quantity().to_string(),
        messages.total_quantity().to_string(),
        megabytes.total_quantity().to_string(),
        format_percentage(percentage_total(UsageCategory::Minutes)),
        format_percentage(percentage_total(UsageCategory::Messages)),
        format_percentage(percentage_total(UsageCategory::Megabytes)),
    ]);

    InvoiceTable {
        caption: "Usage",
        headers: vec![
            "Phone Number",
            "Owner",
            "Minutes",
            "Messages",
            "Data (KB)",
            "Min%",
            "Msg%",
            "Data%",
        ],
        alignments: vec![
            Alignment::Left,
            Alignment::Left,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
        ],
        rows,
        has_total_row: true,
    }
}

// Totals come from the split, whose pools reconcile exactly to the bill.
fn weighted_table(bill: &BillDefinition, split: &BillSplit) -> InvoiceTable {
    let base = UsageCategory::ALL.map(|category| bill.base_amount(category));
    let extra = UsageCategory::ALL.map(|category| bill.extra_amount(category));
    let total = UsageCategory::ALL.map(|category| split.category_subtotal(category));

    let row = |label: &str, values: &[Money; 3]| {
        std::iter::once(label.to_string())
            .chain(values.iter().copied().map(format_money))
            .collect::<Vec<_>>()
    };

    let mut total_row = row("Total", &total);
    total_row.push(format_money(split.usage_subtotal()));

    InvoiceTable {
        caption: "Weighted costs",
        headers: vec!["Weighted", "Minutes", "Messages", "Data"],
        alignments: vec![
            Alignment::Left,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
        ],
        rows: vec![row("Base", &base), row("Extra", &extra), total_row],
        has_total_row: true,
    }
}

fn shared_table(bill: &BillDefinition, split: &BillSplit) -> InvoiceTable {
    InvoiceTable {
        caption: "Shared costs",
        headers: vec!["Shared", "Amount"],
        alignments: vec![Alignment::Left, Alignment::Right],
        rows: vec![
            vec!["Devices".to_string(), format_money(bill.devices_cost)],
            vec!["Tax & Reg".to_string(), format_money(bill.fees)],
            vec!["Total".to_string(), format_money(split.shared_subtotal())],
        ],
        has_total_row: true,
    }
}

fn cost_split_table(bill: &BillDefinition, split: &BillSplit) -> InvoiceTable {
    let mut rows: Vec<Vec<String>> = bill
        .device_ids()
        .map(|id| {
            let id = id.as_str();
            let mut row = vec![id.to_string(), bill.owner_by_id(id).to_string()];
            row.extend(
                UsageCategory::ALL
                    .iter()
                    .map(|category| format_money(split.category(*category).cost(id))),
            );
            row.push(format_money(split.shared_cost(id)));
            row.push(format_money(split.device_total(id)));
            row
        })
        .collect();

    let mut total_row = vec![String::new(), "Total".to_string()];
    total_row.extend(
        UsageCategory::ALL
            .iter()
            .map(|category| format_money(split.category_subtotal(*category))),
    );
    total_row.push(format_money(split.shared_subtotal()));
    total_row.push(format_money(split.grand_total()));
    rows.push(total_row);

    InvoiceTable {
        caption: "Cost split",
        headers: vec![
            "Phone Number",
            "Owner",
            "$Min",
            "$Msg",
            "$Data",
            "$Shared",
            "$Total",
        ],
        alignments: vec![
            Alignment::Left,
            Alignment::Left,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
            Alignment::Right,
        ],
        rows,
        has_total_row: true,
    }
}


#[cfg(test)]
mod tests {
    use super::{fixtures, *};

    fn tables() -> [InvoiceTable; 5] {
        let bill = fixtures::bill();
        let split = fixtures::split(&bill);
        invoice_tables(&bill, &split)
    }

    #[test]
    fn heading_compares_bill_total_with_calculated_total() {
        let [heading, ..] = tables();
        assert_eq!(
            heading.rows,
            vec![vec![
                "Bill Split 2024-01-15".to_string(),
                "3".to_string(),
                "130.85".to_string(),
                "130.85".to_string(),
                "76.00".to_string(),
                "30.00".to_string(),
                "24.85".to_string(),
            ]]
        );
    }

    #[test]
    fn usage_lists_devices_in_bill_order_with_totals() {
        let [_, usage, ..] = tables();
        let ids: Vec<&str> = usage.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(ids, vec!["1112223333", "2229998888", "3331119999", ""]);

        assert_eq!(
            usage.rows[0],
            vec!["1112223333", "ann", "4", "1", "700", "80.00%", "33.33%", "70.00%"]
        );
        assert_eq!(
            usage.rows[3],
            vec!["", "Total", "5", "3", "1000", "100.00%", "100.00%", "100.00%"]
        );
    }

    #[test]
    fn weighted_total_row_carries_grand_total_cell() {
        let [_, _, weighted, ..] = tables();
        assert_eq!(weighted.rows[0], vec!["Base", "30.00", "10.00", "20.00"]);
        assert_eq!(weighted.rows[1], vec!["Extra", "6.00", "0.00", "10.00"]);
        assert_eq!(
            weighted.rows[2],
            vec!["Total", "36.00", "10.00", "30.00", "76.00"]
        );
    }

    #[test]
    fn shared_table_sums_devices_and_fees() {
        let [_, _, _, shared, _] = tables();
        assert_eq!(shared.rows[2], vec!["Total", "54.85"]);
    }

    #[test]
    fn cost_split_rows_reconcile_to_grand_total() {
        let [.., costs] = tables();
        assert_eq!(
            costs.rows[1],
            vec!["2229998888", "bo", "7.20", "3.34", "0.00", "18.29", "28.83"]
        );
        assert_eq!(
            costs.rows[3],
            vec!["", "Total", "36.00", "10.00", "30.00", "54.85", "130.85"]
        );
    }
}
