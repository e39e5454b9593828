use billsplit_application::{UsageParseError, UsageParser};
use billsplit_domain::{DeviceId, UsageCategory, UsageMap};
use csv::{ReaderBuilder, StringRecord, Trim};

/// Reads the provider's per-category usage exports.
///
/// | category  | device column | quantity column  |
/// |-----------|---------------|------------------|
/// | minutes   | `Phone`       | `Duration (min)` |
/// | messages  | `Phone`       | one per row      |
/// | megabytes | `Device`      | `Kilobytes`      |
#[derive(Default)]
pub struct CsvUsageParser;

struct UsageLayout {
    device_header: &'static str,
    quantity_header: Option<&'static str>,
}

impl UsageLayout {
    fn for_category(category: UsageCategory) -> Self {
        match category {
            UsageCategory::Minutes => Self {
                device_header: "Phone",
                quantity_header: Some("Duration (min)"),
            },
            UsageCategory::Messages => Self {
                device_header: "Phone",
                quantity_header: None,
            },
            UsageCategory::Megabytes => Self {
                device_header: "Device",
                quantity_header: Some("Kilobytes"),
            },
        }
    }
}

impl UsageParser for CsvUsageParser {
    fn parse(&self, category: UsageCategory, content: &str) -> Result<UsageMap, UsageParseError> {
        let layout = UsageLayout::for_category(category);
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers().map_err(csv_error)?.clone();
        if headers.is_empty() {
            return Err(UsageParseError::Empty { category });
        }

        let device_index = column_index(&headers, category, layout.device_header)?;
        let quantity_index = layout
            .quantity_header
            .map(|header| column_index(&headers, category, header))
            .transpose()?;

        let mut usage = UsageMap::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let line = record.position().map_or(0, |position| position.line());

            let device = record.get(device_index).unwrap_or_default();
            if device.is_empty() {
                return Err(UsageParseError::BlankDevice { line });
            }

            let quantity = match quantity_index {
                Some(index) => parse_quantity(&record, index, line)?,
                None => 1,
            };

            let total = usage.entry(DeviceId::from(device)).or_insert(0);
            *total = total
                .checked_add(quantity)
                .ok_or_else(|| UsageParseError::QuantityOverflow {
                    device: device.to_string(),
                })?;
        }

        Ok(usage)
    }
}

fn column_index(
    headers: &StringRecord,
    category: UsageCategory,
    header: &'static str,
) -> Result<usize, UsageParseError> {
    headers
        .iter()
        .position(|name| name == header)
        .ok_or(UsageParseError::MissingHeader { category, header })
}

fn parse_quantity(record: &StringRecord, index: usize, line: u64) -> Result<i64, UsageParseError> {
    let raw = record.get(index).unwrap_or_default();
    let quantity: i64 = raw.parse().map_err(|_| UsageParseError::InvalidQuantity {
        line,
        value: raw.to_string(),
    })?;
    if quantity < 0 {
        return Err(UsageParseError::NegativeQuantity {
            line,
            value: raw.to_string(),
        });
    }
    Ok(quantity)
}

fn csv_error(err: csv::Error) -> UsageParseError {
    UsageParseError::Csv(err.to_string())
}
