use billsplit_application::{BillParseError, BillParser};
use billsplit_domain::{BillDefinition, Device, DeviceId, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reads `bill.toml` documents.
#[derive(Default)]
pub struct TomlBillParser;

impl BillParser for TomlBillParser {
    fn parse(&self, content: &str) -> Result<BillDefinition, BillParseError> {
        let document: BillDocument =
            toml::from_str(content).map_err(|err| BillParseError::Syntax(err.to_string()))?;
        document.into_bill()
    }
}

/// Renders the starter `bill.toml` written into a new billing directory.
pub fn bill_template() -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&BillDocument::template())
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct BillDocument {
    #[serde(default)]
    description: String,
    #[serde(default, alias = "shortStrawID", alias = "ShortStrawID")]
    short_straw_id: String,
    #[serde(default, with = "amount")]
    total: Decimal,
    #[serde(default, with = "amount")]
    devices_cost: Decimal,
    #[serde(default, with = "amount")]
    fees: Decimal,
    #[serde(default, with = "amount")]
    minutes: Decimal,
    #[serde(default, with = "amount")]
    messages: Decimal,
    #[serde(default, with = "amount")]
    megabytes: Decimal,
    #[serde(default, with = "amount")]
    extra_minutes: Decimal,
    #[serde(default, with = "amount")]
    extra_messages: Decimal,
    #[serde(default, with = "amount")]
    extra_megabytes: Decimal,
    // Arrays of tables have to come after plain keys in the encoded document.
    #[serde(default)]
    devices: Vec<DeviceDocument>,
}

#[derive(Debug, Deserialize, Serialize)]
struct DeviceDocument {
    #[serde(rename = "deviceId", alias = "DeviceID", alias = "deviceID")]
    device_id: String,
    #[serde(default, alias = "Owner")]
    owner: String,
}

impl BillDocument {
    fn template() -> Self {
        let device = |id: &str, owner: &str| DeviceDocument {
            device_id: id.to_string(),
            owner: owner.to_string(),
        };
        Self {
            description: "Bill Split YYYY-MM-DD".to_string(),
            short_straw_id: "1112223333".to_string(),
            devices: vec![
                device("1112223333", "owner1"),
                device("2229998888", "owner2"),
                device("3331119999", "owner1"),
            ],
            ..Self::default()
        }
    }

    fn into_bill(self) -> Result<BillDefinition, BillParseError> {
        if self.devices.is_empty() {
            return Err(BillParseError::NoDevices);
        }

        let devices = self
            .devices
            .into_iter()
            .enumerate()
            .map(|(idx, device)| {
                let id = device.device_id.trim();
                if id.is_empty() {
                    return Err(BillParseError::BlankDeviceId { position: idx + 1 });
                }
                Ok(Device::new(id, device.owner.trim()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let short_straw_id = match self.short_straw_id.trim() {
            "" => None,
            id => Some(DeviceId::from(id)),
        };

        Ok(BillDefinition {
            description: self.description,
            devices,
            short_straw_id,
            total: Money::from_decimal(self.total),
            devices_cost: Money::from_decimal(self.devices_cost),
            fees: Money::from_decimal(self.fees),
            minutes: Money::from_decimal(self.minutes),
            messages: Money::from_decimal(self.messages),
            megabytes: Money::from_decimal(self.megabytes),
            extra_minutes: Money::from_decimal(self.extra_minutes),
            extra_messages: Money::from_decimal(self.extra_messages),
            extra_megabytes: Money::from_decimal(self.extra_megabytes),
        })
    }
}

/// Dollar amounts written as TOML floats, integers or strings.
///
/// Floats go through their shortest decimal rendering so `54.85` stays `54.85`.
mod amount {
    use rust_decimal::{Decimal, prelude::ToPrimitive};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Integer(value) => Ok(Decimal::from(value)),
            RawAmount::Float(value) if value.is_finite() => {
                Decimal::from_str(&value.to_string()).map_err(D::Error::custom)
            }
            RawAmount::Float(value) => Err(D::Error::custom(format!(
                "amount must be finite, got {value}"
            ))),
            RawAmount::Text(value) => Decimal::from_str(value.trim()).map_err(D::Error::custom),
        }
    }

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.to_f64().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BILL: &str = r#"
description = "Bill Split 2024-01-15"
shortStrawId = "2229998888"
total = 130.85
devicesCost = 30
fees = 24.85
minutes = 30.0
messages = "10.00"
megabytes = 20.0
extraMinutes = 6.0
extraMegabytes = 10.0

[[devices]]
deviceId = "1112223333"
owner = "ann"

[[devices]]
DeviceID = "2229998888"
Owner = "bo"
"#;

    #[test]
    fn parses_bill_document() {
        let bill = TomlBillParser.parse(BILL).expect("bill should parse");

        assert_eq!(bill.description, "Bill Split 2024-01-15");
        assert_eq!(bill.short_straw_id, Some(DeviceId::from("2229998888")));
        assert_eq!(bill.total, Money::new(13085, 2));
        assert_eq!(bill.devices_cost, Money::new(30, 0));
        assert_eq!(bill.fees, Money::new(2485, 2));
        assert_eq!(bill.messages, Money::new(1000, 2));
        assert_eq!(bill.extra_minutes, Money::new(6, 0));
        assert_eq!(bill.extra_messages, Money::ZERO);
        assert_eq!(
            bill.devices,
            vec![Device::new("1112223333", "ann"), Device::new("2229998888", "bo")]
        );
    }

    #[rstest]
    #[case::blank("   ")]
    #[case::empty("")]
    fn blank_short_straw_is_unset(#[case] short_straw: &str) {
        let content = format!(
            "shortStrawId = \"{short_straw}\"\n[[devices]]\ndeviceId = \"111\"\nowner = \"ann\"\n"
        );
        let bill = TomlBillParser.parse(&content).expect("bill should parse");
        assert_eq!(bill.short_straw_id, None);
    }

    #[rstest]
    #[case::no_devices("description = \"x\"\n")]
    fn rejects_bill_without_devices(#[case] content: &str) {
        assert!(matches!(
            TomlBillParser.parse(content),
            Err(BillParseError::NoDevices)
        ));
    }

    #[test]
    fn rejects_blank_device_id() {
        let content = "[[devices]]\ndeviceId = \"111\"\n[[devices]]\ndeviceId = \" \"\n";
        assert!(matches!(
            TomlBillParser.parse(content),
            Err(BillParseError::BlankDeviceId { position: 2 })
        ));
    }

    #[rstest]
    #[case::broken_syntax("total = = 3")]
    #[case::bad_amount("total = \"twelve\"\n[[devices]]\ndeviceId = \"1\"\n")]
    fn rejects_malformed_documents(#[case] content: &str) {
        assert!(matches!(
            TomlBillParser.parse(content),
            Err(BillParseError::Syntax(_))
        ));
    }

    #[test]
    fn template_parses_back() {
        let template = bill_template().expect("template should encode");
        let bill = TomlBillParser.parse(&template).expect("template should parse");

        assert_eq!(bill.devices.len(), 3);
        assert_eq!(bill.short_straw_id, Some(DeviceId::from("1112223333")));
        assert_eq!(bill.total, Money::ZERO);
        assert_eq!(bill.owner_by_id("2229998888"), "owner2");
    }
}
