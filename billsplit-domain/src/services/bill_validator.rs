use crate::{
    error::AllocationError,
    model::{BillDefinition, UsageCategory, UsageMaps},
};
use fxhash::FxHashSet;

/// Rejects malformed bills and usage before anything is allocated.
pub struct BillValidator;

impl BillValidator {
    pub fn validate(bill: &BillDefinition, usage: &UsageMaps) -> Result<(), AllocationError> {
        Self::validate_devices(bill)?;
        Self::validate_amounts(bill)?;
        Self::validate_usage(usage)
    }

    pub fn validate_devices(bill: &BillDefinition) -> Result<(), AllocationError> {
        if bill.devices.is_empty() {
            return Err(AllocationError::EmptyDeviceList);
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for id in bill.device_ids() {
            if !seen.insert(id.as_str()) {
                return Err(AllocationError::DuplicateDevice { id: id.clone() });
            }
        }
        Ok(())
    }

    pub fn validate_amounts(bill: &BillDefinition) -> Result<(), AllocationError> {
        match bill
            .money_fields()
            .into_iter()
            .find(|(_, amount)| amount.is_sign_negative())
        {
            Some((field, amount)) => Err(AllocationError::NegativeAmount { field, amount }),
            None => Ok(()),
        }
    }

    pub fn validate_usage(usage: &UsageMaps) -> Result<(), AllocationError> {
        for category in UsageCategory::ALL {
            if let Some((device, quantity)) =
                usage.get(category).iter().find(|(_, quantity)| **quantity < 0)
            {
                return Err(AllocationError::NegativeUsage {
                    category,
                    device: device.clone(),
                    quantity: *quantity,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Device, DeviceId, Money};

    fn bill() -> BillDefinition {
        BillDefinition {
            devices: vec![Device::new("111", "ann"), Device::new("222", "bo")],
            fees: Money::new(1000, 2),
            ..BillDefinition::default()
        }
    }

    #[test]
    fn accepts_well_formed_input() {
        assert_eq!(BillValidator::validate(&bill(), &UsageMaps::default()), Ok(()));
    }

    #[test]
    fn rejects_duplicate_device() {
        let mut bill = bill();
        bill.devices.push(Device::new("111", "someone else"));
        assert_eq!(
            BillValidator::validate_devices(&bill),
            Err(AllocationError::DuplicateDevice {
                id: DeviceId::from("111")
            })
        );
    }

    #[test]
    fn rejects_negative_amount() {
        let mut bill = bill();
        bill.extra_messages = Money::new(-5, 2);
        assert_eq!(
            BillValidator::validate_amounts(&bill),
            Err(AllocationError::NegativeAmount {
                field: "extraMessages",
                amount: Money::new(-5, 2),
            })
        );
    }

    #[test]
    fn rejects_negative_usage_in_any_category() {
        let mut usage = UsageMaps::default();
        usage.minutes.insert(DeviceId::from("111"), 3);
        usage.megabytes.insert(DeviceId::from("222"), -1);
        assert_eq!(
            BillValidator::validate_usage(&usage),
            Err(AllocationError::NegativeUsage {
                category: UsageCategory::Megabytes,
                device: DeviceId::from("222"),
                quantity: -1,
            })
        );
    }
}
