use crate::{
    error::AllocationError,
    model::{BillDefinition, DeviceId},
    services::ShortStrawFallback,
};

/// Picks the device that absorbs rounding remainders.
pub struct ShortStrawPolicy;

impl ShortStrawPolicy {
    /// Returns the configured short-straw device when it is on the bill.
    ///
    /// A missing id always falls back to the first device in bill order. An id
    /// that does not match any device falls back the same way unless
    /// `fallback` is [`ShortStrawFallback::Reject`].
    pub fn select(
        bill: &BillDefinition,
        fallback: ShortStrawFallback,
    ) -> Result<&DeviceId, AllocationError> {
        let first = bill
            .devices
            .first()
            .map(|device| &device.id)
            .ok_or(AllocationError::EmptyDeviceList)?;

        let Some(requested) = bill.short_straw_id.as_ref() else {
            return Ok(first);
        };

        if let Some(device) = bill.devices.iter().find(|device| device.id == *requested) {
            return Ok(&device.id);
        }

        match fallback {
            ShortStrawFallback::FirstDevice => {
                tracing::warn!(
                    requested = %requested,
                    fallback = %first,
                    "Short straw device is not on the bill; using the first device"
                );
                Ok(first)
            }
            ShortStrawFallback::Reject => Err(AllocationError::UnknownShortStraw {
                id: requested.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Device;
    use rstest::{fixture, rstest};

    #[fixture]
    fn bill() -> BillDefinition {
        BillDefinition {
            devices: vec![
                Device::new("333", "cy"),
                Device::new("111", "ann"),
                Device::new("222", "bo"),
            ],
            ..BillDefinition::default()
        }
    }

    #[rstest]
    #[case::configured(Some("222"), ShortStrawFallback::FirstDevice, "222")]
    #[case::absent(None, ShortStrawFallback::FirstDevice, "333")]
    #[case::absent_strict(None, ShortStrawFallback::Reject, "333")]
    #[case::unmatched_falls_back_to_declared_first(Some("999"), ShortStrawFallback::FirstDevice, "333")]
    fn selects_short_straw(
        mut bill: BillDefinition,
        #[case] requested: Option<&str>,
        #[case] fallback: ShortStrawFallback,
        #[case] expected: &str,
    ) {
        bill.short_straw_id = requested.map(DeviceId::from);
        let selected = ShortStrawPolicy::select(&bill, fallback).expect("selection succeeds");
        assert_eq!(selected.as_str(), expected);
    }

    #[rstest]
    fn rejects_unmatched_when_strict(mut bill: BillDefinition) {
        bill.short_straw_id = Some(DeviceId::from("999"));
        assert_eq!(
            ShortStrawPolicy::select(&bill, ShortStrawFallback::Reject),
            Err(AllocationError::UnknownShortStraw {
                id: DeviceId::from("999")
            })
        );
    }

    #[test]
    fn rejects_empty_bill() {
        assert_eq!(
            ShortStrawPolicy::select(&BillDefinition::default(), ShortStrawFallback::FirstDevice),
            Err(AllocationError::EmptyDeviceList)
        );
    }
}
