use crate::{
    error::SplitError,
    model::{BillingSources, SplitOutcome},
    ports::{BillParser, UsageParser},
};
use billsplit_domain::{
    AllocationContext, AllocationEngine, BillDefinition, UsageCategory, UsageMaps,
};

#[derive(Clone, Copy)]
pub struct SplitProcessor<'a> {
    bill_parser: &'a dyn BillParser,
    usage_parser: &'a dyn UsageParser,
    engine: AllocationEngine,
    context: AllocationContext,
}

impl<'a> SplitProcessor<'a> {
    pub fn new(
        bill_parser: &'a dyn BillParser,
        usage_parser: &'a dyn UsageParser,
        context: AllocationContext,
    ) -> Self {
        Self {
            bill_parser,
            usage_parser,
            engine: AllocationEngine,
            context,
        }
    }

    pub fn context(&self) -> AllocationContext {
        self.context
    }

    pub fn parse_bill(&self, content: &str) -> Result<BillDefinition, SplitError> {
        self.bill_parser.parse(content).map_err(SplitError::Bill)
    }

    pub fn parse_usage(&self, sources: &BillingSources<'_>) -> Result<UsageMaps, SplitError> {
        let mut usage = UsageMaps::default();
        for category in UsageCategory::ALL {
            let parsed = self
                .usage_parser
                .parse(category, sources.usage(category))
                .map_err(|source| SplitError::Usage { category, source })?;
            tracing::debug!(
                category = %category,
                device_count = parsed.len(),
                "Parsed usage"
            );
            *usage.get_mut(category) = parsed;
        }
        Ok(usage)
    }

    /// Parses every source and splits the bill.
    pub fn process(&self, sources: &BillingSources<'_>) -> Result<SplitOutcome, SplitError> {
        let bill = self.parse_bill(sources.bill)?;
        let usage = self.parse_usage(sources)?;
        let split = self.engine.compute_split(&usage, &bill, self.context)?;

        tracing::info!(
            description = %bill.description,
            device_count = bill.devices.len(),
            short_straw = %split.short_straw(),
            calculated_total = %split.grand_total(),
            "Bill split complete"
        );

        Ok(SplitOutcome { bill, usage, split })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BillParseError, UsageParseError};
    use billsplit_domain::{
        AllocationError, Device, DeviceId, Money, ShortStrawFallback, UsageMap,
    };
    use rstest::{fixture, rstest};

    struct StubBillParser;

    impl BillParser for StubBillParser {
        fn parse(&self, content: &str) -> Result<BillDefinition, BillParseError> {
            match content {
                "BILL" => Ok(BillDefinition {
                    description: "stub".to_string(),
                    devices: vec![Device::new("111", "ann"), Device::new("222", "bo")],
                    short_straw_id: Some(DeviceId::from("222")),
                    minutes: Money::new(1000, 2),
                    messages: Money::new(500, 2),
                    megabytes: Money::new(300, 2),
                    devices_cost: Money::new(1001, 2),
                    ..BillDefinition::default()
                }),
                "UNKNOWN_STRAW" => Ok(BillDefinition {
                    devices: vec![Device::new("111", "ann")],
                    short_straw_id: Some(DeviceId::from("999")),
                    ..BillDefinition::default()
                }),
                "EMPTY" => Err(BillParseError::NoDevices),
                _ => Err(BillParseError::Syntax("unexpected content".to_string())),
            }
        }
    }

    struct StubUsageParser;

    impl UsageParser for StubUsageParser {
        fn parse(
            &self,
            category: UsageCategory,
            content: &str,
        ) -> Result<UsageMap, UsageParseError> {
            if content == "BAD" {
                return Err(UsageParseError::MissingHeader {
                    category,
                    header: "Phone",
                });
            }
            Ok(content
                .split(',')
                .filter(|entry| !entry.is_empty())
                .filter_map(|entry| entry.split_once('='))
                .map(|(id, quantity)| (DeviceId::from(id), quantity.parse().unwrap_or(0)))
                .collect())
        }
    }

    #[fixture]
    fn sources() -> BillingSources<'static> {
        BillingSources {
            bill: "BILL",
            minutes: "111=3,222=1",
            messages: "111=1",
            megabytes: "",
        }
    }

    #[rstest]
    fn processes_sources_into_split(sources: BillingSources<'static>) {
        let processor = SplitProcessor::new(
            &StubBillParser,
            &StubUsageParser,
            AllocationContext::usd_default(),
        );

        let outcome = processor.process(&sources).expect("process should succeed");

        let minutes = outcome.split.category(UsageCategory::Minutes);
        assert_eq!(minutes.cost("111"), Money::new(750, 2));
        assert_eq!(minutes.cost("222"), Money::new(250, 2));
        assert_eq!(
            outcome.split.category(UsageCategory::Messages).cost("111"),
            Money::new(500, 2)
        );
        assert_eq!(
            outcome.split.category(UsageCategory::Megabytes).cost("222"),
            Money::new(300, 2)
        );
        assert_eq!(outcome.split.shared_cost("111"), Money::new(500, 2));
        assert_eq!(outcome.split.shared_cost("222"), Money::new(501, 2));
        assert_eq!(outcome.usage.minutes.len(), 2);
        assert_eq!(outcome.bill.description, "stub");
    }

    #[rstest]
    fn bill_errors_are_reported(mut sources: BillingSources<'static>) {
        sources.bill = "EMPTY";
        let processor = SplitProcessor::new(
            &StubBillParser,
            &StubUsageParser,
            AllocationContext::usd_default(),
        );

        let result = processor.process(&sources);
        assert!(matches!(
            result,
            Err(SplitError::Bill(BillParseError::NoDevices))
        ));
    }

    #[rstest]
    #[case::minutes(UsageCategory::Minutes)]
    #[case::messages(UsageCategory::Messages)]
    #[case::megabytes(UsageCategory::Megabytes)]
    fn usage_errors_name_the_category(
        mut sources: BillingSources<'static>,
        #[case] broken: UsageCategory,
    ) {
        match broken {
            UsageCategory::Minutes => sources.minutes = "BAD",
            UsageCategory::Messages => sources.messages = "BAD",
            UsageCategory::Megabytes => sources.megabytes = "BAD",
        }
        let processor = SplitProcessor::new(
            &StubBillParser,
            &StubUsageParser,
            AllocationContext::usd_default(),
        );

        match processor.process(&sources) {
            Err(SplitError::Usage { category, .. }) => assert_eq!(category, broken),
            _ => panic!("expected usage error"),
        }
    }

    #[rstest]
    fn allocation_errors_follow_context(mut sources: BillingSources<'static>) {
        sources.bill = "UNKNOWN_STRAW";
        let strict = AllocationContext {
            short_straw_fallback: ShortStrawFallback::Reject,
            ..AllocationContext::usd_default()
        };
        let processor = SplitProcessor::new(&StubBillParser, &StubUsageParser, strict);

        match processor.process(&sources) {
            Err(SplitError::Allocation(AllocationError::UnknownShortStraw { id })) => {
                assert_eq!(id.as_str(), "999");
            }
            _ => panic!("expected unknown short straw error"),
        }
    }
}
