use billsplit_domain::{BillDefinition, BillSplit, UsageCategory, UsageMaps};

/// Raw contents of one billing period's input files.
#[derive(Clone, Copy, Debug)]
pub struct BillingSources<'a> {
    pub bill: &'a str,
    pub minutes: &'a str,
    pub messages: &'a str,
    pub megabytes: &'a str,
}

impl<'a> BillingSources<'a> {
    pub fn usage(&self, category: UsageCategory) -> &'a str {
        match category {
            UsageCategory::Minutes => self.minutes,
            UsageCategory::Messages => self.messages,
            UsageCategory::Megabytes => self.megabytes,
        }
    }
}

#[derive(Debug)]
pub struct SplitOutcome {
    pub bill: BillDefinition,
    pub usage: UsageMaps,
    pub split: BillSplit,
}
