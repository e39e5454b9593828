use crate::error::{BillParseError, UsageParseError};
use billsplit_domain::{BillDefinition, UsageCategory, UsageMap};

pub trait BillParser: Send + Sync {
    fn parse(&self, content: &str) -> Result<BillDefinition, BillParseError>;
}

pub trait UsageParser: Send + Sync {
    fn parse(&self, category: UsageCategory, content: &str) -> Result<UsageMap, UsageParseError>;
}
