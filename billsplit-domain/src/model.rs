use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::{
    borrow::Borrow,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
};

const UNKNOWN_OWNER: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Fixed-point monetary amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Builds an amount from a mantissa and a scale, e.g. `Money::new(5485, 2)` is 54.85.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_sign_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UsageCategory {
    Minutes,
    Messages,
    /// Data usage. Quantities are kilobytes; the name follows the bill line item.
    Megabytes,
}

impl UsageCategory {
    pub const ALL: [UsageCategory; 3] = [
        UsageCategory::Minutes,
        UsageCategory::Messages,
        UsageCategory::Megabytes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UsageCategory::Minutes => "minutes",
            UsageCategory::Messages => "messages",
            UsageCategory::Megabytes => "megabytes",
        }
    }
}

impl fmt::Display for UsageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub id: DeviceId,
    pub owner: String,
}

impl Device {
    pub fn new(id: impl Into<DeviceId>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
        }
    }
}

/// Provider totals plus the household's device roster for one billing period.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillDefinition {
    pub description: String,
    pub devices: Vec<Device>,
    /// Device that absorbs rounding remainders. `None` selects the first device.
    pub short_straw_id: Option<DeviceId>,
    pub total: Money,
    pub devices_cost: Money,
    pub fees: Money,
    pub minutes: Money,
    pub messages: Money,
    pub megabytes: Money,
    pub extra_minutes: Money,
    pub extra_messages: Money,
    pub extra_megabytes: Money,
}

impl BillDefinition {
    pub fn device_ids(&self) -> impl Iterator<Item = &DeviceId> + '_ {
        self.devices.iter().map(|device| &device.id)
    }

    pub fn owner_by_id(&self, id: &str) -> &str {
        self.devices
            .iter()
            .find(|device| device.id.as_str() == id)
            .map_or(UNKNOWN_OWNER, |device| device.owner.as_str())
    }

    pub fn contains_device(&self, id: &str) -> bool {
        self.devices.iter().any(|device| device.id.as_str() == id)
    }

    pub fn base_amount(&self, category: UsageCategory) -> Money {
        match category {
            UsageCategory::Minutes => self.minutes,
            UsageCategory::Messages => self.messages,
            UsageCategory::Megabytes => self.megabytes,
        }
    }

    pub fn extra_amount(&self, category: UsageCategory) -> Money {
        match category {
            UsageCategory::Minutes => self.extra_minutes,
            UsageCategory::Messages => self.extra_messages,
            UsageCategory::Megabytes => self.extra_megabytes,
        }
    }

    /// Base plus extra for the category, `None` on decimal overflow.
    pub fn billable_amount(&self, category: UsageCategory) -> Option<Money> {
        self.base_amount(category).checked_add(self.extra_amount(category))
    }

    /// Devices cost plus fees, `None` on decimal overflow.
    pub fn shared_pool(&self) -> Option<Money> {
        self.devices_cost.checked_add(self.fees)
    }

    pub(crate) fn money_fields(&self) -> [(&'static str, Money); 9] {
        [
            ("total", self.total),
            ("devicesCost", self.devices_cost),
            ("fees", self.fees),
            ("minutes", self.minutes),
            ("messages", self.messages),
            ("megabytes", self.megabytes),
            ("extraMinutes", self.extra_minutes),
            ("extraMessages", self.extra_messages),
            ("extraMegabytes", self.extra_megabytes),
        ]
    }
}

/// Per-device quantities for one usage category, in first-seen order.
pub type UsageMap = IndexMap<DeviceId, i64>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsageMaps {
    pub minutes: UsageMap,
    pub messages: UsageMap,
    pub megabytes: UsageMap,
}

impl UsageMaps {
    pub fn new(minutes: UsageMap, messages: UsageMap, megabytes: UsageMap) -> Self {
        Self {
            minutes,
            messages,
            megabytes,
        }
    }

    pub fn get(&self, category: UsageCategory) -> &UsageMap {
        match category {
            UsageCategory::Minutes => &self.minutes,
            UsageCategory::Messages => &self.messages,
            UsageCategory::Megabytes => &self.megabytes,
        }
    }

    pub fn get_mut(&mut self, category: UsageCategory) -> &mut UsageMap {
        match category {
            UsageCategory::Minutes => &mut self.minutes,
            UsageCategory::Messages => &mut self.messages,
            UsageCategory::Megabytes => &mut self.megabytes,
        }
    }
}

/// Allocation pool reconciled against an intended total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pool {
    Usage(UsageCategory),
    Shared,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pool::Usage(category) => fmt::Display::fmt(category, f),
            Pool::Shared => f.write_str("shared"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategorySplit {
    pub(crate) costs: IndexMap<DeviceId, Money>,
    pub(crate) quantities: IndexMap<DeviceId, i64>,
    pub(crate) percentages: IndexMap<DeviceId, Decimal>,
}

impl CategorySplit {
    pub fn costs(&self) -> &IndexMap<DeviceId, Money> {
        &self.costs
    }

    pub fn quantities(&self) -> &IndexMap<DeviceId, i64> {
        &self.quantities
    }

    pub fn percentages(&self) -> &IndexMap<DeviceId, Decimal> {
        &self.percentages
    }

    pub fn cost(&self, id: &str) -> Money {
        self.costs.get(id).copied().unwrap_or(Money::ZERO)
    }

    pub fn quantity(&self, id: &str) -> i64 {
        self.quantities.get(id).copied().unwrap_or(0)
    }

    pub fn percentage(&self, id: &str) -> Decimal {
        self.percentages.get(id).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn subtotal(&self) -> Money {
        self.costs.values().sum()
    }

    pub fn total_quantity(&self) -> i64 {
        self.quantities.values().sum()
    }
}

/// Remainders assigned to the short-straw device, one per pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Remainders {
    pub minutes: Money,
    pub messages: Money,
    pub megabytes: Money,
    pub shared: Money,
}

impl Remainders {
    pub fn get(&self, pool: Pool) -> Money {
        match pool {
            Pool::Usage(UsageCategory::Minutes) => self.minutes,
            Pool::Usage(UsageCategory::Messages) => self.messages,
            Pool::Usage(UsageCategory::Megabytes) => self.megabytes,
            Pool::Shared => self.shared,
        }
    }

    pub(crate) fn set(&mut self, pool: Pool, amount: Money) {
        match pool {
            Pool::Usage(UsageCategory::Minutes) => self.minutes = amount,
            Pool::Usage(UsageCategory::Messages) => self.messages = amount,
            Pool::Usage(UsageCategory::Megabytes) => self.megabytes = amount,
            Pool::Shared => self.shared = amount,
        }
    }
}

/// Result of splitting one bill. Every map is keyed in bill device order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillSplit {
    pub(crate) minutes: CategorySplit,
    pub(crate) messages: CategorySplit,
    pub(crate) megabytes: CategorySplit,
    pub(crate) shared_costs: IndexMap<DeviceId, Money>,
    pub(crate) short_straw: DeviceId,
    pub(crate) remainders: Remainders,
}

impl BillSplit {
    pub fn category(&self, category: UsageCategory) -> &CategorySplit {
        match category {
            UsageCategory::Minutes => &self.minutes,
            UsageCategory::Messages => &self.messages,
            UsageCategory::Megabytes => &self.megabytes,
        }
    }

    pub fn shared_costs(&self) -> &IndexMap<DeviceId, Money> {
        &self.shared_costs
    }

    pub fn shared_cost(&self, id: &str) -> Money {
        self.shared_costs.get(id).copied().unwrap_or(Money::ZERO)
    }

    pub fn short_straw(&self) -> &DeviceId {
        &self.short_straw
    }

    pub fn remainders(&self) -> Remainders {
        self.remainders
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &DeviceId> + '_ {
        self.shared_costs.keys()
    }

    pub fn usage_cost(&self, id: &str) -> Money {
        UsageCategory::ALL
            .into_iter()
            .map(|category| self.category(category).cost(id))
            .sum()
    }

    pub fn device_total(&self, id: &str) -> Money {
        self.usage_cost(id) + self.shared_cost(id)
    }

    pub fn category_subtotal(&self, category: UsageCategory) -> Money {
        self.category(category).subtotal()
    }

    pub fn usage_subtotal(&self) -> Money {
        UsageCategory::ALL
            .into_iter()
            .map(|category| self.category_subtotal(category))
            .sum()
    }

    pub fn shared_subtotal(&self) -> Money {
        self.shared_costs.values().sum()
    }

    pub fn grand_total(&self) -> Money {
        self.usage_subtotal() + self.shared_subtotal()
    }
}
