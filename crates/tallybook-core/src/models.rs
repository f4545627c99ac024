//! Persisted entity shapes consumed by the engine
//!
//! All entities belong to a single user scope; amounts are signed
//! decimals with inflow positive and outflow negative, everywhere.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User scope for storage reads, always passed explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Recurrence interval enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// No recurrence, the transaction happens once
    None,
    /// Every day
    Daily,
    /// Every 7 days
    Weekly,
    /// Every calendar month, day-of-month preserved where valid
    Monthly,
    /// Every 3 calendar months
    Quarterly,
    /// Every calendar year
    Yearly,
}

impl Default for Recurrence {
    fn default() -> Self {
        Recurrence::None
    }
}

impl std::str::FromStr for Recurrence {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            "quarterly" => Ok(Recurrence::Quarterly),
            "yearly" => Ok(Recurrence::Yearly),
            _ => Err(format!("Invalid recurrence interval: {}", s)),
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recurrence::None => write!(f, "none"),
            Recurrence::Daily => write!(f, "daily"),
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::Monthly => write!(f, "monthly"),
            Recurrence::Quarterly => write!(f, "quarterly"),
            Recurrence::Yearly => write!(f, "yearly"),
        }
    }
}

/// Category reference carried by expenses and receipt items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// An income transaction, labelled by a free-text source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    /// Signed amount, inflow positive
    pub amount: f64,
    pub date: NaiveDate,
    /// Free-text source label (salary, dividends, ...)
    pub source: String,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub recurrence_end: Option<NaiveDate>,
}

/// A plain expense transaction, labelled by a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    /// Signed amount, outflow negative
    pub amount: f64,
    pub date: NaiveDate,
    pub category: CategoryRef,
    #[serde(default)]
    pub recurrence: Recurrence,
    #[serde(default)]
    pub recurrence_end: Option<NaiveDate>,
}

/// A single line item of a receipt, aggregated individually
///
/// Receipt items never recur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub id: i64,
    /// Signed line total, outflow negative
    pub total_price: f64,
    pub date: NaiveDate,
    pub category: CategoryRef,
}

/// A stored receipt with its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: i64,
    pub store: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
}

/// Authoritative starting balance for one (month, year)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    /// 1-12
    pub month: u32,
    pub year: i32,
    pub starting_balance: f64,
}

/// Common transaction shape shared by incomes, expenses and receipt items
pub trait TransactionLike {
    /// Signed amount, inflow positive, outflow negative
    fn amount(&self) -> f64;
    /// Anchor date of the transaction
    fn date(&self) -> NaiveDate;
    /// Breakdown label: income source or category name
    fn label(&self) -> &str;
    /// Recurrence interval, `Recurrence::None` when absent
    fn recurrence(&self) -> Recurrence {
        Recurrence::None
    }
    /// Optional last date on which a recurrence may fire
    fn recurrence_end(&self) -> Option<NaiveDate> {
        None
    }
}

impl TransactionLike for Income {
    fn amount(&self) -> f64 {
        self.amount
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn label(&self) -> &str {
        &self.source
    }
    fn recurrence(&self) -> Recurrence {
        self.recurrence
    }
    fn recurrence_end(&self) -> Option<NaiveDate> {
        self.recurrence_end
    }
}

impl TransactionLike for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn label(&self) -> &str {
        &self.category.name
    }
    fn recurrence(&self) -> Recurrence {
        self.recurrence
    }
    fn recurrence_end(&self) -> Option<NaiveDate> {
        self.recurrence_end
    }
}

impl TransactionLike for ReceiptItem {
    fn amount(&self) -> f64 {
        self.total_price
    }
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn label(&self) -> &str {
        &self.category.name
    }
}
