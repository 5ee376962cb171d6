//! Financial record types: expenses, income, budgets and savings goals

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Declares a closed set of labels that serializes as its display name.
/// Unknown labels deserialize to `Other` so foreign snapshots never fail.
macro_rules! closed_set {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every member, in display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Display name, also the wire representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Strict, case-insensitive lookup by display name
            pub fn from_label(label: &str) -> Option<Self> {
                let label = label.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(label))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::from_label(&raw).unwrap_or($name::Other))
            }
        }
    };
}

closed_set! {
    /// Fixed expense categories
    ExpenseCategory {
        Food => "Food",
        Transport => "Transport",
        Entertainment => "Entertainment",
        Shopping => "Shopping",
        Bills => "Bills",
        Healthcare => "Healthcare",
        Other => "Other",
    }
}

closed_set! {
    /// Fixed income sources
    IncomeSource {
        Salary => "Salary",
        Freelance => "Freelance",
        Investment => "Investment",
        Business => "Business",
        Other => "Other",
    }
}

/// A single spending entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub category: ExpenseCategory,
    /// Always positive
    pub amount: Decimal,
    pub description: String,
    /// Date of the expense (YYYY-MM-DD)
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(
        id: impl Into<String>,
        category: ExpenseCategory,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            amount,
            description: description.into(),
            date,
        }
    }
}

/// A single earning entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub source: IncomeSource,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
}

impl Income {
    pub fn new(
        id: impl Into<String>,
        source: IncomeSource,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            amount,
            description: description.into(),
            date,
        }
    }
}

/// Spending limit for one category.
///
/// `category` is free text and only correlates with [`Expense::category`]
/// by display-name equality. `spent` may exceed `limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
}

impl Budget {
    pub fn new(id: impl Into<String>, category: impl Into<String>, limit: Decimal, spent: Decimal) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            limit,
            spent,
        }
    }

    /// True once spending has passed the limit
    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }
}

/// A savings goal. The deadline is informational and never enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    pub is_completed: bool,
}

impl Goal {
    /// Create a goal with `is_completed` derived from the amounts
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        target_amount: Decimal,
        current_amount: Decimal,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target_amount,
            current_amount,
            deadline,
            is_completed: current_amount >= target_amount,
        }
    }
}
