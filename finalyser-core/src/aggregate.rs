//! Pure aggregation over record collections: totals, breakdowns, monthly
//! series and budget/goal percentages.
//!
//! Every function here is side-effect free and total. Zero denominators
//! yield a zero percentage instead of failing.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::records::{Budget, Expense, ExpenseCategory, Goal, Income, IncomeSource};

/// Number of monthly buckets kept by [`monthly_series`]
pub const MONTHLY_WINDOW: usize = 6;

/// `part / whole * 100`, or zero when `whole` is zero (or on overflow)
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .unwrap_or(Decimal::ZERO)
}

/// Clamp a percentage into `0..=100` for progress bars
pub fn clamp_percent(percent: Decimal) -> Decimal {
    percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Sum that sticks at the `Decimal` bounds instead of overflowing
pub fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// Sum of `amount` over `records`; zero for an empty slice
pub fn total_of<T>(records: &[T], amount: impl Fn(&T) -> Decimal) -> Decimal {
    saturating_sum(records.iter().map(amount))
}

/// Summed amount for one expense category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: Decimal,
}

/// Summed amount for one income source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceTotal {
    pub source: IncomeSource,
    pub total: Decimal,
}

/// Per-category totals in the order of `categories`, omitting empty ones
pub fn group_by_category(expenses: &[Expense], categories: &[ExpenseCategory]) -> Vec<CategoryTotal> {
    categories
        .iter()
        .map(|&category| CategoryTotal {
            category,
            total: saturating_sum(
                expenses
                    .iter()
                    .filter(|e| e.category == category)
                    .map(|e| e.amount),
            ),
        })
        .filter(|c| !c.total.is_zero())
        .collect()
}

/// Per-source totals in the order of `sources`, omitting empty ones
pub fn group_by_source(income: &[Income], sources: &[IncomeSource]) -> Vec<SourceTotal> {
    sources
        .iter()
        .map(|&source| SourceTotal {
            source,
            total: saturating_sum(income.iter().filter(|i| i.source == source).map(|i| i.amount)),
        })
        .filter(|s| !s.total.is_zero())
        .collect()
}

/// Share of each category in the grand total, in percent
pub fn category_shares(totals: &[CategoryTotal]) -> Vec<(ExpenseCategory, Decimal)> {
    let grand = total_of(totals, |c| c.total);
    totals
        .iter()
        .map(|c| (c.category, percent_of(c.total, grand)))
        .collect()
}

/// Calendar year-month bucket key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Three-letter month name, e.g. `Jan`
    pub fn short_name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("???")
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One row of the income/expense trend chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub month: YearMonth,
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
}

/// Bucket both collections by year-month; ascending, last [`MONTHLY_WINDOW`] rows
pub fn monthly_series(expenses: &[Expense], income: &[Income]) -> Vec<MonthlyRow> {
    let mut buckets: BTreeMap<YearMonth, (Decimal, Decimal)> = BTreeMap::new();

    for i in income {
        let bucket = buckets.entry(YearMonth::of(i.date)).or_default();
        bucket.0 = bucket.0.saturating_add(i.amount);
    }
    for e in expenses {
        let bucket = buckets.entry(YearMonth::of(e.date)).or_default();
        bucket.1 = bucket.1.saturating_add(e.amount);
    }

    let skip = buckets.len().saturating_sub(MONTHLY_WINDOW);
    buckets
        .into_iter()
        .skip(skip)
        .map(|(month, (income, expenses))| MonthlyRow {
            month,
            income,
            expenses,
            savings: income.saturating_sub(expenses),
        })
        .collect()
}

/// Color tier of a budget bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationTier {
    Normal,
    Warning,
    Critical,
}

impl UtilizationTier {
    /// >= 90 critical, >= 70 warning, otherwise normal
    pub fn for_percent(percent: Decimal) -> Self {
        if percent >= Decimal::from(90) {
            UtilizationTier::Critical
        } else if percent >= Decimal::from(70) {
            UtilizationTier::Warning
        } else {
            UtilizationTier::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UtilizationTier::Normal => "ok",
            UtilizationTier::Warning => "warning",
            UtilizationTier::Critical => "critical",
        }
    }
}

/// Spent as a percentage of the limit; zero when the limit is zero
pub fn budget_utilization(budget: &Budget) -> Decimal {
    percent_of(budget.spent, budget.limit)
}

/// Limit minus spent; negative once over budget
pub fn budget_remaining(budget: &Budget) -> Decimal {
    budget.limit.saturating_sub(budget.spent)
}

/// Aggregate over all budgets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetTotals {
    pub limit: Decimal,
    pub spent: Decimal,
    pub percent: Decimal,
}

pub fn budget_totals(budgets: &[Budget]) -> BudgetTotals {
    let limit = total_of(budgets, |b| b.limit);
    let spent = total_of(budgets, |b| b.spent);
    BudgetTotals {
        limit,
        spent,
        percent: percent_of(spent, limit),
    }
}

/// Derive each budget's `spent` from the expenses of the matching category
pub fn recompute_spent(budgets: &[Budget], expenses: &[Expense]) -> Vec<Budget> {
    budgets
        .iter()
        .map(|b| Budget {
            spent: saturating_sum(
                expenses
                    .iter()
                    .filter(|e| e.category.as_str() == b.category)
                    .map(|e| e.amount),
            ),
            ..b.clone()
        })
        .collect()
}

/// Current over target in percent, uncapped; zero when the target is zero
pub fn goal_progress(goal: &Goal) -> Decimal {
    percent_of(goal.current_amount, goal.target_amount)
}

/// New goal with `amount` added and completion recomputed.
/// `amount` is not validated.
pub fn apply_contribution(goal: &Goal, amount: Decimal) -> Goal {
    let current_amount = goal.current_amount.saturating_add(amount);
    Goal {
        current_amount,
        is_completed: current_amount >= goal.target_amount,
        ..goal.clone()
    }
}

/// Split goals into (active, completed), preserving order
pub fn partition_goals(goals: &[Goal]) -> (Vec<&Goal>, Vec<&Goal>) {
    goals.iter().partition(|g| !g.is_completed)
}

/// Relative change in percent; `None` without a non-zero baseline
pub fn percent_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(percent_of(current.saturating_sub(previous), previous.abs()))
}

/// Headline numbers for the overview cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_savings: Decimal,
    pub goals_completed: usize,
    pub goals_total: usize,
    pub goals_percent: Decimal,
    /// Change of the latest month bucket versus the one before it
    pub income_change: Option<Decimal>,
    pub expenses_change: Option<Decimal>,
    pub savings_change: Option<Decimal>,
}

pub fn overview_stats(expenses: &[Expense], income: &[Income], goals: &[Goal]) -> OverviewStats {
    let total_income = total_of(income, |i| i.amount);
    let total_expenses = total_of(expenses, |e| e.amount);
    let goals_completed = goals.iter().filter(|g| g.is_completed).count();
    let goals_total = goals.len();

    let series = monthly_series(expenses, income);
    let (income_change, expenses_change, savings_change) = match series.as_slice() {
        [.., prev, last] => (
            percent_change(prev.income, last.income),
            percent_change(prev.expenses, last.expenses),
            percent_change(prev.savings, last.savings),
        ),
        _ => (None, None, None),
    };

    OverviewStats {
        total_income,
        total_expenses,
        net_savings: total_income.saturating_sub(total_expenses),
        goals_completed,
        goals_total,
        goals_percent: percent_of(Decimal::from(goals_completed), Decimal::from(goals_total)),
        income_change,
        expenses_change,
        savings_change,
    }
}
