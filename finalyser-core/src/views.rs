//! Per-tab view models. Each view reads the store once and carries every
//! aggregate its renderer needs, so renderers do no arithmetic.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::aggregate::{
    budget_remaining, budget_totals, budget_utilization, category_shares, clamp_percent, goal_progress,
    group_by_category, group_by_source, monthly_series, overview_stats, partition_goals, total_of, BudgetTotals,
    MonthlyRow, OverviewStats, SourceTotal, UtilizationTier,
};
use crate::records::{Budget, Expense, ExpenseCategory, Goal, Income, IncomeSource};
use crate::store::FinancialStore;

/// Navigation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Overview,
    Expenses,
    Income,
    Budget,
    Goals,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Overview, Tab::Expenses, Tab::Income, Tab::Budget, Tab::Goals];

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Expenses => "expenses",
            Tab::Income => "income",
            Tab::Budget => "budget",
            Tab::Goals => "goals",
        }
    }

    /// Exact lookup; accepts `budgets` as an alias
    pub fn from_name(name: &str) -> Option<Tab> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "budgets" => Some(Tab::Budget),
            other => Tab::ALL.iter().copied().find(|t| t.name() == other),
        }
    }

    /// Router semantics: unknown names land on the overview
    pub fn route(name: &str) -> Tab {
        Tab::from_name(name).unwrap_or(Tab::Overview)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub stats: OverviewStats,
    pub monthly: Vec<MonthlyRow>,
}

impl OverviewView {
    pub fn build(store: &FinancialStore) -> Self {
        Self {
            stats: overview_stats(store.expenses(), store.income(), store.goals()),
            monthly: monthly_series(store.expenses(), store.income()),
        }
    }
}

/// One pie slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: ExpenseCategory,
    pub total: Decimal,
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpensesView {
    pub expenses: Vec<Expense>,
    pub total: Decimal,
    pub by_category: Vec<CategorySlice>,
    pub categories: &'static [ExpenseCategory],
}

impl ExpensesView {
    pub fn build(store: &FinancialStore) -> Self {
        let totals = group_by_category(store.expenses(), ExpenseCategory::ALL);
        let by_category = totals
            .iter()
            .zip(category_shares(&totals))
            .map(|(t, (_, share))| CategorySlice {
                category: t.category,
                total: t.total,
                share,
            })
            .collect();

        Self {
            expenses: store.expenses().to_vec(),
            total: total_of(store.expenses(), |e| e.amount),
            by_category,
            categories: ExpenseCategory::ALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeView {
    pub income: Vec<Income>,
    pub total: Decimal,
    pub by_source: Vec<SourceTotal>,
    pub sources: &'static [IncomeSource],
}

impl IncomeView {
    pub fn build(store: &FinancialStore) -> Self {
        Self {
            income: store.income().to_vec(),
            total: total_of(store.income(), |i| i.amount),
            by_source: group_by_source(store.income(), IncomeSource::ALL),
            sources: IncomeSource::ALL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetRow {
    pub budget: Budget,
    pub percent: Decimal,
    /// `percent` clamped for the progress bar
    pub bar: Decimal,
    pub tier: UtilizationTier,
    pub remaining: Decimal,
    pub over: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetView {
    pub totals: BudgetTotals,
    pub rows: Vec<BudgetRow>,
}

impl BudgetView {
    pub fn build(store: &FinancialStore) -> Self {
        let rows = store
            .budgets()
            .iter()
            .map(|b| {
                let percent = budget_utilization(b);
                BudgetRow {
                    budget: b.clone(),
                    percent,
                    bar: clamp_percent(percent),
                    tier: UtilizationTier::for_percent(percent),
                    remaining: budget_remaining(b),
                    over: b.is_over(),
                }
            })
            .collect();

        Self {
            totals: budget_totals(store.budgets()),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalRow {
    pub goal: Goal,
    pub percent: Decimal,
    pub bar: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalsView {
    pub active: Vec<GoalRow>,
    pub completed: Vec<Goal>,
}

impl GoalsView {
    pub fn build(store: &FinancialStore) -> Self {
        let (active, completed) = partition_goals(store.goals());
        Self {
            active: active
                .into_iter()
                .map(|g| {
                    let percent = goal_progress(g);
                    GoalRow {
                        goal: g.clone(),
                        percent,
                        bar: clamp_percent(percent),
                    }
                })
                .collect(),
            completed: completed.into_iter().cloned().collect(),
        }
    }
}

/// The rendered content of one tab
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tab", rename_all = "lowercase")]
pub enum View {
    Overview(OverviewView),
    Expenses(ExpensesView),
    Income(IncomeView),
    Budget(BudgetView),
    Goals(GoalsView),
}

impl View {
    pub fn build(tab: Tab, store: &FinancialStore) -> Self {
        match tab {
            Tab::Overview => View::Overview(OverviewView::build(store)),
            Tab::Expenses => View::Expenses(ExpensesView::build(store)),
            Tab::Income => View::Income(IncomeView::build(store)),
            Tab::Budget => View::Budget(BudgetView::build(store)),
            Tab::Goals => View::Goals(GoalsView::build(store)),
        }
    }

    pub fn tab(&self) -> Tab {
        match self {
            View::Overview(_) => Tab::Overview,
            View::Expenses(_) => Tab::Expenses,
            View::Income(_) => Tab::Income,
            View::Budget(_) => Tab::Budget,
            View::Goals(_) => Tab::Goals,
        }
    }
}
