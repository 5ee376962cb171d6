//! finalyser-core: records, aggregation, the session store and view models
//! for the Finalyser personal finance dashboard

pub mod actions;
pub mod aggregate;
pub mod error;
pub mod money;
pub mod records;
pub mod seed;
pub mod store;
pub mod views;

pub use actions::{BudgetForm, ExpenseForm, GoalForm, IncomeForm, CONTRIBUTION_STEP, MAX_AMOUNT_UNITS};
pub use aggregate::{
    apply_contribution, budget_utilization, goal_progress, group_by_category, group_by_source, monthly_series,
    total_of, MonthlyRow, UtilizationTier, YearMonth,
};
pub use error::{StoreError, ValidationError};
pub use records::{Budget, Expense, ExpenseCategory, Goal, Income, IncomeSource};
pub use store::{FinancialSnapshot, FinancialStore, Session};
pub use views::{Tab, View};
