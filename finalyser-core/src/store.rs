//! Session-scoped, in-memory holder of the four record collections.
//!
//! Every mutation is "compute the new full collection, then replace": the
//! store has no partial-update API. A [`Session`] owns the store and marks
//! the initialization/teardown boundary; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::records::{Budget, Expense, Goal, Income};
use crate::seed;

/// Point-in-time copy of all four collections.
///
/// Missing collections deserialize as empty, matching the optional
/// `financialData` fields sent by chat clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub income: Vec<Income>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, Default)]
pub struct FinancialStore {
    expenses: Vec<Expense>,
    income: Vec<Income>,
    budgets: Vec<Budget>,
    goals: Vec<Goal>,
    // Wider than any observed id, so the successor of `u64::MAX` still fits.
    next_id: u128,
}

impl FinancialStore {
    /// Build a store from caller-supplied collections
    pub fn new(expenses: Vec<Expense>, income: Vec<Income>, budgets: Vec<Budget>, goals: Vec<Goal>) -> Self {
        let mut store = Self {
            next_id: 1,
            ..Self::default()
        };
        store.set_expenses(expenses);
        store.set_income(income);
        store.set_budgets(budgets);
        store.set_goals(goals);
        store
    }

    /// Store holding the bundled sample records
    pub fn seeded() -> Self {
        Self::new(seed::expenses(), seed::income(), seed::budgets(), seed::goals())
    }

    pub fn from_snapshot(snapshot: FinancialSnapshot) -> Self {
        Self::new(snapshot.expenses, snapshot.income, snapshot.budgets, snapshot.goals)
    }

    pub fn snapshot(&self) -> FinancialSnapshot {
        FinancialSnapshot {
            expenses: self.expenses.clone(),
            income: self.income.clone(),
            budgets: self.budgets.clone(),
            goals: self.goals.clone(),
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn income(&self) -> &[Income] {
        &self.income
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn set_expenses(&mut self, expenses: Vec<Expense>) {
        self.observe_ids(expenses.iter().map(|e| e.id.as_str()));
        self.expenses = expenses;
    }

    pub fn set_income(&mut self, income: Vec<Income>) {
        self.observe_ids(income.iter().map(|i| i.id.as_str()));
        self.income = income;
    }

    pub fn set_budgets(&mut self, budgets: Vec<Budget>) {
        self.observe_ids(budgets.iter().map(|b| b.id.as_str()));
        self.budgets = budgets;
    }

    pub fn set_goals(&mut self, goals: Vec<Goal>) {
        self.observe_ids(goals.iter().map(|g| g.id.as_str()));
        self.goals = goals;
    }

    /// Fresh id, unique across all collections for the lifetime of the store
    pub fn next_id(&mut self) -> String {
        let id = self.next_id.max(1);
        // Starts at most at 2^64 and grows by one per call: never reaches u128::MAX.
        self.next_id = id.checked_add(1).unwrap_or(u128::MAX);
        id.to_string()
    }

    // Keep the generator ahead of any numeric id a caller inserted directly.
    fn observe_ids<'a>(&mut self, ids: impl Iterator<Item = &'a str>) {
        let max_seen = ids.filter_map(|id| id.parse::<u64>().ok()).max();
        if let Some(max_seen) = max_seen {
            self.next_id = self.next_id.max(u128::from(max_seen) + 1);
        }
    }
}

/// Initialization/teardown boundary around a [`FinancialStore`]
#[derive(Debug, Default)]
pub struct Session {
    store: Option<FinancialStore>,
}

impl Session {
    /// Session with no store; every access fails until one is begun
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(store: FinancialStore) -> Self {
        tracing::debug!(
            expenses = store.expenses().len(),
            income = store.income().len(),
            budgets = store.budgets().len(),
            goals = store.goals().len(),
            "session started"
        );
        Self { store: Some(store) }
    }

    pub fn is_active(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Result<&FinancialStore, StoreError> {
        self.store.as_ref().ok_or(StoreError::NotInitialized)
    }

    pub fn store_mut(&mut self) -> Result<&mut FinancialStore, StoreError> {
        self.store.as_mut().ok_or(StoreError::NotInitialized)
    }

    /// Tear down the session, handing back whatever the store held
    pub fn end(&mut self) -> Option<FinancialStore> {
        let store = self.store.take();
        if store.is_some() {
            tracing::debug!("session ended");
        }
        store
    }
}
