//! User actions. Each one validates its raw form input, computes the next
//! full collection and replaces it in the store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::aggregate::apply_contribution;
use crate::error::ValidationError;
use crate::records::{Budget, Expense, ExpenseCategory, Goal, Income, IncomeSource};
use crate::store::FinancialStore;

/// Fixed step of the "add contribution" button
pub const CONTRIBUTION_STEP: Decimal = Decimal::ONE_HUNDRED;

/// Raw input of the add-expense form
#[derive(Debug, Clone, Default)]
pub struct ExpenseForm {
    pub category: String,
    pub amount: String,
    pub description: String,
}

/// Raw input of the add-income form
#[derive(Debug, Clone, Default)]
pub struct IncomeForm {
    pub source: String,
    pub amount: String,
    pub description: String,
}

/// Raw input of the add-budget form
#[derive(Debug, Clone, Default)]
pub struct BudgetForm {
    pub category: String,
    pub limit: String,
}

/// Raw input of the add-goal form
#[derive(Debug, Clone, Default)]
pub struct GoalForm {
    pub title: String,
    pub target_amount: String,
    pub current_amount: String,
    pub deadline: String,
}

fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value)
}

/// Largest amount accepted from a form, in whole currency units
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Parse `1,234.50` or `$1234.50`; magnitudes above [`MAX_AMOUNT_UNITS`] are rejected
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let value = required(field, raw)?;
    let digits = value.strip_prefix('$').unwrap_or(value).replace(',', "");
    let amount = Decimal::from_str(&digits).map_err(|_| ValidationError::InvalidAmount {
        field,
        value: value.to_string(),
    })?;
    let max = Decimal::from(MAX_AMOUNT_UNITS);
    if amount.abs() > max {
        return Err(ValidationError::TooLarge { field, max });
    }
    Ok(amount)
}

pub fn positive_amount(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let amount = parse_amount(field, raw)?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(amount)
}

pub fn non_negative_amount(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let amount = parse_amount(field, raw)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::Negative(field));
    }
    Ok(amount)
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let value = required(field, raw)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Prepend a new expense dated `today`
pub fn add_expense(store: &mut FinancialStore, form: &ExpenseForm, today: NaiveDate) -> Result<Expense, ValidationError> {
    let label = required("category", &form.category)?;
    let description = required("description", &form.description)?;
    let category = ExpenseCategory::from_label(label).ok_or_else(|| ValidationError::UnknownOption {
        field: "category",
        value: label.to_string(),
    })?;
    let amount = positive_amount("amount", &form.amount)?;

    let expense = Expense::new(store.next_id(), category, amount, description, today);
    let mut next = Vec::with_capacity(store.expenses().len() + 1);
    next.push(expense.clone());
    next.extend_from_slice(store.expenses());
    store.set_expenses(next);

    tracing::debug!(id = %expense.id, category = %expense.category, "expense added");
    Ok(expense)
}

/// Remove an expense; returns false when no record had that id
pub fn delete_expense(store: &mut FinancialStore, id: &str) -> bool {
    let before = store.expenses().len();
    let next: Vec<Expense> = store.expenses().iter().filter(|e| e.id != id).cloned().collect();
    let removed = next.len() != before;
    store.set_expenses(next);
    removed
}

/// Prepend a new income entry dated `today`
pub fn add_income(store: &mut FinancialStore, form: &IncomeForm, today: NaiveDate) -> Result<Income, ValidationError> {
    let label = required("source", &form.source)?;
    let description = required("description", &form.description)?;
    let source = IncomeSource::from_label(label).ok_or_else(|| ValidationError::UnknownOption {
        field: "source",
        value: label.to_string(),
    })?;
    let amount = positive_amount("amount", &form.amount)?;

    let entry = Income::new(store.next_id(), source, amount, description, today);
    let mut next = Vec::with_capacity(store.income().len() + 1);
    next.push(entry.clone());
    next.extend_from_slice(store.income());
    store.set_income(next);

    tracing::debug!(id = %entry.id, source = %entry.source, "income added");
    Ok(entry)
}

/// Remove an income entry; returns false when no record had that id
pub fn delete_income(store: &mut FinancialStore, id: &str) -> bool {
    let before = store.income().len();
    let next: Vec<Income> = store.income().iter().filter(|i| i.id != id).cloned().collect();
    let removed = next.len() != before;
    store.set_income(next);
    removed
}

/// Append a budget with nothing spent yet
pub fn add_budget(store: &mut FinancialStore, form: &BudgetForm) -> Result<Budget, ValidationError> {
    let category = required("category", &form.category)?;
    let limit = non_negative_amount("limit", &form.limit)?;

    let budget = Budget::new(store.next_id(), category, limit, Decimal::ZERO);
    let mut next = store.budgets().to_vec();
    next.push(budget.clone());
    store.set_budgets(next);

    tracing::debug!(id = %budget.id, category = %budget.category, "budget added");
    Ok(budget)
}

/// Replace the limit of one budget
pub fn update_budget_limit(store: &mut FinancialStore, id: &str, limit: &str) -> Result<Budget, ValidationError> {
    let limit = non_negative_amount("limit", limit)?;
    if !store.budgets().iter().any(|b| b.id == id) {
        return Err(ValidationError::NotFound {
            entity: "budget",
            id: id.to_string(),
        });
    }

    let next: Vec<Budget> = store
        .budgets()
        .iter()
        .map(|b| if b.id == id { Budget { limit, ..b.clone() } } else { b.clone() })
        .collect();
    let updated = next.iter().find(|b| b.id == id).cloned();
    store.set_budgets(next);

    updated.ok_or_else(|| ValidationError::NotFound {
        entity: "budget",
        id: id.to_string(),
    })
}

/// Recompute every budget's `spent` from the current expenses
pub fn sync_budget_spending(store: &mut FinancialStore) {
    let next = crate::aggregate::recompute_spent(store.budgets(), store.expenses());
    store.set_budgets(next);
}

/// Prepend a new goal
pub fn add_goal(store: &mut FinancialStore, form: &GoalForm) -> Result<Goal, ValidationError> {
    let title = required("title", &form.title)?;
    let target = positive_amount("target amount", &form.target_amount)?;
    let current = non_negative_amount("current amount", &form.current_amount)?;
    let deadline = parse_date("deadline", &form.deadline)?;

    let goal = Goal::new(store.next_id(), title, target, current, deadline);
    let mut next = Vec::with_capacity(store.goals().len() + 1);
    next.push(goal.clone());
    next.extend_from_slice(store.goals());
    store.set_goals(next);

    tracing::debug!(id = %goal.id, title = %goal.title, "goal added");
    Ok(goal)
}

/// Add `amount` to one goal, possibly completing it
pub fn contribute(store: &mut FinancialStore, id: &str, amount: Decimal) -> Result<Goal, ValidationError> {
    let goal = store
        .goals()
        .iter()
        .find(|g| g.id == id)
        .map(|g| apply_contribution(g, amount))
        .ok_or_else(|| ValidationError::NotFound {
            entity: "goal",
            id: id.to_string(),
        })?;

    let next: Vec<Goal> = store
        .goals()
        .iter()
        .map(|g| if g.id == id { goal.clone() } else { g.clone() })
        .collect();
    store.set_goals(next);

    if goal.is_completed {
        tracing::info!(id = %goal.id, title = %goal.title, "goal reached");
    }
    Ok(goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
    }

    fn expense_form(category: &str, amount: &str, description: &str) -> ExpenseForm {
        ExpenseForm {
            category: category.to_string(),
            amount: amount.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_add_expense_prepends_with_fresh_id() {
        let mut store = FinancialStore::seeded();
        let e = add_expense(&mut store, &expense_form("healthcare", "$42.50", "Pharmacy"), today()).unwrap();
        assert_eq!(e.id, "8");
        assert_eq!(e.category, ExpenseCategory::Healthcare);
        assert_eq!(e.amount, dec!(42.50));
        assert_eq!(e.date, today());
        assert_eq!(store.expenses().len(), 8);
        assert_eq!(store.expenses()[0], e);
    }

    #[test]
    fn test_add_expense_missing_field_leaves_store_unchanged() {
        let mut store = FinancialStore::seeded();
        let before = store.snapshot();
        let err = add_expense(&mut store, &expense_form("", "10", "Lunch"), today()).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("category"));
        let err = add_expense(&mut store, &expense_form("Food", "  ", "Lunch"), today()).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("amount"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_add_expense_rejects_bad_amounts() {
        let mut store = FinancialStore::seeded();
        assert!(matches!(
            add_expense(&mut store, &expense_form("Food", "abc", "x"), today()),
            Err(ValidationError::InvalidAmount { .. })
        ));
        assert_eq!(
            add_expense(&mut store, &expense_form("Food", "0", "x"), today()),
            Err(ValidationError::NotPositive("amount"))
        );
        assert!(matches!(
            add_expense(&mut store, &expense_form("Pets", "3", "x"), today()),
            Err(ValidationError::UnknownOption { field: "category", .. })
        ));
        assert_eq!(store.expenses().len(), 7);
    }

    #[test]
    fn test_amounts_above_ceiling_are_rejected() {
        let mut store = FinancialStore::seeded();
        let huge = Decimal::MAX.to_string();
        let max = Decimal::from(MAX_AMOUNT_UNITS);
        for _ in 0..2 {
            assert_eq!(
                add_expense(&mut store, &expense_form("Food", &huge, "x"), today()),
                Err(ValidationError::TooLarge { field: "amount", max })
            );
        }
        assert_eq!(store.expenses().len(), 7);
        assert_eq!(parse_amount("amount", "1,000,000,000,000"), Ok(max));
        assert!(parse_amount("amount", "-1000000000000.01").is_err());
        assert_eq!(positive_amount("amount", "1,000"), Ok(dec!(1000)));
    }

    #[test]
    fn test_delete_expense() {
        let mut store = FinancialStore::seeded();
        assert!(delete_expense(&mut store, "3"));
        assert!(!store.expenses().iter().any(|e| e.id == "3"));
        assert!(!delete_expense(&mut store, "3"));
        assert_eq!(store.expenses().len(), 6);
    }

    #[test]
    fn test_add_and_delete_income() {
        let mut store = FinancialStore::seeded();
        let form = IncomeForm {
            source: "Business".into(),
            amount: "1,250".into(),
            description: "Consulting".into(),
        };
        let i = add_income(&mut store, &form, today()).unwrap();
        assert_eq!(i.amount, dec!(1250));
        assert_eq!(store.income()[0].id, i.id);
        assert!(delete_income(&mut store, &i.id));
        assert_eq!(store.income().len(), 3);
    }

    #[test]
    fn test_add_budget_appends_with_zero_spent() {
        let mut store = FinancialStore::seeded();
        let b = add_budget(&mut store, &BudgetForm { category: "Healthcare".into(), limit: "0".into() }).unwrap();
        assert_eq!(b.spent, Decimal::ZERO);
        assert_eq!(b.limit, Decimal::ZERO);
        assert_eq!(store.budgets().last(), Some(&b));
        assert_eq!(
            add_budget(&mut store, &BudgetForm { category: "X".into(), limit: "-5".into() }),
            Err(ValidationError::Negative("limit"))
        );
    }

    #[test]
    fn test_update_budget_limit() {
        let mut store = FinancialStore::seeded();
        let b = update_budget_limit(&mut store, "1", "600").unwrap();
        assert_eq!(b.limit, dec!(600));
        assert_eq!(b.spent, dec!(450));
        assert_eq!(store.budgets()[0].limit, dec!(600));
        assert!(matches!(
            update_budget_limit(&mut store, "99", "1"),
            Err(ValidationError::NotFound { entity: "budget", .. })
        ));
    }

    #[test]
    fn test_sync_budget_spending() {
        let mut store = FinancialStore::seeded();
        sync_budget_spending(&mut store);
        let food = store.budgets().iter().find(|b| b.category == "Food").unwrap();
        assert_eq!(food.spent, dec!(930));
    }

    #[test]
    fn test_add_goal_validates_deadline() {
        let mut store = FinancialStore::seeded();
        let mut form = GoalForm {
            title: "Bike".into(),
            target_amount: "800".into(),
            current_amount: "0".into(),
            deadline: "2025-13-01".into(),
        };
        assert!(matches!(add_goal(&mut store, &form), Err(ValidationError::InvalidDate(_))));
        form.deadline = "2025-09-01".into();
        let g = add_goal(&mut store, &form).unwrap();
        assert!(!g.is_completed);
        assert_eq!(store.goals()[0], g);
    }

    #[test]
    fn test_contribute_completes_goal() {
        let mut store = FinancialStore::seeded();
        store.set_goals(vec![Goal::new(
            "1",
            "New Laptop",
            dec!(1500),
            dec!(1400),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        )]);
        let g = contribute(&mut store, "1", CONTRIBUTION_STEP).unwrap();
        assert_eq!(g.current_amount, dec!(1500));
        assert!(g.is_completed);
        assert_eq!(store.goals()[0], g);
        assert!(contribute(&mut store, "nope", CONTRIBUTION_STEP).is_err());
    }
}
