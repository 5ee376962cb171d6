//! Sample records loaded into a fresh session when no fixture is given

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::records::{Budget, Expense, ExpenseCategory, Goal, Income, IncomeSource};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn amount(whole: i64) -> Decimal {
    Decimal::from(whole)
}

pub fn expenses() -> Vec<Expense> {
    use ExpenseCategory::*;
    vec![
        Expense::new("1", Food, amount(450), "Groceries & Dining", date(2025, 1, 15)),
        Expense::new("2", Transport, amount(200), "Gas & Uber", date(2025, 1, 10)),
        Expense::new("3", Entertainment, amount(150), "Movies & Games", date(2025, 1, 5)),
        Expense::new("4", Bills, amount(1200), "Rent & Utilities", date(2025, 1, 1)),
        Expense::new("5", Food, amount(480), "Groceries & Dining", date(2024, 12, 15)),
        Expense::new("6", Shopping, amount(320), "Clothes & Electronics", date(2024, 12, 20)),
        Expense::new("7", Bills, amount(1200), "Rent & Utilities", date(2024, 12, 1)),
    ]
}

pub fn income() -> Vec<Income> {
    use IncomeSource::*;
    vec![
        Income::new("1", Salary, amount(4500), "Monthly Salary", date(2025, 1, 1)),
        Income::new("2", Freelance, amount(300), "Web Design Project", date(2025, 1, 15)),
        Income::new("3", Salary, amount(4500), "Monthly Salary", date(2024, 12, 1)),
    ]
}

pub fn budgets() -> Vec<Budget> {
    vec![
        Budget::new("1", "Food", amount(500), amount(450)),
        Budget::new("2", "Transport", amount(300), amount(200)),
        Budget::new("3", "Entertainment", amount(200), amount(150)),
        Budget::new("4", "Shopping", amount(400), amount(320)),
        Budget::new("5", "Bills", amount(1300), amount(1200)),
    ]
}

pub fn goals() -> Vec<Goal> {
    vec![
        Goal::new("1", "Emergency Fund", amount(5000), amount(2700), date(2025, 6, 1)),
        Goal::new("2", "Vacation Fund", amount(2000), amount(800), date(2025, 8, 1)),
        Goal::new("3", "New Laptop", amount(1500), amount(1500), date(2025, 2, 1)),
        Goal::new("4", "Investment Portfolio", amount(10000), amount(4200), date(2025, 12, 31)),
        Goal::new("5", "Car Down Payment", amount(3000), amount(3000), date(2025, 1, 15)),
    ]
}
