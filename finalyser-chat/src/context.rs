//! Turns a financial snapshot into the assistant's system prompt

use finalyser_core::aggregate::{budget_totals, budget_utilization, goal_progress, partition_goals, total_of};
use finalyser_core::money::{format_amount, format_percent, format_plain};
use finalyser_core::{ExpenseCategory, FinancialSnapshot};
use rust_decimal::Decimal;
use std::fmt::Write;

const PREAMBLE: &str = "You are a helpful financial assistant for Finalyser, a personal finance management app.
You help users with:
- Budgeting advice and expense analysis
- Savings strategies and financial goal planning
- Understanding their spending patterns
- General financial guidance

You have access to the user's real-time financial data. Use this data to provide personalized, specific advice.";

const CLOSING: &str = "Keep responses clear, concise, and actionable. Use a friendly, supportive tone. \
Reference specific numbers from their data when relevant.";

/// Full system instruction; the data block is omitted without a snapshot
pub fn build_system_prompt(snapshot: Option<&FinancialSnapshot>) -> String {
    let context = snapshot.map(data_context).unwrap_or_default();
    format!("{PREAMBLE}\n{context}\n\n{CLOSING}")
}

fn join_or_none(items: Vec<String>, sep: &str) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(sep)
    }
}

/// Expense totals per category in first-seen order
fn expenses_by_category(snapshot: &FinancialSnapshot) -> Vec<(ExpenseCategory, Decimal)> {
    let mut out: Vec<(ExpenseCategory, Decimal)> = Vec::new();
    for e in &snapshot.expenses {
        match out.iter_mut().find(|(c, _)| *c == e.category) {
            Some((_, total)) => *total = total.saturating_add(e.amount),
            None => out.push((e.category, e.amount)),
        }
    }
    out
}

/// The "CURRENT FINANCIAL DATA" block
pub fn data_context(snapshot: &FinancialSnapshot) -> String {
    let total_expenses = total_of(&snapshot.expenses, |e| e.amount);
    let total_income = total_of(&snapshot.income, |i| i.amount);
    let budgets = budget_totals(&snapshot.budgets);
    let (active, completed) = partition_goals(&snapshot.goals);

    let sources = snapshot
        .income
        .iter()
        .map(|i| format!("{} (${})", i.source, format_plain(i.amount)))
        .collect();
    let categories = expenses_by_category(snapshot)
        .into_iter()
        .map(|(c, amt)| format!("{c} (${})", format_plain(amt)))
        .collect();
    let budget_details = snapshot
        .budgets
        .iter()
        .map(|b| {
            format!(
                "{}: ${}/${} ({})",
                b.category,
                format_plain(b.spent),
                format_plain(b.limit),
                format_percent(budget_utilization(b))
            )
        })
        .collect();
    let active_lines = active
        .iter()
        .map(|g| {
            format!(
                "  • {}: ${}/${} ({}) - Deadline: {}",
                g.title,
                format_plain(g.current_amount),
                format_plain(g.target_amount),
                format_percent(goal_progress(g)),
                g.deadline.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>();
    let completed_lines = completed
        .iter()
        .map(|g| format!("  • {} (✓)", g.title))
        .collect::<Vec<_>>();

    let mut s = String::new();
    // Writing to a String cannot fail.
    let _ = write!(
        s,
        "\n\nCURRENT FINANCIAL DATA:\n\n\
         Income Summary:\n\
         - Total Income: {}\n\
         - Income Sources: {}\n\n\
         Expense Summary:\n\
         - Total Expenses: {}\n\
         - Expenses by Category: {}\n\n\
         Budget Status:\n\
         - Total Budget: {}\n\
         - Total Spent: {} ({})\n\
         - Budget Details: {}\n\n\
         Financial Goals:\n\
         - Active Goals: {}\n{}\n\
         - Completed Goals: {}\n{}\n\n\
         Net Savings: {}\n",
        format_amount(total_income),
        join_or_none(sources, ", "),
        format_amount(total_expenses),
        join_or_none(categories, ", "),
        format_amount(budgets.limit),
        format_amount(budgets.spent),
        format_percent(budgets.percent),
        join_or_none(budget_details, ", "),
        active.len(),
        if active_lines.is_empty() { "  None".to_string() } else { active_lines.join("\n") },
        completed.len(),
        if completed_lines.is_empty() { "  None".to_string() } else { completed_lines.join("\n") },
        format_amount(total_income.saturating_sub(total_expenses)),
    );
    s
}
