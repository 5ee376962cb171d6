//! Plain-text rendering of the dashboard views

use finalyser_core::money::{format_amount, format_change, format_percent};
use finalyser_core::views::{BudgetView, ExpensesView, GoalsView, IncomeView, OverviewView};
use finalyser_core::{Tab, View};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// `[#######.............]` for a percent already clamped to 0..=100
pub fn progress_bar(percent: Decimal, width: usize) -> String {
    let filled = (percent * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// Navigation header with the active tab marked
pub fn tab_bar(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|t| if *t == active { format!("[{t}]") } else { format!(" {t} ") })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render(view: &View) -> String {
    match view {
        View::Overview(v) => render_overview(v),
        View::Expenses(v) => render_expenses(v),
        View::Income(v) => render_income(v),
        View::Budget(v) => render_budget(v),
        View::Goals(v) => render_goals(v),
    }
}

// Writing to a String cannot fail, so the fmt results below are ignored.

fn render_overview(v: &OverviewView) -> String {
    let s = &v.stats;
    let mut out = String::new();
    let _ = writeln!(out, "Total Income    {:>12}  {}", format_amount(s.total_income), format_change(s.income_change));
    let _ = writeln!(
        out,
        "Total Expenses  {:>12}  {}",
        format_amount(s.total_expenses),
        format_change(s.expenses_change)
    );
    let _ = writeln!(out, "Net Savings     {:>12}  {}", format_amount(s.net_savings), format_change(s.savings_change));
    let _ = writeln!(
        out,
        "Goals Achieved  {:>12}  {} complete",
        format!("{}/{}", s.goals_completed, s.goals_total),
        format_percent(s.goals_percent)
    );

    let _ = writeln!(out, "\nIncome vs Expenses");
    if v.monthly.is_empty() {
        let _ = writeln!(out, "  no transactions yet");
    }
    for row in &v.monthly {
        let _ = writeln!(
            out,
            "  {} {}  income {:>12}  expenses {:>12}  savings {:>12}",
            row.month.short_name(),
            row.month.year,
            format_amount(row.income),
            format_amount(row.expenses),
            format_amount(row.savings)
        );
    }
    out
}

fn render_expenses(v: &ExpensesView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Expenses: {}", format_amount(v.total));

    let _ = writeln!(out, "\nBy category");
    if v.by_category.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for slice in &v.by_category {
        let _ = writeln!(
            out,
            "  {:<14}{:>12}  {:>6}",
            slice.category.as_str(),
            format_amount(slice.total),
            format_percent(slice.share)
        );
    }

    let _ = writeln!(out, "\nRecent expenses");
    if v.expenses.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for e in &v.expenses {
        let _ = writeln!(
            out,
            "  #{:<4}{}  {:<14}{:>12}  {}",
            e.id,
            e.date.format("%Y-%m-%d"),
            e.category.as_str(),
            format_amount(e.amount),
            e.description
        );
    }
    let names: Vec<&str> = v.categories.iter().map(|c| c.as_str()).collect();
    let _ = writeln!(out, "\nCategories: {}", names.join(", "));
    out
}

fn render_income(v: &IncomeView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Income: {}", format_amount(v.total));

    let _ = writeln!(out, "\nBy source");
    if v.by_source.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for s in &v.by_source {
        let _ = writeln!(out, "  {:<14}{:>12}", s.source.as_str(), format_amount(s.total));
    }

    let _ = writeln!(out, "\nIncome history");
    if v.income.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for i in &v.income {
        let _ = writeln!(
            out,
            "  #{:<4}{}  {:<14}{:>12}  {}",
            i.id,
            i.date.format("%Y-%m-%d"),
            i.source.as_str(),
            format_amount(i.amount),
            i.description
        );
    }
    let names: Vec<&str> = v.sources.iter().map(|s| s.as_str()).collect();
    let _ = writeln!(out, "\nSources: {}", names.join(", "));
    out
}

fn render_budget(v: &BudgetView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total Budget {}  Spent {} ({})",
        format_amount(v.totals.limit),
        format_amount(v.totals.spent),
        format_percent(v.totals.percent)
    );
    let _ = writeln!(out);
    if v.rows.is_empty() {
        let _ = writeln!(out, "  no budgets");
    }
    for row in &v.rows {
        let status = if row.over {
            format!("over by {}", format_amount(-row.remaining))
        } else {
            format!("{} left", format_amount(row.remaining))
        };
        let _ = writeln!(
            out,
            "  #{:<4}{:<14}{} {:>7} {:<8} {} / {}  {}",
            row.budget.id,
            row.budget.category,
            progress_bar(row.bar, BAR_WIDTH),
            format_percent(row.percent),
            row.tier.label(),
            format_amount(row.budget.spent),
            format_amount(row.budget.limit),
            status
        );
    }
    out
}

fn render_goals(v: &GoalsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Active goals");
    if v.active.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for row in &v.active {
        let g = &row.goal;
        let _ = writeln!(
            out,
            "  #{:<4}{:<22}{} {:>7}  {} / {}  due {}",
            g.id,
            g.title,
            progress_bar(row.bar, BAR_WIDTH),
            format_percent(row.percent),
            format_amount(g.current_amount),
            format_amount(g.target_amount),
            g.deadline.format("%Y-%m-%d")
        );
    }

    let _ = writeln!(out, "\nCompleted goals");
    if v.completed.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for g in &v.completed {
        let _ = writeln!(out, "  #{:<4}{:<22}{}  done", g.id, g.title, format_amount(g.target_amount));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use finalyser_core::FinancialStore;
    use rust_decimal_macros::dec;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(dec!(0), 10), "[..........]");
        assert_eq!(progress_bar(dec!(50), 10), "[#####.....]");
        assert_eq!(progress_bar(dec!(100), 10), "[##########]");
        assert_eq!(progress_bar(dec!(250), 10), "[##########]");
    }

    #[test]
    fn test_tab_bar_marks_active() {
        let bar = tab_bar(Tab::Budget);
        assert!(bar.contains("[budget]"));
        assert!(bar.contains(" overview "));
    }

    #[test]
    fn test_render_seed_views() {
        let store = FinancialStore::seeded();

        let overview = render(&View::build(Tab::Overview, &store));
        assert!(overview.contains("$9300.00"));
        assert!(overview.contains("$5300.00"));
        assert!(overview.contains("2/5"));
        assert!(overview.contains("Jan 2025"));

        let budget = render(&View::build(Tab::Budget, &store));
        assert!(budget.contains("Total Budget $2700.00  Spent $2320.00 (85.9%)"));
        assert!(budget.contains("90.0% critical"));

        let goals = render(&View::build(Tab::Goals, &store));
        assert!(goals.contains("Emergency Fund"));
        assert!(goals.contains("54.0%"));
        assert!(goals.contains("New Laptop"));
    }

    #[test]
    fn test_render_empty_store() {
        let store = FinancialStore::new(Vec::new(), Vec::new(), Vec::new(), Vec::new());
        for tab in Tab::ALL {
            let text = render(&View::build(tab, &store));
            assert!(!text.is_empty());
        }
        assert!(render(&View::build(Tab::Overview, &store)).contains("no transactions yet"));
    }
}
