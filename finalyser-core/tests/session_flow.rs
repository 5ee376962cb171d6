use chrono::NaiveDate;
use finalyser_core::actions::{
    add_budget, add_expense, add_goal, contribute, delete_expense, sync_budget_spending, update_budget_limit,
};
use finalyser_core::views::{BudgetView, ExpensesView, GoalsView, OverviewView};
use finalyser_core::{
    BudgetForm, ExpenseForm, FinancialSnapshot, FinancialStore, GoalForm, Session, StoreError, Tab, UtilizationTier,
    ValidationError, View, CONTRIBUTION_STEP,
};
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
}

#[test]
fn test_session_lifecycle() {
    let mut session = Session::new();
    assert!(matches!(session.store(), Err(StoreError::NotInitialized)));
    assert!(matches!(session.store_mut(), Err(StoreError::NotInitialized)));

    let mut session = Session::begin(FinancialStore::seeded());
    assert!(session.is_active());
    assert_eq!(session.store().unwrap().expenses().len(), 7);

    let store = session.end().unwrap();
    assert_eq!(store.goals().len(), 5);
    assert!(!session.is_active());
    assert!(session.end().is_none());
}

#[test]
fn test_expense_flow_updates_views() {
    let mut session = Session::begin(FinancialStore::seeded());
    let store = session.store_mut().unwrap();

    let form = ExpenseForm {
        category: "Food".into(),
        amount: "50".into(),
        description: "Lunch".into(),
    };
    let added = add_expense(store, &form, today()).unwrap();
    assert_eq!(added.id, "8");
    assert_eq!(store.expenses()[0].id, "8");

    let overview = OverviewView::build(store);
    assert_eq!(overview.stats.total_expenses, dec!(4050));
    assert_eq!(overview.stats.net_savings, dec!(5250));
    // Feb 2025 joins the window as its newest bucket.
    let latest = overview.monthly.last().unwrap();
    assert_eq!(latest.month.to_string(), "2025-02");
    assert_eq!(latest.expenses, dec!(50));

    sync_budget_spending(store);
    let budget = BudgetView::build(store);
    let food = budget.rows.iter().find(|r| r.budget.category == "Food").unwrap();
    assert_eq!(food.budget.spent, dec!(980));
    assert!(food.over);
    assert_eq!(food.tier, UtilizationTier::Critical);
    assert_eq!(food.bar, dec!(100));

    assert!(delete_expense(store, "8"));
    assert!(!delete_expense(store, "8"));
    assert_eq!(ExpensesView::build(store).total, dec!(4000));
}

#[test]
fn test_rejected_input_leaves_store_unchanged() {
    let mut store = FinancialStore::seeded();
    let before = store.snapshot();

    let missing = ExpenseForm {
        category: "Food".into(),
        amount: String::new(),
        description: "Lunch".into(),
    };
    assert_eq!(add_expense(&mut store, &missing, today()), Err(ValidationError::MissingField("amount")));

    let negative = BudgetForm {
        category: "Travel".into(),
        limit: "-5".into(),
    };
    assert_eq!(add_budget(&mut store, &negative), Err(ValidationError::Negative("limit")));
    assert!(update_budget_limit(&mut store, "1", "abc").is_err());
    assert!(contribute(&mut store, "99", CONTRIBUTION_STEP).is_err());

    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_goal_flow_moves_goal_to_completed() {
    let mut store = FinancialStore::seeded();
    let goal = add_goal(
        &mut store,
        &GoalForm {
            title: "Bike".into(),
            target_amount: "250".into(),
            current_amount: "100".into(),
            deadline: "2025-09-01".into(),
        },
    )
    .unwrap();
    assert!(!goal.is_completed);

    contribute(&mut store, &goal.id, CONTRIBUTION_STEP).unwrap();
    assert!(GoalsView::build(&store).active.iter().any(|r| r.goal.id == goal.id));

    let done = contribute(&mut store, &goal.id, CONTRIBUTION_STEP).unwrap();
    assert_eq!(done.current_amount, dec!(300));
    assert!(done.is_completed);

    let view = GoalsView::build(&store);
    assert!(view.completed.iter().any(|g| g.id == goal.id));
    assert_eq!(view.active.len(), 3);
    assert_eq!(OverviewView::build(&store).stats.goals_completed, 3);
}

#[test]
fn test_ids_stay_unique_after_direct_replacement() {
    let mut store = FinancialStore::new(Vec::new(), Vec::new(), Vec::new(), Vec::new());
    let budget = add_budget(
        &mut store,
        &BudgetForm {
            category: "Food".into(),
            limit: "100".into(),
        },
    )
    .unwrap();
    assert_eq!(budget.id, "1");

    let mut goals = finalyser_core::seed::goals();
    goals[0].id = "41".into();
    store.set_goals(goals);
    assert_eq!(store.next_id(), "42");
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let store = FinancialStore::seeded();
    let json = serde_json::to_string(&store.snapshot()).unwrap();
    assert!(json.contains("\"targetAmount\""));
    let back: FinancialSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(FinancialStore::from_snapshot(back).snapshot(), store.snapshot());
}

#[test]
fn test_every_tab_renders_and_unknown_routes_to_overview() {
    let store = FinancialStore::seeded();
    for tab in Tab::ALL {
        assert_eq!(View::build(tab, &store).tab(), tab);
    }
    assert_eq!(Tab::route("settings"), Tab::Overview);
}
