//! Interactive navigation shell over one session

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use finalyser_core::actions::{
    add_budget, add_expense, add_goal, add_income, contribute, delete_expense, delete_income, positive_amount,
    sync_budget_spending, update_budget_limit,
};
use finalyser_core::{
    BudgetForm, ExpenseForm, FinancialSnapshot, FinancialStore, GoalForm, IncomeForm, Session, StoreError, Tab,
    ValidationError, View, CONTRIBUTION_STEP,
};
use rust_decimal::Decimal;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::chat::{ChatTarget, Conversation, GREETING};
use crate::render::{render, tab_bar};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true, disable_help_subcommand = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
enum ShellCommand {
    /// Switch tab: overview, expenses, income, budget, goals
    Tab { name: String },

    /// add-expense <category> <amount> <description..>
    AddExpense {
        category: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },

    DeleteExpense { id: String },

    /// add-income <source> <amount> <description..>
    AddIncome {
        source: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },

    DeleteIncome { id: String },

    /// add-budget <category> <limit>
    AddBudget {
        category: String,
        #[arg(allow_hyphen_values = true)]
        limit: String,
    },

    /// set-limit <budget id> <limit>
    SetLimit {
        id: String,
        #[arg(allow_hyphen_values = true)]
        limit: String,
    },

    /// add-goal <target> <current> <deadline YYYY-MM-DD> <title..>
    AddGoal {
        #[arg(allow_hyphen_values = true)]
        target: String,
        #[arg(allow_hyphen_values = true)]
        current: String,
        deadline: String,
        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// contribute <goal id> [amount], default 100
    Contribute {
        id: String,
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,
    },

    /// Recompute budget spending from expenses
    SyncSpent,

    /// Ask the assistant about the current data
    Chat {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        message: Vec<String>,
    },

    Help,

    #[command(alias = "exit")]
    Quit,
}

const HELP: &str = "\
Commands:
  tab <overview|expenses|income|budget|goals>
  add-expense <category> <amount> <description..>
  delete-expense <id>
  add-income <source> <amount> <description..>
  delete-income <id>
  add-budget <category> <limit>
  set-limit <budget id> <limit>
  add-goal <target> <current> <deadline YYYY-MM-DD> <title..>
  contribute <goal id> [amount]
  sync-spent
  chat <message..>
  help
  quit";

/// What the loop should do after one input line
#[derive(Debug, PartialEq)]
pub enum Step {
    Print(String),
    Chat(String),
    Quit,
}

pub struct Shell {
    session: Session,
    tab: Tab,
    clock: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Shell {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            tab: Tab::Overview,
            clock: local_today,
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn snapshot(&self) -> Result<FinancialSnapshot, StoreError> {
        Ok(self.session.store()?.snapshot())
    }

    /// Active tab header plus its rendered view
    pub fn screen(&self) -> Result<String, StoreError> {
        let store = self.session.store()?;
        Ok(format!("{}\n\n{}", tab_bar(self.tab), render(&View::build(self.tab, store))))
    }

    /// Interpret one line. Only a missing store is an error; bad input is
    /// reported back as text and leaves the store untouched.
    pub fn step(&mut self, line: &str) -> Result<Step, StoreError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(Step::Print(String::new()));
        }
        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => return Ok(Step::Print(format!("{}\ntype `help` for commands", e.render()))),
        };

        let today = (self.clock)();
        let store = self.session.store_mut()?;
        let outcome: Result<String, ValidationError> = match command {
            ShellCommand::Tab { name } => {
                self.tab = Tab::route(&name);
                return Ok(Step::Print(self.screen()?));
            }
            ShellCommand::Help => return Ok(Step::Print(HELP.to_string())),
            ShellCommand::Quit => return Ok(Step::Quit),
            ShellCommand::Chat { message } => return Ok(Step::Chat(message.join(" "))),

            ShellCommand::AddExpense {
                category,
                amount,
                description,
            } => {
                let form = ExpenseForm {
                    category,
                    amount,
                    description: description.join(" "),
                };
                add_expense(store, &form, today).map(|e| format!("Added expense #{}", e.id))
            }
            ShellCommand::DeleteExpense { id } => Ok(deleted("expense", &id, delete_expense(store, &id))),
            ShellCommand::AddIncome {
                source,
                amount,
                description,
            } => {
                let form = IncomeForm {
                    source,
                    amount,
                    description: description.join(" "),
                };
                add_income(store, &form, today).map(|i| format!("Added income #{}", i.id))
            }
            ShellCommand::DeleteIncome { id } => Ok(deleted("income", &id, delete_income(store, &id))),
            ShellCommand::AddBudget { category, limit } => {
                add_budget(store, &BudgetForm { category, limit }).map(|b| format!("Added budget #{}", b.id))
            }
            ShellCommand::SetLimit { id, limit } => {
                update_budget_limit(store, &id, &limit).map(|b| format!("Budget #{} limit is now {}", b.id, b.limit))
            }
            ShellCommand::AddGoal {
                target,
                current,
                deadline,
                title,
            } => {
                let form = GoalForm {
                    title: title.join(" "),
                    target_amount: target,
                    current_amount: current,
                    deadline,
                };
                add_goal(store, &form).map(|g| format!("Added goal #{}", g.id))
            }
            ShellCommand::Contribute { id, amount } => contribution_amount(amount.as_deref())
                .and_then(|amount| contribute(store, &id, amount))
                .map(|g| {
                    if g.is_completed {
                        format!("Goal #{} reached: {}", g.id, g.title)
                    } else {
                        format!("Goal #{} now at {}", g.id, g.current_amount)
                    }
                }),
            ShellCommand::SyncSpent => {
                sync_budget_spending(store);
                Ok("Budget spending recomputed from expenses".to_string())
            }
        };

        match outcome {
            Ok(message) => Ok(Step::Print(format!("{message}\n\n{}", self.screen()?))),
            Err(e) => Ok(Step::Print(format!("error: {e}"))),
        }
    }

    pub fn end(mut self) -> Option<FinancialStore> {
        self.session.end()
    }
}

fn deleted(entity: &str, id: &str, removed: bool) -> String {
    if removed {
        format!("Deleted {entity} #{id}")
    } else {
        format!("No {entity} with id {id}")
    }
}

fn contribution_amount(raw: Option<&str>) -> Result<Decimal, ValidationError> {
    raw.map_or(Ok(CONTRIBUTION_STEP), |raw| positive_amount("amount", raw))
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(store: FinancialStore, target: ChatTarget) -> Result<()> {
    let mut shell = Shell::new(Session::begin(store));
    let mut convo = Conversation::new(target);

    println!("{}", shell.screen()?);
    println!("\n{GREETING}\nType `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nfinalyser:{}> ", shell.tab());
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match shell.step(&line)? {
            Step::Print(text) => {
                if !text.is_empty() {
                    println!("{text}");
                }
            }
            Step::Chat(message) => {
                let snapshot = shell.snapshot()?;
                convo.send_to_console(&message, Some(&snapshot)).await;
            }
            Step::Quit => break,
        }
    }

    if let Some(store) = shell.end() {
        tracing::debug!(expenses = store.expenses().len(), goals = store.goals().len(), "session discarded");
    }
    Ok(())
}
