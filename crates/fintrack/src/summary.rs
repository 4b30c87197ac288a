//! Dashboard figures computed from a context's records.
//!
//! All functions are pure: they take records already loaded from the store
//! and never touch a backend. Malformed amounts count as zero.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::records::{Budget, Investment, Savings, Subscription, Transaction};

/// Category used for expenses without one.
pub const UNCATEGORIZED: &str = "Other";

/// Account used for savings without one.
pub const DEFAULT_ACCOUNT: &str = "General";

/// Budget usage, in percent, at which a budget is flagged.
pub const WARNING_PERCENT: f64 = 80.0;

/// Headline figures for one context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    /// Sum of active subscription amounts, whatever their frequency.
    pub total_subscriptions: f64,
    pub total_savings: f64,
    pub total_invested: f64,
    pub total_investment_value: f64,
    pub investment_profit_loss: f64,
}

impl Totals {
    #[must_use]
    pub fn compute(
        transactions: &[Transaction],
        subscriptions: &[Subscription],
        savings: &[Savings],
        investments: &[Investment],
    ) -> Self {
        let total_income = sum(transactions.iter().filter(|t| t.is_income()), Transaction::value);
        let total_expenses = sum(
            transactions.iter().filter(|t| t.is_expense()),
            Transaction::value,
        );
        let total_subscriptions = sum(
            subscriptions.iter().filter(|s| s.is_active()),
            Subscription::value,
        );
        let total_savings = sum(savings.iter(), Savings::value);
        let total_invested = sum(investments.iter(), Investment::invested);
        let total_investment_value = sum(investments.iter(), Investment::worth);

        Self {
            total_income,
            total_expenses,
            net_income: total_income - total_expenses,
            total_subscriptions,
            total_savings,
            total_invested,
            total_investment_value,
            investment_profit_loss: total_investment_value - total_invested,
        }
    }
}

fn sum<'a, T: 'a>(items: impl Iterator<Item = &'a T>, value: impl Fn(&T) -> f64) -> f64 {
    items.map(value).sum()
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Expense totals per category, in the order categories first appear.
#[must_use]
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        let category = if transaction.category.is_empty() {
            UNCATEGORIZED
        } else {
            transaction.category.as_str()
        };
        match totals.iter_mut().find(|c| c.category == category) {
            Some(total) => total.amount += transaction.value(),
            None => totals.push(CategoryTotal {
                category: category.to_string(),
                amount: transaction.value(),
            }),
        }
    }
    totals
}

/// Income and expenses within one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFlow {
    /// `YYYY-MM`.
    pub month: String,
    pub income: f64,
    pub expenses: f64,
}

/// Income against expenses per month, oldest first.
///
/// Every transaction that is not income counts as an expense here.
/// Transactions whose date cannot be read are left out.
#[must_use]
pub fn monthly_cash_flow(transactions: &[Transaction]) -> Vec<MonthlyFlow> {
    let mut months: Vec<MonthlyFlow> = Vec::new();
    for transaction in transactions {
        let Some(month) = month_key(&transaction.date) else {
            continue;
        };
        let index = match months.iter().position(|m| m.month == month) {
            Some(index) => index,
            None => {
                months.push(MonthlyFlow {
                    month,
                    income: 0.0,
                    expenses: 0.0,
                });
                months.len() - 1
            }
        };
        if transaction.is_income() {
            months[index].income += transaction.value();
        } else {
            months[index].expenses += transaction.value();
        }
    }
    months.sort_by(|a, b| a.month.cmp(&b.month));
    months
}

/// Saved amount against goal for one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsProgress {
    pub account: String,
    pub current: f64,
    pub goal: f64,
    /// Percent of goal reached; may exceed 100.
    pub progress: f64,
}

/// Savings per account, in the order accounts first appear.
#[must_use]
pub fn savings_progress(savings: &[Savings]) -> Vec<SavingsProgress> {
    let mut accounts: Vec<SavingsProgress> = Vec::new();
    for record in savings {
        let account = if record.account.is_empty() {
            DEFAULT_ACCOUNT
        } else {
            record.account.as_str()
        };
        match accounts.iter_mut().find(|a| a.account == account) {
            Some(entry) => {
                entry.current += record.value();
                entry.goal += record.goal_value();
            }
            None => accounts.push(SavingsProgress {
                account: account.to_string(),
                current: record.value(),
                goal: record.goal_value(),
                progress: 0.0,
            }),
        }
    }
    for entry in &mut accounts {
        entry.progress = percent(entry.current, entry.goal);
    }
    accounts
}

/// How close a budget is to its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    Over,
}

impl BudgetStatus {
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Over
        } else if percentage >= WARNING_PERCENT {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }
}

/// A budget together with what was actually spent against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    #[serde(flatten)]
    pub budget: Budget,
    pub spent_amount: f64,
    pub limit: f64,
    /// Percent of the limit used, capped at 100.
    pub percentage: f64,
    /// Limit minus spent; negative when over budget.
    pub remaining: f64,
    pub status: BudgetStatus,
}

/// Spending against each budget during `month` (`YYYY-MM`).
///
/// Spent is the sum of expense transactions dated in `month` whose category
/// equals the budget's.
#[must_use]
pub fn budget_progress(
    budgets: &[Budget],
    transactions: &[Transaction],
    month: &str,
) -> Vec<BudgetProgress> {
    let in_month: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense() && month_key(&t.date).as_deref() == Some(month))
        .collect();

    budgets
        .iter()
        .map(|budget| {
            let spent: f64 = in_month
                .iter()
                .filter(|t| t.category == budget.category)
                .map(|t| t.value())
                .sum();
            let limit = budget.limit();
            let percentage = percent(spent, limit).min(100.0);
            BudgetProgress {
                budget: budget.clone(),
                spent_amount: spent,
                limit,
                percentage,
                remaining: limit - spent,
                status: BudgetStatus::from_percentage(percentage),
            }
        })
        .collect()
}

/// Gain or loss on one holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub invested: f64,
    pub current: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
}

/// Gain or loss per holding and across the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentPerformance {
    pub holdings: Vec<Holding>,
    pub total_invested: f64,
    pub total_current: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
}

#[must_use]
pub fn investment_performance(investments: &[Investment]) -> InvestmentPerformance {
    let holdings: Vec<Holding> = investments
        .iter()
        .map(|investment| {
            let invested = investment.invested();
            let current = investment.worth();
            Holding {
                id: investment.id.clone(),
                name: investment.asset_name.clone(),
                kind: investment.kind.clone(),
                invested,
                current,
                profit_loss: current - invested,
                profit_loss_percent: percent(current - invested, invested),
            }
        })
        .collect();

    let total_invested: f64 = holdings.iter().map(|h| h.invested).sum();
    let total_current: f64 = holdings.iter().map(|h| h.current).sum();
    InvestmentPerformance {
        holdings,
        total_invested,
        total_current,
        profit_loss: total_current - total_invested,
        profit_loss_percent: percent(total_current - total_invested, total_invested),
    }
}

/// Everything the dashboard shows for one context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub context_id: String,
    /// Month used for budget progress.
    pub month: String,
    pub totals: Totals,
    pub categories: Vec<CategoryTotal>,
    pub cash_flow: Vec<MonthlyFlow>,
    pub savings: Vec<SavingsProgress>,
    pub budgets: Vec<BudgetProgress>,
    pub investments: InvestmentPerformance,
}

/// Records of one context, as loaded for the dashboard.
#[derive(Debug, Clone, Default)]
pub struct ContextRecords {
    pub transactions: Vec<Transaction>,
    pub subscriptions: Vec<Subscription>,
    pub savings: Vec<Savings>,
    pub budgets: Vec<Budget>,
    pub investments: Vec<Investment>,
}

impl Dashboard {
    #[must_use]
    pub fn build(context_id: &str, month: &str, records: &ContextRecords) -> Self {
        Self {
            context_id: context_id.to_string(),
            month: month.to_string(),
            totals: Totals::compute(
                &records.transactions,
                &records.subscriptions,
                &records.savings,
                &records.investments,
            ),
            categories: category_breakdown(&records.transactions),
            cash_flow: monthly_cash_flow(&records.transactions),
            savings: savings_progress(&records.savings),
            budgets: budget_progress(&records.budgets, &records.transactions, month),
            investments: investment_performance(&records.investments),
        }
    }
}

/// `YYYY-MM` of a date cell.
///
/// Accepts `2024-03-15`, `03/15/2024`, `2024/03/15` and RFC 3339 timestamps.
#[must_use]
pub fn month_key(date: &str) -> Option<String> {
    let date = date.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(date) {
        return Some(timestamp.format("%Y-%m").to_string());
    }
    ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
        .map(|day| day.format("%Y-%m").to_string())
}

/// The current UTC month as `YYYY-MM`.
#[must_use]
pub fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
