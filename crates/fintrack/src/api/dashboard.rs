//! Aggregated views over one context's records.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::error::Result;
use crate::records::{Budget, Filter, Investment, Savings, Subscription, Transaction};
use crate::summary::{self, BudgetProgress, ContextRecords, Dashboard};

/// Query parameters for the dashboard routes.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub context_id: Option<String>,
    /// `YYYY-MM`; defaults to the current month.
    pub month: Option<String>,
}

impl DashboardParams {
    fn context(&self) -> std::result::Result<&str, ApiError> {
        self.context_id
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ApiError::BadRequest("context_id is required".to_string()))
    }

    fn month(&self) -> String {
        self.month
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(summary::current_month)
    }
}

/// Full dashboard for one context.
pub async fn show(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> std::result::Result<Json<Dashboard>, ApiError> {
    let context_id = params.context()?;
    let month = params.month();

    let records = load(&state, context_id, &month)
        .await
        .map_err(|e| ApiError::from_store(e, "fetch dashboard"))?;
    Ok(Json(Dashboard::build(context_id, &month, &records)))
}

/// Spending against each of a context's budgets for one month.
pub async fn budget_progress(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> std::result::Result<Json<Vec<BudgetProgress>>, ApiError> {
    let context_id = params.context()?;
    let month = params.month();
    let filter = Filter {
        context_id: Some(context_id.to_string()),
        month: Some(month.clone()),
    };

    let budget_store = state.store::<Budget>();
    let transaction_store = state.store::<Transaction>();
    let (budgets, transactions) = tokio::try_join!(
        budget_store.list(&filter),
        transaction_store.list(&filter),
    )
    .map_err(|e| ApiError::from_store(e, "fetch budget progress"))?;

    Ok(Json(summary::budget_progress(&budgets, &transactions, &month)))
}

async fn load(state: &AppState, context_id: &str, month: &str) -> Result<ContextRecords> {
    let by_context = Filter::for_context(context_id);
    let by_month = Filter {
        context_id: Some(context_id.to_string()),
        month: Some(month.to_string()),
    };

    let transaction_store = state.store::<Transaction>();
    let subscription_store = state.store::<Subscription>();
    let savings_store = state.store::<Savings>();
    let budget_store = state.store::<Budget>();
    let investment_store = state.store::<Investment>();
    let (transactions, subscriptions, savings, budgets, investments) = tokio::try_join!(
        transaction_store.list(&by_context),
        subscription_store.list(&by_context),
        savings_store.list(&by_context),
        budget_store.list(&by_month),
        investment_store.list(&by_context),
    )?;

    Ok(ContextRecords {
        transactions,
        subscriptions,
        savings,
        budgets,
        investments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_defaults_to_current() {
        let params = DashboardParams {
            context_id: Some("1".to_string()),
            month: Some(String::new()),
        };
        assert_eq!(params.month(), summary::current_month());
    }

    #[test]
    fn test_context_required() {
        let params = DashboardParams::default();
        assert!(matches!(params.context(), Err(ApiError::BadRequest(_))));
    }
}
