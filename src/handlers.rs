use crate::errors::AppError;
use crate::models::{GoalReport, SaleRecord};
use crate::state::AppState;
use crate::tracker::{build_report, build_report_at, filter_period};
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    week: Option<u32>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.config))
}

/// Full report JSON. `?week=` overrides the reference week so past states
/// of the dashboard can be inspected; it defaults to the local ISO week.
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<GoalReport>, AppError> {
    if let Some(week) = query.week {
        if !(1..=53).contains(&week) {
            return Err(AppError::bad_request(format!(
                "week must lie in 1..=53, got {week}"
            )));
        }
    }

    let config = &state.config;
    let records = state.source.snapshot().await?;
    let report = match query.week {
        Some(week) => build_report_at(
            week,
            &records,
            &config.period,
            &config.product_rules,
            config.top_n,
        ),
        None => build_report(&records, &config.period, &config.product_rules, config.top_n),
    };
    Ok(Json(report))
}

/// The period-filtered rows behind the report, for drill-down.
pub async fn get_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleRecord>>, AppError> {
    let records = state.source.snapshot().await?;
    Ok(Json(filter_period(&records, &state.config.period)))
}
