//! Route handlers.
//!
//! Request bodies are extracted as `Result<Json<_>, JsonRejection>` so a bad
//! body still produces the `{"error": ...}` payload with a 400.

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::AppState;
use crate::agent::GoalReport;
use crate::error::ApiError;
use crate::records;

type ApiResult<T> = Result<Json<T>, ApiError>;

// ── Health ──────────────────────────────────────────────────────────────

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "goal-orchestrator"
    }))
}

// ── Goal execution ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GoalRequest {
    goal: Option<String>,
}

pub async fn execute_goal(
    State(state): State<AppState>,
    body: Result<Json<GoalRequest>, JsonRejection>,
) -> ApiResult<GoalReport> {
    let Json(body) = body?;
    let goal = body
        .goal
        .filter(|g| !g.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Goal is required."))?;

    let report = state.orchestrator()?.execute_goal(&goal).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct SubtasksRequest {
    /// Entries are decoded one by one so a bad entry only fails its own slot.
    subtasks: Option<Vec<Value>>,
}

pub async fn execute_subtasks(
    State(state): State<AppState>,
    body: Result<Json<SubtasksRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = body?;
    let subtasks = body
        .subtasks
        .ok_or_else(|| ApiError::bad_request("Invalid subtasks format"))?;

    let results = state.dispatcher.execute_entries(subtasks).await;
    Ok(Json(json!({ "success": true, "results": results })))
}

// ── Task handlers ───────────────────────────────────────────────────────

pub async fn fetch_salesforce_data(State(state): State<AppState>) -> ApiResult<Value> {
    info!("Fetching Salesforce data");
    let data = state.automation()?.fetch_opportunities().await?;
    Ok(Json(json!({ "success": true, "data": data })))
}

#[derive(Debug, Deserialize)]
pub struct DataRequest {
    data: Option<Value>,
}

/// Pull the `data` array out of a request body.
fn records_from(body: Result<Json<DataRequest>, JsonRejection>) -> Result<Vec<Value>, ApiError> {
    let Json(body) = body?;
    match body.data {
        None | Some(Value::Null) => Err(ApiError::bad_request("No data provided.")),
        Some(Value::Array(records)) => Ok(records),
        Some(_) => Err(ApiError::bad_request("`data` must be an array of records.")),
    }
}

pub async fn process_data(body: Result<Json<DataRequest>, JsonRejection>) -> ApiResult<Value> {
    info!("Processing data");
    let records = records_from(body)?;
    let cleaned = records::mark_processed(records);
    Ok(Json(json!({ "success": true, "data": cleaned })))
}

pub async fn analyze_data(body: Result<Json<DataRequest>, JsonRejection>) -> ApiResult<Value> {
    info!("Analyzing data");
    let records = records_from(body)?;
    let insights = records::analyze(&records)?;
    Ok(Json(json!({ "success": true, "insights": insights })))
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    insights: Option<Value>,
}

pub async fn generate_report(
    State(state): State<AppState>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> ApiResult<Value> {
    info!("Generating report");
    let Json(body) = body?;
    let insights = body
        .insights
        .filter(|i| !i.is_null())
        .ok_or_else(|| ApiError::bad_request("No insights provided."))?;

    let report = state.report_generator()?.generate(&insights).await?;
    Ok(Json(json!({ "success": true, "report": report })))
}
