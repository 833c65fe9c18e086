//! Dispatcher: fans subtasks out to their HTTP handlers.
//!
//! Every subtask is posted concurrently and settles independently. Results
//! come back in input order, not completion order.

use std::collections::HashMap;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::task::{ExecutionResult, Subtask, TaskType};

/// Route paths of the built-in handlers, per task type.
pub const FETCH_PATH: &str = "/fetch-salesforce-data";
pub const PROCESS_PATH: &str = "/process-data";
pub const ANALYZE_PATH: &str = "/analyze-data";
pub const REPORT_PATH: &str = "/generate-report";

/// Mapping from task type to the URL that handles it.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    endpoints: HashMap<TaskType, String>,
}

impl DispatchTable {
    /// Empty table; every subtask will fail with "no endpoint".
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pointing the four task types at this service's own handlers.
    pub fn for_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self::new()
            .with_endpoint(TaskType::FetchData, format!("{base}{FETCH_PATH}"))
            .with_endpoint(TaskType::ProcessData, format!("{base}{PROCESS_PATH}"))
            .with_endpoint(TaskType::AnalyzeData, format!("{base}{ANALYZE_PATH}"))
            .with_endpoint(TaskType::GenerateReport, format!("{base}{REPORT_PATH}"))
    }

    pub fn with_endpoint(mut self, task_type: TaskType, url: impl Into<String>) -> Self {
        self.endpoints.insert(task_type, url.into());
        self
    }

    pub fn endpoint(&self, task_type: &TaskType) -> Option<&str> {
        self.endpoints.get(task_type).map(String::as_str)
    }
}

/// Posts each subtask to the endpoint registered for its type.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    table: DispatchTable,
    /// Max in-flight calls; `None` fans out without a bound.
    max_concurrency: Option<usize>,
}

impl Dispatcher {
    pub fn new(table: DispatchTable) -> Self {
        Self {
            client: Client::new(),
            table,
            max_concurrency: None,
        }
    }

    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.filter(|n| *n > 0);
        self
    }

    /// Execute all subtasks and return one result per subtask, in order.
    pub async fn execute(&self, subtasks: &[Subtask]) -> Vec<ExecutionResult> {
        info!(
            count = subtasks.len(),
            limit = ?self.max_concurrency,
            "Dispatching subtasks"
        );

        // Boxed so the handler future stays `Send` through `buffered`.
        let calls: Vec<BoxFuture<'_, ExecutionResult>> = subtasks
            .iter()
            .map(|task| self.execute_one(task).boxed())
            .collect();
        let results: Vec<ExecutionResult> = match self.max_concurrency {
            None => join_all(calls).await,
            // `buffered` keeps input order while capping in-flight calls.
            Some(limit) => stream::iter(calls).buffered(limit).collect().await,
        };

        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(total = results.len(), failed, "Subtasks settled");
        results
    }

    /// Execute raw JSON subtask entries. An entry that does not decode into a
    /// [`Subtask`] gets a `Failed` result in its slot; the rest are dispatched.
    pub async fn execute_entries(&self, entries: Vec<Value>) -> Vec<ExecutionResult> {
        let decoded: Vec<Result<Subtask, ExecutionResult>> =
            entries.into_iter().map(decode_entry).collect();
        let valid: Vec<Subtask> = decoded
            .iter()
            .filter_map(|entry| entry.as_ref().ok().cloned())
            .collect();

        let mut dispatched = self.execute(&valid).await.into_iter();
        decoded
            .into_iter()
            .map(|entry| match entry {
                Ok(_) => dispatched
                    .next()
                    .unwrap_or_else(|| ExecutionResult::failed("Subtask was not dispatched")),
                Err(failed) => failed,
            })
            .collect()
    }

    async fn execute_one(&self, task: &Subtask) -> ExecutionResult {
        let Some(endpoint) = self.table.endpoint(&task.task_type) else {
            warn!(task_id = %task.task_id, task_type = %task.task_type, "No endpoint for task type");
            return ExecutionResult::failed(format!(
                "No endpoint found for task type: {}",
                task.task_type
            ));
        };

        debug!(task_id = %task.task_id, endpoint, "Posting subtask");

        let response = match self
            .client
            .post(endpoint)
            .json(&serde_json::json!({ "task": task }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(task_id = %task.task_id, error = %e, "Subtask request failed");
                return ExecutionResult::failed(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(task_id = %task.task_id, status = status.as_u16(), "Subtask handler returned error");
            return ExecutionResult::failed(format!(
                "Request failed with status code {}",
                status.as_u16()
            ));
        }

        match response.text().await {
            Ok(body) => {
                let data = serde_json::from_str(&body)
                    .unwrap_or(serde_json::Value::String(body));
                ExecutionResult::Success { data }
            }
            Err(e) => ExecutionResult::failed(e.to_string()),
        }
    }
}

fn decode_entry(entry: Value) -> Result<Subtask, ExecutionResult> {
    let task_type = match entry.get("taskType") {
        Some(Value::String(tag)) => tag.clone(),
        raw => {
            let shown = raw.map_or_else(|| "undefined".to_string(), Value::to_string);
            warn!(task_type = %shown, "Subtask has no usable task type");
            return Err(ExecutionResult::failed(format!(
                "No endpoint found for task type: {shown}"
            )));
        }
    };

    serde_json::from_value(entry).map_err(|e| {
        warn!(%task_type, error = %e, "Malformed subtask");
        ExecutionResult::failed(format!("Invalid subtask: {e}"))
    })
}
