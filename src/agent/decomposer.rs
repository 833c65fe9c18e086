//! Goal decomposer: asks the LLM to break a goal into subtasks.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::task::Subtask;
use crate::error::DecomposeError;
use crate::llm::provider::{ChatMessage, CompletionRequest, FinishReason, LlmProvider};

const SYSTEM_PROMPT: &str = "You are an AI that breaks down a user's goal into structured \
     subtasks. Respond ONLY in JSON format with a `goal` and `subtasks` array.";

/// Configuration for goal decomposition.
#[derive(Debug, Clone)]
pub struct DecomposerConfig {
    /// LLM temperature for the planning call.
    pub temperature: f32,
}

impl Default for DecomposerConfig {
    fn default() -> Self {
        Self { temperature: 0.2 }
    }
}

/// Turns a free-text goal into classified subtasks.
pub struct GoalDecomposer {
    llm: Arc<dyn LlmProvider>,
    config: DecomposerConfig,
}

impl GoalDecomposer {
    pub fn new(llm: Arc<dyn LlmProvider>, config: DecomposerConfig) -> Self {
        Self { llm, config }
    }

    /// Decompose a goal. Single attempt; malformed output is returned as
    /// `DecomposeError::Malformed`, never retried.
    pub async fn decompose(&self, goal: &str) -> Result<Vec<Subtask>, DecomposeError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("Break down this goal into subtasks: {goal}")),
        ])
        .with_temperature(self.config.temperature);

        let response = self.llm.complete(request).await?;
        debug!(raw = %response.content, "Raw planner response");
        if response.finish_reason == FinishReason::Length {
            warn!("Planner response was cut off at the token limit");
        }

        let names = parse_plan(&response.content).inspect_err(|e| {
            warn!(error = %e, response = %response.content, "Rejected planner output");
        })?;

        let subtasks: Vec<Subtask> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Subtask::classified(i, name))
            .collect();

        info!(count = subtasks.len(), "Goal decomposed");
        Ok(subtasks)
    }
}

/// Parse the planner reply into subtask names.
///
/// The reply must be a JSON object whose `subtasks` field is an array of
/// strings. A surrounding markdown code fence is tolerated.
pub fn parse_plan(raw: &str) -> Result<Vec<String>, DecomposeError> {
    let json = strip_code_fence(raw);

    let value: Value = serde_json::from_str(json).map_err(|e| DecomposeError::Malformed {
        reason: format!("invalid JSON: {e}"),
    })?;

    let items = match value.get("subtasks") {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => {
            return Err(DecomposeError::Malformed {
                reason: "missing `subtasks` array".to_string(),
            });
        }
        Some(_) => {
            return Err(DecomposeError::Malformed {
                reason: "`subtasks` is not an array".to_string(),
            });
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(name) => Ok(name.clone()),
            other => Err(DecomposeError::Malformed {
                reason: format!("subtask {} is not a string: {}", i + 1, other),
            }),
        })
        .collect()
}

/// Strip a ```json ... ``` (or bare ```) fence if the reply is wrapped in one.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.rfind("```") {
        Some(end) => rest[..end].trim(),
        None => rest.trim(),
    }
}
