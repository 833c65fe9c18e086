//! Report generator: turns aggregated insights into a written report.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::error::LlmError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};

const SYSTEM_PROMPT: &str = "Generate a structured report based on the provided sales insights.";

/// Asks the LLM for a sales report. The reply text is returned unmodified.
pub struct ReportGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl ReportGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub async fn generate(&self, insights: &Value) -> Result<String, LlmError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Create a Q3 sales report based on these insights: {}",
                serde_json::to_string(insights)?
            )),
        ]);

        let response = self.llm.complete(request).await?;
        info!(
            model = self.llm.model_name(),
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Report generated"
        );
        Ok(response.content)
    }
}
