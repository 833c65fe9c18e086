//! CRM data access through an external automation service.
//!
//! The automation flow accepts a SOQL query and answers with the matching
//! records under `records`.

use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::error::AutomationError;

/// Query sent for every fetch: last quarter's opportunities.
pub const OPPORTUNITY_QUERY: &str =
    "SELECT Id, Name, Amount, CloseDate FROM Opportunity WHERE CloseDate = LAST_QUARTER";

/// Client for the automation service endpoint.
#[derive(Debug, Clone)]
pub struct AutomationClient {
    client: Client,
    url: String,
}

impl AutomationClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Run the opportunity query and return the service's reply as-is.
    ///
    /// Fails if the call fails or the reply has no `records` field.
    pub async fn fetch_opportunities(&self) -> Result<Value, AutomationError> {
        info!(url = %self.url, "Fetching CRM opportunities");

        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "soqlQuery": OPPORTUNITY_QUERY }))
            .send()
            .await
            .map_err(|e| AutomationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AutomationError::RequestFailed(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AutomationError::InvalidResponse(e.to_string()))?;

        match body.get("records") {
            Some(records) if !records.is_null() => Ok(body),
            _ => Err(AutomationError::InvalidResponse(
                "missing `records` field".to_string(),
            )),
        }
    }
}
