//! HTTP surface: shared state and router assembly.

pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agent::dispatcher::{ANALYZE_PATH, FETCH_PATH, PROCESS_PATH, REPORT_PATH};
use crate::agent::{DecomposerConfig, DispatchTable, Dispatcher, GoalDecomposer, Orchestrator};
use crate::config::ServiceConfig;
use crate::crm::AutomationClient;
use crate::error::ConfigError;
use crate::llm::{LlmConfig, LlmProvider, create_provider};
use crate::report::ReportGenerator;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured.
    pub llm: Option<Arc<dyn LlmProvider>>,
    /// `None` when no automation URL is configured.
    pub automation: Option<AutomationClient>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(
        llm: Option<Arc<dyn LlmProvider>>,
        automation: Option<AutomationClient>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            llm,
            automation,
            dispatcher,
        }
    }

    /// Wire up providers and the dispatch table from service config.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let llm = LlmConfig::from_service(config).map(|c| create_provider(&c));
        let automation = config.automation_url.as_deref().map(AutomationClient::new);
        let dispatcher = Dispatcher::new(DispatchTable::for_base_url(&config.dispatch_base_url))
            .with_max_concurrency(config.dispatch_max_concurrency);
        Self::new(llm, automation, dispatcher)
    }

    fn llm(&self) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        self.llm
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))
    }

    pub(crate) fn orchestrator(&self) -> Result<Orchestrator, ConfigError> {
        let decomposer = GoalDecomposer::new(self.llm()?, DecomposerConfig::default());
        Ok(Orchestrator::new(decomposer, self.dispatcher.clone()))
    }

    pub(crate) fn report_generator(&self) -> Result<ReportGenerator, ConfigError> {
        Ok(ReportGenerator::new(self.llm()?))
    }

    pub(crate) fn automation(&self) -> Result<&AutomationClient, ConfigError> {
        self.automation
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("POWER_AUTOMATE_URL".to_string()))
    }
}

/// Build the router with every route. No CORS or tracing layers.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/execute-goal", post(routes::execute_goal))
        .route("/execute-subtasks", post(routes::execute_subtasks))
        .route(FETCH_PATH, post(routes::fetch_salesforce_data))
        .route(PROCESS_PATH, post(routes::process_data))
        .route(ANALYZE_PATH, post(routes::analyze_data))
        .route(REPORT_PATH, post(routes::generate_report))
        .with_state(state)
}

/// Build the full application: routes plus CORS for `cors_origin` and
/// request tracing.
pub fn app(state: AppState, cors_origin: &str) -> Result<Router, ConfigError> {
    let origin = HeaderValue::from_str(cors_origin).map_err(|e| ConfigError::InvalidValue {
        key: "CORS_ORIGIN".to_string(),
        message: e.to_string(),
    })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Ok(routes(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Bind the configured address and serve until the process exits.
pub async fn serve(config: &ServiceConfig) -> crate::error::Result<()> {
    let addr = config.listen_addr()?;
    let app = app(AppState::from_config(config), &config.cors_origin)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;
    Ok(())
}
