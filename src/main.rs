use goal_orchestrator::api;
use goal_orchestrator::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServiceConfig::from_env()?;

    eprintln!("🎯 Goal Orchestrator v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Listening: http://{}:{}", config.bind_addr, config.port);
    eprintln!("   Model: {}", config.llm_model);
    eprintln!(
        "   LLM: {}",
        if config.llm_api_key.is_some() {
            "configured"
        } else {
            "missing OPENAI_API_KEY (goal and report routes will fail)"
        }
    );
    eprintln!(
        "   Automation: {}",
        config
            .automation_url
            .as_deref()
            .unwrap_or("missing POWER_AUTOMATE_URL (fetch route will fail)")
    );
    eprintln!("   Dispatch base: {}", config.dispatch_base_url);
    match config.dispatch_max_concurrency {
        Some(limit) => eprintln!("   Dispatch: at most {limit} concurrent subtasks\n"),
        None => eprintln!("   Dispatch: unbounded fan-out\n"),
    }

    api::serve(&config).await?;
    Ok(())
}
