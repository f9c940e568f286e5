use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hlrgw_api::{config::Config, router::build_router, state::AppState};
use hlrgw_llm::{ClientFactory, ProviderConfig};
use hlrgw_quota::{parse_utc_offset, MemoryStore, QuotaLedger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting HLR assistant gateway");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Select the completion strategy once, from configuration
    let provider = if config.llm.use_openai_compat {
        tracing::info!("Completion strategy: OpenAI-compatible gateway");
        ProviderConfig::OpenAICompat {
            gateway_url: config.llm.gateway_url.clone(),
            api_token: (!config.gateway_api_token.is_empty())
                .then(|| config.gateway_api_token.clone()),
            model: config.llm.model.clone(),
        }
    } else {
        tracing::info!("Completion strategy: direct binding");
        ProviderConfig::DirectBinding {
            binding_url: config.llm.binding_url.clone(),
            model: config.llm.model.clone(),
        }
    };
    let completion = ClientFactory::create(provider);

    // Usage ledger over the shared store
    let offset = parse_utc_offset(&config.quota.timezone)
        .map_err(|e| anyhow::anyhow!("Invalid quota timezone: {}", e))?;
    let ledger = QuotaLedger::new(Arc::new(MemoryStore::new()), config.quota.daily_cap, offset);

    // Create application state and router
    let state = AppState::new(config.clone(), ledger, completion);
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/api/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
