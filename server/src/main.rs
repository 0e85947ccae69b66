use anyhow::Context;
use saucier_core::{create_image_search, create_provider, Generator, ImageSearchConfig, LlmConfig};
use saucier_server::{api, app, db, AppState, PgRecipeStore};
use std::env;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Console logging filtered by RUST_LOG (default: info).
fn init_telemetry() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .context("Failed to serialize OpenAPI spec")?;
        println!("{}", spec);
        return Ok(());
    }

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    init_telemetry();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let bind_addr = env::var("SAUCIER_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let llm_config = LlmConfig::from_env().context("Invalid model configuration")?;
    let image_config = ImageSearchConfig::from_env().context("Invalid image search configuration")?;

    let llm = create_provider(&llm_config).context("Failed to create model provider")?;
    tracing::info!(
        provider = llm.provider_name(),
        model = %llm.model_name(),
        "Generation model configured"
    );
    let images = create_image_search(&image_config);

    let pool = db::create_pool(&database_url)?;
    let store = Arc::new(PgRecipeStore::new(pool));

    let state = AppState::new(store.clone(), Generator::new(llm, images, store));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);
    tracing::info!(
        "OpenAPI spec available at http://{}/api-docs/openapi.json",
        local_addr
    );

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}
