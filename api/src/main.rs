use actix_web::{web, HttpServer};
use clap::Parser;
use std::sync::Arc;

use st_api::config::{init_tracing, load_config, Args};
use st_api::middleware::SignatureAuth;
use st_api::{create_app, AppState};
use st_core::services::CodeStoreTrait;
use st_infra::{create_sms_service, InMemoryCodeStore, RedisClient, RedisCodeStore, SmsNotifier};
use st_shared::{AppConfig, CacheBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        algorithm = %config.signature.algorithm,
        "Starting SMS token service"
    );

    let sms = create_sms_service(&config.sms)?;
    let notifier = Arc::new(SmsNotifier::new(sms));
    tracing::info!(provider = notifier.provider_name(), "SMS provider configured");

    match config.cache.backend {
        CacheBackend::Redis => {
            let client = RedisClient::new(config.cache.clone()).await?;
            if !client.health_check().await? {
                anyhow::bail!("Redis health check failed");
            }
            serve(config, notifier, Arc::new(RedisCodeStore::new(client))).await
        }
        CacheBackend::Memory => {
            tracing::warn!("Using in-memory code store; codes are lost on restart");
            let mut store = InMemoryCodeStore::new();
            if let Some(prefix) = &config.cache.key_prefix {
                store = store.with_prefix(prefix.clone());
            }
            serve(config, notifier, Arc::new(store)).await
        }
    }
}

async fn serve<S>(config: AppConfig, notifier: Arc<SmsNotifier>, store: Arc<S>) -> anyhow::Result<()>
where
    S: CodeStoreTrait + 'static,
{
    let state = web::Data::new(AppState::new(notifier, store, &config.token));
    let signature = SignatureAuth::new(&config.signature);
    let json_limit = config.server.max_payload_size;

    let bind_address = config.server.bind_address();
    tracing::info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(state.clone(), signature.clone(), json_limit));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}
