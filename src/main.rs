use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use posts_service::auth::{GoogleOAuthClient, GoogleTokenVerifier, TokenVerifier};
use posts_service::db::{EntityStore, GoogleDatastore};
use posts_service::handlers;
use posts_service::Config;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {e}");
            eprintln!("ERROR: Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting posts-service v{}", env!("CARGO_PKG_VERSION"));

    // Process-scoped clients, constructed once and injected into the
    // routing layer.
    let store: Arc<dyn EntityStore> = Arc::new(GoogleDatastore::new(&config.datastore));
    let verifier: Arc<dyn TokenVerifier> = Arc::new(GoogleTokenVerifier::new(&config.google));
    let oauth = web::Data::new(GoogleOAuthClient::new(config.google.clone()));

    let store_data = web::Data::new(store);
    let verifier_data = web::Data::new(verifier);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {bind_address}");

    HttpServer::new(move || {
        App::new()
            .app_data(store_data.clone())
            .app_data(verifier_data.clone())
            .app_data(oauth.clone())
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {bind_address}"))?
    .run()
    .await?;

    Ok(())
}
