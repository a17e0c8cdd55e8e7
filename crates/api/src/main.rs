//! Huddle API server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use huddle_common::config::AppConfig;
use huddle_common::db::create_pool;
use huddle_dispatch::channel::ChannelSender;
use huddle_dispatch::directory::PgRecipientDirectory;
use huddle_dispatch::dispatcher::Dispatcher;
use huddle_dispatch::push::{ExpoPushGateway, PushSender};
use huddle_dispatch::sms::{SmsSender, TwilioSmsGateway};
use huddle_dispatch::store::{NotificationStore, PgNotificationStore};

use huddle_api::routes::create_router;
use huddle_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("huddle_api=debug,huddle_dispatch=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting Huddle API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Create database connection pool
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Database pool created");

    // Wire the dispatch core: provider gateways get their credentials here,
    // never from ambient process state.
    let push_gateway = Arc::new(ExpoPushGateway::new(
        config.push_api_url.clone(),
        config.push_access_token.clone(),
    ));
    let sms_gateway = Arc::new(TwilioSmsGateway::new(
        config.sms_api_url.clone(),
        config.sms_account_sid.clone().unwrap_or_default(),
        config.sms_auth_token.clone().unwrap_or_default(),
        config.sms_from_number.clone().unwrap_or_default(),
    ));

    let senders: Vec<Arc<dyn ChannelSender>> = vec![
        Arc::new(PushSender::new(push_gateway)),
        Arc::new(SmsSender::new(sms_gateway)),
    ];

    let store: Arc<dyn NotificationStore> = Arc::new(PgNotificationStore::new(pool.clone()));
    let directory = Arc::new(PgRecipientDirectory::new(pool));
    let dispatcher = Arc::new(Dispatcher::new(store.clone(), directory, senders));

    // Build application state
    let state = AppState::new(dispatcher, store);

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
