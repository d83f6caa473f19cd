use std::sync::Arc;

use milonga_app::app::api::routes;
use milonga_app::config::ConfigHandler;
use milonga_app::service_handler::EventServiceHandler;
use milonga_core::config::load_config;
use milonga_db::db::connection::create_pool;
use milonga_db::db::migrate::run_migrations;
use milonga_db::store::PgEventStore;
use milonga_service::EventService;
use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Milonga event server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
    )
    .await?;

    if config.database.run_migrations {
        run_migrations(&config.database.url).await?;
    }

    let index = milonga_search::from_settings(&config.search)?;
    match index.ensure_index().await {
        Ok(status) => tracing::info!(?status, index = %config.search.index, "Search index ready"),
        // the index is set up again before the first mirror write
        Err(e) => tracing::error!(error = %e, index = %config.search.index, "Search index unavailable at startup"),
    }

    let service = EventService::new(Arc::new(PgEventStore::new(pool)), index);

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(EventServiceHandler {
            service: Arc::new(service),
        })
        .hoop(ConfigHandler {
            settings: config.clone(),
        })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
