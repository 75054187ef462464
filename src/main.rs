use client_registry::application::context::AppContext;
use client_registry::config::{self, StorageBackend};
use client_registry::domain::services::client_validation::ClientValidator;
use client_registry::infrastructure::db::postgres::PostgresDatabase;
use client_registry::infrastructure::db::repositories::Repositories;
use client_registry::interface::http;
use client_registry::interface::http::state::AppState;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "client_registry=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() {
    // Step 1: Logging and configuration.
    init_tracing();
    let settings = config::load().expect("load config");

    // Step 2: Metrics recorder; the service still runs without one.
    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "prometheus recorder not installed");
            None
        }
    };

    // Step 3: Build repositories for the configured backend.
    let repos = match settings.db.backend {
        StorageBackend::Postgres => {
            let db = Arc::new(
                PostgresDatabase::connect_with(&settings.db.url, settings.db.max_connections)
                    .await
                    .expect("connect database"),
            );
            if settings.db.run_migrations {
                db.migrate().await.expect("run migrations");
            }
            Repositories::postgres(db)
        }
        StorageBackend::Memory => {
            warn!("using the in-memory client store; data is lost on restart");
            Repositories::in_memory()
        }
    };

    // Step 4: Assemble shared application context and HTTP state.
    let validator = ClientValidator::new(settings.validation.phone_policy);
    let ctx = AppContext::new(repos, validator);
    let state = AppState::new(ctx, settings.clone(), metrics);

    // Step 5: Build the HTTP app.
    let app = http::app(state);
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Step 6: Bind and serve until ctrl-c.
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("bind server");
    info!(addr = %bind_addr, "client registry listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .expect("serve");
}
