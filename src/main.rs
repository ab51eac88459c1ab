//! Pub Golf Back binary entrypoint wiring the REST API, local snapshot and cloud collaborators.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pub_golf_back::{
    config::AppConfig,
    dao::snapshot::FileSnapshotStore,
    routes,
    services::persistence_service,
    state::{AppState, AppStateBuilder, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    if let Err(err) = tokio::fs::create_dir_all(config.uploads_dir()).await {
        warn!(
            path = %config.uploads_dir().display(),
            error = %err,
            "cannot create uploads directory; image uploads will fail"
        );
    }

    let snapshots = Arc::new(FileSnapshotStore::new(config.snapshot_path().clone()));
    let registry = persistence_service::restore(&config, snapshots.as_ref()).await;

    let builder = AppState::builder(config)
        .registry(registry)
        .snapshot_store(snapshots);
    let builder = install_supabase(builder);
    let builder = install_stripe(builder);
    let app_state = builder.build();

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Attach the Supabase mirror and photo bucket when the environment provides credentials.
#[cfg(feature = "supabase")]
fn install_supabase(builder: AppStateBuilder) -> AppStateBuilder {
    use pub_golf_back::dao::supabase::{SupabaseClient, SupabaseConfig};

    let config = match SupabaseConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "Supabase not configured; cloud mirror and photo upload disabled");
            return builder;
        }
    };

    match SupabaseClient::new(config) {
        Ok(client) => {
            info!("Supabase cloud mirror enabled");
            let client = Arc::new(client);
            builder.score_mirror(client.clone()).cloud_photos(client)
        }
        Err(err) => {
            warn!(error = %err, "failed to build Supabase client; cloud features disabled");
            builder
        }
    }
}

#[cfg(not(feature = "supabase"))]
fn install_supabase(builder: AppStateBuilder) -> AppStateBuilder {
    builder
}

/// Attach the Stripe gateway when `STRIPE_SECRET_KEY` is set.
#[cfg(feature = "stripe")]
fn install_stripe(builder: AppStateBuilder) -> AppStateBuilder {
    use pub_golf_back::dao::payments::stripe::StripeGateway;

    match StripeGateway::from_env() {
        Some(Ok(gateway)) => {
            info!("Stripe payments enabled");
            builder.payments(Arc::new(gateway))
        }
        Some(Err(err)) => {
            warn!(error = %err, "failed to build Stripe client; payments disabled");
            builder
        }
        None => {
            warn!("STRIPE_SECRET_KEY not set; payments disabled");
            builder
        }
    }
}

#[cfg(not(feature = "stripe"))]
fn install_stripe(builder: AppStateBuilder) -> AppStateBuilder {
    builder
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "cannot install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
