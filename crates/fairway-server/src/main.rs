use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use fairway_api::middleware::require_auth;
use fairway_api::{AppState, AppStateInner, connections, messages, rounds, tee_times};
use fairway_notify::Notifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fairway=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("FAIRWAY_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("FAIRWAY_DB_PATH").unwrap_or_else(|_| "fairway.db".into());
    let host = std::env::var("FAIRWAY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("FAIRWAY_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let notify_url = std::env::var("FAIRWAY_NOTIFY_URL").ok();
    let require_connection = std::env::var("FAIRWAY_REQUIRE_CONNECTION")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    // Init database
    let db = fairway_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let notifier = Notifier::new(notify_url);
    let app_state: AppState = Arc::new(AppStateInner {
        db,
        notifier,
        jwt_secret,
        require_connection,
    });

    // Routes. Tee-time search and golf rounds are public (per-route auth on
    // everything else); on /tee-times only the POST is behind the layer.
    let auth = middleware::from_fn_with_state(app_state.clone(), require_auth);

    let app = Router::new()
        .route(
            "/connections",
            post(connections::create_connection)
                .get(connections::list_connections)
                .route_layer(auth.clone()),
        )
        .route(
            "/connections/{connection_id}",
            patch(connections::respond_connection).route_layer(auth.clone()),
        )
        .route(
            "/messages",
            post(messages::send_message)
                .get(messages::fetch_messages)
                .route_layer(auth.clone()),
        )
        .route(
            "/tee-times",
            post(tee_times::create_tee_time)
                .route_layer(auth.clone())
                .get(tee_times::search_tee_times),
        )
        .route(
            "/tee-times/{tee_time_id}/applications",
            post(tee_times::apply_to_tee_time).route_layer(auth.clone()),
        )
        .route(
            "/tee-times/{tee_time_id}/applications/{applicant_id}",
            patch(tee_times::decide_application).route_layer(auth),
        )
        .route(
            "/golf-rounds",
            post(rounds::record_round).get(rounds::list_rounds),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Fairway server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
