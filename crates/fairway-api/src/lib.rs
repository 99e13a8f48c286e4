pub mod connections;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod rounds;
pub mod tee_times;

use std::sync::Arc;

use fairway_db::Database;
use fairway_notify::Notifier;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub notifier: Notifier,
    pub jwt_secret: String,
    /// When set, sending a direct message requires an accepted connection
    /// between the two users. Off by default (open messaging).
    pub require_connection: bool,
}

/// Run rusqlite work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("spawn_blocking join error: {}", e)))?
}
