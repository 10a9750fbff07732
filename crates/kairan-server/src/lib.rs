//! Server assembly for the kairan bulletin engine.
//!
//! Wires the JSON store, the roster, authentication, and the REST API into
//! one axum [`Router`]. Refresh is a polling contract: clients re-read
//! their queries on an interval, so the server only has to serve
//! consistent snapshots — no push channel exists.

pub mod auth;

use std::path::PathBuf;

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use kairan_api::ApiState;
use kairan_core::store::BulletinStore;

use auth::AuthState;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` (and
/// `KAIRAN_*` environment overrides).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  /// The JSON blob holding posts and messages.
  pub store_path:          PathBuf,
  /// Roster file (JSON array of residents). Falls back to the built-in
  /// standard roster when absent.
  #[serde(default)]
  pub roster_path:         Option<PathBuf>,
  /// Resident access-code registry file.
  pub pin_path:            PathBuf,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: String,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: the REST API nested under `/api`,
/// the login endpoints at the root, request tracing over everything.
pub fn router<S>(api: ApiState<S>, auth: AuthState) -> Router
where
  S: BulletinStore + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", kairan_api::api_router(api))
    .merge(auth::router(auth))
    .layer(TraceLayer::new_for_http())
}
