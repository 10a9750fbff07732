//! JSON REST API for the kairan bulletin engine.
//!
//! Exposes an axum [`Router`] backed by any
//! [`kairan_core::store::BulletinStore`]. Auth and transport concerns are
//! the caller's responsibility; handlers speak plain data in and out.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kairan_api::api_router(state))
//! ```

pub mod error;
pub mod messages;
pub mod posts;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use chrono::NaiveDate;

use kairan_core::{
  roster::{Resident, Roster},
  store::BulletinStore,
};
use kairan_engine::receipts::ReadTracker;

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub roster:  Arc<Roster>,
  pub tracker: Arc<ReadTracker>,
}

impl<S> ApiState<S> {
  /// State with the default read-receipt configuration.
  pub fn new(store: Arc<S>, roster: Arc<Roster>) -> Self {
    Self { store, roster, tracker: Arc::new(ReadTracker::default()) }
  }

  pub(crate) fn lookup_resident(&self, id: &str) -> Result<&Resident, ApiError> {
    self
      .roster
      .by_id(id)
      .ok_or_else(|| ApiError::NotFound(format!("resident {id} not found")))
  }
}

// Manual impl: `Arc` clones regardless of whether `S` itself is `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   self.store.clone(),
      roster:  self.roster.clone(),
      tracker: self.tracker.clone(),
    }
  }
}

/// The reference date for every retention/aggregation query.
pub(crate) fn today() -> NaiveDate {
  chrono::Local::now().date_naive()
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: BulletinStore + Send + Sync + 'static,
{
  Router::new()
    // Feeds
    .route("/posts", get(posts::feed::<S>))
    .route("/updates/recent", get(posts::recent::<S>))
    // Posts
    .route(
      "/posts/{category}",
      get(posts::list::<S>).post(posts::create::<S>),
    )
    .route("/posts/{category}/unread-count", get(posts::unread_count::<S>))
    .route("/posts/{category}/{id}", delete(posts::remove::<S>))
    .route("/posts/{category}/{id}/read", post(posts::mark_read::<S>))
    // Dashboard statistics
    .route("/stats/announcements", get(stats::announcements::<S>))
    .route("/stats/blocks", get(stats::blocks::<S>))
    .route("/stats/recent", get(stats::recent::<S>))
    .route("/stats/announcements/{id}/unread", get(stats::unread::<S>))
    .route(
      "/stats/announcements/{id}/unread.csv",
      get(stats::unread_csv::<S>),
    )
    // Inquiry threads
    .route("/messages", get(messages::list::<S>).post(messages::create::<S>))
    .route("/messages/read-all", post(messages::read_all::<S>))
    .route(
      "/messages/replies/read-all",
      post(messages::replies_read_all::<S>),
    )
    .route("/messages/unread-count", get(messages::unread_count::<S>))
    .route(
      "/messages/unread-reply-count",
      get(messages::unread_reply_count::<S>),
    )
    .route("/messages/{id}", delete(messages::remove::<S>))
    .route("/messages/{id}/read", post(messages::mark_read::<S>))
    .route("/messages/{id}/replies", post(messages::add_reply::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
