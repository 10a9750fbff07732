//! Handlers for post listing, publishing, read receipts, and the
//! retention feeds.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/posts` | All categories, 3-month window, newest first |
//! | `GET`  | `/updates/recent` | Same, narrowed to the last 7 days |
//! | `GET`  | `/posts/{category}` | Optional `?resident=` applies targeting |
//! | `POST` | `/posts/{category}` | Body: post draft |
//! | `DELETE` | `/posts/{category}/{id}` | 404 if missing |
//! | `POST` | `/posts/{category}/{id}/read` | Body: `{"resident":"A001"}` |
//! | `GET`  | `/posts/{category}/unread-count?resident=` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use kairan_core::{
  post::{Category, NewPost, Post, PostId},
  store::BulletinStore,
};
use kairan_engine::{feed, receipts::MarkOutcome};

use crate::{ApiState, error::ApiError, today};

// ─── Feeds ───────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn feed<S>(State(state): State<ApiState<S>>) -> Json<Vec<feed::FeedItem>>
where
  S: BulletinStore + Send + Sync + 'static,
{
  Json(feed::all_posts(state.store.as_ref(), today()))
}

/// `GET /updates/recent`
pub async fn recent<S>(
  State(state): State<ApiState<S>>,
) -> Json<Vec<feed::FeedItem>>
where
  S: BulletinStore + Send + Sync + 'static,
{
  Json(feed::recent_updates(state.store.as_ref(), today()))
}

// ─── Category listing ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// When present, the targeting rule is applied for this resident.
  /// Admin clients omit it and see every post.
  pub resident: Option<String>,
}

/// `GET /posts/{category}[?resident=<id>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(category): Path<Category>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let resident = match &params.resident {
    Some(id) => Some(state.lookup_resident(id)?),
    None => None,
  };

  let mut posts = state.store.posts(category);
  if let Some(resident) = resident {
    posts.retain(|p| p.is_visible_to(Some(resident)));
  }
  posts.sort_by(|a, b| b.date.cmp(&a.date));
  Ok(Json(posts))
}

// ─── Publish / delete ────────────────────────────────────────────────────────

/// `POST /posts/{category}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Path(category): Path<Category>,
  Json(draft): Json<NewPost>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  draft.validate()?;
  let post = state.store.add_post(category, draft);
  Ok((StatusCode::CREATED, Json(post)))
}

/// `DELETE /posts/{category}/{id}`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path((category, id)): Path<(Category, PostId)>,
) -> Result<StatusCode, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  if state.store.delete_post(category, id) {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("post {category}/{id} not found")))
  }
}

// ─── Read receipts ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MarkReadBody {
  pub resident: String,
}

/// `POST /posts/{category}/{id}/read` — body: `{"resident":"A001"}`
pub async fn mark_read<S>(
  State(state): State<ApiState<S>>,
  Path((category, id)): Path<(Category, PostId)>,
  Json(body): Json<MarkReadBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  state.lookup_resident(&body.resident)?;
  let outcome = state
    .tracker
    .mark_as_read(state.store.as_ref(), category, id, &body.resident);
  match outcome {
    MarkOutcome::NotFound => {
      Err(ApiError::NotFound(format!("post {category}/{id} not found")))
    }
    outcome => Ok(Json(json!({ "outcome": outcome }))),
  }
}

#[derive(Debug, Deserialize)]
pub struct UnreadCountParams {
  pub resident: String,
}

/// `GET /posts/{category}/unread-count?resident=<id>`
pub async fn unread_count<S>(
  State(state): State<ApiState<S>>,
  Path(category): Path<Category>,
  Query(params): Query<UnreadCountParams>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let resident = state.lookup_resident(&params.resident)?;
  let count = state.tracker.unread_count(
    state.store.as_ref(),
    category,
    resident,
    today(),
  );
  Ok(Json(json!({ "count": count })))
}
