//! Handlers for inquiry threads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/messages` | Admin inbox; `?resident=` narrows to own threads |
//! | `POST` | `/messages` | Body: message draft |
//! | `DELETE` | `/messages/{id}` | Hard delete |
//! | `POST` | `/messages/{id}/read` | Admin viewed one thread |
//! | `POST` | `/messages/{id}/replies` | 409 once the thread holds 6 |
//! | `POST` | `/messages/read-all` | Bulk admin acknowledgment |
//! | `POST` | `/messages/replies/read-all` | Body: `{"resident":"A001"}` |
//! | `GET`  | `/messages/unread-count` | Admin badge |
//! | `GET`  | `/messages/unread-reply-count?resident=` | Resident badge |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use kairan_core::{
  message::{Message, MessageId, NewMessage, ReplySender},
  store::BulletinStore,
};
use kairan_engine::threads;

use crate::{ApiState, error::ApiError, today};

// ─── Listing / lifecycle ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub resident: Option<String>,
}

/// `GET /messages[?resident=<id>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Json<Vec<Message>>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let mut messages = state.store.messages();
  if let Some(resident) = &params.resident {
    messages.retain(|m| &m.sender_id == resident);
  }
  Json(messages)
}

/// `POST /messages`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(draft): Json<NewMessage>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  draft.validate()?;
  let message = state.store.add_message(draft, today());
  Ok((StatusCode::CREATED, Json(message)))
}

/// `DELETE /messages/{id}`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<MessageId>,
) -> Result<StatusCode, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  if state.store.delete_message(id) {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("message {id} not found")))
  }
}

// ─── Replies ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReplyBody {
  pub content: String,
  pub sender:  ReplySender,
}

/// `POST /messages/{id}/replies` — body: `{"content":"…","sender":"admin"}`
pub async fn add_reply<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<MessageId>,
  Json(body): Json<ReplyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let reply = threads::add_reply(
    state.store.as_ref(),
    id,
    &body.content,
    body.sender,
    today(),
  )?;
  Ok((StatusCode::CREATED, Json(reply)))
}

// ─── Attention flags ─────────────────────────────────────────────────────────

/// `POST /messages/{id}/read`
pub async fn mark_read<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<MessageId>,
) -> Json<serde_json::Value>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let updated = threads::mark_message_read(state.store.as_ref(), id);
  Json(json!({ "updated": updated }))
}

/// `POST /messages/read-all`
pub async fn read_all<S>(State(state): State<ApiState<S>>) -> Json<serde_json::Value>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let updated = threads::mark_all_messages_read(state.store.as_ref());
  Json(json!({ "updated": updated }))
}

#[derive(Debug, Deserialize)]
pub struct ResidentBody {
  pub resident: String,
}

/// `POST /messages/replies/read-all` — body: `{"resident":"A001"}`
pub async fn replies_read_all<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ResidentBody>,
) -> Json<serde_json::Value>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let updated =
    threads::mark_all_replies_read(state.store.as_ref(), &body.resident);
  Json(json!({ "updated": updated }))
}

// ─── Counts ──────────────────────────────────────────────────────────────────

/// `GET /messages/unread-count`
pub async fn unread_count<S>(
  State(state): State<ApiState<S>>,
) -> Json<serde_json::Value>
where
  S: BulletinStore + Send + Sync + 'static,
{
  Json(json!({ "count": threads::unread_inquiry_count(state.store.as_ref()) }))
}

#[derive(Debug, Deserialize)]
pub struct ReplyCountParams {
  pub resident: String,
}

/// `GET /messages/unread-reply-count?resident=<id>`
pub async fn unread_reply_count<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ReplyCountParams>,
) -> Json<serde_json::Value>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let count =
    threads::unread_reply_count(state.store.as_ref(), &params.resident);
  Json(json!({ "count": count }))
}
