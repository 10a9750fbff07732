//! Handlers for the read-rate dashboard and the unread drill-down.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/stats/announcements` | Per-post read statistics, newest first |
//! | `GET` | `/stats/blocks` | Average read rate per block |
//! | `GET` | `/stats/recent` | Last 10 posts' rates, oldest first |
//! | `GET` | `/stats/announcements/{id}/unread` | `?block=&page=`, 50/page |
//! | `GET` | `/stats/announcements/{id}/unread.csv` | BOM'd CSV, unfiltered |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::header,
  response::IntoResponse,
};
use serde::Deserialize;

use kairan_core::{post::PostId, roster::Block, store::BulletinStore};
use kairan_engine::{
  export,
  stats::{self, BlockReadRate, PostReadStats, RecentRate, UnreadPage},
};

use crate::{ApiState, error::ApiError, today};

/// Posts shown in the recent-rates chart.
const RECENT_CHART_POSTS: usize = 10;

/// `GET /stats/announcements`
pub async fn announcements<S>(
  State(state): State<ApiState<S>>,
) -> Json<Vec<PostReadStats>>
where
  S: BulletinStore + Send + Sync + 'static,
{
  Json(stats::announcement_stats(
    state.store.as_ref(),
    &state.roster,
    today(),
  ))
}

/// `GET /stats/blocks`
pub async fn blocks<S>(
  State(state): State<ApiState<S>>,
) -> Json<Vec<BlockReadRate>>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let stats =
    stats::announcement_stats(state.store.as_ref(), &state.roster, today());
  Json(stats::block_average_read_rates(&stats, &state.roster))
}

/// `GET /stats/recent`
pub async fn recent<S>(
  State(state): State<ApiState<S>>,
) -> Json<Vec<RecentRate>>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let stats =
    stats::announcement_stats(state.store.as_ref(), &state.roster, today());
  Json(stats::recent_read_rates(&stats, RECENT_CHART_POSTS))
}

// ─── Unread drill-down ───────────────────────────────────────────────────────

fn stats_for_post<S>(
  state: &ApiState<S>,
  id: PostId,
) -> Result<PostReadStats, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  stats::announcement_stats(state.store.as_ref(), &state.roster, today())
    .into_iter()
    .find(|s| s.post.id == id)
    .ok_or_else(|| ApiError::NotFound(format!("announcement {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct UnreadParams {
  pub block: Option<Block>,
  pub page:  Option<usize>,
}

/// `GET /stats/announcements/{id}/unread[?block=A][&page=2]`
pub async fn unread<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PostId>,
  Query(params): Query<UnreadParams>,
) -> Result<Json<UnreadPage>, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let stats = stats_for_post(&state, id)?;
  Ok(Json(stats::unread_page(
    &stats,
    params.block,
    params.page.unwrap_or(1),
  )))
}

/// `GET /stats/announcements/{id}/unread.csv`
///
/// Always exports the full unread set; the viewer's block filter and page
/// never leak into the download.
pub async fn unread_csv<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<PostId>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BulletinStore + Send + Sync + 'static,
{
  let stats = stats_for_post(&state, id)?;
  let body = export::unread_list_csv(&stats);
  Ok((
    [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
    body,
  ))
}
