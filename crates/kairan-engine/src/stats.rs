//! Read-rate aggregation for the admin dashboard.
//!
//! All aggregates resolve a post's target set against the roster first:
//! the whole roster when the post is untargeted, otherwise the residents
//! of the targeted blocks. Rates are percentages in `[0, 100]`.

use chrono::NaiveDate;
use serde::Serialize;

use kairan_core::{
  post::{Category, Post, PostId},
  retention::is_within_retention_period,
  roster::{Block, Resident, Roster},
  store::BulletinStore,
};

/// Fixed page size of the unread drill-down listing.
pub const UNREAD_PAGE_SIZE: usize = 50;

// ─── Per-post statistics ─────────────────────────────────────────────────────

/// One post's resolved read statistics. The unread resident list is kept
/// out of the serialised form; the paginated drill-down serves it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostReadStats {
  pub category:     Category,
  #[serde(flatten)]
  pub post:         Post,
  pub target_count: usize,
  pub read_count:   usize,
  pub read_rate:    f64,
  #[serde(skip)]
  pub unread:       Vec<Resident>,
}

/// Resolve one post against the roster.
pub fn post_read_stats(
  category: Category,
  post: Post,
  roster: &Roster,
) -> PostReadStats {
  let targets: Vec<&Resident> = roster
    .iter()
    .filter(|r| {
      post.target_blocks.is_empty() || post.target_blocks.contains(&r.block)
    })
    .collect();

  let mut unread: Vec<Resident> = targets
    .iter()
    .filter(|r| !post.is_read_by(&r.id))
    .map(|r| (*r).clone())
    .collect();
  unread.sort_by(|a, b| a.id.cmp(&b.id));

  let target_count = targets.len();
  let read_count = target_count - unread.len();
  let read_rate = if target_count > 0 {
    read_count as f64 / target_count as f64 * 100.0
  } else {
    0.0
  };

  PostReadStats { category, post, target_count, read_count, read_rate, unread }
}

/// Statistics for every announcement within the retention window, newest
/// first (the dashboard table order).
pub fn announcement_stats<S: BulletinStore>(
  store: &S,
  roster: &Roster,
  today: NaiveDate,
) -> Vec<PostReadStats> {
  let mut posts: Vec<Post> = store
    .posts(Category::Announcements)
    .into_iter()
    .filter(|p| is_within_retention_period(p.date, today))
    .collect();
  posts.sort_by(|a, b| b.date.cmp(&a.date));
  posts
    .into_iter()
    .map(|post| post_read_stats(Category::Announcements, post, roster))
    .collect()
}

// ─── Block averages ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BlockReadRate {
  pub block: Block,
  pub rate:  f64,
}

/// Average read rate per block: for each block, the mean of the
/// block-local rates of every post that addresses it (targeted at it or
/// untargeted). Posts with no targeted residents in the block are
/// skipped; a block with no eligible posts averages 0.
pub fn block_average_read_rates(
  stats: &[PostReadStats],
  roster: &Roster,
) -> Vec<BlockReadRate> {
  Block::ALL
    .into_iter()
    .map(|block| {
      let block_residents: Vec<&Resident> = roster.in_block(block).collect();

      let rates: Vec<f64> = stats
        .iter()
        .filter(|s| {
          s.post.target_blocks.is_empty()
            || s.post.target_blocks.contains(&block)
        })
        .filter_map(|s| {
          if block_residents.is_empty() {
            return None;
          }
          let read = block_residents
            .iter()
            .filter(|r| s.post.is_read_by(&r.id))
            .count();
          Some(read as f64 / block_residents.len() as f64 * 100.0)
        })
        .collect();

      let rate = if rates.is_empty() {
        0.0
      } else {
        rates.iter().sum::<f64>() / rates.len() as f64
      };
      BlockReadRate { block, rate }
    })
    .collect()
}

// ─── Recent chart feed ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RecentRate {
  pub id:    PostId,
  pub title: String,
  pub date:  NaiveDate,
  pub rate:  f64,
}

/// The `n` most recent posts' individual rates, re-ordered chronologically
/// ascending for charting (oldest of the selection first). Expects `stats`
/// newest first, as produced by [`announcement_stats`].
pub fn recent_read_rates(stats: &[PostReadStats], n: usize) -> Vec<RecentRate> {
  let mut recent: Vec<RecentRate> = stats
    .iter()
    .take(n)
    .map(|s| RecentRate {
      id:    s.post.id,
      title: s.post.title.clone(),
      date:  s.post.date,
      rate:  s.read_rate,
    })
    .collect();
  recent.reverse();
  recent
}

// ─── Unread drill-down ───────────────────────────────────────────────────────

/// One page of the unread resident listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadPage {
  /// Unread residents matching the filter, before pagination.
  pub total:      usize,
  pub page:       usize,
  pub page_count: usize,
  pub residents:  Vec<Resident>,
}

/// Page through a post's unread residents, optionally narrowed to a single
/// block. Ordering is by resident id (already established by
/// [`post_read_stats`]), so pages are stable across requests. Pages are
/// 1-based; out-of-range pages come back empty.
pub fn unread_page(
  stats: &PostReadStats,
  block: Option<Block>,
  page: usize,
) -> UnreadPage {
  let filtered: Vec<&Resident> = stats
    .unread
    .iter()
    .filter(|r| block.is_none_or(|b| r.block == b))
    .collect();

  let total = filtered.len();
  let page_count = total.div_ceil(UNREAD_PAGE_SIZE);
  let page = page.max(1);
  let residents = filtered
    .into_iter()
    .skip((page - 1) * UNREAD_PAGE_SIZE)
    .take(UNREAD_PAGE_SIZE)
    .cloned()
    .collect();

  UnreadPage { total, page, page_count, residents }
}
