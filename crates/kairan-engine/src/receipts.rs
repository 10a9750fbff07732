//! The read-state tracker: read receipts and unread counts.
//!
//! Receipt recording is gated per category: categories without an
//! accountability requirement (collection schedules, flyers) never record
//! who read what. The gate is an explicit configuration map, not a
//! hardcoded list, so deployments can flip categories without code
//! changes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use kairan_core::{
  post::{Category, PostId},
  retention::is_within_retention_period,
  roster::Resident,
  store::BulletinStore,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Per-category read-receipt switches.
#[derive(Debug, Clone)]
pub struct ReceiptConfig {
  enabled: BTreeMap<Category, bool>,
}

impl Default for ReceiptConfig {
  /// Announcements carry receipts; garbage schedules and flyers do not.
  fn default() -> Self {
    Self {
      enabled: BTreeMap::from([
        (Category::Announcements, true),
        (Category::Garbage, false),
        (Category::Ads, false),
      ]),
    }
  }
}

impl ReceiptConfig {
  pub fn enabled(&self, category: Category) -> bool {
    self.enabled.get(&category).copied().unwrap_or(true)
  }

  /// Override one category's switch.
  pub fn with(mut self, category: Category, enabled: bool) -> Self {
    self.enabled.insert(category, enabled);
    self
  }
}

/// Whether unread counting considers every post in a category or only the
/// posts targeted at the resident's block. Counting everything matches the
/// historical behavior; callers that pre-filter by targeting should keep
/// [`UnreadScope::AllPosts`] here to avoid double filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnreadScope {
  #[default]
  AllPosts,
  TargetedOnly,
}

// ─── Tracker ─────────────────────────────────────────────────────────────────

/// Outcome of a mark-as-read command. Everything except `Recorded` is a
/// no-op on the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkOutcome {
  Recorded,
  AlreadyRead,
  ReceiptsDisabled,
  NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct ReadTracker {
  pub receipts: ReceiptConfig,
  pub scope:    UnreadScope,
}

impl ReadTracker {
  /// Record that `resident_id` has read a post. Idempotent: an already
  /// recorded receipt changes nothing and writes nothing. The category
  /// switch is consulted before the store is touched at all.
  pub fn mark_as_read<S: BulletinStore>(
    &self,
    store: &S,
    category: Category,
    post_id: PostId,
    resident_id: &str,
  ) -> MarkOutcome {
    if !self.receipts.enabled(category) {
      return MarkOutcome::ReceiptsDisabled;
    }
    match store.update_post(category, post_id, &mut |post| {
      post.mark_read(resident_id)
    }) {
      None => MarkOutcome::NotFound,
      Some(true) => MarkOutcome::Recorded,
      Some(false) => MarkOutcome::AlreadyRead,
    }
  }

  /// Posts in `category` within the retention window that `resident` has
  /// not read, scoped per [`UnreadScope`].
  pub fn unread_count<S: BulletinStore>(
    &self,
    store: &S,
    category: Category,
    resident: &Resident,
    today: NaiveDate,
  ) -> usize {
    store
      .posts(category)
      .iter()
      .filter(|p| is_within_retention_period(p.date, today))
      .filter(|p| match self.scope {
        UnreadScope::AllPosts => true,
        UnreadScope::TargetedOnly => p.is_visible_to(Some(resident)),
      })
      .filter(|p| !p.is_read_by(&resident.id))
      .count()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Days;
  use kairan_core::{
    post::{Importance, NewPost},
    roster::{Block, Roster},
  };
  use kairan_store_json::JsonStore;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() }

  fn draft(date: NaiveDate, targets: Vec<Block>) -> NewPost {
    NewPost {
      title:         "お知らせ".to_owned(),
      content:       "本文".to_owned(),
      date,
      target_blocks: targets,
      importance:    Importance::Normal,
      image:         None,
    }
  }

  #[test]
  fn marking_twice_records_once() {
    let store = JsonStore::in_memory();
    let tracker = ReadTracker::default();
    let post = store.add_post(Category::Announcements, draft(today(), vec![]));

    let first =
      tracker.mark_as_read(&store, Category::Announcements, post.id, "A001");
    assert_eq!(first, MarkOutcome::Recorded);

    let second =
      tracker.mark_as_read(&store, Category::Announcements, post.id, "A001");
    assert_eq!(second, MarkOutcome::AlreadyRead);

    let read_by = &store.posts(Category::Announcements)[0].read_by;
    assert_eq!(read_by, &vec!["A001".to_owned()]);
  }

  #[test]
  fn disabled_category_records_nothing() {
    let store = JsonStore::in_memory();
    let tracker = ReadTracker::default();
    let post = store.add_post(Category::Garbage, draft(today(), vec![]));

    let outcome =
      tracker.mark_as_read(&store, Category::Garbage, post.id, "A001");
    assert_eq!(outcome, MarkOutcome::ReceiptsDisabled);
    assert!(store.posts(Category::Garbage)[0].read_by.is_empty());
  }

  #[test]
  fn disabling_a_category_stops_new_receipts() {
    let store = JsonStore::in_memory();
    let enabled = ReadTracker::default();
    let post = store.add_post(Category::Announcements, draft(today(), vec![]));
    enabled.mark_as_read(&store, Category::Announcements, post.id, "A001");

    // Receipts switched off for the category afterwards: earlier receipts
    // stay, new ones are refused.
    let disabled = ReadTracker {
      receipts: ReceiptConfig::default().with(Category::Announcements, false),
      scope:    UnreadScope::default(),
    };
    let newer = store.add_post(Category::Announcements, draft(today(), vec![]));
    let outcome =
      disabled.mark_as_read(&store, Category::Announcements, newer.id, "A001");
    assert_eq!(outcome, MarkOutcome::ReceiptsDisabled);

    let posts = store.posts(Category::Announcements);
    assert!(posts.iter().find(|p| p.id == newer.id).unwrap().read_by.is_empty());
    assert!(posts.iter().find(|p| p.id == post.id).unwrap().is_read_by("A001"));
  }

  #[test]
  fn missing_post_is_a_noop() {
    let store = JsonStore::in_memory();
    let tracker = ReadTracker::default();
    let outcome =
      tracker.mark_as_read(&store, Category::Announcements, 42, "A001");
    assert_eq!(outcome, MarkOutcome::NotFound);
  }

  #[test]
  fn unread_count_applies_retention_but_not_read_state_of_others() {
    let store = JsonStore::in_memory();
    let tracker = ReadTracker::default();
    let roster = Roster::standard();
    let resident = roster.by_id("A001").unwrap();

    let fresh = store.add_post(Category::Announcements, draft(today(), vec![]));
    store.add_post(
      Category::Announcements,
      draft(today() - Days::new(200), vec![]),
    );

    // One fresh unread post; the aged-out one does not count.
    assert_eq!(
      tracker.unread_count(&store, Category::Announcements, resident, today()),
      1
    );

    // Another resident reading it does not change A001's count.
    tracker.mark_as_read(&store, Category::Announcements, fresh.id, "B001");
    assert_eq!(
      tracker.unread_count(&store, Category::Announcements, resident, today()),
      1
    );

    tracker.mark_as_read(&store, Category::Announcements, fresh.id, "A001");
    assert_eq!(
      tracker.unread_count(&store, Category::Announcements, resident, today()),
      0
    );
  }

  #[test]
  fn targeted_scope_skips_posts_for_other_blocks() {
    let store = JsonStore::in_memory();
    let roster = Roster::standard();
    let resident_b = roster.by_id("B001").unwrap();

    store.add_post(Category::Announcements, draft(today(), vec![Block::A]));
    store.add_post(Category::Announcements, draft(today(), vec![]));

    let counting_all = ReadTracker::default();
    assert_eq!(
      counting_all.unread_count(&store, Category::Announcements, resident_b, today()),
      2
    );

    let targeted = ReadTracker {
      receipts: ReceiptConfig::default(),
      scope:    UnreadScope::TargetedOnly,
    };
    assert_eq!(
      targeted.unread_count(&store, Category::Announcements, resident_b, today()),
      1
    );
  }
}
