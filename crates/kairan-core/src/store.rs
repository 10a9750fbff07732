//! The `BulletinStore` trait — the seam between the engine and a backend.
//!
//! The trait is implemented by storage backends (e.g. `kairan-store-json`).
//! Higher layers (`kairan-engine`, `kairan-api`) depend on this abstraction,
//! not on any concrete backend.
//!
//! The model is single-writer and synchronous: each method is an atomic
//! read-modify-write against one logical store, durably persisted before it
//! returns. Backends do not surface persistence failures to callers; they
//! report the failure once and degrade to memory-only state for the rest of
//! the session. Operating on a missing id is a no-op, reported through the
//! return value.

use chrono::NaiveDate;

use crate::{
  message::{Message, MessageId, NewMessage},
  post::{Category, NewPost, Post, PostId},
};

/// Abstraction over a bulletin store backend.
///
/// The `update_*` methods take a closure that mutates the entity in place
/// and reports whether it actually changed anything; backends persist only
/// on change (this is what makes `mark_read` idempotence free of spurious
/// writes). They return `None` when the id does not exist.
pub trait BulletinStore {
  /// All posts in `category`, newest-prepended (insertion order).
  fn posts(&self, category: Category) -> Vec<Post>;

  /// Allocate an id, take the creation-time snapshot, prepend, persist.
  fn add_post(&self, category: Category, draft: NewPost) -> Post;

  /// Remove a post by id. Returns `false` (no-op) when missing.
  fn delete_post(&self, category: Category, id: PostId) -> bool;

  /// Atomic read-modify-write of one post. Returns `Some(changed)` or
  /// `None` when the post does not exist.
  fn update_post(
    &self,
    category: Category,
    id: PostId,
    apply: &mut dyn FnMut(&mut Post) -> bool,
  ) -> Option<bool>;

  /// All inquiry threads, newest-prepended.
  fn messages(&self) -> Vec<Message>;

  /// Open a new thread dated `date`; allocates the id, prepends, persists.
  fn add_message(&self, draft: NewMessage, date: NaiveDate) -> Message;

  /// Remove a thread entirely. Returns `false` (no-op) when missing.
  fn delete_message(&self, id: MessageId) -> bool;

  /// Atomic read-modify-write of one thread. Returns `Some(changed)` or
  /// `None` when the thread does not exist.
  fn update_message(
    &self,
    id: MessageId,
    apply: &mut dyn FnMut(&mut Message) -> bool,
  ) -> Option<bool>;

  /// Apply `apply` to every thread; persists once if anything changed.
  /// Returns the number of threads changed.
  fn update_messages(
    &self,
    apply: &mut dyn FnMut(&mut Message) -> bool,
  ) -> usize;
}
