//! [`JsonStore`] — the single-file JSON blob implementation of
//! [`BulletinStore`].
//!
//! The whole dataset lives in one keyed blob:
//!
//! ```json
//! { "posts": { "announcements": [ … ] }, "messages": [ … ] }
//! ```
//!
//! Loading a missing or malformed file falls back to the fixed seed
//! dataset. Saving is atomic (temp file + rename); the first persistence
//! failure is reported through `tracing` and the store then runs
//! memory-only for the remainder of the session, keeping the in-memory
//! view consistent.

pub mod seed;

use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
  sync::Mutex,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use kairan_core::{
  message::{Message, MessageId, NewMessage},
  post::{Category, NewPost, Post, PostId},
  store::BulletinStore,
};

// ─── Blob layout ─────────────────────────────────────────────────────────────

/// The persisted root object. Missing keys default so older blobs load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
  #[serde(default)]
  pub posts:    BTreeMap<Category, Vec<Post>>,
  #[serde(default)]
  pub messages: Vec<Message>,
}

// ─── Store ───────────────────────────────────────────────────────────────────

struct Inner {
  data:     StoreData,
  path:     Option<PathBuf>,
  /// Set after the first failed save; suppresses repeat reports.
  degraded: bool,
}

/// A bulletin store backed by a single JSON file.
pub struct JsonStore {
  inner: Mutex<Inner>,
}

impl JsonStore {
  /// Open the store at `path`. A missing file starts from the seed
  /// dataset; a malformed file is reported and also falls back to the
  /// seed rather than failing outright.
  pub fn open(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref().to_path_buf();
    let data = match fs::read_to_string(&path) {
      Ok(raw) => match serde_json::from_str::<StoreData>(&raw) {
        Ok(data) => data,
        Err(e) => {
          tracing::warn!("malformed store file {path:?}: {e}; starting from seed data");
          seed::seed_data()
        }
      },
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => seed::seed_data(),
      Err(e) => {
        tracing::warn!("cannot read store file {path:?}: {e}; starting from seed data");
        seed::seed_data()
      }
    };
    Self {
      inner: Mutex::new(Inner { data, path: Some(path), degraded: false }),
    }
  }

  /// An empty memory-only store — useful for testing.
  pub fn in_memory() -> Self {
    Self::from_data(StoreData::default())
  }

  /// A memory-only store pre-populated with the seed dataset.
  pub fn seeded() -> Self {
    Self::from_data(seed::seed_data())
  }

  fn from_data(data: StoreData) -> Self {
    Self {
      inner: Mutex::new(Inner { data, path: None, degraded: false }),
    }
  }

  fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
    let mut inner = self.inner.lock().expect("store mutex poisoned");
    f(&mut inner)
  }
}

// ─── Persistence ─────────────────────────────────────────────────────────────

impl Inner {
  /// Write the blob out. Failures flip the store into memory-only mode;
  /// the in-memory state is already updated, so callers see a consistent
  /// view either way.
  fn persist(&mut self) {
    let Some(path) = self.path.clone() else { return };
    if self.degraded {
      return;
    }
    if let Err(e) = write_atomically(&path, &self.data) {
      tracing::error!(
        "cannot persist store to {path:?}: {e}; continuing in memory only"
      );
      self.degraded = true;
    }
  }
}

fn write_atomically(path: &Path, data: &StoreData) -> std::io::Result<()> {
  let raw = serde_json::to_string_pretty(data)?;
  // Write-then-rename so a crash mid-write never truncates the blob.
  let tmp = path.with_extension("json.tmp");
  fs::write(&tmp, raw)?;
  fs::rename(&tmp, path)?;
  Ok(())
}

// ─── BulletinStore implementation ────────────────────────────────────────────

impl BulletinStore for JsonStore {
  fn posts(&self, category: Category) -> Vec<Post> {
    self.with_inner(|inner| {
      inner.data.posts.get(&category).cloned().unwrap_or_default()
    })
  }

  fn add_post(&self, category: Category, draft: NewPost) -> Post {
    self.with_inner(|inner| {
      // Ids are creation-ordered across every category.
      let next_id = inner
        .data
        .posts
        .values()
        .flatten()
        .map(|p| p.id)
        .max()
        .unwrap_or(0)
        + 1;
      let post = Post::compose(next_id, draft);
      inner
        .data
        .posts
        .entry(category)
        .or_default()
        .insert(0, post.clone());
      inner.persist();
      post
    })
  }

  fn delete_post(&self, category: Category, id: PostId) -> bool {
    self.with_inner(|inner| {
      let Some(posts) = inner.data.posts.get_mut(&category) else {
        return false;
      };
      let before = posts.len();
      posts.retain(|p| p.id != id);
      let removed = posts.len() != before;
      if removed {
        inner.persist();
      }
      removed
    })
  }

  fn update_post(
    &self,
    category: Category,
    id: PostId,
    apply: &mut dyn FnMut(&mut Post) -> bool,
  ) -> Option<bool> {
    self.with_inner(|inner| {
      let post = inner
        .data
        .posts
        .get_mut(&category)?
        .iter_mut()
        .find(|p| p.id == id)?;
      let changed = apply(post);
      if changed {
        inner.persist();
      }
      Some(changed)
    })
  }

  fn messages(&self) -> Vec<Message> {
    self.with_inner(|inner| inner.data.messages.clone())
  }

  fn add_message(&self, draft: NewMessage, date: NaiveDate) -> Message {
    self.with_inner(|inner| {
      let next_id =
        inner.data.messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
      let message = Message::compose(next_id, draft, date);
      inner.data.messages.insert(0, message.clone());
      inner.persist();
      message
    })
  }

  fn delete_message(&self, id: MessageId) -> bool {
    self.with_inner(|inner| {
      let before = inner.data.messages.len();
      inner.data.messages.retain(|m| m.id != id);
      let removed = inner.data.messages.len() != before;
      if removed {
        inner.persist();
      }
      removed
    })
  }

  fn update_message(
    &self,
    id: MessageId,
    apply: &mut dyn FnMut(&mut Message) -> bool,
  ) -> Option<bool> {
    self.with_inner(|inner| {
      let message = inner.data.messages.iter_mut().find(|m| m.id == id)?;
      let changed = apply(message);
      if changed {
        inner.persist();
      }
      Some(changed)
    })
  }

  fn update_messages(
    &self,
    apply: &mut dyn FnMut(&mut Message) -> bool,
  ) -> usize {
    self.with_inner(|inner| {
      let mut changed = 0;
      for message in &mut inner.data.messages {
        if apply(message) {
          changed += 1;
        }
      }
      if changed > 0 {
        inner.persist();
      }
      changed
    })
  }
}
