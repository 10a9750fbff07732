//! Posts, categories, and the targeting rule.
//!
//! A post is distributed to the whole estate or to a subset of blocks.
//! Its `read_by` set grows monotonically: resident ids are appended once
//! and never removed.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  roster::{Block, Resident},
};

pub type PostId = u64;

// ─── Category ────────────────────────────────────────────────────────────────

/// The bulletin categories a post can be published under. Serialises as the
/// lowercase name, which is also the key in the persisted blob.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Announcements,
  Garbage,
  Ads,
}

impl Category {
  /// Every category, in feed traversal order.
  pub const ALL: [Category; 3] =
    [Category::Announcements, Category::Garbage, Category::Ads];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Announcements => "announcements",
      Category::Garbage => "garbage",
      Category::Ads => "ads",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Category {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "announcements" => Ok(Category::Announcements),
      "garbage" => Ok(Category::Garbage),
      "ads" => Ok(Category::Ads),
      other => Err(Error::UnknownCategory(other.to_owned())),
    }
  }
}

// ─── Importance ──────────────────────────────────────────────────────────────

/// Urgency marker; only meaningful for announcements.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
  #[default]
  Normal,
  High,
  Urgent,
}

// ─── Translations ────────────────────────────────────────────────────────────

/// Denormalised per-language text, attached once at creation and never
/// recomputed. The snapshot transform tags the base text per language; a
/// real translation service can replace it without touching the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translations {
  #[serde(default)]
  pub title_en:   String,
  #[serde(default)]
  pub title_zh:   String,
  #[serde(default)]
  pub title_es:   String,
  #[serde(default)]
  pub content_en: String,
  #[serde(default)]
  pub content_zh: String,
  #[serde(default)]
  pub content_es: String,
}

impl Translations {
  /// Snapshot of `title`/`content` for every supported language.
  pub fn snapshot(title: &str, content: &str) -> Self {
    Self {
      title_en:   tag(title, "EN"),
      title_zh:   tag(title, "CH"),
      title_es:   tag(title, "ES"),
      content_en: tag(content, "EN"),
      content_zh: tag(content, "CH"),
      content_es: tag(content, "ES"),
    }
  }
}

fn tag(text: &str, lang: &str) -> String { format!("{text} [{lang}]") }

// ─── Post ────────────────────────────────────────────────────────────────────

/// A published bulletin entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  pub id:            PostId,
  pub title:         String,
  pub content:       String,
  #[serde(flatten)]
  pub translations:  Translations,
  /// Calendar date used for both ordering and retention.
  pub date:          NaiveDate,
  /// Empty means the post addresses every resident.
  #[serde(default)]
  pub target_blocks: Vec<Block>,
  #[serde(default)]
  pub importance:    Importance,
  /// Opaque reference (e.g. a data URL); never interpreted here.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image:         Option<String>,
  /// Resident ids that have read this post. Append-only.
  #[serde(default)]
  pub read_by:       Vec<String>,
  #[serde(default)]
  pub likes:         u32,
}

impl Post {
  /// Build a post from a validated draft. The id is allocated by the store;
  /// the translation snapshot is taken here, at creation time.
  pub fn compose(id: PostId, draft: NewPost) -> Self {
    let translations = Translations::snapshot(&draft.title, &draft.content);
    Self {
      id,
      title: draft.title,
      content: draft.content,
      translations,
      date: draft.date,
      target_blocks: draft.target_blocks,
      importance: draft.importance,
      image: draft.image,
      read_by: Vec::new(),
      likes: 0,
    }
  }

  /// The targeting rule: untargeted posts and public (anonymous) views see
  /// everything; otherwise the resident's block must be in the target set.
  /// Administrators bypass this by listing posts without a resident.
  pub fn is_visible_to(&self, resident: Option<&Resident>) -> bool {
    if self.target_blocks.is_empty() {
      return true;
    }
    match resident {
      None => true,
      Some(r) => self.target_blocks.contains(&r.block),
    }
  }

  pub fn is_read_by(&self, resident_id: &str) -> bool {
    self.read_by.iter().any(|id| id == resident_id)
  }

  /// Append `resident_id` to the read set. Idempotent: returns `true` only
  /// when the set actually changed.
  pub fn mark_read(&mut self, resident_id: &str) -> bool {
    if self.is_read_by(resident_id) {
      return false;
    }
    self.read_by.push(resident_id.to_owned());
    true
  }
}

// ─── NewPost ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::BulletinStore::add_post`]. The id and the
/// translation snapshot are not accepted from callers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
  pub title:         String,
  pub content:       String,
  pub date:          NaiveDate,
  #[serde(default)]
  pub target_blocks: Vec<Block>,
  #[serde(default)]
  pub importance:    Importance,
  #[serde(default)]
  pub image:         Option<String>,
}

impl NewPost {
  /// Boundary validation: required text fields must not be blank.
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::EmptyField("title"));
    }
    if self.content.trim().is_empty() {
      return Err(Error::EmptyField("content"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::roster::Roster;

  fn draft(targets: Vec<Block>) -> NewPost {
    NewPost {
      title:         "清掃のお知らせ".to_owned(),
      content:       "来週の日曜日に清掃を行います。".to_owned(),
      date:          NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
      target_blocks: targets,
      importance:    Importance::Normal,
      image:         None,
    }
  }

  #[test]
  fn compose_takes_translation_snapshot() {
    let post = Post::compose(7, draft(vec![]));
    assert_eq!(post.translations.title_en, "清掃のお知らせ [EN]");
    assert_eq!(post.translations.title_zh, "清掃のお知らせ [CH]");
    assert_eq!(post.translations.content_es, "来週の日曜日に清掃を行います。 [ES]");
    assert!(post.read_by.is_empty());
    assert_eq!(post.likes, 0);
  }

  #[test]
  fn untargeted_post_is_visible_to_everyone() {
    let roster = Roster::standard();
    let post = Post::compose(1, draft(vec![]));
    assert!(post.is_visible_to(None));
    assert!(post.is_visible_to(roster.by_id("A001")));
    assert!(post.is_visible_to(roster.by_id("E050")));
  }

  #[test]
  fn targeted_post_is_visible_only_to_targeted_blocks() {
    let roster = Roster::standard();
    let post = Post::compose(1, draft(vec![Block::A, Block::C]));
    assert!(post.is_visible_to(roster.by_id("A001")));
    assert!(post.is_visible_to(roster.by_id("C010")));
    assert!(!post.is_visible_to(roster.by_id("B001")));
    // The public (anonymous) view always passes.
    assert!(post.is_visible_to(None));
  }

  #[test]
  fn mark_read_is_idempotent_and_monotonic() {
    let mut post = Post::compose(1, draft(vec![]));
    assert!(post.mark_read("A001"));
    assert!(!post.mark_read("A001"));
    assert!(post.mark_read("B002"));
    assert_eq!(post.read_by, vec!["A001", "B002"]);
  }

  #[test]
  fn validate_rejects_blank_fields() {
    let mut d = draft(vec![]);
    d.title = "  ".to_owned();
    assert_eq!(d.validate(), Err(Error::EmptyField("title")));

    let mut d = draft(vec![]);
    d.content = String::new();
    assert_eq!(d.validate(), Err(Error::EmptyField("content")));

    assert!(draft(vec![]).validate().is_ok());
  }
}
