//! Inquiry threads between a resident and the administration.
//!
//! A thread is opened by a resident and carries at most [`MAX_THREAD_REPLIES`]
//! replies (three round-trips). Two flags track attention: `read` for the
//! admin side of the thread, `has_unread_reply` for the resident side.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type MessageId = u64;
pub type ReplyId = u64;

/// Reply capacity per thread: three turns per side.
pub const MAX_THREAD_REPLIES: usize = 6;

// ─── Reply ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySender {
  Admin,
  Resident,
}

/// One turn in a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
  pub id:      ReplyId,
  pub content: String,
  pub date:    NaiveDate,
  pub sender:  ReplySender,
}

// ─── Message ─────────────────────────────────────────────────────────────────

/// An inquiry thread. Deleted explicitly and entirely; no tombstones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
  pub id:               MessageId,
  pub sender_id:        String,
  pub sender_name:      String,
  pub subject:          String,
  pub content:          String,
  pub date:             NaiveDate,
  /// Whether the admin side has viewed the thread.
  #[serde(default)]
  pub read:             bool,
  /// Whether the resident has an unseen admin reply.
  #[serde(default)]
  pub has_unread_reply: bool,
  #[serde(default)]
  pub replies:          Vec<Reply>,
}

impl Message {
  /// Build a fresh thread from a validated draft. New threads start unread
  /// on the admin side with no replies.
  pub fn compose(id: MessageId, draft: NewMessage, date: NaiveDate) -> Self {
    Self {
      id,
      sender_id: draft.sender_id,
      sender_name: draft.sender_name,
      subject: draft.subject,
      content: draft.content,
      date,
      read: false,
      has_unread_reply: false,
      replies: Vec::new(),
    }
  }

  pub fn can_reply(&self) -> bool {
    self.replies.len() < MAX_THREAD_REPLIES
  }

  /// Creation-ordered reply id within this thread.
  pub fn next_reply_id(&self) -> ReplyId {
    self.replies.iter().map(|r| r.id).max().unwrap_or(0) + 1
  }
}

// ─── NewMessage ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::BulletinStore::add_message`]. The id and the
/// creation date are assigned at the store boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
  pub sender_id:   String,
  pub sender_name: String,
  pub subject:     String,
  pub content:     String,
}

impl NewMessage {
  pub fn validate(&self) -> Result<()> {
    if self.subject.trim().is_empty() {
      return Err(Error::EmptyField("subject"));
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

  fn thread_with_replies(count: usize) -> Message {
    let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
    let mut msg = Message::compose(
      1,
      NewMessage {
        sender_id:   "A001".to_owned(),
        sender_name: "田中 太郎".to_owned(),
        subject:     "駐輪場について".to_owned(),
        content:     "駐輪場の場所を教えてください。".to_owned(),
      },
      date,
    );
    for i in 0..count {
      let sender = if i % 2 == 0 {
        ReplySender::Admin
      } else {
        ReplySender::Resident
      };
      msg.replies.push(Reply {
        id: msg.next_reply_id(),
        content: format!("reply {i}"),
        date,
        sender,
      });
    }
    msg
  }

  #[test]
  fn fresh_thread_is_unread_and_replyable() {
    let msg = thread_with_replies(0);
    assert!(!msg.read);
    assert!(!msg.has_unread_reply);
    assert!(msg.can_reply());
  }

  #[test]
  fn thread_at_capacity_cannot_reply() {
    assert!(thread_with_replies(5).can_reply());
    assert!(!thread_with_replies(6).can_reply());
  }

  #[test]
  fn reply_ids_are_creation_ordered() {
    let msg = thread_with_replies(3);
    let ids: Vec<_> = msg.replies.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(msg.next_reply_id(), 4);
  }

  #[test]
  fn validate_rejects_blank_fields() {
    let draft = NewMessage {
      sender_id:   "A001".to_owned(),
      sender_name: "田中 太郎".to_owned(),
      subject:     String::new(),
      content:     "本文".to_owned(),
    };
    assert_eq!(draft.validate(), Err(Error::EmptyField("subject")));
  }
}
