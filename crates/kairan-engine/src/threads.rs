//! Inquiry-thread operations: bounded replies and attention flags.

use chrono::NaiveDate;

use kairan_core::{
  error::{Error, Result},
  message::{MessageId, Reply, ReplySender},
  store::BulletinStore,
};

/// Append a reply to a thread.
///
/// An admin reply flags the thread for the resident (`has_unread_reply`);
/// a resident reply re-opens it for the admin (`read = false`). A thread
/// at capacity rejects the reply without touching the store.
pub fn add_reply<S: BulletinStore>(
  store: &S,
  id: MessageId,
  content: &str,
  sender: ReplySender,
  today: NaiveDate,
) -> Result<Reply> {
  if content.trim().is_empty() {
    return Err(Error::EmptyField("content"));
  }

  let mut added: Option<Reply> = None;
  let outcome = store.update_message(id, &mut |msg| {
    if !msg.can_reply() {
      return false;
    }
    let reply = Reply {
      id: msg.next_reply_id(),
      content: content.to_owned(),
      date: today,
      sender,
    };
    match sender {
      ReplySender::Admin => msg.has_unread_reply = true,
      ReplySender::Resident => msg.read = false,
    }
    msg.replies.push(reply.clone());
    added = Some(reply);
    true
  });

  match outcome {
    None => Err(Error::MessageNotFound(id)),
    Some(_) => added.ok_or(Error::ThreadFull(id)),
  }
}

/// Admin viewed one thread.
pub fn mark_message_read<S: BulletinStore>(store: &S, id: MessageId) -> bool {
  store
    .update_message(id, &mut |msg| {
      if msg.read {
        false
      } else {
        msg.read = true;
        true
      }
    })
    .unwrap_or(false)
}

/// Bulk admin acknowledgment (inbox view). Returns threads changed.
pub fn mark_all_messages_read<S: BulletinStore>(store: &S) -> usize {
  store.update_messages(&mut |msg| {
    if msg.read {
      false
    } else {
      msg.read = true;
      true
    }
  })
}

/// A resident viewed their inquiry history: clear the unread-reply flag on
/// their own threads. Returns threads changed.
pub fn mark_all_replies_read<S: BulletinStore>(
  store: &S,
  resident_id: &str,
) -> usize {
  store.update_messages(&mut |msg| {
    if msg.sender_id == resident_id && msg.has_unread_reply {
      msg.has_unread_reply = false;
      true
    } else {
      false
    }
  })
}

/// Threads the admin side has not yet viewed.
pub fn unread_inquiry_count<S: BulletinStore>(store: &S) -> usize {
  store.messages().iter().filter(|m| !m.read).count()
}

/// The resident's own threads carrying an unseen admin reply.
pub fn unread_reply_count<S: BulletinStore>(
  store: &S,
  resident_id: &str,
) -> usize {
  store
    .messages()
    .iter()
    .filter(|m| m.sender_id == resident_id && m.has_unread_reply)
    .count()
}

#[cfg(test)]
mod tests {
  use super::*;
  use kairan_core::message::{MAX_THREAD_REPLIES, NewMessage};
  use kairan_store_json::JsonStore;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() }

  fn open_thread(store: &JsonStore, sender_id: &str) -> MessageId {
    store
      .add_message(
        NewMessage {
          sender_id:   sender_id.to_owned(),
          sender_name: format!("Resident {sender_id}"),
          subject:     "騒音について".to_owned(),
          content:     "夜間の騒音が気になります。".to_owned(),
        },
        today(),
      )
      .id
  }

  #[test]
  fn admin_reply_flags_the_resident_side() {
    let store = JsonStore::in_memory();
    let id = open_thread(&store, "A001");
    mark_message_read(&store, id);

    let reply =
      add_reply(&store, id, "確認します。", ReplySender::Admin, today()).unwrap();
    assert_eq!(reply.id, 1);
    assert_eq!(reply.sender, ReplySender::Admin);

    let msg = &store.messages()[0];
    assert!(msg.has_unread_reply);
    // The admin's own read state is left as it was.
    assert!(msg.read);
    assert_eq!(unread_reply_count(&store, "A001"), 1);
    assert_eq!(unread_reply_count(&store, "A002"), 0);
  }

  #[test]
  fn resident_reply_reopens_the_thread_for_admin() {
    let store = JsonStore::in_memory();
    let id = open_thread(&store, "A001");
    mark_message_read(&store, id);
    assert_eq!(unread_inquiry_count(&store), 0);

    add_reply(&store, id, "追加の情報です。", ReplySender::Resident, today())
      .unwrap();
    let msg = &store.messages()[0];
    assert!(!msg.read);
    assert_eq!(unread_inquiry_count(&store), 1);
  }

  #[test]
  fn seventh_reply_is_rejected_and_the_thread_stays_at_six() {
    let store = JsonStore::in_memory();
    let id = open_thread(&store, "A001");

    // Three full round-trips.
    for turn in 0..MAX_THREAD_REPLIES {
      let sender = if turn % 2 == 0 {
        ReplySender::Resident
      } else {
        ReplySender::Admin
      };
      add_reply(&store, id, &format!("turn {turn}"), sender, today()).unwrap();
    }
    assert!(!store.messages()[0].can_reply());

    let result =
      add_reply(&store, id, "もう一度", ReplySender::Resident, today());
    assert_eq!(result, Err(Error::ThreadFull(id)));
    assert_eq!(store.messages()[0].replies.len(), MAX_THREAD_REPLIES);
  }

  #[test]
  fn replying_to_a_missing_thread_is_reported_without_state_change() {
    let store = JsonStore::in_memory();
    let result = add_reply(&store, 99, "内容", ReplySender::Admin, today());
    assert_eq!(result, Err(Error::MessageNotFound(99)));
    assert!(store.messages().is_empty());
  }

  #[test]
  fn blank_reply_is_rejected_at_the_boundary() {
    let store = JsonStore::in_memory();
    let id = open_thread(&store, "A001");
    let result = add_reply(&store, id, "   ", ReplySender::Admin, today());
    assert_eq!(result, Err(Error::EmptyField("content")));
    assert!(store.messages()[0].replies.is_empty());
  }

  #[test]
  fn bulk_acknowledgments_touch_only_matching_threads() {
    let store = JsonStore::in_memory();
    let a = open_thread(&store, "A001");
    let b = open_thread(&store, "B001");
    open_thread(&store, "A001");

    assert_eq!(unread_inquiry_count(&store), 3);
    assert_eq!(mark_all_messages_read(&store), 3);
    assert_eq!(unread_inquiry_count(&store), 0);
    // Second pass has nothing to do.
    assert_eq!(mark_all_messages_read(&store), 0);

    add_reply(&store, a, "回答A", ReplySender::Admin, today()).unwrap();
    add_reply(&store, b, "回答B", ReplySender::Admin, today()).unwrap();
    assert_eq!(unread_reply_count(&store, "A001"), 1);
    assert_eq!(unread_reply_count(&store, "B001"), 1);

    assert_eq!(mark_all_replies_read(&store, "A001"), 1);
    assert_eq!(unread_reply_count(&store, "A001"), 0);
    // B001's flag is untouched by A001's acknowledgment.
    assert_eq!(unread_reply_count(&store, "B001"), 1);
  }
}
