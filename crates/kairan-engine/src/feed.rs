//! Retention-windowed feeds across every category.

use chrono::NaiveDate;
use serde::Serialize;

use kairan_core::{
  post::{Category, Post},
  retention::{is_within_last_week, is_within_retention_period},
  store::BulletinStore,
};

/// A post annotated with the category it was published under.
#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
  pub category: Category,
  #[serde(flatten)]
  pub post:     Post,
}

/// Every post within the retention window, across all categories, newest
/// first. The sort is stable, so same-day posts keep their insertion order
/// within the fixed category traversal.
pub fn all_posts<S: BulletinStore>(store: &S, today: NaiveDate) -> Vec<FeedItem> {
  let mut items: Vec<FeedItem> = Category::ALL
    .into_iter()
    .flat_map(|category| {
      store
        .posts(category)
        .into_iter()
        .filter(move |p| is_within_retention_period(p.date, today))
        .map(move |post| FeedItem { category, post })
    })
    .collect();
  items.sort_by(|a, b| b.post.date.cmp(&a.post.date));
  items
}

/// [`all_posts`] narrowed to the last seven days — the dashboard's
/// "recent updates" strip.
pub fn recent_updates<S: BulletinStore>(
  store: &S,
  today: NaiveDate,
) -> Vec<FeedItem> {
  let mut items = all_posts(store, today);
  items.retain(|item| is_within_last_week(item.post.date, today));
  items
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Days;
  use kairan_core::post::{Importance, NewPost};
  use kairan_store_json::JsonStore;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() }

  fn draft(title: &str, date: NaiveDate) -> NewPost {
    NewPost {
      title:         title.to_owned(),
      content:       "本文".to_owned(),
      date,
      target_blocks: Vec::new(),
      importance:    Importance::Normal,
      image:         None,
    }
  }

  #[test]
  fn all_posts_spans_categories_and_sorts_newest_first() {
    let store = JsonStore::in_memory();
    store.add_post(Category::Announcements, draft("古い", today() - Days::new(30)));
    store.add_post(Category::Garbage, draft("回収", today() - Days::new(2)));
    store.add_post(Category::Announcements, draft("新しい", today()));

    let items = all_posts(&store, today());
    let titles: Vec<_> = items.iter().map(|i| i.post.title.as_str()).collect();
    assert_eq!(titles, vec!["新しい", "回収", "古い"]);
    assert_eq!(items[1].category, Category::Garbage);
  }

  #[test]
  fn all_posts_drops_aged_out_entries() {
    let store = JsonStore::in_memory();
    store.add_post(Category::Announcements, draft("残る", today() - Days::new(10)));
    store.add_post(Category::Announcements, draft("消える", today() - Days::new(120)));

    let items = all_posts(&store, today());
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].post.title, "残る");
  }

  #[test]
  fn same_day_posts_keep_insertion_order() {
    let store = JsonStore::in_memory();
    let date = today();
    store.add_post(Category::Announcements, draft("先", date));
    store.add_post(Category::Announcements, draft("後", date));

    // Storage is newest-prepended, so the later post comes first and the
    // stable sort must not reorder the tie.
    let items = all_posts(&store, today());
    let titles: Vec<_> = items.iter().map(|i| i.post.title.as_str()).collect();
    assert_eq!(titles, vec!["後", "先"]);
  }

  #[test]
  fn recent_updates_keeps_only_the_last_week() {
    let store = JsonStore::in_memory();
    store.add_post(Category::Announcements, draft("今日", today()));
    store.add_post(Category::Announcements, draft("六日前", today() - Days::new(6)));
    store.add_post(Category::Announcements, draft("八日前", today() - Days::new(8)));

    let items = recent_updates(&store, today());
    let titles: Vec<_> = items.iter().map(|i| i.post.title.as_str()).collect();
    assert_eq!(titles, vec!["今日", "六日前"]);
  }
}
