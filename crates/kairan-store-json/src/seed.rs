//! The fixed seed dataset used when no (valid) blob exists yet.

use chrono::NaiveDate;

use kairan_core::post::{Category, Importance, Post, Translations};

use crate::StoreData;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).expect("seed date is valid")
}

struct SeedPost {
  id:         u64,
  title:      [&'static str; 4],
  content:    [&'static str; 4],
  date:       NaiveDate,
  likes:      u32,
  read_by:    &'static [&'static str],
  importance: Importance,
}

impl SeedPost {
  fn build(self) -> Post {
    let [title, title_en, title_zh, title_es] = self.title;
    let [content, content_en, content_zh, content_es] = self.content;
    Post {
      id: self.id,
      title: title.to_owned(),
      content: content.to_owned(),
      translations: Translations {
        title_en:   title_en.to_owned(),
        title_zh:   title_zh.to_owned(),
        title_es:   title_es.to_owned(),
        content_en: content_en.to_owned(),
        content_zh: content_zh.to_owned(),
        content_es: content_es.to_owned(),
      },
      date: self.date,
      target_blocks: Vec::new(),
      importance: self.importance,
      image: None,
      read_by: self.read_by.iter().map(|&id| id.to_owned()).collect(),
      likes: self.likes,
    }
  }
}

/// The initial dataset: four estate-wide announcements, no messages.
pub fn seed_data() -> StoreData {
  let announcements = vec![
    SeedPost {
      id: 1,
      title: [
        "定例総会のお知らせ",
        "Regular General Meeting Notice",
        "定期大会通知",
        "Aviso de Asamblea General Ordinaria",
      ],
      content: [
        "来週の日曜日に公民館で定例総会を行います。",
        "The regular general meeting will be held at the community center next Sunday.",
        "下周日将在社区中心举行定期大会。",
        "La asamblea general ordinaria se llevará a cabo en el centro comunitario el próximo domingo.",
      ],
      date: date(2025, 12, 1),
      likes: 12,
      read_by: &["A002"],
      importance: Importance::Normal,
    },
    SeedPost {
      id: 2,
      title: [
        "年末の大掃除について",
        "Year-end Cleaning",
        "关于年末大扫除",
        "Sobre la limpieza de fin de año",
      ],
      content: [
        "年末の地域清掃にご協力をお願いします。",
        "Please cooperate with the year-end community cleaning.",
        "请配合年末的社区清扫。",
        "Por favor coopere con la limpieza comunitaria de fin de año.",
      ],
      date: date(2025, 12, 15),
      likes: 8,
      read_by: &[],
      importance: Importance::High,
    },
    SeedPost {
      id: 3,
      title: [
        "町内清掃の報告",
        "Community Cleaning Report",
        "社区清扫报告",
        "Informe de Limpieza Comunitaria",
      ],
      content: [
        "先日の町内清掃へのご協力ありがとうございました。",
        "Thank you for your cooperation in the recent community cleaning.",
        "感谢您在社区清扫中的配合。",
        "Gracias por su cooperación en la reciente limpieza comunitaria.",
      ],
      date: date(2026, 1, 18),
      likes: 15,
      read_by: &[],
      importance: Importance::Normal,
    },
    SeedPost {
      id: 4,
      title: [
        "資源回収のお知らせ",
        "Resource Collection Notice",
        "资源回收通知",
        "Aviso de Recolección de Recursos",
      ],
      content: [
        "明日は資源回収の日です。",
        "Tomorrow is resource collection day.",
        "明天是资源回收日。",
        "Mañana es el día de la recolección de recursos.",
      ],
      date: date(2026, 1, 25),
      likes: 5,
      read_by: &[],
      importance: Importance::Urgent,
    },
  ];

  let mut data = StoreData::default();
  data.posts.insert(
    Category::Announcements,
    announcements.into_iter().map(SeedPost::build).collect(),
  );
  data
}
