//! Blocks and the resident roster.
//!
//! The roster is fixed reference data supplied by an external collaborator
//! (seeded here, or loaded from a file by the server). The engine never
//! creates or destroys residents.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ─── Block ───────────────────────────────────────────────────────────────────

/// A named partition of the resident population, used for targeted
/// distribution of posts.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
pub enum Block {
  A,
  B,
  C,
  D,
  E,
}

impl Block {
  /// Every block, in display order.
  pub const ALL: [Block; 5] =
    [Block::A, Block::B, Block::C, Block::D, Block::E];

  pub fn as_str(&self) -> &'static str {
    match self {
      Block::A => "A",
      Block::B => "B",
      Block::C => "C",
      Block::D => "D",
      Block::E => "E",
    }
  }
}

impl fmt::Display for Block {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Block {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "A" => Ok(Block::A),
      "B" => Ok(Block::B),
      "C" => Ok(Block::C),
      "D" => Ok(Block::D),
      "E" => Ok(Block::E),
      other => Err(Error::UnknownBlock(other.to_owned())),
    }
  }
}

// ─── Resident ────────────────────────────────────────────────────────────────

/// One resident of the estate. Ids follow the `<Block><3 digits>` format,
/// e.g. `A001`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
  pub id:    String,
  pub name:  String,
  pub block: Block,
}

// ─── Roster ──────────────────────────────────────────────────────────────────

/// The read-only resident reference set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
  residents: Vec<Resident>,
}

/// Residents per block in the standard seed roster.
const RESIDENTS_PER_BLOCK: usize = 50;

/// Named residents carried over from the estate's historical records; the
/// rest of the seed roster gets generated display names.
const LEGACY_NAMES: [(&str, &str); 5] = [
  ("A001", "田中 太郎"),
  ("A002", "鈴木 花子"),
  ("A003", "佐藤 次郎"),
  ("A004", "高橋 優子"),
  ("A005", "伊藤 健太"),
];

impl Roster {
  pub fn new(residents: Vec<Resident>) -> Self { Self { residents } }

  /// The standard 250-resident roster: 50 residents per block, ids
  /// `A001`–`E050`.
  pub fn standard() -> Self {
    let mut residents = Vec::with_capacity(Block::ALL.len() * RESIDENTS_PER_BLOCK);
    for block in Block::ALL {
      for n in 1..=RESIDENTS_PER_BLOCK {
        let id = format!("{block}{n:03}");
        let name = LEGACY_NAMES
          .iter()
          .find(|(legacy_id, _)| *legacy_id == id)
          .map(|(_, name)| (*name).to_owned())
          .unwrap_or_else(|| format!("Resident {id}"));
        residents.push(Resident { id, name, block });
      }
    }
    Self { residents }
  }

  pub fn len(&self) -> usize { self.residents.len() }

  pub fn is_empty(&self) -> bool { self.residents.is_empty() }

  pub fn iter(&self) -> std::slice::Iter<'_, Resident> {
    self.residents.iter()
  }

  pub fn by_id(&self, id: &str) -> Option<&Resident> {
    self.residents.iter().find(|r| r.id == id)
  }

  pub fn in_block(&self, block: Block) -> impl Iterator<Item = &Resident> {
    self.residents.iter().filter(move |r| r.block == block)
  }
}
