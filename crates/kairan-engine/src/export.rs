//! CSV export of a post's unread residents.
//!
//! The output is meant for direct download into spreadsheet tools, which
//! need a UTF-8 byte-order mark to detect the encoding. The export always
//! covers the full (all-blocks) unread set, independent of whatever filter
//! or page the viewer currently has applied.

use std::fmt::Write as _;

use crate::stats::PostReadStats;

const BOM: char = '\u{feff}';
const HEADER: &str = "title,date,name,block,user_id";

/// Render the unread list as a BOM-prefixed CSV table: one header row and
/// one row per unread resident, in the listing's id order.
pub fn unread_list_csv(stats: &PostReadStats) -> String {
  let mut out = String::new();
  out.push(BOM);
  out.push_str(HEADER);
  out.push('\n');
  for resident in &stats.unread {
    let _ = writeln!(
      out,
      "{},{},{},{},{}",
      field(&stats.post.title),
      stats.post.date,
      field(&resident.name),
      resident.block,
      field(&resident.id),
    );
  }
  out
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn field(raw: &str) -> String {
  if raw.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", raw.replace('"', "\"\""))
  } else {
    raw.to_owned()
  }
}
