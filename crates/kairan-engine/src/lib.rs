//! Derived-state computation over any [`kairan_core::store::BulletinStore`].
//!
//! Everything in this crate is computed on read from the store and the
//! roster — read trackers, retention-windowed feeds, read-rate aggregates,
//! the unread-list export, and the inquiry-thread operations. Nothing here
//! owns state of its own.
//!
//! All entry points take the reference date (`today`) as an argument; the
//! caller at the presentation boundary supplies the current date, which
//! keeps this crate clock-free and its window arithmetic exactly testable.

pub mod export;
pub mod feed;
pub mod receipts;
pub mod stats;
pub mod threads;
