//! Error types for `kairan-core`.

use thiserror::Error;

use crate::{
  message::MessageId,
  pin::PIN_LENGTH,
  post::{Category, PostId},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("post not found: {0}/{1}")]
  PostNotFound(Category, PostId),

  #[error("message not found: {0}")]
  MessageNotFound(MessageId),

  #[error("message {0} has reached its reply limit")]
  ThreadFull(MessageId),

  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("access code must be exactly {PIN_LENGTH} digits")]
  PinFormat,

  #[error("access code is too easy to guess")]
  PinGuessable,

  #[error("unknown block: {0:?}")]
  UnknownBlock(String),

  #[error("unknown category: {0:?}")]
  UnknownCategory(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
