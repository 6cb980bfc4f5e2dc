//! Error types for `sensus-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("rate {name} out of range: {value} (must lie within 0.0..=1.0)")]
  RateOutOfRange { name: &'static str, value: f64 },

  #[error("{name} must be greater than zero")]
  ZeroRowCount { name: &'static str },

  #[error("identifier sequence out of band: {0}")]
  SequenceOutOfBand(u16),

  #[error("identifier filler digit out of range: {0}")]
  FillerOutOfRange(u8),

  #[error("malformed identifier payload: {0:?}")]
  MalformedPayload(String),

  #[error("invalid identifier: {0:?}")]
  InvalidIdNumber(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
