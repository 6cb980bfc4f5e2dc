//! South African identity numbers.
//!
//! Thirteen digits, `YYMMDD SSSS C A Z`: a 6-digit birth-date encoding, a
//! 4-digit sequence whose numeric band encodes gender (0000–4999 female,
//! 5000–9999 male), the citizenship digit `C` (always 0 here), a filler
//! digit `A` (0–8) and a mod-10 check digit `Z` over the first twelve.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, record::Gender};

/// Digits in a full identity number.
pub const ID_LEN: usize = 13;
/// Digits covered by the checksum.
pub const PAYLOAD_LEN: usize = 12;
/// Width of each per-gender sequence band.
pub const SEQUENCE_BAND: u16 = 5000;

/// A 13-digit identity number.
///
/// Every value is checksum-valid: [`IdNumber::from_parts`] computes the
/// check digit itself, and [`IdNumber::parse`], which deserialisation
/// routes through, verifies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IdNumber(String);

impl IdNumber {
  /// Build an identity number from its parts.
  ///
  /// `sequence` indexes within the gender band (`0..SEQUENCE_BAND`): the
  /// female band occupies 0000–4999 and the male band 5000–9999. `filler`
  /// is the penultimate digit (0–8).
  pub fn from_parts(
    birth: NaiveDate,
    gender: Gender,
    sequence: u16,
    filler: u8,
  ) -> Result<Self> {
    if sequence >= SEQUENCE_BAND {
      return Err(Error::SequenceOutOfBand(sequence));
    }
    if filler > 8 {
      return Err(Error::FillerOutOfRange(filler));
    }
    let banded = match gender {
      Gender::Female => sequence,
      Gender::Male => SEQUENCE_BAND + sequence,
    };
    let mut id = format!(
      "{:02}{:02}{:02}{:04}0{}",
      birth.year() % 100,
      birth.month(),
      birth.day(),
      banded,
      filler
    );
    let digits: Vec<u8> = id.bytes().map(|b| b - b'0').collect();
    id.push(char::from(b'0' + checksum_of(&digits)));
    Ok(Self(id))
  }

  /// Take ownership of an already formatted identity number, rejecting
  /// anything that is not thirteen digits ending in a valid check digit.
  pub fn parse(raw: impl Into<String>) -> Result<Self> {
    let raw = raw.into();
    if !is_valid(&raw) {
      return Err(Error::InvalidIdNumber(raw));
    }
    Ok(Self(raw))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The raw 4-digit sequence component, band included.
  pub fn sequence(&self) -> u16 {
    self.0.as_bytes()[6..10]
      .iter()
      .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
  }

  /// Gender category encoded by the sequence band.
  pub fn gender(&self) -> Gender {
    if self.sequence() < SEQUENCE_BAND {
      Gender::Female
    } else {
      Gender::Male
    }
  }

  /// The final (checksum) digit.
  pub fn check_digit(&self) -> u8 {
    self.0.as_bytes()[ID_LEN - 1] - b'0'
  }
}

impl std::fmt::Display for IdNumber {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

// Derived `Deserialize` would admit arbitrary strings; route through
// `parse` so the checksum invariant survives a round trip.
impl<'de> Deserialize<'de> for IdNumber {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    Self::parse(raw).map_err(serde::de::Error::custom)
  }
}

/// Compute the mod-10 check digit over a 12-digit payload.
pub fn check_digit(payload: &str) -> Result<u8> {
  let bytes = payload.as_bytes();
  if bytes.len() != PAYLOAD_LEN || !bytes.iter().all(|b| b.is_ascii_digit()) {
    return Err(Error::MalformedPayload(payload.to_owned()));
  }
  let digits: Vec<u8> = bytes.iter().map(|b| b - b'0').collect();
  Ok(checksum_of(&digits))
}

/// Whether `candidate` is thirteen digits ending in a valid check digit.
pub fn is_valid(candidate: &str) -> bool {
  let bytes = candidate.as_bytes();
  bytes.len() == ID_LEN
    && bytes.iter().all(|b| b.is_ascii_digit())
    && check_digit(&candidate[..PAYLOAD_LEN])
      .map(|d| d == bytes[ID_LEN - 1] - b'0')
      .unwrap_or(false)
}

/// Walking right to left, every second digit (the 12th, 10th, …) is doubled
/// and a doubled value above nine keeps its digit sum. The check digit
/// brings the grand total to a multiple of ten.
fn checksum_of(digits: &[u8]) -> u8 {
  let mut total = 0u32;
  for (i, &d) in digits.iter().rev().enumerate() {
    let mut value = u32::from(d);
    if i % 2 == 0 {
      value *= 2;
      if value > 9 {
        value -= 9;
      }
    }
    total += value;
  }
  ((10 - total % 10) % 10) as u8
}
