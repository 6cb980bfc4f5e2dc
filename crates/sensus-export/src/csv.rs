//! CSV table writer.
//!
//! The header row comes from the record's field names, so the column order
//! is exactly the struct field order in `sensus_core::record`. `None` cells
//! are written empty.

use std::path::Path;

use serde::Serialize;

use crate::Result;

/// Serialize `rows` to `path`, header first.
pub fn write_table<P, T>(path: P, rows: &[T]) -> Result<()>
where
  P: AsRef<Path>,
  T: Serialize,
{
  let mut writer = ::csv::Writer::from_path(path)?;
  for row in rows {
    writer.serialize(row)?;
  }
  writer.flush()?;
  Ok(())
}
