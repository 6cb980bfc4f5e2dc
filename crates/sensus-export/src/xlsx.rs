//! XLSX workbook writer.
//!
//! Tables longer than Excel's per-sheet row limit are split across numbered
//! sheets; shorter tables get a single named sheet.

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use sensus_core::record::{ApplicationRecord, PersonRecord};

use crate::Result;

/// Excel's hard per-sheet row limit, header row included.
pub const EXCEL_MAX_ROWS: usize = 1_048_576;

// Must match the field order in `sensus_core::record`.
const POPULATION_HEADER: [&str; 12] = [
  "sa_id_number",
  "first_name",
  "last_name",
  "date_of_birth",
  "gender",
  "citizenship_status",
  "province",
  "city",
  "street_address",
  "postal_code",
  "cell_number",
  "record_created_date",
];

const APPLICATIONS_HEADER: [&str; 11] = [
  "application_id",
  "sa_id_number",
  "application_type",
  "application_date",
  "application_status",
  "province",
  "branch_name",
  "branch_code",
  "submission_channel",
  "processing_days",
  "last_updated_date",
];

pub fn write_population<P: AsRef<Path>>(
  path: P,
  rows: &[PersonRecord],
) -> Result<()> {
  write_sheets(
    path.as_ref(),
    rows,
    EXCEL_MAX_ROWS - 1,
    "Population Registry",
    &POPULATION_HEADER,
    write_person_row,
  )?;
  Ok(())
}

pub fn write_applications<P: AsRef<Path>>(
  path: P,
  rows: &[ApplicationRecord],
) -> Result<()> {
  write_sheets(
    path.as_ref(),
    rows,
    EXCEL_MAX_ROWS - 1,
    "Applications",
    &APPLICATIONS_HEADER,
    write_application_row,
  )?;
  Ok(())
}

/// Write `rows` in chunks of `capacity` data rows per sheet. Returns the
/// number of sheets written.
fn write_sheets<T>(
  path: &Path,
  rows: &[T],
  capacity: usize,
  base_name: &str,
  header: &[&str],
  write_row: fn(&mut Worksheet, u32, &T) -> Result<()>,
) -> Result<usize> {
  let mut workbook = Workbook::new();
  let mut chunks: Vec<&[T]> = rows.chunks(capacity).collect();
  if chunks.is_empty() {
    chunks.push(&[]);
  }
  let split = chunks.len() > 1;

  for (i, chunk) in chunks.iter().enumerate() {
    let sheet = workbook.add_worksheet();
    if split {
      sheet.set_name(format!("Sheet{}", i + 1))?;
    } else {
      sheet.set_name(base_name)?;
    }
    for (col, title) in header.iter().enumerate() {
      sheet.write_string(0, col as u16, *title)?;
    }
    for (offset, row) in chunk.iter().enumerate() {
      write_row(sheet, offset as u32 + 1, row)?;
    }
  }

  workbook.save(path)?;
  Ok(chunks.len())
}

fn write_person_row(
  sheet: &mut Worksheet,
  row: u32,
  person: &PersonRecord,
) -> Result<()> {
  sheet.write_string(row, 0, person.sa_id_number.as_str())?;
  sheet.write_string(row, 1, person.first_name.as_str())?;
  sheet.write_string(row, 2, person.last_name.as_str())?;
  sheet.write_string(row, 3, person.date_of_birth.to_string())?;
  sheet.write_string(row, 4, person.gender.as_str())?;
  sheet.write_string(row, 5, person.citizenship_status.as_str())?;
  sheet.write_string(row, 6, person.province.as_str())?;
  write_optional(sheet, row, 7, person.city.as_deref())?;
  write_optional(sheet, row, 8, person.street_address.as_deref())?;
  write_optional(sheet, row, 9, person.postal_code.as_deref())?;
  write_optional(sheet, row, 10, person.cell_number.as_deref())?;
  sheet.write_string(row, 11, person.record_created_date.to_string())?;
  Ok(())
}

fn write_application_row(
  sheet: &mut Worksheet,
  row: u32,
  app: &ApplicationRecord,
) -> Result<()> {
  sheet.write_string(row, 0, app.application_id.as_str())?;
  sheet.write_string(row, 1, app.sa_id_number.as_str())?;
  sheet.write_string(row, 2, app.application_type.as_str())?;
  sheet.write_string(row, 3, app.application_date.to_string())?;
  write_optional(
    sheet,
    row,
    4,
    app.application_status.map(|s| s.as_str()),
  )?;
  sheet.write_string(row, 5, app.province.as_str())?;
  sheet.write_string(row, 6, app.branch_name.as_str())?;
  // Branch codes keep their leading zeros, so they stay text.
  sheet.write_string(row, 7, app.branch_code.as_str())?;
  sheet.write_string(row, 8, app.submission_channel.as_str())?;
  sheet.write_number(row, 9, f64::from(app.processing_days))?;
  sheet.write_string(row, 10, app.last_updated_date.to_string())?;
  Ok(())
}

fn write_optional(
  sheet: &mut Worksheet,
  row: u32,
  col: u16,
  value: Option<&str>,
) -> Result<()> {
  if let Some(value) = value {
    sheet.write_string(row, col, value)?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use rand::prelude::*;
  use sensus_core::config::GeneratorConfig;

  use super::*;

  fn sample_population(rows: usize) -> Vec<PersonRecord> {
    let config = GeneratorConfig {
      population_rows: rows,
      reference_date: NaiveDate::from_ymd_opt(2026, 8, 25).unwrap(),
      ..GeneratorConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(21);
    sensus_gen::population::generate(&config, &mut rng).unwrap()
  }

  #[test]
  fn small_tables_fit_one_named_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("population.xlsx");
    let rows = sample_population(40);
    let sheets = write_sheets(
      &path,
      &rows,
      EXCEL_MAX_ROWS - 1,
      "Population Registry",
      &POPULATION_HEADER,
      write_person_row,
    )
    .unwrap();
    assert_eq!(sheets, 1);
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
  }

  #[test]
  fn long_tables_split_across_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("split.xlsx");
    let rows = sample_population(25);
    // A capacity of ten data rows forces the same split logic the Excel
    // limit would trigger at a million.
    let sheets = write_sheets(
      &path,
      &rows,
      10,
      "Population Registry",
      &POPULATION_HEADER,
      write_person_row,
    )
    .unwrap();
    assert_eq!(sheets, 3);
  }

  #[test]
  fn empty_tables_still_produce_a_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");
    write_applications(&path, &[]).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
  }
}
