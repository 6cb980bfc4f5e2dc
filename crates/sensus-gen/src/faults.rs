//! Rate-controlled fault injection.
//!
//! A pure function of (table, rates, random stream) → (table, report). The
//! generators hand over clean tables, so every defect in the output is
//! accounted for in the report.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use sensus_core::{
  config::GeneratorConfig,
  record::{ApplicationRecord, PersonRecord},
};

use crate::pools;

/// The three independent fault rates, lifted out of the run configuration.
/// Each must lie in `0.0..=1.0`, which `GeneratorConfig::validate` enforces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultRates {
  pub duplicate: f64,
  pub missing:   f64,
  pub invalid:   f64,
}

impl From<&GeneratorConfig> for FaultRates {
  fn from(config: &GeneratorConfig) -> Self {
    Self {
      duplicate: config.duplicate_rate,
      missing:   config.missing_value_rate,
      invalid:   config.invalid_value_rate,
    }
  }
}

/// What the injector did to the population table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationIssues {
  pub duplicates:              usize,
  pub missing_values:          usize,
  pub invalid_postal_codes:    usize,
  pub future_dates:            usize,
  pub inconsistent_formatting: usize,
}

/// What the injector did to the applications table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationIssues {
  pub duplicates:         usize,
  pub missing_statuses:   usize,
  pub branch_mismatches:  usize,
  pub invalid_processing: usize,
  pub reversed_dates:     usize,
}

/// Corrupt a population table in place and report what was done.
///
/// Duplicates use the replace convention: `floor(rows × duplicate_rate)`
/// distinct rows are overwritten with exact copies of other rows, so the row
/// count never changes. Missing and invalid values are independent per-cell
/// draws over the nullable and validatable columns.
pub fn inject_population(
  mut rows: Vec<PersonRecord>,
  rates: FaultRates,
  reference_date: NaiveDate,
  rng: &mut StdRng,
) -> (Vec<PersonRecord>, PopulationIssues) {
  let mut issues = PopulationIssues {
    duplicates: duplicate_rows(&mut rows, rates.duplicate, rng),
    ..PopulationIssues::default()
  };

  for row in &mut rows {
    for cell in [
      &mut row.city,
      &mut row.street_address,
      &mut row.postal_code,
      &mut row.cell_number,
    ] {
      if cell.is_some() && rng.gen_bool(rates.missing) {
        *cell = None;
        issues.missing_values += 1;
      }
    }

    if row.postal_code.is_some() && rng.gen_bool(rates.invalid) {
      row.postal_code = Some(malformed_postal_code(rng));
      issues.invalid_postal_codes += 1;
    }
    if rng.gen_bool(rates.invalid) {
      row.record_created_date =
        reference_date + Duration::days(rng.gen_range(1..=30));
      issues.future_dates += 1;
    }
    // Formatting drift is the most common defect in the source systems, so
    // it runs at twice the invalid rate.
    if rng.gen_bool((rates.invalid * 2.0).min(1.0)) {
      format_drift(row, rng, &mut issues.inconsistent_formatting);
    }
  }
  (rows, issues)
}

/// Corrupt an applications table in place and report what was done.
pub fn inject_applications(
  mut rows: Vec<ApplicationRecord>,
  rates: FaultRates,
  rng: &mut StdRng,
) -> (Vec<ApplicationRecord>, ApplicationIssues) {
  let mut issues = ApplicationIssues {
    duplicates: duplicate_rows(&mut rows, rates.duplicate, rng),
    ..ApplicationIssues::default()
  };

  for row in &mut rows {
    if row.application_status.is_some() && rng.gen_bool(rates.missing) {
      row.application_status = None;
      issues.missing_statuses += 1;
    }

    if rng.gen_bool(rates.invalid) {
      // The branch moves to another province; the stale branch code is left
      // behind on purpose.
      let other = pools::pick_other_province(rng, row.province);
      row.branch_name = pools::pick(rng, pools::branches_in(other)).to_owned();
      issues.branch_mismatches += 1;
    }
    if rng.gen_bool(rates.invalid) {
      row.processing_days = out_of_range_processing(rng);
      issues.invalid_processing += 1;
    }
    if rng.gen_bool(rates.invalid) {
      row.last_updated_date =
        row.application_date - Duration::days(rng.gen_range(1..=30));
      issues.reversed_dates += 1;
    }
  }
  (rows, issues)
}

/// Overwrite `floor(len × rate)` distinct rows with copies of other rows.
/// Returns the number of replacements.
fn duplicate_rows<T: Clone>(
  rows: &mut [T],
  rate: f64,
  rng: &mut StdRng,
) -> usize {
  let n = rows.len();
  let wanted = (n as f64 * rate) as usize;
  if wanted == 0 || n < 2 {
    return 0;
  }
  let targets = rand::seq::index::sample(rng, n, wanted.min(n));
  for target in targets.iter() {
    let mut source = rng.gen_range(0..n);
    while source == target {
      source = rng.gen_range(0..n);
    }
    rows[target] = rows[source].clone();
  }
  wanted.min(n)
}

fn malformed_postal_code(rng: &mut StdRng) -> String {
  match rng.gen_range(0..4) {
    0 => rng.gen_range(100..1000).to_string(),
    1 => rng.gen_range(10_000..100_000).to_string(),
    2 => "ABCD".to_owned(),
    _ => String::new(),
  }
}

fn out_of_range_processing(rng: &mut StdRng) -> i32 {
  if rng.gen_bool(0.5) {
    rng.gen_range(-10..=-1)
  } else {
    rng.gen_range(1000..=5000)
  }
}

/// Re-case the first name or flip the cell-number prefix between the
/// national and international forms.
fn format_drift(row: &mut PersonRecord, rng: &mut StdRng, count: &mut usize) {
  if rng.gen_bool(0.5) {
    row.first_name = if rng.gen_bool(0.5) {
      row.first_name.to_uppercase()
    } else {
      row.first_name.to_lowercase()
    };
    *count += 1;
  } else if let Some(cell) = &row.cell_number {
    let flipped = if let Some(rest) = cell.strip_prefix("+27") {
      Some(format!("0{rest}"))
    } else {
      cell.strip_prefix('0').map(|rest| format!("+27{rest}"))
    };
    if let Some(flipped) = flipped {
      row.cell_number = Some(flipped);
      *count += 1;
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use sensus_core::config::GeneratorConfig;

  use super::*;
  use crate::{applications, population};

  const REFERENCE: &str = "2026-08-25";

  fn reference_date() -> NaiveDate {
    REFERENCE.parse().unwrap()
  }

  fn clean_population(rows: usize, seed: u64) -> Vec<PersonRecord> {
    let config = GeneratorConfig {
      population_rows: rows,
      reference_date: reference_date(),
      ..GeneratorConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(seed);
    population::generate(&config, &mut rng).unwrap()
  }

  fn rates(duplicate: f64, missing: f64, invalid: f64) -> FaultRates {
    FaultRates { duplicate, missing, invalid }
  }

  // ── Duplicates ──

  #[test]
  fn duplicate_count_is_exact_under_replace_convention() {
    let rows = clean_population(2_000, 5);
    let mut rng = StdRng::seed_from_u64(6);
    let (rows, issues) = inject_population(
      rows,
      rates(0.02, 0.0, 0.0),
      reference_date(),
      &mut rng,
    );

    assert_eq!(issues.duplicates, 40);
    assert_eq!(rows.len(), 2_000);

    let distinct: std::collections::HashSet<&str> =
      rows.iter().map(|r| r.sa_id_number.as_str()).collect();
    assert!(distinct.len() >= 2_000 - 40);
    assert!(distinct.len() < 2_000, "no row was actually duplicated");
  }

  #[test]
  fn duplicated_rows_are_exact_copies() {
    let rows = clean_population(500, 8);
    let mut rng = StdRng::seed_from_u64(9);
    let (rows, issues) = inject_population(
      rows,
      rates(0.1, 0.0, 0.0),
      reference_date(),
      &mut rng,
    );
    assert_eq!(issues.duplicates, 50);

    for row in &rows {
      let twins: Vec<&PersonRecord> = rows
        .iter()
        .filter(|r| r.sa_id_number == row.sa_id_number)
        .collect();
      for twin in twins {
        assert_eq!(twin, row, "shared identifiers mean shared rows");
      }
    }
  }

  // ── Missing values ──

  #[test]
  fn missing_rate_blanks_the_expected_share_of_cells() {
    let rows = clean_population(2_000, 10);
    let mut rng = StdRng::seed_from_u64(11);
    let (rows, issues) = inject_population(
      rows,
      rates(0.0, 0.25, 0.0),
      reference_date(),
      &mut rng,
    );

    // 8 000 nullable cells at rate 0.25; the window is over seven standard
    // deviations wide on each side.
    assert!(
      (1_700..=2_300).contains(&issues.missing_values),
      "got: {issues:?}"
    );
    let blank = rows
      .iter()
      .map(|r| {
        [&r.city, &r.street_address, &r.postal_code, &r.cell_number]
          .iter()
          .filter(|c| c.is_none())
          .count()
      })
      .sum::<usize>();
    assert_eq!(blank, issues.missing_values);
  }

  // ── Invalid values ──

  #[test]
  fn invalid_rate_produces_out_of_domain_population_cells() {
    let rows = clean_population(1_000, 12);
    let mut rng = StdRng::seed_from_u64(13);
    let (rows, issues) = inject_population(
      rows,
      rates(0.0, 0.0, 0.2),
      reference_date(),
      &mut rng,
    );

    assert!(issues.invalid_postal_codes > 100, "got: {issues:?}");
    assert!(issues.future_dates > 100, "got: {issues:?}");
    assert!(issues.inconsistent_formatting > 250, "got: {issues:?}");

    let bad_postal = rows
      .iter()
      .filter_map(|r| r.postal_code.as_deref())
      .filter(|p| p.len() != 4 || !p.bytes().all(|b| b.is_ascii_digit()))
      .count();
    assert_eq!(bad_postal, issues.invalid_postal_codes);

    let future = rows
      .iter()
      .filter(|r| r.record_created_date > reference_date())
      .count();
    assert_eq!(future, issues.future_dates);
  }

  #[test]
  fn zero_rates_leave_the_table_untouched() {
    let rows = clean_population(300, 14);
    let before = rows.clone();
    let mut rng = StdRng::seed_from_u64(15);
    let (after, issues) = inject_population(
      rows,
      rates(0.0, 0.0, 0.0),
      reference_date(),
      &mut rng,
    );
    assert_eq!(after, before);
    assert_eq!(issues, PopulationIssues::default());
  }

  // ── Applications ──

  fn clean_tables(
    invalid: f64,
  ) -> (Vec<ApplicationRecord>, GeneratorConfig, StdRng) {
    let config = GeneratorConfig {
      population_rows: 300,
      application_rows: 1_000,
      invalid_value_rate: invalid,
      reference_date: reference_date(),
      ..GeneratorConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(16);
    let people = population::generate(&config, &mut rng).unwrap();
    let index = applications::PopulationIndex::from_records(&people);
    let apps = applications::generate(&config, &index, &mut rng).unwrap();
    (apps, config, rng)
  }

  #[test]
  fn application_faults_follow_their_rates() {
    let (apps, _, mut rng) = clean_tables(0.0);
    let (apps, issues) =
      inject_applications(apps, rates(0.0, 0.2, 0.2), &mut rng);

    assert!(issues.missing_statuses > 80, "got: {issues:?}");
    assert!(issues.branch_mismatches > 120, "got: {issues:?}");
    assert!(issues.invalid_processing > 120, "got: {issues:?}");
    assert!(issues.reversed_dates > 120, "got: {issues:?}");

    let bad_days = apps
      .iter()
      .filter(|a| a.processing_days < 0 || a.processing_days > 100)
      .count();
    assert_eq!(bad_days, issues.invalid_processing);

    let reversed = apps
      .iter()
      .filter(|a| a.last_updated_date < a.application_date)
      .count();
    assert_eq!(reversed, issues.reversed_dates);
  }

  #[test]
  fn zero_invalid_rate_yields_a_fully_valid_applications_table() {
    let (apps, _, mut rng) = clean_tables(0.0);
    let (apps, issues) =
      inject_applications(apps, rates(0.0, 0.0, 0.0), &mut rng);

    assert_eq!(issues, ApplicationIssues::default());
    for app in &apps {
      assert!(app.processing_days >= 0);
      assert!(app.last_updated_date >= app.application_date);
    }
  }
}
