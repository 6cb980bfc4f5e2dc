//! End-to-end tests for the generation pipeline: generate, inject, link,
//! all from one seeded stream.

use std::collections::{HashMap, HashSet};

use rand::prelude::*;
use sensus_core::{
  config::GeneratorConfig,
  id_number,
  record::{ApplicationRecord, PersonRecord},
};

use crate::{
  applications::{self, PopulationIndex},
  faults::{self, ApplicationIssues, FaultRates, PopulationIssues},
  population,
};

fn config() -> GeneratorConfig {
  GeneratorConfig {
    population_rows: 400,
    application_rows: 700,
    reference_date: "2026-08-25".parse().unwrap(),
    ..GeneratorConfig::default()
  }
}

struct Run {
  people:     Vec<PersonRecord>,
  pop_issues: PopulationIssues,
  apps:       Vec<ApplicationRecord>,
  app_issues: ApplicationIssues,
}

/// The pipeline in the order the binary runs it.
fn run(config: &GeneratorConfig) -> Run {
  let mut rng = StdRng::seed_from_u64(config.seed);
  let rates = FaultRates::from(config);
  let people = population::generate(config, &mut rng).unwrap();
  let (people, pop_issues) =
    faults::inject_population(people, rates, config.reference_date, &mut rng);
  let index = PopulationIndex::from_records(&people);
  let apps = applications::generate(config, &index, &mut rng).unwrap();
  let (apps, app_issues) = faults::inject_applications(apps, rates, &mut rng);
  Run { people, pop_issues, apps, app_issues }
}

/// Independent checksum recomputation: digits at odd positions (1-indexed)
/// are summed directly; digits at even positions are read as one number,
/// doubled, and that product's digits are summed.
fn recompute_check_digit(payload: &str) -> u8 {
  let digits: Vec<u64> = payload.bytes().map(|b| u64::from(b - b'0')).collect();
  let odd_sum: u64 = digits.iter().step_by(2).sum();
  let even_number =
    digits.iter().skip(1).step_by(2).fold(0u64, |n, &d| n * 10 + d);
  let mut doubled = even_number * 2;
  let mut even_sum = 0u64;
  while doubled > 0 {
    even_sum += doubled % 10;
    doubled /= 10;
  }
  ((10 - (odd_sum + even_sum) % 10) % 10) as u8
}

// ─── Reproducibility ─────────────────────────────────────────────────────────

#[test]
fn identical_configuration_reproduces_identical_tables() {
  let config = config();
  let first = run(&config);
  let second = run(&config);
  assert_eq!(first.people, second.people);
  assert_eq!(first.apps, second.apps);
  assert_eq!(first.pop_issues, second.pop_issues);
  assert_eq!(first.app_issues, second.app_issues);
}

#[test]
fn different_seeds_diverge() {
  let base = config();
  let other = GeneratorConfig { seed: 43, ..base.clone() };
  assert_ne!(run(&base).people, run(&other).people);
}

// ─── Checksums ───────────────────────────────────────────────────────────────

#[test]
fn row_seventeen_of_the_reference_run_passes_recomputation() {
  let config = GeneratorConfig {
    population_rows: 100,
    seed: 42,
    ..config()
  };
  let mut rng = StdRng::seed_from_u64(config.seed);
  let people = population::generate(&config, &mut rng).unwrap();
  let id = people[17].sa_id_number.as_str();
  assert_eq!(id.as_bytes()[12] - b'0', recompute_check_digit(&id[..12]));
}

#[test]
fn every_identifier_in_a_run_passes_recomputation() {
  let out = run(&config());
  for row in &out.people {
    let id = row.sa_id_number.as_str();
    assert!(id_number::is_valid(id), "got: {id}");
    assert_eq!(id.as_bytes()[12] - b'0', recompute_check_digit(&id[..12]));
  }
  for app in &out.apps {
    assert!(id_number::is_valid(app.sa_id_number.as_str()));
  }
}

// ─── Cross-table integrity ───────────────────────────────────────────────────

#[test]
fn linked_applications_agree_with_the_register() {
  let out = run(&config());
  let by_id: HashMap<&str, &PersonRecord> = out
    .people
    .iter()
    .map(|p| (p.sa_id_number.as_str(), p))
    .collect();
  let mut linked = 0usize;
  for app in &out.apps {
    if let Some(person) = by_id.get(app.sa_id_number.as_str()) {
      assert_eq!(person.province, app.province);
      linked += 1;
    }
  }
  assert!(linked > out.apps.len() / 2, "got {linked} linked rows");
}

#[test]
fn a_zero_invalid_rate_leaves_no_defect_in_validatable_columns() {
  let config = GeneratorConfig {
    duplicate_rate: 0.0,
    missing_value_rate: 0.0,
    invalid_value_rate: 0.0,
    ..config()
  };
  let out = run(&config);

  assert_eq!(out.pop_issues, PopulationIssues::default());
  assert_eq!(out.app_issues, ApplicationIssues::default());

  let ids: HashSet<&str> =
    out.people.iter().map(|p| p.sa_id_number.as_str()).collect();
  assert_eq!(ids.len(), out.people.len(), "identifiers must stay unique");

  for row in &out.people {
    let postal = row.postal_code.as_deref().unwrap();
    assert!(postal.len() == 4 && postal.bytes().all(|b| b.is_ascii_digit()));
    assert!(row.record_created_date <= config.reference_date);
  }
  for app in &out.apps {
    assert!((5..=30).contains(&app.processing_days));
    assert!(app.last_updated_date >= app.application_date);
    assert!(ids.contains(app.sa_id_number.as_str()), "orphan under rate 0");
  }
}

#[test]
fn a_backdated_reference_stays_ahead_of_every_clean_date() {
  let config = GeneratorConfig {
    duplicate_rate: 0.0,
    missing_value_rate: 0.0,
    invalid_value_rate: 0.0,
    reference_date: "2000-01-01".parse().unwrap(),
    ..config()
  };
  config.validate().unwrap();
  let out = run(&config);

  assert_eq!(out.pop_issues, PopulationIssues::default());
  for row in &out.people {
    assert!(row.date_of_birth < row.record_created_date);
    assert!(row.record_created_date <= config.reference_date);
  }
  for app in &out.apps {
    assert!(app.application_date <= config.reference_date);
  }
}

// ─── Duplicate accounting ────────────────────────────────────────────────────

#[test]
fn duplicate_rate_carries_through_the_whole_pipeline() {
  let config = GeneratorConfig {
    duplicate_rate: 0.05,
    ..config()
  };
  let out = run(&config);
  assert_eq!(out.pop_issues.duplicates, 20);
  assert_eq!(out.app_issues.duplicates, 35);
  assert_eq!(out.people.len(), 400);
  assert_eq!(out.apps.len(), 700);
}
