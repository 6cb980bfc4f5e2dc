//! Population-register generation.
//!
//! Records come out clean: identifiers unique and checksum-valid, postal
//! codes four digits, every person 18 to 80 years old at the reference
//! date, creation dates between one year after birth and the reference
//! date. Defects are added afterwards by the fault injector.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use rand::prelude::*;
use sensus_core::{
  Result,
  config::GeneratorConfig,
  id_number::{IdNumber, SEQUENCE_BAND},
  record::{Gender, PersonRecord, Province},
};

use crate::pools;

/// Registered ages, measured in whole years at the reference date.
const YOUNGEST_AGE: i32 = 18;
const OLDEST_AGE: i32 = 80;

/// Generate `config.population_rows` clean records.
pub fn generate(
  config: &GeneratorConfig,
  rng: &mut StdRng,
) -> Result<Vec<PersonRecord>> {
  let mut rows = Vec::with_capacity(config.population_rows);
  let mut seen: HashSet<IdNumber> =
    HashSet::with_capacity(config.population_rows);
  let progress_every = (config.population_rows / 20).max(1);
  let birth_years = (config.reference_date.year() - OLDEST_AGE)
    ..=(config.reference_date.year() - YOUNGEST_AGE);

  for i in 0..config.population_rows {
    let date_of_birth = pools::random_date(rng, birth_years.clone());
    let gender = pools::pick(rng, &[Gender::Male, Gender::Female]);

    let mut sa_id_number = random_id(rng, date_of_birth, gender)?;
    while seen.contains(&sa_id_number) {
      sa_id_number = random_id(rng, date_of_birth, gender)?;
    }
    seen.insert(sa_id_number.clone());

    rows.push(PersonRecord {
      sa_id_number,
      first_name: pools::pick(rng, pools::FIRST_NAMES).to_owned(),
      last_name: pools::pick(rng, pools::LAST_NAMES).to_owned(),
      date_of_birth,
      gender,
      citizenship_status: pools::CITIZENSHIP.to_owned(),
      province: pools::pick(rng, &Province::ALL),
      city: Some(pools::pick(rng, pools::CITIES).to_owned()),
      street_address: Some(random_street_address(rng)),
      postal_code: Some(format!("{:04}", rng.gen_range(1..10_000))),
      cell_number: Some(random_cell_number(rng)),
      record_created_date: random_created_date(
        rng,
        date_of_birth,
        config.reference_date,
      ),
    });

    if config.big_data && (i + 1) % progress_every == 0 {
      tracing::info!(
        rows = i + 1,
        total = config.population_rows,
        "population progress"
      );
    }
  }
  Ok(rows)
}

fn random_id(
  rng: &mut StdRng,
  birth: NaiveDate,
  gender: Gender,
) -> Result<IdNumber> {
  IdNumber::from_parts(
    birth,
    gender,
    rng.gen_range(0..SEQUENCE_BAND),
    rng.gen_range(0..=8),
  )
}

fn random_street_address(rng: &mut StdRng) -> String {
  format!(
    "{} {}",
    rng.gen_range(1..1000),
    pools::pick(rng, pools::STREET_NAMES)
  )
}

/// `+27` or `0` prefix followed by nine digits.
fn random_cell_number(rng: &mut StdRng) -> String {
  let prefix = if rng.gen_bool(0.5) { "+27" } else { "0" };
  format!("{prefix}{}", rng.gen_range(100_000_000u32..=999_999_999))
}

/// At least a year after birth and, while the window allows, no later than
/// the reference date.
fn random_created_date(
  rng: &mut StdRng,
  birth: NaiveDate,
  reference: NaiveDate,
) -> NaiveDate {
  let earliest = birth + Duration::days(365);
  let span = (reference - earliest).num_days().max(0);
  earliest + Duration::days(rng.gen_range(0..=span))
}
