//! Applications-table generation and cross-table linkage.
//!
//! Most applications reference a registered identity; at the configured
//! invalid rate the reference is a fresh, syntactically valid identifier
//! that exists nowhere in the population table (an orphan record). Nothing
//! enforces referential integrity across the two tables.

use std::collections::HashSet;

use chrono::Duration;
use rand::prelude::*;
use sensus_core::{
  Result,
  config::GeneratorConfig,
  id_number::{IdNumber, SEQUENCE_BAND},
  record::{
    ApplicationRecord, ApplicationStatus, ApplicationType, Gender,
    PersonRecord, Province, SubmissionChannel,
  },
};

use crate::pools::{self, BranchDirectory};

/// Identifier → province lookup built from the written population table.
///
/// The linker needs nothing else from that table, so the full table can be
/// dropped once this index exists.
#[derive(Debug, Clone)]
pub struct PopulationIndex {
  entries: Vec<(IdNumber, Province)>,
  known:   HashSet<IdNumber>,
}

impl PopulationIndex {
  pub fn from_records(rows: &[PersonRecord]) -> Self {
    let entries: Vec<(IdNumber, Province)> = rows
      .iter()
      .map(|r| (r.sa_id_number.clone(), r.province))
      .collect();
    let known = entries.iter().map(|(id, _)| id.clone()).collect();
    Self { entries, known }
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Whether `id` is registered in the population table.
  pub fn contains(&self, id: &IdNumber) -> bool {
    self.known.contains(id)
  }

  fn pick(&self, rng: &mut StdRng) -> &(IdNumber, Province) {
    &self.entries[rng.gen_range(0..self.entries.len())]
  }
}

/// Generate `config.application_rows` clean records linked against `index`.
pub fn generate(
  config: &GeneratorConfig,
  index: &PopulationIndex,
  rng: &mut StdRng,
) -> Result<Vec<ApplicationRecord>> {
  let directory = BranchDirectory::new(rng);
  let mut rows = Vec::with_capacity(config.application_rows);
  let progress_every = (config.application_rows / 20).max(1);

  for i in 0..config.application_rows {
    let (sa_id_number, province) =
      if index.is_empty() || rng.gen_bool(config.invalid_value_rate) {
        orphan_reference(rng, index)?
      } else {
        let (id, province) = index.pick(rng);
        (id.clone(), *province)
      };

    let application_date =
      config.reference_date - Duration::days(rng.gen_range(0..=1095));
    let branch_name = pick_branch(rng, province).to_owned();
    let branch_code = directory.code_of(&branch_name).to_owned();
    let processing_days = rng.gen_range(5..=30);
    let last_updated_date = application_date
      + Duration::days(rng.gen_range(0..=i64::from(processing_days)));

    rows.push(ApplicationRecord {
      application_id: format!("APP{}", 100_000 + i),
      sa_id_number,
      application_type: pools::pick(rng, &ApplicationType::ALL),
      application_date,
      application_status: random_status(rng),
      province,
      branch_name,
      branch_code,
      submission_channel: pools::pick(rng, &SubmissionChannel::ALL),
      processing_days,
      last_updated_date,
    });

    if config.big_data && (i + 1) % progress_every == 0 {
      tracing::info!(
        rows = i + 1,
        total = config.application_rows,
        "applications progress"
      );
    }
  }
  Ok(rows)
}

/// A reference that is valid in shape but absent from the register.
fn orphan_reference(
  rng: &mut StdRng,
  index: &PopulationIndex,
) -> Result<(IdNumber, Province)> {
  let mut id = random_unregistered(rng)?;
  while index.contains(&id) {
    id = random_unregistered(rng)?;
  }
  Ok((id, pools::pick(rng, &Province::ALL)))
}

fn random_unregistered(rng: &mut StdRng) -> Result<IdNumber> {
  let birth = pools::random_date(rng, 1980..=2000);
  let gender = pools::pick(rng, &[Gender::Male, Gender::Female]);
  IdNumber::from_parts(
    birth,
    gender,
    rng.gen_range(0..SEQUENCE_BAND),
    rng.gen_range(0..=8),
  )
}

/// One slot in ten goes to a branch outside the applicant's province.
fn pick_branch(rng: &mut StdRng, province: Province) -> &'static str {
  if rng.gen_bool(0.9) {
    pools::pick(rng, pools::branches_in(province))
  } else {
    let other = pools::pick_other_province(rng, province);
    pools::pick(rng, pools::branches_in(other))
  }
}

/// One slot in six is the explicit missing state.
fn random_status(rng: &mut StdRng) -> Option<ApplicationStatus> {
  let i = rng.gen_range(0..=ApplicationStatus::ALL.len());
  ApplicationStatus::ALL.get(i).copied()
}
