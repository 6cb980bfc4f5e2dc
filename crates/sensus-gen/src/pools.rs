//! Sampling pools: names, places, branches.
//!
//! Everything here is static except [`BranchDirectory`], which assigns each
//! branch a 4-digit code once per run from the run's random stream.

use std::{collections::HashMap, ops::RangeInclusive};

use chrono::NaiveDate;
use rand::prelude::*;
use sensus_core::record::Province;

pub const CITIZENSHIP: &str = "South African";

pub const FIRST_NAMES: &[&str] = &[
  "Johan", "Pieter", "Thabo", "Sipho", "Bongani", "Lerato", "Nomvula",
  "Zanele", "Annelie", "Marike", "Kagiso", "Tumelo", "Mandla", "Ayanda",
  "Precious", "Busisiwe", "Karabo", "Refilwe", "Hendrik", "Willem",
  "Susanna", "Elna", "Riaan", "Danie", "Xolani", "Lwazi", "Nandi", "Palesa",
  "Tebogo", "Mpho", "Dineo", "Katlego", "Sibusiso", "Nkosinathi",
  "Thandiwe", "Zodwa", "Charmaine", "Desmond", "Trevor", "Nadine",
  "Chantelle", "Jacques", "Francois", "Elmarie", "Anika", "Gert", "Kobus",
  "Marius",
];

pub const LAST_NAMES: &[&str] = &[
  "Botha", "Van der Merwe", "Nkosi", "Dlamini", "Khumalo", "Mokoena",
  "Van Wyk", "Pretorius", "Naidoo", "Pillay", "Govender", "Ngcobo",
  "Mthembu", "Sithole", "Mahlangu", "Du Plessis", "Venter", "Fourie",
  "Le Roux", "Steyn", "Coetzee", "Joubert", "Nel", "Swanepoel", "Kruger",
  "Mabaso", "Zulu", "Ndlovu", "Tshabalala", "Molefe", "Radebe", "Maharaj",
  "Abrahams", "Adams", "Jacobs", "Petersen", "Hendricks", "Booysen",
  "September", "Cloete",
];

/// Flat pool; deliberately not correlated with the record's province.
pub const CITIES: &[&str] = &[
  "Johannesburg", "Cape Town", "Durban", "Pretoria", "Port Elizabeth",
  "Bloemfontein", "East London", "Polokwane", "Nelspruit", "Kimberley",
  "Mahikeng", "Pietermaritzburg", "Soweto", "Sandton", "Midrand", "Welkom",
  "Newcastle", "Tzaneen", "Witbank", "Upington", "Rustenburg",
  "Stellenbosch", "George", "Mthatha", "Paarl", "Benoni", "Boksburg",
  "Krugersdorp", "Vereeniging", "Centurion", "Randburg", "Roodepoort",
  "Springs", "Vanderbijlpark", "Klerksdorp", "Potchefstroom", "Queenstown",
  "Uitenhage", "Knysna", "Grahamstown",
];

pub const STREET_NAMES: &[&str] = &[
  "Church Street", "Long Street", "Main Road", "Voortrekker Road",
  "Kerk Street", "Market Street", "Loop Street", "Bree Street",
  "Plein Street", "Jan Smuts Avenue", "Oxford Road", "Rivonia Road",
  "Umhlanga Rocks Drive", "Florida Road", "Smith Street", "West Street",
  "Paul Kruger Street", "Schoeman Street", "Pretorius Street",
  "Nelson Mandela Drive", "Louis Botha Avenue", "Ontdekkers Road",
  "Commissioner Street", "Eloff Street",
];

/// Service branches per province.
pub fn branches_in(province: Province) -> &'static [&'static str] {
  match province {
    Province::EasternCape => &["Port Elizabeth", "East London", "Mthatha"],
    Province::FreeState => &["Bloemfontein", "Welkom"],
    Province::Gauteng => {
      &["Johannesburg", "Pretoria", "Soweto", "Sandton", "Midrand"]
    }
    Province::KwaZuluNatal => &["Durban", "Pietermaritzburg", "Newcastle"],
    Province::Limpopo => &["Polokwane", "Tzaneen"],
    Province::Mpumalanga => &["Nelspruit", "Witbank"],
    Province::NorthernCape => &["Kimberley", "Upington"],
    Province::NorthWest => &["Mahikeng", "Rustenburg"],
    Province::WesternCape => &["Cape Town", "Stellenbosch", "George"],
  }
}

/// Uniform pick from a non-empty pool.
pub fn pick<T: Copy>(rng: &mut StdRng, pool: &[T]) -> T {
  pool[rng.gen_range(0..pool.len())]
}

/// Uniform pick over the other eight provinces.
pub fn pick_other_province(rng: &mut StdRng, exclude: Province) -> Province {
  let mut province = pick(rng, &Province::ALL);
  while province == exclude {
    province = pick(rng, &Province::ALL);
  }
  province
}

/// A date in `years` with the day capped at 28, so any month works.
pub fn random_date(rng: &mut StdRng, years: RangeInclusive<i32>) -> NaiveDate {
  let year = rng.gen_range(years);
  let month = rng.gen_range(1..=12);
  let day = rng.gen_range(1..=28);
  NaiveDate::from_ymd_opt(year, month, day)
    .expect("day in 1..=28 is valid for every month")
}

/// Per-run branch register: every branch holds a stable 4-digit code drawn
/// once from the run's random stream.
#[derive(Debug, Clone)]
pub struct BranchDirectory {
  codes: HashMap<&'static str, String>,
}

impl BranchDirectory {
  pub fn new(rng: &mut StdRng) -> Self {
    let mut codes = HashMap::new();
    for province in Province::ALL {
      for branch in branches_in(province) {
        codes.insert(*branch, format!("{:04}", rng.gen_range(100..10_000)));
      }
    }
    Self { codes }
  }

  pub fn code_of(&self, branch: &str) -> &str {
    self.codes.get(branch).map(String::as_str).unwrap_or("0000")
  }
}
