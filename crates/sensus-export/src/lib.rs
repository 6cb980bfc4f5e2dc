//! File writers for the generated tables: CSV always, XLSX on request.

pub mod csv;
pub mod error;
pub mod xlsx;

pub use error::{Error, Result};

/// File-name stem for the population register.
pub const POPULATION_STEM: &str = "population_registry";
/// File-name stem for the applications table.
pub const APPLICATIONS_STEM: &str = "applications";

/// Output file name for one table; large-volume runs carry a `big_data_`
/// prefix so the two dataset sizes can live side by side.
pub fn file_name(stem: &str, extension: &str, big_data: bool) -> String {
  let prefix = if big_data { "big_data_" } else { "" };
  format!("{prefix}{stem}.{extension}")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_names_carry_the_big_data_prefix() {
    assert_eq!(
      file_name(POPULATION_STEM, "csv", false),
      "population_registry.csv"
    );
    assert_eq!(
      file_name(APPLICATIONS_STEM, "xlsx", true),
      "big_data_applications.xlsx"
    );
  }
}
