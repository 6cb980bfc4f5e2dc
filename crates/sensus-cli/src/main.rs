//! `sensus` — synthetic civil-registry dataset generator.
//!
//! Builds a South African population register and a linked ID/passport
//! application table, corrupts both with a configurable dose of
//! data-quality faults, and writes them out as CSV (and optionally XLSX).
//!
//! # Usage
//!
//! ```
//! sensus --seed 42 --out-dir data
//! sensus --big
//! SENSUS_DUPLICATE_RATE=0.1 sensus --config sensus.toml
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use sensus_core::config::{
  BIG_DATA_APPLICATION_ROWS, BIG_DATA_POPULATION_ROWS, GeneratorConfig,
};
use sensus_export::{APPLICATIONS_STEM, POPULATION_STEM, csv, file_name, xlsx};
use sensus_gen::{FaultRates, PopulationIndex, applications, faults, population};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "sensus",
  version,
  about = "Synthetic civil-registry dataset generator"
)]
struct Args {
  /// Path to a TOML configuration file.
  #[arg(short, long, default_value = "sensus.toml")]
  config: PathBuf,

  /// Directory the output files are written into.
  #[arg(short, long, default_value = "data")]
  out_dir: PathBuf,

  /// Number of population register rows.
  #[arg(long, value_name = "N")]
  population_rows: Option<usize>,

  /// Number of application rows.
  #[arg(long, value_name = "N")]
  application_rows: Option<usize>,

  /// Fraction of rows duplicated, between 0 and 1.
  #[arg(long, value_name = "RATE")]
  duplicate_rate: Option<f64>,

  /// Fraction of nullable cells blanked, between 0 and 1.
  #[arg(long, value_name = "RATE")]
  missing_rate: Option<f64>,

  /// Fraction of validatable cells corrupted, between 0 and 1.
  #[arg(long, value_name = "RATE")]
  invalid_rate: Option<f64>,

  /// RNG seed. Identical configurations reproduce identical files.
  #[arg(long)]
  seed: Option<u64>,

  /// Date the generated timelines are anchored to (YYYY-MM-DD).
  #[arg(long, value_name = "DATE")]
  reference_date: Option<NaiveDate>,

  /// Large-volume preset: 1.5 M population rows, 800 K applications.
  #[arg(long)]
  big: bool,

  /// Write XLSX workbooks even in big-data mode.
  #[arg(long)]
  xlsx: bool,

  /// Skip the XLSX workbooks.
  #[arg(long, conflicts_with = "xlsx")]
  no_xlsx: bool,
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Row counts exactly as the file and environment layers spelled them out,
/// before defaults fill the gaps. The big-data preset leaves pinned counts
/// alone, even ones pinned at the standard default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PinnedRows {
  population_rows:  Option<usize>,
  application_rows: Option<usize>,
}

/// Layer the configuration sources: built-in defaults, then the config
/// file, then `SENSUS_*` environment variables, then command-line flags.
fn load_config(args: &Args) -> anyhow::Result<GeneratorConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(args.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("SENSUS"))
    .build()
    .context("failed to read configuration")?;

  let pinned: PinnedRows = settings
    .clone()
    .try_deserialize()
    .context("failed to deserialise configuration")?;
  let mut cfg: GeneratorConfig = settings
    .try_deserialize()
    .context("failed to deserialise configuration")?;

  if let Some(rows) = args.population_rows {
    cfg.population_rows = rows;
  }
  if let Some(rows) = args.application_rows {
    cfg.application_rows = rows;
  }
  if let Some(rate) = args.duplicate_rate {
    cfg.duplicate_rate = rate;
  }
  if let Some(rate) = args.missing_rate {
    cfg.missing_value_rate = rate;
  }
  if let Some(rate) = args.invalid_rate {
    cfg.invalid_value_rate = rate;
  }
  if let Some(seed) = args.seed {
    cfg.seed = seed;
  }
  if let Some(date) = args.reference_date {
    cfg.reference_date = date;
  }
  if args.big {
    cfg.big_data = true;
  }

  // The preset only bumps row counts no layer has pinned down.
  if cfg.big_data {
    if args.population_rows.is_none() && pinned.population_rows.is_none() {
      cfg.population_rows = BIG_DATA_POPULATION_ROWS;
    }
    if args.application_rows.is_none() && pinned.application_rows.is_none() {
      cfg.application_rows = BIG_DATA_APPLICATION_ROWS;
    }
  }

  cfg.validate().context("invalid configuration")?;
  Ok(cfg)
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let config = load_config(&args)?;

  tracing::info!(
    population_rows = config.population_rows,
    application_rows = config.application_rows,
    seed = config.seed,
    big_data = config.big_data,
    "generating datasets"
  );

  std::fs::create_dir_all(&args.out_dir).with_context(|| {
    format!("failed to create output directory {}", args.out_dir.display())
  })?;

  // XLSX mirrors are on by default at standard volume. Big-data mode skips
  // them unless `--xlsx` is passed; sheets split at the Excel row limit.
  let write_xlsx = !args.no_xlsx && (args.xlsx || !config.big_data);

  let rates = FaultRates::from(&config);
  let mut rng = StdRng::seed_from_u64(config.seed);

  // Population: generate, corrupt, write. Only the compact linker index
  // survives past this block, so one table is in memory at a time.
  let people = population::generate(&config, &mut rng)?;
  let (people, pop_issues) =
    faults::inject_population(people, rates, config.reference_date, &mut rng);
  let population_rows = people.len();

  let population_csv = args
    .out_dir
    .join(file_name(POPULATION_STEM, "csv", config.big_data));
  csv::write_table(&population_csv, &people)
    .with_context(|| format!("failed to write {}", population_csv.display()))?;
  tracing::info!("wrote {}", population_csv.display());

  if write_xlsx {
    let population_xlsx = args
      .out_dir
      .join(file_name(POPULATION_STEM, "xlsx", config.big_data));
    xlsx::write_population(&population_xlsx, &people).with_context(|| {
      format!("failed to write {}", population_xlsx.display())
    })?;
    tracing::info!("wrote {}", population_xlsx.display());
  }

  let index = PopulationIndex::from_records(&people);
  drop(people);

  // Applications link against the register as corrupted, not as generated.
  let apps = applications::generate(&config, &index, &mut rng)?;
  let (apps, app_issues) = faults::inject_applications(apps, rates, &mut rng);

  let applications_csv = args
    .out_dir
    .join(file_name(APPLICATIONS_STEM, "csv", config.big_data));
  csv::write_table(&applications_csv, &apps).with_context(|| {
    format!("failed to write {}", applications_csv.display())
  })?;
  tracing::info!("wrote {}", applications_csv.display());

  if write_xlsx {
    let applications_xlsx = args
      .out_dir
      .join(file_name(APPLICATIONS_STEM, "xlsx", config.big_data));
    xlsx::write_applications(&applications_xlsx, &apps).with_context(|| {
      format!("failed to write {}", applications_xlsx.display())
    })?;
    tracing::info!("wrote {}", applications_xlsx.display());
  }

  let orphans = apps
    .iter()
    .filter(|app| !index.contains(&app.sa_id_number))
    .count();

  print_summary(
    &config,
    population_rows,
    pop_issues,
    apps.len(),
    app_issues,
    orphans,
  );
  Ok(())
}

// ─── Summary ──────────────────────────────────────────────────────────────────

/// Print the post-run issue report.
fn print_summary(
  config: &GeneratorConfig,
  population_rows: usize,
  pop_issues: faults::PopulationIssues,
  application_rows: usize,
  app_issues: faults::ApplicationIssues,
  orphans: usize,
) {
  println!();
  println!("Generation summary (seed {})", config.seed);
  println!("  population rows:       {population_rows}");
  println!("    duplicated rows:     {}", pop_issues.duplicates);
  println!("    blanked cells:       {}", pop_issues.missing_values);
  println!("    invalid postcodes:   {}", pop_issues.invalid_postal_codes);
  println!("    future dates:        {}", pop_issues.future_dates);
  println!("    reformatted rows:    {}", pop_issues.inconsistent_formatting);
  println!("  application rows:      {application_rows}");
  println!("    duplicated rows:     {}", app_issues.duplicates);
  println!("    blanked statuses:    {}", app_issues.missing_statuses);
  println!("    branch mismatches:   {}", app_issues.branch_mismatches);
  println!("    bad processing days: {}", app_issues.invalid_processing);
  println!("    reversed timelines:  {}", app_issues.reversed_dates);
  println!("    orphan references:   {}", orphans);
}
