//! Record types for the two generated tables.
//!
//! Struct field order is the column order of the written files; the CSV and
//! XLSX writers rely on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id_number::IdNumber;

// ─── Field enums ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  pub fn as_str(self) -> &'static str {
    match self {
      Gender::Male => "Male",
      Gender::Female => "Female",
    }
  }
}

/// The nine provinces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Province {
  #[serde(rename = "Eastern Cape")]
  EasternCape,
  #[serde(rename = "Free State")]
  FreeState,
  Gauteng,
  #[serde(rename = "KwaZulu-Natal")]
  KwaZuluNatal,
  Limpopo,
  Mpumalanga,
  #[serde(rename = "Northern Cape")]
  NorthernCape,
  #[serde(rename = "North West")]
  NorthWest,
  #[serde(rename = "Western Cape")]
  WesternCape,
}

impl Province {
  pub const ALL: [Province; 9] = [
    Province::EasternCape,
    Province::FreeState,
    Province::Gauteng,
    Province::KwaZuluNatal,
    Province::Limpopo,
    Province::Mpumalanga,
    Province::NorthernCape,
    Province::NorthWest,
    Province::WesternCape,
  ];

  /// Must match the serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Province::EasternCape => "Eastern Cape",
      Province::FreeState => "Free State",
      Province::Gauteng => "Gauteng",
      Province::KwaZuluNatal => "KwaZulu-Natal",
      Province::Limpopo => "Limpopo",
      Province::Mpumalanga => "Mpumalanga",
      Province::NorthernCape => "Northern Cape",
      Province::NorthWest => "North West",
      Province::WesternCape => "Western Cape",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationType {
  #[serde(rename = "ID Card")]
  IdCard,
  Passport,
}

impl ApplicationType {
  pub const ALL: [ApplicationType; 2] =
    [ApplicationType::IdCard, ApplicationType::Passport];

  /// Must match the serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      ApplicationType::IdCard => "ID Card",
      ApplicationType::Passport => "Passport",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
  Pending,
  #[serde(rename = "In Progress")]
  InProgress,
  Approved,
  Rejected,
  Completed,
}

impl ApplicationStatus {
  pub const ALL: [ApplicationStatus; 5] = [
    ApplicationStatus::Pending,
    ApplicationStatus::InProgress,
    ApplicationStatus::Approved,
    ApplicationStatus::Rejected,
    ApplicationStatus::Completed,
  ];

  /// Must match the serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      ApplicationStatus::Pending => "Pending",
      ApplicationStatus::InProgress => "In Progress",
      ApplicationStatus::Approved => "Approved",
      ApplicationStatus::Rejected => "Rejected",
      ApplicationStatus::Completed => "Completed",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionChannel {
  Branch,
  Online,
  #[serde(rename = "Mobile Unit")]
  MobileUnit,
}

impl SubmissionChannel {
  pub const ALL: [SubmissionChannel; 3] = [
    SubmissionChannel::Branch,
    SubmissionChannel::Online,
    SubmissionChannel::MobileUnit,
  ];

  /// Must match the serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      SubmissionChannel::Branch => "Branch",
      SubmissionChannel::Online => "Online",
      SubmissionChannel::MobileUnit => "Mobile Unit",
    }
  }
}

// ─── Table rows ──────────────────────────────────────────────────────────────

/// One row of the population register.
///
/// The nullable columns (`city`, `street_address`, `postal_code`,
/// `cell_number`) are the ones the fault injector may blank; a `None`
/// serializes as an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
  pub sa_id_number:        IdNumber,
  pub first_name:          String,
  pub last_name:           String,
  pub date_of_birth:       NaiveDate,
  pub gender:              Gender,
  pub citizenship_status:  String,
  pub province:            Province,
  pub city:                Option<String>,
  pub street_address:      Option<String>,
  pub postal_code:         Option<String>,
  pub cell_number:         Option<String>,
  pub record_created_date: NaiveDate,
}

/// One row of the applications table.
///
/// `sa_id_number` references a population row but is not a foreign key;
/// orphan references are a deliberate part of the generated data. A `None`
/// status is the explicit "missing" state and serializes as an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
  pub application_id:     String,
  pub sa_id_number:       IdNumber,
  pub application_type:   ApplicationType,
  pub application_date:   NaiveDate,
  pub application_status: Option<ApplicationStatus>,
  pub province:           Province,
  pub branch_name:        String,
  pub branch_code:        String,
  pub submission_channel: SubmissionChannel,
  pub processing_days:    i32,
  pub last_updated_date:  NaiveDate,
}
