//! Citizen model — the wire schema of the registry API.
//!
//! Records are validated here, at the API boundary, by an explicit schema.
//! Nothing downstream handles untyped payloads: a record that does not fit
//! this shape is a deserialization error, not a half-populated draft.

use std::{fmt, num::NonZeroU64, str::FromStr};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

// ─── Identifier ──────────────────────────────────────────────────────────────

/// A registry identifier — always a positive integer.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CitizenId(NonZeroU64);

impl CitizenId {
  pub fn new(raw: u64) -> Option<Self> { NonZeroU64::new(raw).map(Self) }

  pub fn get(self) -> u64 { self.0.get() }
}

impl FromStr for CitizenId {
  type Err = Error;

  /// Parse a route/CLI parameter. Zero, empty, and non-numeric input are
  /// all rejected before any load is attempted.
  fn from_str(s: &str) -> Result<Self> {
    s.trim()
      .parse::<u64>()
      .ok()
      .and_then(Self::new)
      .ok_or_else(|| Error::InvalidId(s.to_string()))
  }
}

impl fmt::Display for CitizenId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Marital status ──────────────────────────────────────────────────────────

/// Marital status as the registry stores it. The wire strings double as the
/// display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
  #[serde(rename = "Soltero")]
  Single,
  #[serde(rename = "Casado")]
  Married,
  #[serde(rename = "Divorciado")]
  Divorced,
  #[serde(rename = "Viudo")]
  Widowed,
}

impl MaritalStatus {
  /// Every selectable status, in display order.
  pub const ALL: [MaritalStatus; 4] = [
    MaritalStatus::Single,
    MaritalStatus::Married,
    MaritalStatus::Divorced,
    MaritalStatus::Widowed,
  ];

  /// Statuses that imply a partner linkage. Any other status forces
  /// `partner = null` on the record.
  pub fn implies_partner(self) -> bool {
    matches!(self, Self::Married | Self::Divorced | Self::Widowed)
  }

  /// The wire string for this status.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Single => "Soltero",
      Self::Married => "Casado",
      Self::Divorced => "Divorciado",
      Self::Widowed => "Viudo",
    }
  }
}

impl fmt::Display for MaritalStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Citizen ─────────────────────────────────────────────────────────────────

/// One citizen record as the registry returns it.
///
/// `partner` arrives as a nested record on reads; updates carry only the
/// partner's id (see [`CitizenUpdate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citizen {
  pub id:               CitizenId,
  pub name:             String,
  pub last_name_father: String,
  pub last_name_mother: String,
  /// Calendar date only; wire timestamps are reduced to their date
  /// component during deserialization.
  #[serde(default, deserialize_with = "deserialize_birth_date")]
  pub birth_date:       Option<NaiveDate>,
  #[serde(default)]
  pub phone:            String,
  pub marital_status:   MaritalStatus,
  #[serde(default)]
  pub partner:          Option<Box<Citizen>>,
}

impl Citizen {
  /// Given name and both surnames, skipping empty parts.
  pub fn full_name(&self) -> String {
    [
      self.name.as_str(),
      self.last_name_father.as_str(),
      self.last_name_mother.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.trim().is_empty())
    .collect::<Vec<_>>()
    .join(" ")
  }
}

// ─── Birth-date normalization ────────────────────────────────────────────────

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; anything else is a
/// boundary error.
pub fn parse_birth_date(s: &str) -> Option<NaiveDate> {
  if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Some(date);
  }
  DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn deserialize_birth_date<'de, D>(de: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<String>::deserialize(de)?;
  match raw.as_deref() {
    None | Some("") => Ok(None),
    Some(s) => parse_birth_date(s)
      .map(Some)
      .ok_or_else(|| serde::de::Error::custom(format!("unparseable birth date: {s:?}"))),
  }
}

// ─── Update payload ──────────────────────────────────────────────────────────

/// The update payload — also the comparison projection of a draft.
///
/// Change detection is field-wise equality between the draft's projection
/// and the snapshot's; no serialized round trip is involved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitizenUpdate {
  pub name:             String,
  pub last_name_father: String,
  pub last_name_mother: String,
  pub phone:            String,
  pub birth_date:       Option<NaiveDate>,
  pub marital_status:   MaritalStatus,
  /// Partner id, or `None` both for "no partner" and for a registration
  /// still pending in the sub-form.
  pub partner:          Option<CitizenId>,
}

impl CitizenUpdate {
  /// The projection of a stored record, with the nested partner reduced to
  /// its id.
  pub fn of(citizen: &Citizen) -> Self {
    Self {
      name:             citizen.name.clone(),
      last_name_father: citizen.last_name_father.clone(),
      last_name_mother: citizen.last_name_mother.clone(),
      phone:            citizen.phone.clone(),
      birth_date:       citizen.birth_date,
      marital_status:   citizen.marital_status,
      partner:          citizen.partner.as_ref().map(|p| p.id),
    }
  }
}
