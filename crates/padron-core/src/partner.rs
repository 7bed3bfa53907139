//! Partner selection and candidate derivation.

use crate::citizen::{Citizen, CitizenId, MaritalStatus};

// ─── Selection ───────────────────────────────────────────────────────────────

/// The three-way partner choice the edit form offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PartnerSelection {
  /// No partner linked.
  #[default]
  None,
  /// Link to a citizen already in the registry.
  Existing(CitizenId),
  /// Author a new partner in the registration sub-form. Until that record
  /// exists, updates carry `partner = null`.
  RegisterNew,
}

impl PartnerSelection {
  /// The selection a freshly-loaded record starts from.
  pub fn from_partner(partner: Option<&Citizen>) -> Self {
    partner.map_or(Self::None, |p| Self::Existing(p.id))
  }

  /// The id an update payload carries for this selection.
  pub fn resolved_id(self) -> Option<CitizenId> {
    match self {
      Self::Existing(id) => Some(id),
      Self::None | Self::RegisterNew => None,
    }
  }
}

// ─── Candidates ──────────────────────────────────────────────────────────────

/// Citizens offered by the partner selector: everyone whose status is
/// Soltero, plus the current partner (whatever their status) so the
/// existing link stays visible and selectable. The current partner is
/// never duplicated.
pub fn partner_candidates(all: Vec<Citizen>, current: Option<&Citizen>) -> Vec<Citizen> {
  let mut candidates: Vec<Citizen> = all
    .into_iter()
    .filter(|c| {
      c.marital_status == MaritalStatus::Single
        || current.is_some_and(|p| p.id == c.id)
    })
    .collect();

  if let Some(p) = current
    && !candidates.iter().any(|c| c.id == p.id)
  {
    candidates.push(p.clone());
  }

  candidates
}
