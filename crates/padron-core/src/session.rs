//! The edit session — draft, snapshot, and the submit decision.

use crate::{
  citizen::{Citizen, CitizenId, CitizenUpdate, MaritalStatus},
  directory::CitizenDirectory,
  input,
  partner::PartnerSelection,
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What a submit attempt decided. Transport failures are the directory's
/// error type, not an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
  /// The registry accepted the update.
  Updated,
  /// Draft and snapshot project identically; no call was made.
  NoChange,
}

// ─── EditSession ─────────────────────────────────────────────────────────────

/// The working copy of one citizen under edit.
///
/// Owns the mutable draft and the snapshot captured at load time. The
/// session is discarded on navigation away, saved or not; it carries no
/// dirty flag — [`EditSession::changes`] recomputes the diff on demand.
#[derive(Debug, Clone)]
pub struct EditSession {
  /// The citizen being edited. Text fields are mutated directly by the
  /// form; marital status goes through [`EditSession::set_marital_status`]
  /// so the partner rule holds.
  pub draft:         Citizen,
  snapshot:          Citizen,
  selection:         PartnerSelection,
  partner_form_open: bool,
}

impl EditSession {
  /// Fetch the citizen and open a session around it. `Ok(None)` when the
  /// registry has no record for `id`.
  pub async fn load<D: CitizenDirectory>(
    directory: &D,
    id: CitizenId,
  ) -> Result<Option<Self>, D::Error> {
    let Some(citizen) = directory.get_citizen(id).await? else {
      return Ok(None);
    };
    Ok(Some(Self::new(citizen)))
  }

  /// Open a session around an already-fetched record.
  pub fn new(citizen: Citizen) -> Self {
    let selection = PartnerSelection::from_partner(citizen.partner.as_deref());
    Self {
      snapshot: citizen.clone(),
      draft: citizen,
      selection,
      partner_form_open: false,
    }
  }

  pub fn id(&self) -> CitizenId { self.snapshot.id }

  pub fn selection(&self) -> PartnerSelection { self.selection }

  pub fn partner_form_open(&self) -> bool { self.partner_form_open }

  /// The partner recorded at load time, if any. Feeds the candidate
  /// derivation so the existing link stays selectable.
  pub fn current_partner(&self) -> Option<&Citizen> {
    self.snapshot.partner.as_deref()
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Change the marital status. Leaving the partner-implying statuses
  /// clears the selection and closes the registration sub-form.
  pub fn set_marital_status(&mut self, status: MaritalStatus) {
    self.draft.marital_status = status;
    if !status.implies_partner() {
      self.selection = PartnerSelection::None;
      self.partner_form_open = false;
    }
  }

  /// Pick a partner. `RegisterNew` opens the registration sub-form; every
  /// other selection (including `None`) closes it.
  pub fn select_partner(&mut self, selection: PartnerSelection) {
    self.selection = selection;
    self.partner_form_open = selection == PartnerSelection::RegisterNew;
  }

  /// Replace the draft phone with the filtered form of `raw`.
  pub fn set_phone(&mut self, raw: &str) {
    self.draft.phone = input::filter_phone(raw);
  }

  // ── Diff & submit ─────────────────────────────────────────────────────────

  /// The update payload for the current draft state.
  pub fn update_payload(&self) -> CitizenUpdate {
    CitizenUpdate {
      name:             self.draft.name.clone(),
      last_name_father: self.draft.last_name_father.clone(),
      last_name_mother: self.draft.last_name_mother.clone(),
      phone:            self.draft.phone.clone(),
      birth_date:       self.draft.birth_date,
      marital_status:   self.draft.marital_status,
      partner:          self.selection.resolved_id(),
    }
  }

  /// The payload to send if anything differs from the snapshot, `None`
  /// otherwise.
  pub fn changes(&self) -> Option<CitizenUpdate> {
    let current = self.update_payload();
    (current != CitizenUpdate::of(&self.snapshot)).then_some(current)
  }

  /// Submit the draft: at most one `update` call, and none when nothing
  /// changed. The session is untouched either way, so a failed attempt can
  /// simply be retried.
  pub async fn submit<D: CitizenDirectory>(
    &self,
    directory: &D,
  ) -> Result<SubmitOutcome, D::Error> {
    match self.changes() {
      None => Ok(SubmitOutcome::NoChange),
      Some(update) => {
        directory.update_citizen(self.id(), &update).await?;
        Ok(SubmitOutcome::Updated)
      }
    }
  }
}
