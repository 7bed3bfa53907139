//! Unit tests for the core workflow against an in-memory directory.

use std::sync::Mutex;

use chrono::NaiveDate;

use crate::{
  access::{self, DEFAULT_LANDING, Decision},
  citizen::{Citizen, CitizenId, CitizenUpdate, MaritalStatus},
  directory::CitizenDirectory,
  error::Error,
  input,
  partner::{PartnerSelection, partner_candidates},
  session::{EditSession, SubmitOutcome},
};

// ─── Test directory ──────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("directory unavailable")]
struct Unavailable;

/// Serves a fixed set of citizens and records every update call.
#[derive(Default)]
struct MemoryDirectory {
  citizens:     Vec<Citizen>,
  updates:      Mutex<Vec<(CitizenId, CitizenUpdate)>>,
  fail_updates: bool,
}

impl MemoryDirectory {
  fn with(citizens: Vec<Citizen>) -> Self {
    Self { citizens, ..Default::default() }
  }

  fn update_count(&self) -> usize { self.updates.lock().unwrap().len() }
}

impl CitizenDirectory for MemoryDirectory {
  type Error = Unavailable;

  async fn get_citizen(&self, id: CitizenId) -> Result<Option<Citizen>, Unavailable> {
    Ok(self.citizens.iter().find(|c| c.id == id).cloned())
  }

  async fn list_citizens(&self) -> Result<Vec<Citizen>, Unavailable> {
    Ok(self.citizens.clone())
  }

  async fn update_citizen(
    &self,
    id: CitizenId,
    update: &CitizenUpdate,
  ) -> Result<(), Unavailable> {
    if self.fail_updates {
      return Err(Unavailable);
    }
    self.updates.lock().unwrap().push((id, update.clone()));
    Ok(())
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn id(raw: u64) -> CitizenId { CitizenId::new(raw).unwrap() }

fn citizen(raw_id: u64, name: &str, status: MaritalStatus) -> Citizen {
  Citizen {
    id:               id(raw_id),
    name:             name.into(),
    last_name_father: "García".into(),
    last_name_mother: "López".into(),
    birth_date:       NaiveDate::from_ymd_opt(1990, 5, 17),
    phone:            "5512345678".into(),
    marital_status:   status,
    partner:          None,
  }
}

// ─── Access guard ────────────────────────────────────────────────────────────

#[test]
fn guard_allows_member_role() {
  let decision = access::decide(&["Administrador", "Capturista"], Some("Capturista"));
  assert_eq!(decision, Decision::Allow);
  assert!(decision.is_allowed());
}

#[test]
fn guard_redirects_unknown_role() {
  let decision = access::decide(&["Administrador"], Some("Consulta"));
  assert_eq!(decision, Decision::Redirect { target: DEFAULT_LANDING });
}

#[test]
fn guard_redirects_missing_role() {
  let decision = access::decide(&["Administrador"], None);
  assert_eq!(decision, Decision::Redirect { target: DEFAULT_LANDING });
}

#[test]
fn guard_empty_required_list_always_redirects() {
  // No role is a member of the empty set, not even a defined one.
  let decision = access::decide(&[], Some("Administrador"));
  assert_eq!(decision, Decision::Redirect { target: DEFAULT_LANDING });
}

// ─── Identifier parsing ──────────────────────────────────────────────────────

#[test]
fn citizen_id_accepts_positive_integers() {
  let parsed: CitizenId = "42".parse().unwrap();
  assert_eq!(parsed.get(), 42);
}

#[test]
fn citizen_id_rejects_zero_and_garbage() {
  for raw in ["0", "", "abc", "-3", "1.5"] {
    let result = raw.parse::<CitizenId>();
    assert!(matches!(result, Err(Error::InvalidId(_))), "accepted {raw:?}");
  }
}

// ─── Birth-date normalization ────────────────────────────────────────────────

#[test]
fn birth_date_normalizes_timestamps_to_calendar_dates() {
  let date_only: Citizen = serde_json::from_value(serde_json::json!({
    "id": 1,
    "name": "Ana",
    "last_name_father": "García",
    "last_name_mother": "López",
    "birth_date": "1990-05-17",
    "phone": "5512345678",
    "marital_status": "Soltero",
  }))
  .unwrap();

  let timestamped: Citizen = serde_json::from_value(serde_json::json!({
    "id": 1,
    "name": "Ana",
    "last_name_father": "García",
    "last_name_mother": "López",
    "birth_date": "1990-05-17T00:00:00.000Z",
    "phone": "5512345678",
    "marital_status": "Soltero",
  }))
  .unwrap();

  assert_eq!(date_only.birth_date, NaiveDate::from_ymd_opt(1990, 5, 17));
  assert_eq!(date_only.birth_date, timestamped.birth_date);

  // Serialization always emits the date-only form.
  let wire = serde_json::to_value(&timestamped).unwrap();
  assert_eq!(wire["birth_date"], "1990-05-17");
}

#[test]
fn birth_date_tolerates_absence() {
  let citizen: Citizen = serde_json::from_value(serde_json::json!({
    "id": 7,
    "name": "Luis",
    "last_name_father": "Pérez",
    "last_name_mother": "",
    "marital_status": "Soltero",
  }))
  .unwrap();
  assert_eq!(citizen.birth_date, None);
  assert_eq!(citizen.phone, "");
}

// ─── Input filters ───────────────────────────────────────────────────────────

#[test]
fn filter_phone_strips_and_truncates() {
  assert_eq!(input::filter_phone("(55) 1234-5678"), "5512345678");
  assert_eq!(input::filter_phone("55123456789999"), "5512345678");
  assert_eq!(input::filter_phone("sin dígitos"), "");
}

#[test]
fn filter_phone_is_idempotent_and_bounded() {
  for raw in ["(55) 1234-5678 ext 9", "abc123", "", "5512345678"] {
    let once = input::filter_phone(raw);
    assert_eq!(input::filter_phone(&once), once);
    assert!(once.len() <= 10);
    assert!(once.chars().all(|c| c.is_ascii_digit()));
  }
}

#[test]
fn letter_filter_blocks_digits_and_accepts_spanish_letters() {
  assert!(!input::letter_allowed('5'));
  assert!(!input::letter_allowed('3'));
  assert!(input::letter_allowed('ñ'));
  assert!(input::letter_allowed('Ñ'));
  assert!(input::letter_allowed('é'));
  assert!(input::letter_allowed(' '));
  assert!(input::letter_allowed('A'));
}

#[test]
fn digit_filter_accepts_only_ascii_digits() {
  assert!(!input::digit_allowed('a'));
  assert!(input::digit_allowed('7'));
  // Neighbours of the 48–57 range.
  assert!(!input::digit_allowed('/'));
  assert!(!input::digit_allowed(':'));
}

// ─── Partner candidates ──────────────────────────────────────────────────────

#[test]
fn candidates_are_singles_plus_current_partner() {
  let all = vec![
    citizen(1, "Ana", MaritalStatus::Single),
    citizen(2, "Benito", MaritalStatus::Married),
    citizen(3, "Carla", MaritalStatus::Single),
  ];

  // Benito is not Soltero, but as the current partner he must remain
  // selectable.
  let current = citizen(2, "Benito", MaritalStatus::Married);
  let candidates = partner_candidates(all, Some(&current));

  let ids: Vec<u64> = candidates.iter().map(|c| c.id.get()).collect();
  assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn candidates_keep_offlist_partner_without_duplicates() {
  let all = vec![citizen(1, "Ana", MaritalStatus::Single)];
  let current = citizen(9, "Benito", MaritalStatus::Widowed);

  let candidates = partner_candidates(all, Some(&current));
  let ids: Vec<u64> = candidates.iter().map(|c| c.id.get()).collect();
  assert_eq!(ids, vec![1, 9]);

  // A Soltero current partner already in the list is not appended twice.
  let all = vec![
    citizen(1, "Ana", MaritalStatus::Single),
    citizen(2, "Benito", MaritalStatus::Single),
  ];
  let current = citizen(2, "Benito", MaritalStatus::Single);
  let candidates = partner_candidates(all, Some(&current));
  assert_eq!(candidates.iter().filter(|c| c.id.get() == 2).count(), 1);
}

// ─── Edit session ────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_missing_citizen_returns_none() {
  let directory = MemoryDirectory::with(vec![citizen(1, "Ana", MaritalStatus::Single)]);
  let session = EditSession::load(&directory, id(99)).await.unwrap();
  assert!(session.is_none());
}

#[tokio::test]
async fn unchanged_submit_is_a_warning_and_makes_no_call() {
  let directory = MemoryDirectory::with(vec![citizen(1, "Ana", MaritalStatus::Single)]);
  let session = EditSession::load(&directory, id(1)).await.unwrap().unwrap();

  assert!(session.changes().is_none());
  let outcome = session.submit(&directory).await.unwrap();
  assert_eq!(outcome, SubmitOutcome::NoChange);
  assert_eq!(directory.update_count(), 0);
}

#[tokio::test]
async fn reverted_edit_counts_as_no_change() {
  let directory = MemoryDirectory::with(vec![citizen(1, "Ana", MaritalStatus::Single)]);
  let mut session = EditSession::load(&directory, id(1)).await.unwrap().unwrap();

  session.draft.name = "Anabel".into();
  assert!(session.changes().is_some());

  session.draft.name = "Ana".into();
  assert!(session.changes().is_none());
}

#[test]
fn leaving_partner_status_clears_selection_and_closes_form() {
  let mut paired = citizen(1, "Ana", MaritalStatus::Married);
  paired.partner = Some(Box::new(citizen(2, "Benito", MaritalStatus::Married)));
  let mut session = EditSession::new(paired);
  assert_eq!(session.selection(), PartnerSelection::Existing(id(2)));

  session.select_partner(PartnerSelection::RegisterNew);
  assert!(session.partner_form_open());

  session.set_marital_status(MaritalStatus::Single);
  assert_eq!(session.selection(), PartnerSelection::None);
  assert!(!session.partner_form_open());
}

#[test]
fn staying_in_partner_statuses_keeps_selection() {
  let mut paired = citizen(1, "Ana", MaritalStatus::Married);
  paired.partner = Some(Box::new(citizen(2, "Benito", MaritalStatus::Married)));
  let mut session = EditSession::new(paired);

  session.set_marital_status(MaritalStatus::Widowed);
  assert_eq!(session.selection(), PartnerSelection::Existing(id(2)));
}

#[test]
fn register_new_opens_the_subform_and_other_picks_close_it() {
  let mut session = EditSession::new(citizen(1, "Ana", MaritalStatus::Married));

  session.select_partner(PartnerSelection::RegisterNew);
  assert!(session.partner_form_open());

  session.select_partner(PartnerSelection::Existing(id(2)));
  assert!(!session.partner_form_open());

  session.select_partner(PartnerSelection::RegisterNew);
  session.select_partner(PartnerSelection::None);
  assert!(!session.partner_form_open());
}

#[test]
fn pending_registration_projects_a_null_partner() {
  let mut session = EditSession::new(citizen(1, "Ana", MaritalStatus::Married));
  session.select_partner(PartnerSelection::RegisterNew);

  let payload = session.update_payload();
  assert_eq!(payload.partner, None);
  assert_eq!(serde_json::to_value(&payload).unwrap()["partner"], serde_json::Value::Null);
}

#[test]
fn set_phone_applies_the_filter() {
  let mut session = EditSession::new(citizen(1, "Ana", MaritalStatus::Single));
  session.set_phone("(55) 9876-5432 ext 1");
  assert_eq!(session.draft.phone, "5598765432");
}

#[tokio::test]
async fn marrying_ana_sends_the_expected_payload() {
  let directory = MemoryDirectory::with(vec![
    citizen(1, "Ana", MaritalStatus::Single),
    citizen(2, "Benito", MaritalStatus::Single),
  ]);
  let mut session = EditSession::load(&directory, id(1)).await.unwrap().unwrap();

  session.set_marital_status(MaritalStatus::Married);
  session.select_partner(PartnerSelection::Existing(id(2)));

  let outcome = session.submit(&directory).await.unwrap();
  assert_eq!(outcome, SubmitOutcome::Updated);

  let updates = directory.updates.lock().unwrap();
  assert_eq!(updates.len(), 1);
  let (target, payload) = &updates[0];
  assert_eq!(*target, id(1));

  let wire = serde_json::to_value(payload).unwrap();
  assert_eq!(wire["name"], "Ana");
  assert_eq!(wire["marital_status"], "Casado");
  assert_eq!(wire["partner"], 2);
}

#[tokio::test]
async fn failed_update_preserves_the_draft_for_retry() {
  let directory = MemoryDirectory {
    citizens: vec![citizen(1, "Ana", MaritalStatus::Single)],
    fail_updates: true,
    ..Default::default()
  };
  let mut session = EditSession::load(&directory, id(1)).await.unwrap().unwrap();

  session.draft.name = "Anabel".into();
  assert!(session.submit(&directory).await.is_err());

  // The draft is intact and the same submit can simply be retried.
  assert_eq!(session.draft.name, "Anabel");
  assert!(session.changes().is_some());

  let recovered = MemoryDirectory::with(vec![citizen(1, "Ana", MaritalStatus::Single)]);
  let outcome = session.submit(&recovered).await.unwrap();
  assert_eq!(outcome, SubmitOutcome::Updated);
  assert_eq!(recovered.update_count(), 1);
}
