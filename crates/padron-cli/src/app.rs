//! Application state machine and event dispatcher.

use std::{sync::Arc, time::Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use padron_core::{
  access::{self, Decision},
  citizen::{Citizen, CitizenId, MaritalStatus},
  directory::CitizenDirectory,
  input,
  notice::Notice,
  partner::{PartnerSelection, partner_candidates},
  session::{EditSession, SubmitOutcome},
};

use crate::client::ApiClient;

// ─── Screens & routes ─────────────────────────────────────────────────────────

/// Screens the app can show. The citizen list is also the default landing
/// screen a denied navigation redirects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  CitizenList,
  EditCitizen,
}

/// Roles allowed to open the edit screen — the screen's route metadata.
pub const EDIT_SCREEN_ROLES: &[&str] = &["Administrador", "Capturista"];

// ─── Form fields ──────────────────────────────────────────────────────────────

/// Focusable fields of the edit form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Name,
  LastNameFather,
  LastNameMother,
  BirthDate,
  Phone,
  MaritalStatus,
  Partner,
}

impl Field {
  pub const ORDER: [Field; 7] = [
    Field::Name,
    Field::LastNameFather,
    Field::LastNameMother,
    Field::BirthDate,
    Field::Phone,
    Field::MaritalStatus,
    Field::Partner,
  ];

  /// Label shown next to the input.
  pub fn label(self) -> &'static str {
    match self {
      Self::Name => "Nombre",
      Self::LastNameFather => "Apellido paterno",
      Self::LastNameMother => "Apellido materno",
      Self::BirthDate => "Fecha de nacimiento",
      Self::Phone => "Teléfono",
      Self::MaritalStatus => "Estado civil",
      Self::Partner => "Pareja",
    }
  }

  fn index(self) -> usize {
    Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
  }

  fn next(self) -> Field {
    Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
  }

  fn prev(self) -> Field {
    Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// All citizens, loaded at startup; backs the list screen.
  pub citizens: Vec<Citizen>,

  /// Current fuzzy-filter string (only active when `filter_active`).
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* citizen list.
  pub list_cursor: usize,

  /// The open edit session; present only on the edit screen.
  pub session: Option<EditSession>,

  /// Selectable partners for the open session. Empty until the deferred
  /// candidate fetch completes; the form renders fine without it.
  pub candidates: Vec<Citizen>,

  /// Set when the edit screen opens; the event loop performs the fetch on
  /// the tick after the form first renders.
  pub candidates_pending: bool,

  /// Text buffer for the date field; parsed into the draft on save.
  pub date_input: String,

  /// Focused form field.
  pub focus: Field,

  /// Cursor within [`App::partner_options`].
  pub partner_cursor: usize,

  /// Current notice and when it was posted; cleared once the severity's
  /// duration elapses.
  pub notice: Option<(Notice, Instant)>,

  /// Role read from configuration; `None` means no session role.
  pub role: Option<String>,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] with an empty citizen list.
  pub fn new(client: ApiClient, role: Option<String>) -> Self {
    Self {
      screen: Screen::CitizenList,
      citizens: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      session: None,
      candidates: Vec::new(),
      candidates_pending: false,
      date_input: String::new(),
      focus: Field::Name,
      partner_cursor: 0,
      notice: None,
      role,
      client: Arc::new(client),
    }
  }

  // ── Notices ───────────────────────────────────────────────────────────────

  /// Show a notice at the top of the screen; it replaces any previous one.
  pub fn post_notice(&mut self, notice: Notice) {
    self.notice = Some((notice, Instant::now()));
  }

  /// Expire the current notice once its severity's duration has elapsed.
  /// Called once per event-loop iteration.
  pub fn tick(&mut self) {
    if let Some((notice, shown_at)) = &self.notice
      && shown_at.elapsed() >= notice.severity.duration()
    {
      self.notice = None;
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch all citizens from the registry into `self.citizens`.
  pub async fn load_citizens(&mut self) {
    let client = Arc::clone(&self.client);
    match client.list_citizens().await {
      Ok(citizens) => {
        self.citizens = citizens;
        self.list_cursor = 0;
      }
      Err(e) => {
        tracing::error!("loading citizens: {e}");
        self.post_notice(Notice::error("Ocurrió un error al cargar los datos"));
      }
    }
  }

  /// Deferred fetch of the partner-candidate list. The form is already on
  /// screen and tolerates the empty list until this completes.
  pub async fn load_candidates(&mut self) {
    self.candidates_pending = false;
    let Some(current) = self.session.as_ref().map(|s| s.current_partner().cloned()) else {
      return;
    };

    let client = Arc::clone(&self.client);
    match client.list_citizens().await {
      Ok(all) => {
        self.candidates = partner_candidates(all, current.as_ref());
        self.partner_cursor = self.selection_option_index();
      }
      Err(e) => {
        tracing::error!("loading partner candidates: {e}");
        self.post_notice(Notice::error("Ocurrió un error al cargar las parejas"));
      }
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Citizens that match the current filter query.
  pub fn filtered_citizens(&self) -> Vec<&Citizen> {
    if self.filter.is_empty() {
      return self.citizens.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .citizens
      .iter()
      .filter(|c| {
        matcher.fuzzy_match(&c.full_name(), &self.filter).is_some()
          || matcher.fuzzy_match(&c.id.to_string(), &self.filter).is_some()
      })
      .collect()
  }

  /// The citizen under the list cursor in the filtered view, if any.
  pub fn cursor_citizen(&self) -> Option<&Citizen> {
    let list = self.filtered_citizens();
    list.get(self.list_cursor).copied()
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Navigate to the edit screen for `id`, subject to the role guard.
  /// A denial lands back on the citizen list, silently.
  pub async fn open_edit(&mut self, id: CitizenId) {
    match access::decide(EDIT_SCREEN_ROLES, self.role.as_deref()) {
      Decision::Redirect { target } => {
        tracing::debug!("edit screen denied for role {:?}, redirecting to {target}", self.role);
        self.screen = Screen::CitizenList;
        return;
      }
      Decision::Allow => {}
    }

    let client = Arc::clone(&self.client);
    match EditSession::load(client.as_ref(), id).await {
      Ok(Some(session)) => {
        self.date_input = session
          .draft
          .birth_date
          .map(|d| d.format("%Y-%m-%d").to_string())
          .unwrap_or_default();
        self.session = Some(session);
        self.candidates = Vec::new();
        self.candidates_pending = true;
        self.partner_cursor = 0;
        self.focus = Field::Name;
        self.screen = Screen::EditCitizen;
      }
      Ok(None) => {
        self.post_notice(Notice::error("No se encontró el ciudadano"));
      }
      Err(e) => {
        tracing::error!("loading citizen {id}: {e}");
        self.post_notice(Notice::error("Ocurrió un error al cargar los datos"));
      }
    }
  }

  /// Discard the session and return to the list screen.
  fn close_edit(&mut self) {
    self.session = None;
    self.candidates = Vec::new();
    self.candidates_pending = false;
    self.date_input.clear();
    self.screen = Screen::CitizenList;
  }

  // ── Partner options ───────────────────────────────────────────────────────

  /// Entries of the partner selector, in display order: no partner, every
  /// candidate, then the register-new entry.
  pub fn partner_options(&self) -> Vec<PartnerSelection> {
    let mut options = vec![PartnerSelection::None];
    options.extend(self.candidates.iter().map(|c| PartnerSelection::Existing(c.id)));
    options.push(PartnerSelection::RegisterNew);
    options
  }

  /// Index of the session's current selection within the options.
  fn selection_option_index(&self) -> usize {
    let Some(session) = &self.session else { return 0 };
    self
      .partner_options()
      .iter()
      .position(|o| *o == session.selection())
      .unwrap_or(0)
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    // Filter input mode: all printable keys go into the filter string.
    if self.filter_active {
      return self.handle_filter_key(key).await;
    }

    match self.screen {
      Screen::CitizenList => self.handle_list_key(key).await,
      Screen::EditCitizen => self.handle_edit_key(key).await,
    }
  }

  async fn handle_filter_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.filter_active = false;
        self.list_cursor = 0;
        // Immediately open the editor if there's exactly one match.
        let only = {
          let list = self.filtered_citizens();
          (list.len() == 1).then(|| list[0].id)
        };
        if let Some(id) = only {
          self.open_edit(id).await;
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    true
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      // Quit
      KeyCode::Char('q') => return false,

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_citizens().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Open the editor for the citizen under the cursor.
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_citizen().map(|c| c.id) {
          self.open_edit(id).await;
        }
      }

      // Filter
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }

      _ => {}
    }
    true
  }

  async fn handle_edit_key(&mut self, key: KeyEvent) -> bool {
    // Save from any field.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
      self.submit().await;
      return true;
    }

    match key.code {
      KeyCode::Esc => self.close_edit(),
      KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
      KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
      _ => self.handle_field_key(key),
    }
    true
  }

  /// Route a key to the focused field, applying the field's input filter.
  fn handle_field_key(&mut self, key: KeyEvent) {
    let Some(session) = self.session.as_mut() else { return };

    match self.focus {
      Field::Name | Field::LastNameFather | Field::LastNameMother => match key.code {
        KeyCode::Char(c) => {
          if input::letter_allowed(c) {
            name_field_mut(session, self.focus).push(c);
          } else {
            self.post_notice(Notice::error("No se aceptan números en este campo"));
          }
        }
        KeyCode::Backspace => {
          name_field_mut(session, self.focus).pop();
        }
        _ => {}
      },

      Field::Phone => match key.code {
        KeyCode::Char(c) => {
          if input::digit_allowed(c) {
            let raw = format!("{}{}", session.draft.phone, c);
            session.set_phone(&raw);
          } else {
            self.post_notice(Notice::error("No se permiten letras en este campo"));
          }
        }
        KeyCode::Backspace => {
          session.draft.phone.pop();
        }
        _ => {}
      },

      Field::BirthDate => match key.code {
        // Terminal stand-in for the native date picker: free-form
        // digits-and-dashes entry, parsed on save.
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
          if self.date_input.len() < 10 {
            self.date_input.push(c);
          }
        }
        KeyCode::Backspace => {
          self.date_input.pop();
        }
        _ => {}
      },

      Field::MaritalStatus => match key.code {
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
          let all = MaritalStatus::ALL;
          let current = all
            .iter()
            .position(|s| *s == session.draft.marital_status)
            .unwrap_or(0);
          let next = if key.code == KeyCode::Left {
            (current + all.len() - 1) % all.len()
          } else {
            (current + 1) % all.len()
          };
          session.set_marital_status(all[next]);
          self.partner_cursor = self.selection_option_index();
        }
        _ => {}
      },

      Field::Partner => {
        // Disabled unless the status implies a partner.
        if !session.draft.marital_status.implies_partner() {
          return;
        }
        match key.code {
          KeyCode::Left | KeyCode::Right => {
            let options = self.partner_options();
            let cursor = if key.code == KeyCode::Left {
              (self.partner_cursor + options.len() - 1) % options.len()
            } else {
              (self.partner_cursor + 1) % options.len()
            };
            self.partner_cursor = cursor;
            if let Some(session) = self.session.as_mut() {
              session.select_partner(options[cursor]);
            }
          }
          _ => {}
        }
      }
    }
  }

  // ── Submit ────────────────────────────────────────────────────────────────

  /// Parse the date buffer into the draft; an invalid value blocks the
  /// save with an error notice.
  fn apply_date_input(&mut self) -> bool {
    let Some(session) = self.session.as_mut() else { return false };

    if self.date_input.trim().is_empty() {
      session.draft.birth_date = None;
      return true;
    }
    match padron_core::citizen::parse_birth_date(self.date_input.trim()) {
      Some(date) => {
        session.draft.birth_date = Some(date);
        true
      }
      None => {
        self.post_notice(Notice::error("Fecha de nacimiento inválida"));
        false
      }
    }
  }

  /// Submit the open session: warning on no change, success and navigate
  /// back on update, error and stay for retry on failure.
  async fn submit(&mut self) {
    if !self.apply_date_input() {
      return;
    }

    let client = Arc::clone(&self.client);
    let Some(session) = self.session.as_ref() else { return };
    let id = session.id();
    let result = session.submit(client.as_ref()).await;

    match result {
      Ok(SubmitOutcome::NoChange) => {
        self.post_notice(Notice::warning("No se detectaron cambios para actualizar"));
      }
      Ok(SubmitOutcome::Updated) => {
        self.post_notice(Notice::success("Datos actualizados correctamente"));
        self.close_edit();
        // The list shows names and statuses; refresh it with the saved data.
        self.load_citizens().await;
      }
      Err(e) => {
        tracing::error!("updating citizen {id}: {e}");
        self.post_notice(Notice::error("Ocurrió un error al actualizar"));
      }
    }
  }
}

// ─── Field access helper ──────────────────────────────────────────────────────

/// The draft string behind a letters-only field.
fn name_field_mut(session: &mut EditSession, field: Field) -> &mut String {
  match field {
    Field::Name => &mut session.draft.name,
    Field::LastNameFather => &mut session.draft.last_name_father,
    Field::LastNameMother => &mut session.draft.last_name_mother,
    _ => unreachable!("not a letters-only field: {field:?}"),
  }
}
