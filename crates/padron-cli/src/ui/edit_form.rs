//! Edit form pane — general personal data for one citizen.

use padron_core::{citizen::Citizen, partner::PartnerSelection, session::EditSession};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Field};

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the edit form into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(session) = &app.session else { return };

  let block = Block::default()
    .title(format!(" Editar datos generales — {} ", session.draft.full_name()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let inner = block.inner(area);
  f.render_widget(block, area);

  // Reserve space for the registration sub-form when it is open.
  let (form_area, subform_area) = if session.partner_form_open() {
    let rows = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Min(0), Constraint::Length(4)])
      .split(inner);
    (rows[0], Some(rows[1]))
  } else {
    (inner, None)
  };

  let mut lines: Vec<Line> = Vec::new();
  for field in Field::ORDER {
    lines.push(field_line(app, session, field));
    lines.push(Line::from(""));
  }

  lines.push(Line::from(Span::styled(
    "[Ctrl-S] guardar   [Esc] volver",
    Style::default().fg(Color::Gray),
  )));

  f.render_widget(Paragraph::new(lines), form_area);

  if let Some(subform_area) = subform_area {
    draw_partner_subform(f, subform_area);
  }
}

// ─── Field rendering ──────────────────────────────────────────────────────────

fn field_line(app: &App, session: &EditSession, field: Field) -> Line<'static> {
  let focused = app.focus == field;

  let label_style = if focused {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  let value_style = if focused {
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default()
  };

  let caret = if focused { "_" } else { "" };
  let value = match field {
    Field::Name => format!("{}{caret}", session.draft.name),
    Field::LastNameFather => format!("{}{caret}", session.draft.last_name_father),
    Field::LastNameMother => format!("{}{caret}", session.draft.last_name_mother),
    Field::BirthDate => format!("{}{caret}", app.date_input),
    Field::Phone => format!("{}{caret}", session.draft.phone),
    Field::MaritalStatus => {
      let status = session.draft.marital_status;
      if focused {
        format!("◂ {status} ▸")
      } else {
        status.to_string()
      }
    }
    Field::Partner => {
      if !session.draft.marital_status.implies_partner() {
        return Line::from(vec![
          Span::styled(format!("{:<22}", field.label()), label_style),
          Span::styled("—", Style::default().fg(Color::DarkGray)),
        ]);
      }
      let label = option_label(session.selection(), &app.candidates);
      if focused {
        format!("◂ {label} ▸")
      } else {
        label
      }
    }
  };

  let mut spans = vec![
    Span::styled(format!("{:<22}", field.label()), label_style),
    Span::styled(value, value_style),
  ];

  if field == Field::Partner && app.candidates_pending {
    spans.push(Span::styled(
      "  (cargando parejas…)",
      Style::default().fg(Color::DarkGray),
    ));
  }

  Line::from(spans)
}

/// Display label for a partner option. Before the candidate list arrives an
/// existing link falls back to its id.
fn option_label(option: PartnerSelection, candidates: &[Citizen]) -> String {
  match option {
    PartnerSelection::None => "Sin pareja".into(),
    PartnerSelection::RegisterNew => "Registrar nueva pareja".into(),
    PartnerSelection::Existing(id) => candidates
      .iter()
      .find(|c| c.id == id)
      .map(Citizen::full_name)
      .unwrap_or_else(|| format!("Ciudadano {id}")),
  }
}

// ─── Partner registration sub-form ────────────────────────────────────────────

fn draw_partner_subform(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Registrar nueva pareja ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let lines = vec![
    Line::from("La nueva pareja se captura como ciudadano desde el registro."),
    Line::from(Span::styled(
      "Hasta entonces, al guardar estos datos la pareja queda sin asignar.",
      Style::default().fg(Color::Gray),
    )),
  ];
  f.render_widget(Paragraph::new(lines), inner);
}
