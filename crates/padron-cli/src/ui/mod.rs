//! TUI rendering — orchestrates all panes.

pub mod citizen_list;
pub mod edit_form;

use chrono::Local;
use padron_core::notice::Severity;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, notice bar, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(1), // notice bar (top placement, like the toasts)
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_notice(f, rows[1], app);
  draw_body(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, _app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " padrón  [/] buscar  [q] salir",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Notice bar ───────────────────────────────────────────────────────────────

/// The top-of-screen notice, colored by severity. Blank when nothing is
/// being shown.
fn draw_notice(f: &mut Frame, area: Rect, app: &App) {
  let Some((notice, _)) = &app.notice else {
    f.render_widget(Paragraph::new(""), area);
    return;
  };

  let style = match notice.severity {
    Severity::Success => Style::default().bg(Color::Green).fg(Color::Black),
    Severity::Error => Style::default().bg(Color::Red).fg(Color::White),
    Severity::Warning => Style::default().bg(Color::Yellow).fg(Color::Black),
  };

  f.render_widget(
    Paragraph::new(format!(" {}", notice.message))
      .style(style.add_modifier(Modifier::BOLD)),
    area,
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  match app.screen {
    Screen::CitizenList => citizen_list::draw(f, area, app),
    Screen::EditCitizen => edit_form::draw(f, area, app),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    Screen::CitizenList if app.filter_active => {
      ("BUSCAR", "Escribe para filtrar  Esc cancelar  Enter seleccionar")
    }
    Screen::CitizenList => {
      ("LISTA", "↑↓/jk navegar  / buscar  Enter editar  q salir")
    }
    Screen::EditCitizen => {
      ("EDITAR", "Tab/↑↓ campo  ←→ cambiar valor  Ctrl-S guardar  Esc volver")
    }
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {hints}"),
    Style::default().fg(Color::Gray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
