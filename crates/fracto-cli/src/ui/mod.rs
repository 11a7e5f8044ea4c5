//! TUI rendering: header, body view, status bar and popups.

pub mod graph;
pub mod prompt;
pub mod sections;

use chrono::Local;
use fracto_core::store::TagStore;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Mode, View};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: TagStore + 'static>(f: &mut Frame, app: &App<S>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.view {
    View::Sections => sections::draw(f, rows[1], app),
    View::Graph => graph::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);

  match &app.mode {
    Mode::Browse => {}
    Mode::Picker(picker) => prompt::draw_picker(f, rows[1], picker),
    Mode::Input(input) => prompt::draw_input(f, rows[1], input),
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S: TagStore + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let who = app.user_name.as_deref().unwrap_or(app.sync.user_id());
  let left = Span::styled(
    format!(" fracto · {who}"),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );

  let right_text = if app.sync.is_loading() {
    "syncing… ".to_owned()
  } else if app.sync.is_just_updated() {
    "✓ updated ".to_owned()
  } else {
    format!("{} ", Local::now().format("%H:%M"))
  };
  let right_color = if app.sync.is_just_updated() { Color::Green } else { Color::Gray };
  let right = Span::styled(right_text, Style::default().fg(right_color));

  // Simple left-right header: pad the middle.
  let left_width = left.width() as u16;
  let right_width = right.width() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: TagStore + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match (&app.mode, app.view) {
    (Mode::Picker(_), _) => ("PICK", "Type to filter  ↑↓ choose  Enter select  Esc cancel"),
    (Mode::Input(_), _) => ("EDIT", "Type a value  Enter save  Esc cancel"),
    (Mode::Browse, View::Graph) => ("GRAPH", "g list  r refresh  q quit"),
    (Mode::Browse, View::Sections) => (
      "NORMAL",
      "Tab section  ↑↓/jk item  a add  e edit  d delete  g graph  r refresh  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };
  let status_color = if app.status_msg.starts_with("Error") { Color::Red } else { Color::DarkGray };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(status_color));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

/// Map a category colour family to a terminal colour.
pub(crate) fn family_color(family: &str) -> Color {
  match family {
    "emerald" => Color::Green,
    "blue" => Color::Blue,
    "orange" => Color::LightRed,
    "purple" => Color::Magenta,
    _ => Color::White,
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use fracto_core::ItemType;
  use fracto_store_sqlite::SqliteStore;
  use fracto_sync::ProfileSync;
  use ratatui::{Terminal, backend::TestBackend};

  use super::*;

  async fn app() -> App<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    App::new(Arc::new(ProfileSync::new(store, "u1")), Some("Sam".into()))
  }

  fn render(app: &App<SqliteStore>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
      .content()
      .chunks(width)
      .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
      .collect::<Vec<_>>()
      .join("\n")
  }

  #[tokio::test]
  async fn empty_profile_shows_placeholders() {
    let app = app().await;
    let screen = render(&app);
    assert!(screen.contains("Location (one only)"));
    assert!(screen.contains("Target Role (one only)"));
    assert!(screen.contains("Not set yet"));
    assert!(screen.contains("Companies"));
    assert!(!screen.contains("Companies (one only)"));
  }

  #[tokio::test]
  async fn items_render_in_their_sections() {
    let app = app().await;
    app.sync.add(ItemType::Location, "London").await.unwrap();
    app.sync.add(ItemType::Skill, "Python").await.unwrap();

    let screen = render(&app);
    assert!(screen.contains("London"));
    assert!(screen.contains("Python"));
  }

  #[tokio::test]
  async fn graph_view_lists_legend_and_nodes() {
    let mut app = app().await;
    app.sync.add(ItemType::Company, "Acme").await.unwrap();
    app.view = View::Graph;

    let screen = render(&app);
    assert!(screen.contains("Sam"));
    assert!(screen.contains("Acme"));
    assert!(screen.contains("Company"));
  }
}
