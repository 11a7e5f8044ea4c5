//! Profile sections, one bordered block per category.

use fracto_core::{InputKind, ItemType, store::TagStore};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::family_color;
use crate::app::App;

/// A choice-section value that is not among the suggestions.
fn is_custom(item_type: ItemType, value: &str) -> bool {
  let input = item_type.spec().input;
  matches!(input, InputKind::Choice { .. }) && !input.is_suggested(value)
}

/// Render all four sections stacked vertically into `area`.
pub fn draw<S: TagStore + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let groups: Vec<_> = ItemType::ALL
    .iter()
    .map(|t| (*t, app.sync.items_of(*t)))
    .collect();

  // Each block is sized to its contents; the last one soaks up the rest.
  let constraints: Vec<Constraint> = groups
    .iter()
    .enumerate()
    .map(|(i, (_, items))| {
      if i + 1 == groups.len() {
        Constraint::Min(3)
      } else {
        Constraint::Length(items.len().max(1) as u16 + 2)
      }
    })
    .collect();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints)
    .split(area);

  for (i, (item_type, items)) in groups.iter().enumerate() {
    let focused = i == app.section;
    let spec = item_type.spec();
    let color = family_color(spec.color);

    let mut title = format!(" {} {} ", spec.icon, spec.label);
    if item_type.is_single() {
      title.push_str("(one only) ");
    }
    let border_style = if focused {
      Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
      .title(title)
      .borders(Borders::ALL)
      .border_style(border_style);

    if items.is_empty() {
      let empty = Paragraph::new("Not set yet")
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
      f.render_widget(empty, rows[i]);
      continue;
    }

    let list_items: Vec<ListItem> = items
      .iter()
      .map(|item| {
        let mut spans = vec![Span::styled(item.display_value(), Style::default().fg(color))];
        if item.confirmed {
          spans.push(Span::styled(" ✓", Style::default().fg(Color::Green)));
        }
        if !item.is_persisted() {
          spans.push(Span::styled("  saving…", Style::default().fg(Color::DarkGray)));
        } else if is_custom(*item_type, &item.value) {
          spans.push(Span::styled("  (custom)", Style::default().fg(Color::DarkGray)));
        }
        ListItem::new(Line::from(spans))
      })
      .collect();

    let mut state = ListState::default();
    state.select(focused.then_some(app.cursor));

    f.render_stateful_widget(
      List::new(list_items)
        .block(block)
        .highlight_style(
          Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› "),
      rows[i],
      &mut state,
    );
  }
}
