//! Popups for entering a value: the suggestion picker and the text input.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::{Picker, Target, TextInput};

fn title(target: &Target) -> String {
  match target {
    Target::Add(t) => format!(" Add {} ", t.spec().label),
    Target::Edit(item) => format!(" Edit {} ", item.value),
  }
}

/// A `width` x `height` box centred in `area`, clamped to fit.
fn centred(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

fn popup_block(target: &Target) -> Block<'static> {
  Block::default()
    .title(title(target))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow))
}

pub fn draw_picker(f: &mut Frame, area: Rect, picker: &Picker) {
  let popup = centred(area, 44, 16);
  f.render_widget(Clear, popup);

  let block = popup_block(&picker.target);
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(inner);

  let query = Line::from(vec![
    Span::styled("/", Style::default().fg(Color::DarkGray)),
    Span::styled(format!("{}_", picker.query), Style::default().fg(Color::Yellow)),
  ]);
  f.render_widget(Paragraph::new(query), rows[0]);

  let items: Vec<ListItem> = picker
    .matches()
    .into_iter()
    .map(ListItem::new)
    .collect();

  let mut state = ListState::default();
  state.select(Some(picker.cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    rows[1],
    &mut state,
  );
}

pub fn draw_input(f: &mut Frame, area: Rect, input: &TextInput) {
  let popup = centred(area, 44, 4);
  f.render_widget(Clear, popup);

  let placeholder = input.target.item_type().spec().placeholder;
  let line = if input.buffer.is_empty() {
    Line::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
  } else {
    Line::from(Span::raw(format!("{}_", input.buffer)))
  };

  f.render_widget(Paragraph::new(line).block(popup_block(&input.target)), popup);
}
