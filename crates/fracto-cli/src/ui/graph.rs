//! Graph view: the profile projected as a star around the user.
//!
//! Tag nodes sit evenly on a circle; confirmed tags are drawn in bold. The
//! legend underneath maps node colours back to categories.

use std::f64::consts::TAU;

use fracto_core::{
  graph::{CONFIRMED_WEIGHT, NodeKind},
  store::TagStore,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style, Stylize},
  symbols::Marker,
  text::{Line, Span},
  widgets::{
    Block, Borders, Paragraph,
    canvas::{Canvas, Line as Edge},
  },
};

use crate::app::App;

const LEGEND: [(NodeKind, &str); 5] = [
  (NodeKind::User, "You"),
  (NodeKind::Location, "Location"),
  (NodeKind::Role, "Role"),
  (NodeKind::Company, "Company"),
  (NodeKind::Skill, "Skill"),
];

fn node_color(kind: NodeKind) -> Color { kind.color().parse().unwrap_or(Color::White) }

pub fn draw<S: TagStore + 'static>(f: &mut Frame, area: Rect, app: &App<S>) {
  let graph = app.sync.graph(app.user_name.as_deref());

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(1)])
    .split(area);

  let Some((centre, tags)) = graph.nodes.split_first() else {
    return;
  };

  let title = format!(" Profile graph ({} tags) ", tags.len());
  let canvas = Canvas::default()
    .block(
      Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray)),
    )
    .marker(Marker::Braille)
    .x_bounds([-1.4, 1.4])
    .y_bounds([-1.2, 1.2])
    .paint(|ctx| {
      let n = tags.len().max(1) as f64;
      let points: Vec<(f64, f64)> = (0..tags.len())
        .map(|i| {
          let angle = TAU * i as f64 / n;
          (angle.cos(), angle.sin())
        })
        .collect();

      for &(x2, y2) in &points {
        ctx.draw(&Edge { x1: 0.0, y1: 0.0, x2, y2, color: Color::DarkGray });
      }
      ctx.layer();

      for (node, (x, y)) in tags.iter().zip(&points) {
        let mut span = Span::styled(node.name.clone(), Style::default().fg(node_color(node.kind)));
        if node.val >= CONFIRMED_WEIGHT {
          span = span.bold();
        }
        ctx.print(*x, *y, Line::from(span));
      }
      ctx.print(
        0.0,
        0.0,
        Line::from(Span::styled(centre.name.clone(), Style::default().fg(node_color(centre.kind)).bold())),
      );
    });
  f.render_widget(canvas, rows[0]);

  let legend: Vec<Span> = LEGEND
    .iter()
    .flat_map(|(kind, label)| {
      [
        Span::styled(" ● ", Style::default().fg(node_color(*kind))),
        Span::raw(*label),
      ]
    })
    .collect();
  f.render_widget(Paragraph::new(Line::from(legend)), rows[1]);
}
