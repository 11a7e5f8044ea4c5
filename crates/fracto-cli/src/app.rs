//! Application state machine and event dispatcher.
//!
//! Mutations run as spawned tasks so the list keeps redrawing while a request
//! is in flight; the optimistic state lives in [`ProfileSync`] and the
//! outcome of each task comes back over a channel for the status bar.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fracto_core::{
  InputKind, ItemType, ProfileItem, category::OTHER_OPTION, store::TagStore,
};
use fracto_sync::{PollGuard, ProfileSync, SyncError};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use tokio::sync::mpsc;

// ─── Modes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Sections,
  Graph,
}

/// What a submitted value is for.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
  Add(ItemType),
  Edit(ProfileItem),
}

impl Target {
  pub fn item_type(&self) -> ItemType {
    match self {
      Self::Add(t) => *t,
      Self::Edit(item) => item.item_type,
    }
  }
}

/// Suggestion list with a fuzzy filter, for choice categories.
#[derive(Debug, Clone, PartialEq)]
pub struct Picker {
  pub target: Target,
  pub query:  String,
  pub cursor: usize,
}

impl Picker {
  fn new(target: Target) -> Self {
    Self { target, query: String::new(), cursor: 0 }
  }

  /// Suggestions matching the query, best first. `Other...` always stays
  /// available at the end.
  pub fn matches(&self) -> Vec<&'static str> {
    let options = self.target.item_type().spec().input.options();
    let suggestions = options.iter().copied().filter(|o| *o != OTHER_OPTION);

    let mut out: Vec<&'static str> = if self.query.is_empty() {
      suggestions.collect()
    } else {
      let matcher = SkimMatcherV2::default();
      let mut scored: Vec<(i64, &'static str)> = suggestions
        .filter_map(|o| matcher.fuzzy_match(o, &self.query).map(|score| (score, o)))
        .collect();
      scored.sort_by(|a, b| b.0.cmp(&a.0));
      scored.into_iter().map(|(_, o)| o).collect()
    };
    out.push(OTHER_OPTION);
    out
  }
}

/// Single-line text entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TextInput {
  pub target: Target,
  pub buffer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
  Browse,
  Picker(Picker),
  Input(TextInput),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  /// Cached profile, shared with the polling task and in-flight mutations.
  pub sync: Arc<ProfileSync<S>>,

  /// Name on the centre node of the graph view.
  pub user_name: Option<String>,

  pub view: View,
  pub mode: Mode,

  /// Index into [`ItemType::ALL`] of the focused section.
  pub section: usize,

  /// Cursor within the focused section's items.
  pub cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  outcomes_tx: mpsc::UnboundedSender<String>,
  outcomes_rx: mpsc::UnboundedReceiver<String>,
  _poll:       Option<PollGuard>,
}

impl<S: TagStore + 'static> App<S> {
  pub fn new(sync: Arc<ProfileSync<S>>, user_name: Option<String>) -> Self {
    let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
    Self {
      sync,
      user_name,
      view: View::Sections,
      mode: Mode::Browse,
      section: 0,
      cursor: 0,
      status_msg: String::new(),
      outcomes_tx,
      outcomes_rx,
      _poll: None,
    }
  }

  /// Keep `guard` alive for as long as the app runs.
  pub fn with_polling(mut self, guard: PollGuard) -> Self {
    self._poll = Some(guard);
    self
  }

  // ── Derived state ─────────────────────────────────────────────────────────

  pub fn focused_type(&self) -> ItemType { ItemType::ALL[self.section] }

  pub fn focused_items(&self) -> Vec<ProfileItem> { self.sync.items_of(self.focused_type()) }

  pub fn cursor_item(&self) -> Option<ProfileItem> {
    self.focused_items().into_iter().nth(self.cursor)
  }

  /// Adding is closed on a single-valued section that already has a value.
  pub fn can_add(&self, item_type: ItemType) -> bool {
    !item_type.is_single() || self.sync.items_of(item_type).is_empty()
  }

  /// Move finished task outcomes into the status bar and keep the cursor in
  /// range of a list that may have shrunk.
  pub fn tick(&mut self) {
    while let Ok(msg) = self.outcomes_rx.try_recv() {
      self.status_msg = msg;
    }
    let len = self.focused_items().len();
    if self.cursor >= len {
      self.cursor = len.saturating_sub(1);
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match std::mem::replace(&mut self.mode, Mode::Browse) {
      Mode::Browse => return self.handle_browse_key(key),
      Mode::Picker(picker) => self.mode = self.handle_picker_key(picker, key),
      Mode::Input(input) => self.mode = self.handle_input_key(input, key),
    }
    true
  }

  fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      // Sections
      KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
        self.section = (self.section + 1) % ItemType::ALL.len();
        self.cursor = 0;
      }
      KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
        self.section = (self.section + ItemType::ALL.len() - 1) % ItemType::ALL.len();
        self.cursor = 0;
      }

      // Items
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < self.focused_items().len() {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      KeyCode::Char('a') => self.begin_add(),
      KeyCode::Char('e') => self.begin_edit(),
      KeyCode::Char('d') => self.delete_cursor_item(),

      KeyCode::Char('g') => {
        self.view = match self.view {
          View::Sections => View::Graph,
          View::Graph => View::Sections,
        };
      }
      KeyCode::Char('r') => self.spawn_refresh(),

      _ => {}
    }
    true
  }

  fn handle_picker_key(&mut self, mut picker: Picker, key: KeyEvent) -> Mode {
    match key.code {
      KeyCode::Esc => return Mode::Browse,
      KeyCode::Down => {
        if picker.cursor + 1 < picker.matches().len() {
          picker.cursor += 1;
        }
      }
      KeyCode::Up => picker.cursor = picker.cursor.saturating_sub(1),
      KeyCode::Backspace => {
        picker.query.pop();
        picker.cursor = 0;
      }
      KeyCode::Char(c) => {
        picker.query.push(c);
        picker.cursor = 0;
      }
      KeyCode::Enter => {
        let choice = picker.matches().get(picker.cursor).copied();
        return match choice {
          Some(OTHER_OPTION) | None => Mode::Input(TextInput {
            target: picker.target,
            buffer: picker.query,
          }),
          Some(value) => {
            self.submit(picker.target, value.to_owned());
            Mode::Browse
          }
        };
      }
      _ => {}
    }
    Mode::Picker(picker)
  }

  fn handle_input_key(&mut self, mut input: TextInput, key: KeyEvent) -> Mode {
    match key.code {
      KeyCode::Esc => return Mode::Browse,
      KeyCode::Backspace => {
        input.buffer.pop();
      }
      KeyCode::Char(c) => input.buffer.push(c),
      KeyCode::Enter => {
        if input.buffer.trim().is_empty() {
          self.status_msg = "Value cannot be empty".into();
          return Mode::Input(input);
        }
        self.submit(input.target, input.buffer);
        return Mode::Browse;
      }
      _ => {}
    }
    Mode::Input(input)
  }

  // ── Actions ───────────────────────────────────────────────────────────────

  fn begin_add(&mut self) {
    let item_type = self.focused_type();
    if !self.can_add(item_type) {
      self.status_msg = format!("{} holds one value; press e to change it", item_type.spec().label);
      return;
    }
    self.mode = match item_type.spec().input {
      InputKind::Choice { .. } => Mode::Picker(Picker::new(Target::Add(item_type))),
      InputKind::FreeText => Mode::Input(TextInput {
        target: Target::Add(item_type),
        buffer: String::new(),
      }),
    };
  }

  fn begin_edit(&mut self) {
    let Some(item) = self.cursor_item() else {
      return;
    };
    if !item.is_persisted() {
      self.status_msg = "Still saving; try again in a moment".into();
      return;
    }
    let buffer = item.value.clone();
    self.mode = Mode::Input(TextInput { target: Target::Edit(item), buffer });
  }

  fn delete_cursor_item(&mut self) {
    let Some(id) = self.cursor_item().and_then(|i| i.id) else {
      return;
    };
    let sync = Arc::clone(&self.sync);
    self.spawn(async move { sync.delete(id).await.map(|()| "Deleted".to_owned()) });
  }

  fn submit(&mut self, target: Target, value: String) {
    let sync = Arc::clone(&self.sync);
    self.spawn(async move {
      let item = match &target {
        Target::Add(item_type) => sync.add(*item_type, &value).await?,
        Target::Edit(old) => sync.edit(old, &value).await?,
      };
      Ok(format!("Saved {}", item.display_value()))
    });
  }

  fn spawn_refresh(&mut self) {
    let sync = Arc::clone(&self.sync);
    self.status_msg = "Refreshing…".into();
    self.spawn(async move { sync.request_refresh().await.map(|()| "Up to date".to_owned()) });
  }

  fn spawn<F>(&self, task: F)
  where
    F: Future<Output = Result<String, SyncError>> + Send + 'static,
  {
    let tx = self.outcomes_tx.clone();
    tokio::spawn(async move {
      let msg = match task.await {
        Ok(msg) => msg,
        Err(e) => format!("Error: {e}"),
      };
      // The receiver only goes away when the app is shutting down.
      let _ = tx.send(msg);
    });
  }
}
