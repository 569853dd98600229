use crate::app::AppContext;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self { key, label }
  }
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back); quits at the root
  Pop,
  Quit,
}

/// Trait for view behavior
///
/// Views own their UI state (selection, prompts, queries) and read or mutate
/// shared domain state through the [`AppContext`] handed in by the App.
/// Views that load data asynchronously hold a `Query<T>` and poll it in
/// `tick()`.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> ViewAction;

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &AppContext);

  fn breadcrumb_label(&self) -> String;

  /// Called on each tick to allow views to poll async queries
  fn tick(&mut self, _ctx: &mut AppContext) {}

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("esc", "back")]
  }
}
