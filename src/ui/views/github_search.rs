use crate::app::AppContext;
use crate::ui::components::{InputResult, TextInput};
use crate::ui::ensure_valid_selection;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::ProfileView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
  Input,
  History,
}

/// Username search box with the recent-searches list beneath it
pub struct GitHubSearchView {
  input: TextInput,
  focus: Focus,
  history_state: ListState,
}

impl GitHubSearchView {
  pub fn new() -> Self {
    Self {
      input: TextInput::new(),
      focus: Focus::Input,
      history_state: ListState::default(),
    }
  }

  /// Record the search and open the profile. Blank input does nothing.
  fn search(&mut self, username: &str, ctx: &mut AppContext) -> ViewAction {
    let username = username.trim();
    if username.is_empty() {
      return ViewAction::None;
    }

    if let Err(e) = ctx.history.record(username) {
      ctx.error(format!("Failed to save search history: {}", e));
    }
    self.history_state.select(Some(0));
    self.open_profile(username, ctx)
  }

  /// Open the profile without touching the history order.
  fn open_profile(&mut self, username: &str, ctx: &mut AppContext) -> ViewAction {
    self.input.set_value(username);
    ViewAction::Push(Box::new(ProfileView::new(username.to_string(), ctx)))
  }

  fn handle_history_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.history_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => {
        if self.history_state.selected() == Some(0) {
          self.focus = Focus::Input;
        } else {
          self.history_state.select_previous();
        }
      }
      KeyCode::Enter => {
        let entry = self
          .history_state
          .selected()
          .and_then(|i| ctx.history.entries().get(i).cloned());
        if let Some(username) = entry {
          return self.open_profile(&username, ctx);
        }
      }
      KeyCode::Tab | KeyCode::Char('/') => self.focus = Focus::Input,
      KeyCode::Esc | KeyCode::Char('q') => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }
}

impl Default for GitHubSearchView {
  fn default() -> Self {
    Self::new()
  }
}

impl View for GitHubSearchView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> ViewAction {
    if self.focus == Focus::History {
      return self.handle_history_key(key, ctx);
    }

    match key.code {
      KeyCode::Tab | KeyCode::Down if !ctx.history.is_empty() => {
        self.focus = Focus::History;
        self.history_state.select(Some(0));
        ViewAction::None
      }
      _ => match self.input.handle_key(key) {
        InputResult::Submitted(value) => self.search(&value, ctx),
        InputResult::Cancelled => ViewAction::Pop,
        InputResult::Consumed | InputResult::NotHandled => ViewAction::None,
      },
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(3), Constraint::Min(3)])
      .split(area);

    let input_focused = self.focus == Focus::Input;
    let input_line = if self.input.is_empty() && input_focused {
      let mut spans = self.input.spans(true);
      spans.push(Span::styled(
        "Enter GitHub username",
        Style::default().fg(Color::DarkGray),
      ));
      Line::from(spans)
    } else {
      Line::from(self.input.spans(input_focused))
    };
    let input_block = Block::default()
      .title(" GitHub Username ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(if input_focused {
        Color::Yellow
      } else {
        Color::Blue
      }));
    frame.render_widget(Paragraph::new(input_line).block(input_block), chunks[0]);

    let history_block = Block::default()
      .title(" Recent searches ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(if input_focused {
        Color::Blue
      } else {
        Color::Yellow
      }));

    let entries = ctx.history.entries();
    if entries.is_empty() {
      let paragraph = Paragraph::new("No recent searches.")
        .block(history_block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, chunks[1]);
      return;
    }

    ensure_valid_selection(&mut self.history_state, entries.len());
    let items: Vec<ListItem> = entries
      .iter()
      .map(|entry| ListItem::new(Line::from(format!("@{}", entry))))
      .collect();
    let mut list = List::new(items).block(history_block);
    if !input_focused {
      list = list
        .highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ");
    }
    frame.render_stateful_widget(list, chunks[1], &mut self.history_state);
  }

  fn breadcrumb_label(&self) -> String {
    "GitHub Search".to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("enter", "search"),
      ShortcutInfo::new("tab", "history"),
      ShortcutInfo::new("esc", "back"),
    ]
  }
}
