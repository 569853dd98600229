use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events a prompt reports to its parent view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
  /// Value edited; emitted on every keystroke so filters apply live
  Changed(String),
  /// Enter pressed; the value is kept
  Submitted(String),
}

/// Inline prompt overlay for editing one filter value.
///
/// Escape restores the value the prompt was opened with.
#[derive(Debug, Clone, Default)]
pub struct Prompt {
  title: &'static str,
  input: TextInput,
  original: String,
  active: bool,
}

impl Prompt {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn open(&mut self, title: &'static str, value: &str) {
    self.title = title;
    self.original = value.to_string();
    self.input.set_value(value);
    self.active = true;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<PromptEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(value) => {
        self.active = false;
        KeyResult::Event(PromptEvent::Submitted(value))
      }
      InputResult::Cancelled => {
        self.active = false;
        KeyResult::Event(PromptEvent::Changed(self.original.clone()))
      }
      InputResult::Consumed => KeyResult::Event(PromptEvent::Changed(self.input.value().to_string())),
      // swallow everything else while open
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = overlay_width(area.width);
    let overlay = Rect::new(area.x + 1, area.y + 1, width, 3).intersection(area);
    if overlay.is_empty() {
      return;
    }
    frame.render_widget(Clear, overlay);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.title));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    if inner.height > 0 {
      frame.render_widget(Paragraph::new(Line::from(self.input.spans(true))), inner);
    }
  }
}

/// 60% of the available width, kept between 30 and 60 columns.
fn overlay_width(available: u16) -> u16 {
  let width = u32::from(available) * 60 / 100;
  u16::try_from(width).unwrap_or(u16::MAX).clamp(30, 60)
}
