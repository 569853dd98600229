use crate::app::AppContext;
use crate::candidates::{CandidateDraft, ExperienceLevel, TECH_STACK_OPTIONS};
use crate::ui::components::{InputResult, TextInput};
use crate::ui::renderfns::experience_color;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
  FullName,
  Role,
  Linkedin,
  Github,
  Experience,
  TechStack,
  Submit,
}

impl Field {
  const ORDER: [Field; 7] = [
    Field::FullName,
    Field::Role,
    Field::Linkedin,
    Field::Github,
    Field::Experience,
    Field::TechStack,
    Field::Submit,
  ];

  fn label(&self) -> &'static str {
    match self {
      Field::FullName => "Full Name",
      Field::Role => "Job Role / Position",
      Field::Linkedin => "LinkedIn URL",
      Field::Github => "GitHub URL",
      Field::Experience => "Experience Level",
      Field::TechStack => "Tech Stack",
      Field::Submit => "Add Candidate",
    }
  }

  fn text_index(&self) -> Option<usize> {
    match self {
      Field::FullName => Some(0),
      Field::Role => Some(1),
      Field::Linkedin => Some(2),
      Field::Github => Some(3),
      _ => None,
    }
  }

  fn step(&self, forward: bool) -> Field {
    let pos = Self::ORDER.iter().position(|f| f == self).unwrap_or(0);
    let len = Self::ORDER.len();
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
    Self::ORDER[next]
  }
}

/// Form for adding a candidate
pub struct CandidateFormView {
  inputs: [TextInput; 4],
  /// Experience level and tech stack; text fields are copied in on submit
  draft: CandidateDraft,
  tech_cursor: usize,
  focus: Field,
  missing: Vec<&'static str>,
}

impl CandidateFormView {
  pub fn new() -> Self {
    Self {
      inputs: Default::default(),
      draft: CandidateDraft::default(),
      tech_cursor: 0,
      focus: Field::FullName,
      missing: Vec::new(),
    }
  }

  fn draft(&self) -> CandidateDraft {
    CandidateDraft {
      full_name: self.inputs[0].value().to_string(),
      role: self.inputs[1].value().to_string(),
      linkedin_url: self.inputs[2].value().to_string(),
      github_url: self.inputs[3].value().to_string(),
      ..self.draft.clone()
    }
  }

  fn submit(&mut self, ctx: &mut AppContext) {
    let draft = self.draft();
    self.missing = draft.missing_fields();
    if !self.missing.is_empty() {
      ctx.error(format!("Please fill in: {}", self.missing.join(", ")));
      return;
    }

    match ctx.candidates.add(draft) {
      Ok(candidate) => {
        ctx.info(format!("Added {}", candidate.full_name));
        *self = Self::new();
      }
      Err(e) => ctx.error(format!("Failed to save candidate: {}", e)),
    }
  }

  fn handle_field_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> ViewAction {
    if let Some(idx) = self.focus.text_index() {
      return match self.inputs[idx].handle_key(key) {
        InputResult::Submitted(_) => {
          self.focus = self.focus.step(true);
          ViewAction::None
        }
        InputResult::Cancelled => ViewAction::Pop,
        InputResult::Consumed | InputResult::NotHandled => ViewAction::None,
      };
    }

    match (self.focus, key.code) {
      (_, KeyCode::Esc) => return ViewAction::Pop,
      (Field::Experience, KeyCode::Left | KeyCode::Char('h')) => {
        self.draft.experience_level = self.draft.experience_level.prev();
      }
      (Field::Experience, KeyCode::Right | KeyCode::Char('l')) => {
        self.draft.experience_level = self.draft.experience_level.next();
      }
      (Field::TechStack, KeyCode::Left | KeyCode::Char('h')) => {
        self.tech_cursor = self.tech_cursor.saturating_sub(1);
      }
      (Field::TechStack, KeyCode::Right | KeyCode::Char('l')) => {
        self.tech_cursor = (self.tech_cursor + 1).min(TECH_STACK_OPTIONS.len() - 1);
      }
      (Field::TechStack, KeyCode::Char(' ') | KeyCode::Enter) => {
        if let Some(tech) = TECH_STACK_OPTIONS.get(self.tech_cursor) {
          self.draft.toggle_tech(tech);
        }
      }
      (Field::Submit, KeyCode::Enter) => self.submit(ctx),
      (_, KeyCode::Enter) => self.focus = self.focus.step(true),
      _ => {}
    }
    ViewAction::None
  }

  fn field_block(&self, field: Field) -> Block<'static> {
    let missing = self.missing.contains(&field.label());
    let color = match (self.focus == field, missing) {
      (true, _) => Color::Yellow,
      (false, true) => Color::Red,
      (false, false) => Color::Blue,
    };
    let title = if field.text_index().is_some() {
      format!(" {} * ", field.label())
    } else {
      format!(" {} ", field.label())
    };
    Block::default()
      .title(title)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(color))
  }

  fn experience_line(&self) -> Line<'static> {
    let current = self.draft.experience_level;
    let spans = ExperienceLevel::ALL
      .iter()
      .flat_map(|level| {
        let marker = if *level == current { "(•) " } else { "( ) " };
        let style = if *level == current {
          Style::default().fg(experience_color(*level)).bold()
        } else {
          Style::default().fg(Color::DarkGray)
        };
        [Span::styled(format!("{}{}", marker, level.label()), style), Span::raw("   ")]
      })
      .collect::<Vec<_>>();
    Line::from(spans)
  }

  fn tech_line(&self) -> Line<'static> {
    let focused = self.focus == Field::TechStack;
    let spans = TECH_STACK_OPTIONS
      .iter()
      .enumerate()
      .flat_map(|(i, tech)| {
        let selected = self.draft.tech_stack.iter().any(|t| t == tech);
        let mut style = if selected {
          Style::default().fg(Color::Green).bold()
        } else {
          Style::default().fg(Color::DarkGray)
        };
        if focused && i == self.tech_cursor {
          style = style.add_modifier(Modifier::REVERSED);
        }
        let mark = if selected { "[x] " } else { "[ ] " };
        [Span::styled(format!("{}{}", mark, tech), style), Span::raw("  ")]
      })
      .collect::<Vec<_>>();
    Line::from(spans)
  }
}

impl Default for CandidateFormView {
  fn default() -> Self {
    Self::new()
  }
}

impl View for CandidateFormView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> ViewAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Char('s') if ctrl => {
        self.submit(ctx);
        ViewAction::None
      }
      KeyCode::Char('n') if ctrl => ViewAction::Pop,
      KeyCode::Tab | KeyCode::Down => {
        self.focus = self.focus.step(true);
        ViewAction::None
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = self.focus.step(false);
        ViewAction::None
      }
      _ => self.handle_field_key(key, ctx),
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, _ctx: &AppContext) {
    let rows = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
      ])
      .split(area);

    for field in [Field::FullName, Field::Role, Field::Linkedin, Field::Github] {
      let Some(idx) = field.text_index() else {
        continue;
      };
      let line = Line::from(self.inputs[idx].spans(self.focus == field));
      frame.render_widget(Paragraph::new(line).block(self.field_block(field)), rows[idx]);
    }

    frame.render_widget(
      Paragraph::new(self.experience_line()).block(self.field_block(Field::Experience)),
      rows[4],
    );
    frame.render_widget(
      Paragraph::new(self.tech_line()).block(self.field_block(Field::TechStack)),
      rows[5],
    );

    let submit_style = if self.focus == Field::Submit {
      Style::default().fg(Color::Black).bg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::Cyan)
    };
    frame.render_widget(
      Paragraph::new(Span::styled(" Add Candidate ", submit_style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Blue))),
      rows[6],
    );
  }

  fn breadcrumb_label(&self) -> String {
    "Add Candidate".to_string()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("tab", "next field"),
      ShortcutInfo::new("←/→", "choose"),
      ShortcutInfo::new("space", "toggle tech"),
      ShortcutInfo::new("ctrl-s", "save"),
      ShortcutInfo::new("esc/ctrl-n", "back"),
    ]
  }
}
