use crate::app::AppContext;
use crate::candidates::export::export_to_dir;
use crate::candidates::{listing, Candidate, CandidateFilter, ExperienceLevel, Pager, SortMode};
use crate::ui::components::{KeyResult, Prompt, PromptEvent};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{experience_color, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::{CandidateFormView, GitHubSearchView, ProfileView};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextFilter {
  Role,
  Tech,
}

/// Dashboard: experience summary, filters, and the paged candidate list
pub struct CandidateListView {
  filter: CandidateFilter,
  sort: SortMode,
  pager: Pager,
  list_state: ListState,
  prompt: Prompt,
  editing: Option<TextFilter>,
}

impl CandidateListView {
  pub fn new(page_size: usize) -> Self {
    Self {
      filter: CandidateFilter::default(),
      sort: SortMode::default(),
      pager: Pager::new(page_size),
      list_state: ListState::default(),
      prompt: Prompt::new(),
      editing: None,
    }
  }

  fn matching<'a>(&self, ctx: &'a AppContext) -> Vec<&'a Candidate> {
    listing::apply(ctx.candidates.all(), &self.filter, self.sort)
  }

  fn selected_candidate<'a>(&self, ctx: &'a AppContext) -> Option<&'a Candidate> {
    let matching = self.matching(ctx);
    let visible = self.pager.visible(matching.len());
    self
      .list_state
      .selected()
      .filter(|i| *i < visible)
      .and_then(|i| matching.get(i).copied())
  }

  /// Filters and sort changed: back to the first page and row.
  fn listing_changed(&mut self) {
    self.pager.reset();
    self.list_state.select(Some(0));
  }

  fn set_text_filter(&mut self, value: String) {
    match self.editing {
      Some(TextFilter::Role) => self.filter.role = value,
      Some(TextFilter::Tech) => self.filter.tech = value,
      None => return,
    }
    self.listing_changed();
  }

  fn cycle_experience(&mut self) {
    self.filter.experience = match self.filter.experience {
      None => Some(ExperienceLevel::Junior),
      Some(ExperienceLevel::Junior) => Some(ExperienceLevel::Mid),
      Some(ExperienceLevel::Mid) => Some(ExperienceLevel::Senior),
      Some(ExperienceLevel::Senior) => None,
    };
    self.listing_changed();
  }

  /// Moving onto the last visible row reveals the next page.
  fn move_down(&mut self, ctx: &AppContext) {
    let total = self.matching(ctx).len();
    let visible = self.pager.visible(total);
    if visible == 0 {
      return;
    }

    let next = self
      .list_state
      .selected()
      .map_or(0, |i| (i + 1).min(visible - 1));
    self.list_state.select(Some(next));

    if next + 1 == visible {
      self.pager.load_more(total);
    }
  }

  fn export(&self, ctx: &mut AppContext) {
    let dir = ctx.config.export_dir();
    match export_to_dir(ctx.candidates.all(), &dir) {
      Ok(path) => {
        let message = format!("Exported {} candidates to {}", ctx.candidates.len(), path.display());
        ctx.info(message);
      }
      Err(e) => ctx.error(format!("Export failed: {}", e)),
    }
  }

  fn delete_selected(&mut self, ctx: &mut AppContext) {
    let Some((id, name)) = self
      .selected_candidate(ctx)
      .map(|c| (c.id.clone(), c.full_name.clone()))
    else {
      return;
    };

    match ctx.candidates.delete(&id) {
      Ok(true) => ctx.info(format!("Deleted {}", name)),
      Ok(false) => {}
      Err(e) => ctx.error(format!("Failed to delete {}: {}", name, e)),
    }
  }

  fn open_profile(&self, ctx: &mut AppContext) -> ViewAction {
    let Some(candidate) = self.selected_candidate(ctx) else {
      return ViewAction::None;
    };

    match candidate.github_username() {
      Some(username) => ViewAction::Push(Box::new(ProfileView::new(username, ctx))),
      None => {
        let message = format!("No GitHub username in '{}'", candidate.github_url);
        ctx.error(message);
        ViewAction::None
      }
    }
  }

  fn render_summary(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
    let summary = ctx.candidates.summary();
    let mut spans = Vec::new();
    for level in ExperienceLevel::ALL {
      spans.push(Span::raw("  "));
      spans.push(Span::styled(
        format!("{} Developers: {}", level.label(), summary.count(level)),
        Style::default().fg(experience_color(level)).bold(),
      ));
      spans.push(Span::raw("  "));
    }

    let block = Block::default()
      .title(format!(" Summary ({} total) ", summary.total()))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
  }

  fn render_filters(&self, frame: &mut Frame, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);
    let placeholder = |s: &str, empty: &'static str| {
      if s.is_empty() {
        Span::styled(empty, label)
      } else {
        Span::styled(s.to_string(), value)
      }
    };

    let line = Line::from(vec![
      Span::styled(" Role: ", label),
      placeholder(&self.filter.role, "any"),
      Span::styled("  Experience: ", label),
      Span::styled(
        self.filter.experience.map_or("All Levels", |l| l.label()),
        value,
      ),
      Span::styled("  Tech: ", label),
      placeholder(&self.filter.tech, "any"),
      Span::styled("  Sort: ", label),
      Span::styled(self.sort.label(), value),
    ]);
    frame.render_widget(Paragraph::new(line), area);
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
    let matching = self.matching(ctx);
    let visible = self.pager.visible(matching.len());
    ensure_valid_selection(&mut self.list_state, visible);

    let more = if self.pager.has_more(matching.len()) {
      ", more below"
    } else {
      ""
    };
    let block = Block::default()
      .title(format!(
        " Candidates ({}/{}, page {}{}) ",
        visible,
        matching.len(),
        self.pager.page(),
        more
      ))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if matching.is_empty() {
      let content = if ctx.candidates.is_empty() {
        "No candidates yet. Press 'a' to add one."
      } else {
        "No candidates match the current filters."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = matching
      .iter()
      .take(visible)
      .map(|c| {
        ListItem::new(Line::from(vec![
          Span::styled(
            format!("{:<24}", truncate(&c.full_name, 24)),
            Style::default().bold(),
          ),
          Span::raw(" "),
          Span::raw(format!("{:<24}", truncate(&c.role, 24))),
          Span::raw(" "),
          Span::styled(
            format!("{:<7}", c.experience_level.label()),
            Style::default().fg(experience_color(c.experience_level)),
          ),
          Span::raw(" "),
          Span::styled(
            truncate(&c.tech_stack.join(", "), 40),
            Style::default().fg(Color::DarkGray),
          ),
        ]))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    let Some(c) = self.selected_candidate(ctx) else {
      frame.render_widget(block, area);
      return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let link = Style::default().fg(Color::Cyan);
    let added = chrono::DateTime::parse_from_rfc3339(&c.date_added)
      .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
      .unwrap_or_else(|_| c.date_added.clone());

    let lines = vec![
      Line::from(vec![
        Span::styled(" LinkedIn: ", label),
        Span::styled(c.linkedin_url.clone(), link),
        Span::styled("  GitHub: ", label),
        Span::styled(c.github_url.clone(), link),
      ]),
      Line::from(vec![Span::styled(" Added: ", label), Span::raw(added)]),
    ];
    frame.render_widget(
      Paragraph::new(lines).block(block.title(format!(" {} ", c.full_name))),
      area,
    );
  }
}

impl View for CandidateListView {
  fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> ViewAction {
    match self.prompt.handle_key(key) {
      KeyResult::Handled => return ViewAction::None,
      KeyResult::Event(PromptEvent::Changed(value)) => {
        self.set_text_filter(value);
        return ViewAction::None;
      }
      KeyResult::Event(PromptEvent::Submitted(value)) => {
        self.set_text_filter(value);
        self.editing = None;
        return ViewAction::None;
      }
      KeyResult::NotHandled => {}
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Char('n') if ctrl => return ViewAction::Push(Box::new(CandidateFormView::new())),
      KeyCode::Char('j') | KeyCode::Down => self.move_down(ctx),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => {
        self.editing = Some(TextFilter::Role);
        self.prompt.open("Filter by Role", &self.filter.role);
      }
      KeyCode::Char('t') => {
        self.editing = Some(TextFilter::Tech);
        self.prompt.open("Tech Stack", &self.filter.tech);
      }
      KeyCode::Char('e') => self.cycle_experience(),
      KeyCode::Char('s') => {
        self.sort = self.sort.toggle();
        self.listing_changed();
      }
      KeyCode::Char('c') => {
        self.filter = CandidateFilter::default();
        self.listing_changed();
      }
      KeyCode::Char('x') => self.export(ctx),
      KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(ctx),
      KeyCode::Char('a') => return ViewAction::Push(Box::new(CandidateFormView::new())),
      KeyCode::Char('g') => return ViewAction::Push(Box::new(GitHubSearchView::new())),
      KeyCode::Enter => return self.open_profile(ctx),
      KeyCode::Char('q') => return ViewAction::Quit,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Summary
        Constraint::Length(1), // Filters
        Constraint::Min(3),    // List
        Constraint::Length(4), // Selected candidate
      ])
      .split(area);

    self.render_summary(frame, chunks[0], ctx);
    self.render_filters(frame, chunks[1]);
    self.render_list(frame, chunks[2], ctx);
    self.render_detail(frame, chunks[3], ctx);
    self.prompt.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    if self.filter.is_empty() {
      "Candidates".to_string()
    } else {
      "Candidates (filtered)".to_string()
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("a/ctrl-n", "add"),
      ShortcutInfo::new("r/t/e", "filter"),
      ShortcutInfo::new("s", "sort"),
      ShortcutInfo::new("x", "export"),
      ShortcutInfo::new("d", "delete"),
      ShortcutInfo::new("enter", "github"),
      ShortcutInfo::new("g", "search"),
      ShortcutInfo::new("q", "quit"),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::candidates::CandidateDraft;
  use crate::ui::testing::{context, key, render, type_str};

  fn add(ctx: &mut AppContext, name: &str, role: &str, level: ExperienceLevel, tech: &[&str]) {
    let draft = CandidateDraft {
      full_name: name.to_string(),
      role: role.to_string(),
      linkedin_url: format!("https://linkedin.com/in/{}", name.to_lowercase()),
      github_url: format!("https://github.com/{}", name.to_lowercase()),
      experience_level: level,
      tech_stack: tech.iter().map(|t| t.to_string()).collect(),
    };
    ctx.candidates.add(draft).unwrap();
  }

  fn populated() -> AppContext {
    let mut ctx = context();
    add(&mut ctx, "Carol", "Backend Engineer", ExperienceLevel::Senior, &["Python"]);
    add(&mut ctx, "alice", "Frontend Developer", ExperienceLevel::Junior, &["React"]);
    add(&mut ctx, "Bob", "Backend Developer", ExperienceLevel::Mid, &["Java", "AWS"]);
    ctx
  }

  #[test]
  fn test_renders_summary_and_sorted_list() {
    let ctx = populated();
    let mut view = CandidateListView::new(10);
    let screen = render(&mut view, &ctx);

    assert!(screen.contains("Junior Developers: 1"));
    assert!(screen.contains("Mid Developers: 1"));
    assert!(screen.contains("Senior Developers: 1"));

    let alice = screen.find("alice").unwrap();
    let bob = screen.find("Bob").unwrap();
    let carol = screen.find("Carol").unwrap();
    assert!(alice < bob && bob < carol);
  }

  #[test]
  fn test_selected_candidate_links_shown() {
    let mut ctx = populated();
    let mut view = CandidateListView::new(10);
    let screen = render(&mut view, &ctx);
    assert!(screen.contains("LinkedIn: https://linkedin.com/in/alice"));
    assert!(screen.contains("GitHub: https://github.com/alice"));
    assert!(screen.contains("Added: "));

    view.handle_key(key(KeyCode::Down), &mut ctx);
    let screen = render(&mut view, &ctx);
    assert!(screen.contains("LinkedIn: https://linkedin.com/in/bob"));
  }

  #[test]
  fn test_role_prompt_filters_live() {
    let mut ctx = populated();
    let mut view = CandidateListView::new(10);

    view.handle_key(key(KeyCode::Char('r')), &mut ctx);
    type_str(&mut view, &mut ctx, "backend");
    assert_eq!(view.matching(&ctx).len(), 2);

    view.handle_key(key(KeyCode::Enter), &mut ctx);
    assert_eq!(view.filter.role, "backend");
    assert_eq!(view.breadcrumb_label(), "Candidates (filtered)");

    // keys go back to the list once the prompt is closed
    view.handle_key(key(KeyCode::Char('e')), &mut ctx);
    assert_eq!(view.filter.experience, Some(ExperienceLevel::Junior));
    assert!(view.matching(&ctx).is_empty());
  }

  #[test]
  fn test_scrolling_to_bottom_loads_next_page() {
    let mut ctx = context();
    for i in 0..25 {
      add(&mut ctx, &format!("Dev{i:02}"), "Engineer", ExperienceLevel::Mid, &[]);
    }
    let mut view = CandidateListView::new(10);
    render(&mut view, &ctx);

    for _ in 0..9 {
      view.handle_key(key(KeyCode::Down), &mut ctx);
    }
    assert_eq!(view.pager.page(), 2);

    view.handle_key(key(KeyCode::Char('s')), &mut ctx);
    assert_eq!(view.pager.page(), 1);
  }

  #[test]
  fn test_delete_selected() {
    let mut ctx = populated();
    let mut view = CandidateListView::new(10);
    render(&mut view, &ctx);

    // first row by name is "alice"
    view.handle_key(key(KeyCode::Char('d')), &mut ctx);
    let names: Vec<&str> = ctx.candidates.all().iter().map(|c| c.full_name.as_str()).collect();
    assert_eq!(names, vec!["Carol", "Bob"]);
    assert_eq!(ctx.status().map(|s| s.text.as_str()), Some("Deleted alice"));
  }

  #[test]
  fn test_export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = populated();
    ctx.config.set_export_dir(dir.path().to_path_buf());
    let mut view = CandidateListView::new(10);

    view.handle_key(key(KeyCode::Char('x')), &mut ctx);
    let csv = std::fs::read_to_string(dir.path().join("candidates.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
  }

  #[test]
  fn test_ctrl_n_opens_form() {
    let mut ctx = context();
    let mut view = CandidateListView::new(10);
    let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
    match view.handle_key(ctrl_n, &mut ctx) {
      ViewAction::Push(form) => assert_eq!(form.breadcrumb_label(), "Add Candidate"),
      _ => panic!("expected candidate form"),
    }
  }

  #[tokio::test]
  async fn test_enter_opens_profile() {
    let mut ctx = populated();
    let mut view = CandidateListView::new(10);
    render(&mut view, &ctx);

    match view.handle_key(key(KeyCode::Enter), &mut ctx) {
      ViewAction::Push(profile) => assert_eq!(profile.breadcrumb_label(), "@alice"),
      _ => panic!("expected profile view"),
    }
  }
}
