use crate::candidates::CandidateRepository;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::github::{CachedGitHubClient, GitHubClient};
use crate::history::SearchHistory;
use crate::store::KeyValueStore;
use crate::ui::renderfns::{draw_footer, draw_header};
use crate::ui::view::{View, ViewAction};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
  Info,
  Warning,
  Error,
}

/// One-line message shown in the footer until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
  pub kind: StatusKind,
  pub text: String,
}

/// Domain state shared by every view
pub struct AppContext {
  pub candidates: CandidateRepository,
  pub history: SearchHistory,
  pub github: CachedGitHubClient,
  pub config: Config,
  status: Option<Status>,
}

impl AppContext {
  pub fn new(store: Arc<dyn KeyValueStore>, config: Config) -> Result<Self> {
    let candidates = CandidateRepository::load(store.clone())?;
    let history = SearchHistory::load(store.clone())?;
    let github = CachedGitHubClient::new(
      GitHubClient::new(&config.github.api_url)?,
      store,
      config.github.cache_ttl(),
    );

    let status = candidates.load_warning().map(|text| Status {
      kind: StatusKind::Warning,
      text: text.to_string(),
    });

    Ok(Self {
      candidates,
      history,
      github,
      config,
      status,
    })
  }

  pub fn status(&self) -> Option<&Status> {
    self.status.as_ref()
  }

  pub fn info(&mut self, text: impl Into<String>) {
    self.set_status(StatusKind::Info, text.into());
  }

  pub fn error(&mut self, text: impl Into<String>) {
    let text = text.into();
    warn!(%text, "shown to user");
    self.set_status(StatusKind::Error, text);
  }

  pub fn clear_status(&mut self) {
    self.status = None;
  }

  fn set_status(&mut self, kind: StatusKind, text: String) {
    self.status = Some(Status { kind, text });
  }
}

/// Main application: a stack of views over a shared context
pub struct App {
  /// Navigation stack, root at index 0
  views: Vec<Box<dyn View>>,
  ctx: AppContext,
  should_quit: bool,
}

impl App {
  pub fn new(ctx: AppContext, root: Box<dyn View>) -> Self {
    Self {
      views: vec![root],
      ctx,
      should_quit: false,
    }
  }

  pub fn ctx(&self) -> &AppContext {
    &self.ctx
  }

  pub fn push(&mut self, view: Box<dyn View>) {
    self.views.push(view);
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.event_loop().await;

    // restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(Duration::from_millis(250));
    info!("started");

    while !self.should_quit() {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    info!("exiting");
    Ok(())
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    self.ctx.clear_status();
    let Some(view) = self.views.last_mut() else {
      self.should_quit = true;
      return;
    };

    match view.handle_key(key, &mut self.ctx) {
      ViewAction::None => {}
      ViewAction::Push(next) => self.views.push(next),
      ViewAction::Pop if self.views.len() > 1 => {
        self.views.pop();
      }
      ViewAction::Pop | ViewAction::Quit => self.should_quit = true,
    }
  }

  pub fn tick(&mut self) {
    if let Some(view) = self.views.last_mut() {
      view.tick(&mut self.ctx);
    }
  }

  pub fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    let breadcrumb: Vec<String> = self.views.iter().map(|v| v.breadcrumb_label()).collect();

    if let Some(view) = self.views.last_mut() {
      draw_header(frame, chunks[0], &view.shortcuts());
      view.render(frame, chunks[1], &self.ctx);
    }

    draw_footer(frame, chunks[2], &breadcrumb, self.ctx.status());
  }
}
