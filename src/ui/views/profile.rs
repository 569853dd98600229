use crate::app::AppContext;
use crate::github::fetcher::{repos_error_message, user_error_message};
use crate::github::repos::{self, RepoSort};
use crate::github::{CacheSource, Fetched, GitHubUser, Repository};
use crate::query::{Query, QueryState};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

/// GitHub user card plus their top repositories
pub struct ProfileView {
  username: String,
  user: Query<Fetched<GitHubUser>>,
  repos: Query<Fetched<Vec<Repository>>>,
  language: Option<String>,
  sort: RepoSort,
  limit: usize,
  list_state: ListState,
}

impl ProfileView {
  /// Create the view and start both fetches.
  pub fn new(username: String, ctx: &AppContext) -> Self {
    let github = ctx.github.clone();
    let name = username.clone();
    let mut user = Query::new(move || {
      let github = github.clone();
      let name = name.clone();
      async move {
        github
          .fetch_user(&name)
          .await
          .map_err(|e| user_error_message(&e))
      }
    });

    let github = ctx.github.clone();
    let name = username.clone();
    let mut repos = Query::new(move || {
      let github = github.clone();
      let name = name.clone();
      async move {
        github
          .fetch_repos(&name)
          .await
          .map_err(|e| repos_error_message(&e))
      }
    });

    user.start();
    repos.start();

    Self {
      username,
      user,
      repos,
      language: None,
      sort: RepoSort::default(),
      limit: ctx.config.github.repo_limit,
      list_state: ListState::default(),
    }
  }

  fn all_repos(&self) -> &[Repository] {
    self.repos.data().map(|f| f.data.as_slice()).unwrap_or(&[])
  }

  fn selected_repos(&self) -> Vec<&Repository> {
    repos::select(
      self.all_repos(),
      self.language.as_deref(),
      self.sort,
      self.limit,
    )
  }

  /// All -> each language in order -> All.
  fn cycle_language(&mut self) {
    let languages = repos::languages(self.all_repos());
    self.language = match &self.language {
      None => languages.first().cloned(),
      Some(current) => languages
        .iter()
        .position(|l| l == current)
        .and_then(|i| languages.get(i + 1))
        .cloned(),
    };
    self.list_state.select(Some(0));
  }

  fn render_user(&self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" @{} ", self.username))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let dim = Style::default().fg(Color::DarkGray);
    let lines = match self.user.state() {
      QueryState::Idle | QueryState::Loading => vec![Line::styled("Loading profile...", dim)],
      QueryState::Error(e) => vec![Line::styled(e.clone(), Style::default().fg(Color::Red))],
      QueryState::Success(fetched) => {
        let user = &fetched.data;
        let mut lines = vec![Line::from(vec![
          Span::styled(user.display_name().to_string(), Style::default().bold()),
          Span::styled(format!("  @{}", user.login), dim),
          Span::styled(source_label(fetched.source), dim),
        ])];
        if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
          lines.push(Line::raw(bio.to_string()));
        }
        if let Some(location) = user.location.as_deref().filter(|l| !l.is_empty()) {
          lines.push(Line::styled(format!("Location: {}", location), dim));
        }
        lines.push(Line::raw(format!(
          "{} followers · {} following",
          user.followers, user.following
        )));
        lines.push(Line::styled(user.html_url.clone(), Style::default().fg(Color::Cyan)));
        lines
      }
    };

    frame.render_widget(
      Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
      area,
    );
  }

  fn render_repos(&mut self, frame: &mut Frame, area: Rect) {
    let title = format!(
      " Repositories [language: {} | sort: {}] ",
      self.language.as_deref().unwrap_or("All"),
      self.sort.label()
    );
    let block = Block::default()
      .title(title)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let message = match self.repos.state() {
      QueryState::Idle | QueryState::Loading => Some(("Loading repositories...", Color::DarkGray)),
      QueryState::Error(e) => {
        let paragraph = Paragraph::new(e.clone())
          .block(block)
          .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
        return;
      }
      QueryState::Success(_) => None,
    };
    if let Some((text, color)) = message {
      frame.render_widget(Paragraph::new(text).block(block).style(Style::default().fg(color)), area);
      return;
    }

    let items: Vec<ListItem> = self
      .selected_repos()
      .into_iter()
      .map(|repo| {
        let mut lines = vec![Line::from(vec![
          Span::styled(format!("{:<32}", truncate(&repo.name, 32)), Style::default().bold()),
          Span::styled(
            format!(" ★ {:<6}", repo.stargazers_count),
            Style::default().fg(Color::Yellow),
          ),
          Span::styled(
            format!(" ⑂ {:<5}", repo.forks_count),
            Style::default().fg(Color::DarkGray),
          ),
          Span::styled(
            format!(" {}", repo.language.as_deref().unwrap_or("")),
            Style::default().fg(Color::Cyan),
          ),
        ])];
        if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
          lines.push(Line::styled(
            format!("  {}", truncate(description, 90)),
            Style::default().fg(Color::DarkGray),
          ));
        }
        ListItem::new(lines)
      })
      .collect();

    if items.is_empty() {
      let paragraph = Paragraph::new("No repositories found.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    ensure_valid_selection(&mut self.list_state, items.len());
    let list = List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray))
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

fn source_label(source: CacheSource) -> &'static str {
  match source {
    CacheSource::Cache => "  (cached)",
    CacheSource::Network => "",
  }
}

impl View for ProfileView {
  fn handle_key(&mut self, key: KeyEvent, _ctx: &mut AppContext) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('l') => self.cycle_language(),
      KeyCode::Char('s') => {
        self.sort = self.sort.toggle();
        self.list_state.select(Some(0));
      }
      KeyCode::Char('r') => {
        self.user.restart();
        self.repos.restart();
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, _ctx: &AppContext) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(8), Constraint::Min(3)])
      .split(area);

    self.render_user(frame, chunks[0]);
    self.render_repos(frame, chunks[1]);
  }

  fn breadcrumb_label(&self) -> String {
    format!("@{}", self.username)
  }

  fn tick(&mut self, _ctx: &mut AppContext) {
    self.user.poll();
    self.repos.poll();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new("l", "language"),
      ShortcutInfo::new("s", "sort"),
      ShortcutInfo::new("r", "refresh"),
      ShortcutInfo::new("esc", "back"),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::{KeyValueStore, MemoryStore};
  use crate::ui::testing::{context_with, key, render};
  use std::sync::Arc;
  use std::time::Duration;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  async fn settle(view: &mut ProfileView, ctx: &mut AppContext) {
    for _ in 0..100 {
      view.tick(ctx);
      if !view.user.is_loading() && !view.repos.is_loading() {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("profile queries did not settle");
  }

  fn repo(id: u64, name: &str, stars: u64, language: &str) -> serde_json::Value {
    serde_json::json!({
      "id": id,
      "name": name,
      "description": format!("{name} description"),
      "html_url": format!("https://github.com/octocat/{name}"),
      "stargazers_count": stars,
      "forks_count": 1,
      "language": language
    })
  }

  async fn server_with_profile() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/users/octocat"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "login": "octocat",
        "name": "The Octocat",
        "avatar_url": "https://avatars.example/octocat",
        "html_url": "https://github.com/octocat",
        "location": "San Francisco",
        "bio": "Mascot",
        "followers": 42,
        "following": 7
      })))
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(path("/users/octocat/repos"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
        repo(1, "spoon-knife", 10, "HTML"),
        repo(2, "hello-world", 50, "Rust"),
        repo(3, "linguist", 30, "Ruby"),
      ])))
      .mount(&server)
      .await;
    server
  }

  #[tokio::test]
  async fn test_renders_profile_and_repos() {
    let server = server_with_profile().await;
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut ctx = context_with(store, &server.uri());
    let mut view = ProfileView::new("octocat".to_string(), &ctx);
    settle(&mut view, &mut ctx).await;

    let screen = render(&mut view, &ctx);
    assert!(screen.contains("The Octocat"), "{screen}");
    assert!(screen.contains("42 followers · 7 following"), "{screen}");

    let hello = screen.find("hello-world").unwrap();
    let linguist = screen.find("linguist").unwrap();
    let spoon = screen.find("spoon-knife").unwrap();
    assert!(hello < linguist && linguist < spoon);
  }

  #[tokio::test]
  async fn test_language_filter_and_sort() {
    let server = server_with_profile().await;
    let mut ctx = context_with(Arc::new(MemoryStore::new()), &server.uri());
    let mut view = ProfileView::new("octocat".to_string(), &ctx);
    settle(&mut view, &mut ctx).await;

    // HTML, Ruby, Rust
    view.handle_key(key(KeyCode::Char('l')), &mut ctx);
    assert_eq!(view.language.as_deref(), Some("HTML"));
    let names: Vec<&str> = view.selected_repos().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["spoon-knife"]);

    for _ in 0..3 {
      view.handle_key(key(KeyCode::Char('l')), &mut ctx);
    }
    assert_eq!(view.language, None);

    view.handle_key(key(KeyCode::Char('s')), &mut ctx);
    let names: Vec<&str> = view.selected_repos().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["hello-world", "linguist", "spoon-knife"]);
  }

  #[tokio::test]
  async fn test_not_found_shows_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let mut ctx = context_with(Arc::new(MemoryStore::new()), &server.uri());
    let mut view = ProfileView::new("ghost".to_string(), &ctx);
    settle(&mut view, &mut ctx).await;

    let screen = render(&mut view, &ctx);
    assert!(screen.contains("User not found"), "{screen}");
    assert!(screen.contains("Failed to fetch repositories"), "{screen}");
  }
}
