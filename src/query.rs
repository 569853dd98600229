//! Background fetch state machine used by views that load remote data.
//!
//! A [`Query`] owns a fetcher closure. Starting it spawns the future on the
//! tokio runtime and moves the query to `Loading`; the UI tick calls
//! [`Query::poll`], which drains the result channel without blocking and
//! moves to `Success` or `Error`:
//!
//! ```text
//! Idle --start--> Loading --poll--> Success(T) | Error(msg)
//!                    ^                    |
//!                    +------restart-------+
//! ```
//!
//! Dropping a query (or restarting it) drops the receiver. The spawned task
//! still runs to completion but its result is discarded.

use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
  Idle,
  Loading,
  Success(T),
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }
}

type QueryFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;
type Fetcher<T> = Box<dyn Fn() -> QueryFuture<T> + Send + Sync>;

pub struct Query<T> {
  state: QueryState<T>,
  fetcher: Fetcher<T>,
  pending: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
}

impl<T: Send + 'static> Query<T> {
  /// Wrap `fetcher`; nothing runs until [`Query::start`].
  ///
  /// Errors are already mapped to the message the view displays.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      pending: None,
    }
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// Start a fetch unless one is already in flight.
  pub fn start(&mut self) {
    if !self.state.is_loading() {
      self.spawn();
    }
  }

  /// Discard any in-flight result and fetch again.
  pub fn restart(&mut self) {
    self.pending = None;
    self.spawn();
  }

  /// Returns `true` when the state changed.
  pub fn poll(&mut self) -> bool {
    let Some(rx) = self.pending.as_mut() else {
      return false;
    };

    let next = match rx.try_recv() {
      Ok(Ok(data)) => QueryState::Success(data),
      Ok(Err(message)) => QueryState::Error(message),
      Err(mpsc::error::TryRecvError::Empty) => return false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        QueryState::Error("Request was cancelled".to_string())
      }
    };

    self.state = next;
    self.pending = None;
    true
  }

  fn spawn(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    let future = (self.fetcher)();
    self.pending = Some(rx);
    self.state = QueryState::Loading;

    tokio::spawn(async move {
      // receiver is gone when the view was left
      let _ = tx.send(future.await);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("pending", &self.pending.is_some())
      .finish_non_exhaustive()
  }
}
