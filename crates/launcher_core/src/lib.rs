use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use serde::Serialize;
use shared::domain::{Instance, ListKind, NewsItem};
use tokio::{
    sync::{broadcast, RwLock},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

pub mod error;
mod fetch_slot;
pub mod http_source;
pub mod source;

pub use error::FetchError;
pub use http_source::HttpDataSource;
pub use source::{DataSource, MissingDataSource, PlaceholderDataSource};

use fetch_slot::FetchSlot;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct StateOptions {
    pub fetch_timeout: Duration,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    ThemeChanged { dark_theme: bool },
    InstancesReplaced { count: usize },
    NewsReplaced { count: usize },
    FetchFailed { list: ListKind, error: FetchError },
}

/// Owned copy of the launcher state at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSnapshot {
    pub dark_theme: bool,
    pub instances: Vec<Instance>,
    pub news: Vec<NewsItem>,
}

/// Application-wide launcher UI state.
///
/// Starts with the dark theme on and both lists empty. The lists only
/// change through [`fetch_instances`](Self::fetch_instances) and
/// [`fetch_news`](Self::fetch_news), which replace them wholesale, and only
/// when the data source succeeds.
pub struct LauncherState {
    source: Arc<dyn DataSource>,
    options: StateOptions,
    dark_theme: AtomicBool,
    instances: RwLock<Vec<Instance>>,
    news: RwLock<Vec<NewsItem>>,
    instances_fetch: FetchSlot,
    news_fetch: FetchSlot,
    events: broadcast::Sender<StateEvent>,
}

impl LauncherState {
    pub fn new(source: Arc<dyn DataSource>) -> Arc<Self> {
        Self::with_options(source, StateOptions::default())
    }

    pub fn placeholder() -> Arc<Self> {
        Self::new(Arc::new(PlaceholderDataSource))
    }

    pub fn with_options(source: Arc<dyn DataSource>, options: StateOptions) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            source,
            options,
            dark_theme: AtomicBool::new(true),
            instances: RwLock::new(Vec::new()),
            news: RwLock::new(Vec::new()),
            instances_fetch: FetchSlot::new(),
            news_fetch: FetchSlot::new(),
            events,
        })
    }

    pub fn dark_theme(&self) -> bool {
        self.dark_theme.load(Ordering::SeqCst)
    }

    /// Flips the theme flag and returns the new value.
    pub fn toggle_theme(&self) -> bool {
        let dark_theme = !self.dark_theme.fetch_xor(true, Ordering::SeqCst);
        debug!("theme: dark_theme={dark_theme}");
        self.emit(StateEvent::ThemeChanged { dark_theme });
        dark_theme
    }

    pub async fn instances(&self) -> Vec<Instance> {
        self.instances.read().await.clone()
    }

    pub async fn news(&self) -> Vec<NewsItem> {
        self.news.read().await.clone()
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            dark_theme: self.dark_theme(),
            instances: self.instances().await,
            news: self.news().await,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }

    /// Replaces the instance list with what the data source reports.
    ///
    /// On failure the previous list is kept. Concurrent callers share one
    /// request.
    pub async fn fetch_instances(&self) -> Result<(), FetchError> {
        let (outcome, coalesced) = self
            .instances_fetch
            .run(move || async move {
                let instances = self
                    .bounded(ListKind::Instances, self.source.list_instances())
                    .await?;
                let count = instances.len();
                *self.instances.write().await = instances;
                info!("fetch: replaced instances count={count}");
                self.emit(StateEvent::InstancesReplaced { count });
                Ok(())
            })
            .await;
        if coalesced {
            debug!("fetch: instances joined in-flight request");
        }
        outcome
    }

    pub async fn fetch_news(&self) -> Result<(), FetchError> {
        let (outcome, coalesced) = self
            .news_fetch
            .run(move || async move {
                let news = self
                    .bounded(ListKind::News, self.source.list_news())
                    .await?;
                let count = news.len();
                *self.news.write().await = news;
                info!("fetch: replaced news count={count}");
                self.emit(StateEvent::NewsReplaced { count });
                Ok(())
            })
            .await;
        if coalesced {
            debug!("fetch: news joined in-flight request");
        }
        outcome
    }

    /// Runs [`fetch_instances`](Self::fetch_instances) on its own task.
    /// Aborting the handle cancels the fetch and keeps the current list.
    pub fn spawn_fetch_instances(self: &Arc<Self>) -> JoinHandle<Result<(), FetchError>> {
        let state = Arc::clone(self);
        tokio::spawn(async move { state.fetch_instances().await })
    }

    pub fn spawn_fetch_news(self: &Arc<Self>) -> JoinHandle<Result<(), FetchError>> {
        let state = Arc::clone(self);
        tokio::spawn(async move { state.fetch_news().await })
    }

    async fn bounded<T>(
        &self,
        list: ListKind,
        request: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        let timeout = self.options.fetch_timeout;
        let result = match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };
        if let Err(error) = &result {
            warn!(
                "fetch: {} failed, keeping last known list: {error}",
                list.as_str()
            );
            self.emit(StateEvent::FetchFailed {
                list,
                error: error.clone(),
            });
        }
        result
    }

    fn emit(&self, event: StateEvent) {
        // Fails only when nobody is subscribed.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
