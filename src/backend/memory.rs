//! In-memory `LinkBackend`.
//!
//! Reference implementation of the backend contract and the crate's test
//! double: fully in-memory, seedable, with canned previews, a preview
//! notification channel and per-call failure toggles for exercising the
//! core's fallback paths.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::backend::LinkBackend;
use crate::types::errors::BackendError;
use crate::types::link::{
    Enrichment, LinkDetails, LinkProperties, OpenGraph, PreviewReady, RankConfig, ScoreEntry,
};

#[derive(Default)]
struct State {
    /// Insertion-ordered so `list_link_names` has a deterministic natural order.
    links: Vec<(String, LinkDetails)>,
    scores: Vec<ScoreEntry>,
    rank_config: Option<RankConfig>,
    previews: HashMap<String, OpenGraph>,
    preview_tx: Option<UnboundedSender<PreviewReady>>,
    fail_scores: bool,
    fail_set_scores: bool,
    fail_rank_config: bool,
}

/// In-memory backend, shareable across tasks.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Seeds a stored link under an explicit name.
    pub fn insert_link(&self, name: &str, details: LinkDetails) {
        self.lock().links.push((name.to_string(), details));
    }

    /// Seeds one score table row.
    pub fn insert_score(&self, entry: ScoreEntry) {
        self.lock().scores.push(entry);
    }

    /// Seeds the persisted rank config.
    pub fn put_rank_config(&self, config: RankConfig) {
        self.lock().rank_config = Some(config);
    }

    /// Registers a canned preview for `request_preview`.
    pub fn put_preview(&self, url: &str, graph: OpenGraph) {
        self.lock().previews.insert(url.to_string(), graph);
    }

    /// Opens the inbound preview-notification channel and returns its
    /// receiving end; `push_preview` delivers into it.
    pub fn preview_channel(&self) -> UnboundedReceiver<PreviewReady> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().preview_tx = Some(tx);
        rx
    }

    /// Emits a `previewReady` notification for `url`.
    pub fn push_preview(&self, url: &str, graph: Enrichment) {
        let state = self.lock();
        if let Some(tx) = &state.preview_tx {
            let _ = tx.send(PreviewReady {
                url: url.to_string(),
                graph,
                resolved_at: Self::now(),
            });
        }
    }

    /// Drops the notification sender so a consumer loop can drain and exit.
    pub fn close_preview_channel(&self) {
        self.lock().preview_tx = None;
    }

    pub fn fail_scores(&self, fail: bool) {
        self.lock().fail_scores = fail;
    }

    pub fn fail_set_scores(&self, fail: bool) {
        self.lock().fail_set_scores = fail;
    }

    pub fn fail_rank_config(&self, fail: bool) {
        self.lock().fail_rank_config = fail;
    }

    /// Current stored score table, for assertions.
    pub fn stored_scores(&self) -> Vec<ScoreEntry> {
        self.lock().scores.clone()
    }

    /// Current stored rank config, for assertions.
    pub fn stored_rank_config(&self) -> Option<RankConfig> {
        self.lock().rank_config.clone()
    }

    fn assign_name(url: &str) -> String {
        let host = url
            .trim_start_matches("http://")
            .trim_start_matches("https://")
            .split(['/', '?', '#'])
            .next()
            .unwrap_or("link")
            .to_string();
        format!("{}-{}.link", host, Uuid::new_v4().simple())
    }
}

impl LinkBackend for MemoryBackend {
    async fn list_link_names(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.lock().links.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn read_link(&self, name: &str) -> Result<LinkDetails, BackendError> {
        self.lock()
            .links
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, details)| details.clone())
            .ok_or_else(|| BackendError::NotFound(name.to_string()))
    }

    async fn create_link(&self, props: &LinkProperties) -> Result<String, BackendError> {
        if !props.url.starts_with("http://") && !props.url.starts_with("https://") {
            return Err(BackendError::InvalidUrl(props.url.clone()));
        }
        let name = Self::assign_name(&props.url);
        let details = LinkDetails {
            title: props.title.clone(),
            desc: props.desc.clone(),
            url: props.url.clone(),
            created_at: Some(Self::now()),
        };
        self.lock().links.push((name.clone(), details));
        Ok(name)
    }

    async fn delete_link(&self, name: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        let before = state.links.len();
        state.links.retain(|(n, _)| n != name);
        if state.links.len() == before {
            return Err(BackendError::NotFound(name.to_string()));
        }
        state.scores.retain(|s| s.name != name);
        Ok(())
    }

    async fn get_scores(&self) -> Result<Vec<ScoreEntry>, BackendError> {
        let state = self.lock();
        if state.fail_scores {
            return Err(BackendError::Unavailable("scores offline".to_string()));
        }
        Ok(state.scores.clone())
    }

    async fn set_scores(&self, entries: &[ScoreEntry]) -> Result<(), BackendError> {
        let mut state = self.lock();
        if state.fail_set_scores {
            return Err(BackendError::WriteFailed("scores offline".to_string()));
        }
        state.scores = entries.to_vec();
        Ok(())
    }

    async fn get_rank_config(&self) -> Result<Option<RankConfig>, BackendError> {
        let state = self.lock();
        if state.fail_rank_config {
            return Err(BackendError::Unavailable("config offline".to_string()));
        }
        Ok(state.rank_config.clone())
    }

    async fn set_rank_config(&self, config: &RankConfig) -> Result<RankConfig, BackendError> {
        let mut state = self.lock();
        if state.fail_rank_config {
            return Err(BackendError::WriteFailed("config offline".to_string()));
        }
        state.rank_config = Some(config.clone());
        Ok(config.clone())
    }

    async fn request_preview(&self, url: &str) -> Result<OpenGraph, BackendError> {
        self.lock()
            .previews
            .get(url)
            .cloned()
            .ok_or_else(|| BackendError::Unavailable(format!("no preview for {}", url)))
    }
}
