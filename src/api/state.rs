// src/api/state.rs
use crate::config::AppConfig;
use crate::errors::Result;
use crate::harness::TestHarness;
use crate::models::Submission;
use crate::prompt::DEFAULT_PROMPT_TEMPLATE;
use crate::providers::ChatCompletionProvider;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: ChatCompletionProvider,
    pub harness: TestHarness,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.completion.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            provider: ChatCompletionProvider::new(client, config.completion.clone()),
            harness: TestHarness::from_config(&config.runner),
            sessions: SessionStore::new(config.max_sessions),
            config: Arc::new(config),
        })
    }

    pub fn prompt_template(&self) -> &str {
        self.config
            .prompt_template
            .as_deref()
            .unwrap_or(DEFAULT_PROMPT_TEMPLATE)
    }
}

/// Latest submission per browser session.
///
/// Each session holds at most one submission; storing a new one replaces
/// the old. When `capacity` sessions exist, the least recently updated one
/// is evicted to make room.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<Uuid, Submission>>>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    pub async fn put(&self, session: Uuid, submission: Submission) {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(&session) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, s)| s.submitted_at)
                .map(|(id, _)| *id);
            if let Some(id) = oldest {
                log::debug!("Evicting session {}", id);
                entries.remove(&id);
            }
        }
        entries.insert(session, submission);
    }

    pub async fn get(&self, session: &Uuid) -> Option<Submission> {
        self.entries.read().await.get(session).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
