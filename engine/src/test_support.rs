// In-process stand-in for the remote backend, shared by the service tests
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shared::models::{
    Credentials, FavoriteRecord, HistoryEntry, NewsResponse, SessionToken, StockAnalysis, TermReply,
};

use crate::error::{GuardianError, Result};
use crate::services::backend::GuardianBackend;
use crate::session::{MemoryTokenStore, TokenStore};

#[derive(Default)]
pub struct FakeState {
    pub favorites: Vec<FavoriteRecord>,
    /// Exact names the server accepts on add; `None` accepts everything.
    pub accepted_names: Option<HashSet<String>>,
    pub list_status: Option<u16>,
    pub add_status: Option<u16>,
    pub remove_status: Option<u16>,
    pub offline: bool,
    pub news: Option<NewsResponse>,
    pub analysis: Option<StockAnalysis>,
    pub term_reply: Option<TermReply>,
    pub history: Vec<HistoryEntry>,
    pub login_token: Option<String>,
    pub login_status: Option<(u16, String)>,
    // Recorded traffic
    pub requests: usize,
    pub add_attempts: Vec<String>,
    pub removed: Vec<String>,
    pub signups: Vec<String>,
}

#[derive(Default, Clone)]
pub struct FakeBackend {
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_favorites(records: &[(&str, &str)]) -> Self {
        let fake = Self::new();
        fake.state().favorites = records
            .iter()
            .map(|(code, name)| FavoriteRecord { corp_code: code.to_string(), corp_name: name.to_string() })
            .collect();
        fake
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn accept_only(&self, names: &[&str]) {
        self.state().accepted_names = Some(names.iter().map(|n| n.to_string()).collect());
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.requests += 1;
        if state.offline {
            return Err(GuardianError::Connectivity("connection refused".to_string()));
        }
        Ok(state)
    }
}

fn http(status: u16) -> GuardianError {
    GuardianError::Http { status, message: format!("fake status {}", status) }
}

#[async_trait]
impl GuardianBackend for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken> {
        let state = self.enter()?;
        if let Some((status, message)) = &state.login_status {
            return Err(GuardianError::Http { status: *status, message: message.clone() });
        }
        let raw = state.login_token.clone().unwrap_or_else(|| format!("token-{}", credentials.username));
        SessionToken::new(raw).ok_or_else(|| GuardianError::Decode("empty token".into()))
    }

    async fn signup(&self, credentials: &Credentials) -> Result<()> {
        let mut state = self.enter()?;
        if let Some((status, message)) = &state.login_status {
            return Err(GuardianError::Http { status: *status, message: message.clone() });
        }
        state.signups.push(credentials.username.clone());
        Ok(())
    }

    async fn list_favorites(&self, _token: &SessionToken) -> Result<Vec<FavoriteRecord>> {
        let state = self.enter()?;
        match state.list_status {
            Some(status) => Err(http(status)),
            None => Ok(state.favorites.clone()),
        }
    }

    async fn add_favorite(&self, _token: &SessionToken, favorite: &FavoriteRecord) -> Result<()> {
        let mut state = self.enter()?;
        state.add_attempts.push(favorite.corp_name.clone());
        if let Some(status) = state.add_status {
            return Err(http(status));
        }
        let accepted = state
            .accepted_names
            .as_ref()
            .map_or(true, |names| names.contains(&favorite.corp_name));
        if !accepted {
            return Err(http(400));
        }
        state.favorites.push(favorite.clone());
        Ok(())
    }

    async fn remove_favorite(&self, _token: &SessionToken, corp_name: &str) -> Result<()> {
        let mut state = self.enter()?;
        if let Some(status) = state.remove_status {
            return Err(http(status));
        }
        state.favorites.retain(|f| f.corp_name != corp_name);
        state.removed.push(corp_name.to_string());
        Ok(())
    }

    async fn news(&self, _token: &SessionToken) -> Result<NewsResponse> {
        let state = self.enter()?;
        match (state.list_status, &state.news) {
            (Some(status), _) => Err(http(status)),
            (None, Some(news)) => Ok(news.clone()),
            (None, None) => Ok(NewsResponse { count: 0, results: Vec::new() }),
        }
    }

    async fn analysis(&self, _token: &SessionToken, corp_name: &str) -> Result<StockAnalysis> {
        let state = self.enter()?;
        match &state.analysis {
            Some(a) if a.company == corp_name => Ok(a.clone()),
            _ => Err(http(404)),
        }
    }

    async fn describe_term(&self, _token: &SessionToken, _term: &str) -> Result<TermReply> {
        let state = self.enter()?;
        Ok(state.term_reply.clone().unwrap_or_default())
    }

    async fn description_history(&self, _token: &SessionToken) -> Result<Vec<HistoryEntry>> {
        let state = self.enter()?;
        Ok(state.history.clone())
    }
}

pub fn token(raw: &str) -> SessionToken {
    SessionToken::new(raw).unwrap()
}

pub fn logged_in_store() -> Arc<dyn TokenStore> {
    Arc::new(MemoryTokenStore::with_token(token("test-token")))
}

pub fn logged_out_store() -> Arc<dyn TokenStore> {
    Arc::new(MemoryTokenStore::new())
}
