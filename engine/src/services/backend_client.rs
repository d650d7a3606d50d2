// reqwest-based client for the Stock Guardian HTTP/JSON backend
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use shared::models::{
    Credentials, ErrorBody, FavoriteRecord, HistoryEntry, HistoryResponse, LoginResponse, NewsResponse,
    RemoveFavoriteRequest, SessionToken, StockAnalysis, TermReply, TermRequest,
};

use super::backend::GuardianBackend;
use crate::config::ClientSettings;
use crate::error::{GuardianError, Result};

const TOKEN_HEADER: &str = "token";

pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| GuardianError::Config(format!("Invalid base_url '{}': {}", settings.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GuardianError::Config(format!("base_url '{}' cannot be a base", settings.base_url)));
        }
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| GuardianError::Config(format!("Failed to build HTTP client: {}", e)))?;
        tracing::debug!(base_url = %base_url, timeout_secs = settings.request_timeout_secs, "HTTP backend ready");
        Ok(HttpBackend { client, base_url })
    }

    // Path segments are percent-encoded individually, so names like "KT&G" are safe.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status.canonical_reason().unwrap_or("no reason").to_string()
                } else {
                    text.chars().take(200).collect()
                }
            });
        tracing::debug!(status = status.as_u16(), %message, "Backend returned an error status");
        Err(GuardianError::Http { status: status.as_u16(), message })
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &SessionToken, segments: &[&str]) -> Result<T> {
        let resp = self
            .client
            .get(self.url(segments))
            .header(TOKEN_HEADER, token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        Ok(Self::check(resp).await?.json::<T>().await?)
    }
}

#[async_trait]
impl GuardianBackend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken> {
        let resp = self.client.post(self.url(&["api", "user", "login"])).json(credentials).send().await?;
        let body: LoginResponse = Self::check(resp).await?.json().await?;
        body.token
            .and_then(SessionToken::new)
            .ok_or_else(|| GuardianError::Decode("login response carried no token".to_string()))
    }

    async fn signup(&self, credentials: &Credentials) -> Result<()> {
        let resp = self.client.post(self.url(&["api", "user", "signup"])).json(credentials).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn list_favorites(&self, token: &SessionToken) -> Result<Vec<FavoriteRecord>> {
        self.get_json(token, &["user", "favorites"]).await
    }

    async fn add_favorite(&self, token: &SessionToken, favorite: &FavoriteRecord) -> Result<()> {
        let resp = self
            .client
            .post(self.url(&["user", "favorites"]))
            .header(TOKEN_HEADER, token.as_str())
            .json(favorite)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn remove_favorite(&self, token: &SessionToken, corp_name: &str) -> Result<()> {
        let body = RemoveFavoriteRequest { corp_name: corp_name.to_string() };
        let resp = self
            .client
            .delete(self.url(&["user", "favorites"]))
            .header(TOKEN_HEADER, token.as_str())
            .json(&body)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn news(&self, token: &SessionToken) -> Result<NewsResponse> {
        self.get_json(token, &["news"]).await
    }

    async fn analysis(&self, token: &SessionToken, corp_name: &str) -> Result<StockAnalysis> {
        self.get_json(token, &["analysis", corp_name]).await
    }

    async fn describe_term(&self, token: &SessionToken, term: &str) -> Result<TermReply> {
        let resp = self
            .client
            .post(self.url(&["api", "description"]))
            .header(TOKEN_HEADER, token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&TermRequest { term: term.to_string() })
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn description_history(&self, token: &SessionToken) -> Result<Vec<HistoryEntry>> {
        let body: HistoryResponse = self.get_json(token, &["api", "description", "history"]).await?;
        Ok(body.history)
    }
}
