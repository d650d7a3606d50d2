use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category label used when a ticker has no metadata entry.
pub const DEFAULT_CATEGORY: &str = "기타";
/// Placeholder shown when none of a ticker's logo domains load.
pub const DEFAULT_GLYPH: &str = "📈";

// --- Session ---

/// Opaque credential issued by the backend at login.
///
/// Only presence and byte equality matter. `Debug` never prints the value so
/// tokens cannot leak through tracing fields.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default, alias = "access_token")]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Shape of the backend's error payloads; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// --- Tickers ---

/// Authoritative `(code, name)` pair from the local reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTicker {
    pub code: String,
    #[serde(rename = "name")]
    pub canonical_name: String,
}

/// One row of the favorites list. Rows are keyed by `code`; removal is keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteTicker {
    pub code: String,
    pub name: String,
    pub category: String,
    pub logo_domains: Vec<String>,
    pub glyph: String,
}

/// Favorite as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub corp_code: String,
    pub corp_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveFavoriteRequest {
    pub corp_name: String,
}

/// Entry of the local, non-synchronized watchlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: String,
    pub name: String,
    pub category: String,
    pub logo_domains: Vec<String>,
    pub glyph: String,
    pub pinned: bool,
    pub pinned_at: Option<DateTime<Utc>>,
}

// --- News ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub date: String,
    pub link: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsCompany {
    pub company: String,
    #[serde(default)]
    pub news: Vec<NewsArticle>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub results: Vec<NewsCompany>,
}

/// Flattened, display-ready article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub id: String,
    pub company: String,
    pub title: String,
    pub content: String,
    pub date: String,
    pub link: String,
    pub image: Option<String>,
}

// --- Analysis ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorFigures {
    #[serde(default)]
    pub personal: f64,
    #[serde(default)]
    pub foreigner: f64,
    #[serde(default)]
    pub institution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorHistory {
    pub date: String,
    #[serde(default)]
    pub personal: f64,
    #[serde(default)]
    pub foreigner: f64,
    #[serde(default)]
    pub institution: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorMetrics {
    #[serde(default)]
    pub cumulative_net: InvestorFigures,
    #[serde(default)]
    pub cumulative_buy: InvestorFigures,
    #[serde(default)]
    pub cumulative_sell: InvestorFigures,
    #[serde(default)]
    pub history: Vec<InvestorHistory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockMetrics {
    #[serde(default)]
    pub investors: Option<InvestorMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub corp_code: String,
    #[serde(default)]
    pub metrics: Option<StockMetrics>,
    #[serde(default)]
    pub gemini_output: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
}

// --- Term explainer ---

#[derive(Debug, Clone, Serialize)]
pub struct TermRequest {
    pub term: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermReply {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub title: Option<String>,
    pub content: String,
    pub created_at: Option<String>,
}
