// Contract of the remote Stock Guardian backend, as consumed by this client
use async_trait::async_trait;
use shared::models::{
    Credentials, FavoriteRecord, HistoryEntry, NewsResponse, SessionToken, StockAnalysis, TermReply,
};

use crate::error::Result;

/// Raw backend calls.
///
/// Implementations report non-2xx responses as `GuardianError::Http` and
/// transport failures as `GuardianError::Connectivity`; classifying those into
/// the workflow taxonomy (`SessionExpired`, `AddRejected`, ...) is the calling
/// service's job.
#[async_trait]
pub trait GuardianBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken>;

    async fn signup(&self, credentials: &Credentials) -> Result<()>;

    /// GET `/user/favorites`, in server order.
    async fn list_favorites(&self, token: &SessionToken) -> Result<Vec<FavoriteRecord>>;

    /// POST `/user/favorites` keyed by code and name.
    async fn add_favorite(&self, token: &SessionToken, favorite: &FavoriteRecord) -> Result<()>;

    /// DELETE `/user/favorites` keyed by name only.
    async fn remove_favorite(&self, token: &SessionToken, corp_name: &str) -> Result<()>;

    async fn news(&self, token: &SessionToken) -> Result<NewsResponse>;

    async fn analysis(&self, token: &SessionToken, corp_name: &str) -> Result<StockAnalysis>;

    async fn describe_term(&self, token: &SessionToken, term: &str) -> Result<TermReply>;

    async fn description_history(&self, token: &SessionToken) -> Result<Vec<HistoryEntry>>;
}
