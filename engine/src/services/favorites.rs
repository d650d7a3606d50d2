// Favorites synchronization: server list, resolver-driven add, optimistic remove
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use shared::models::{FavoriteRecord, FavoriteTicker, SessionToken};
use tokio::sync::RwLock;

use super::backend::GuardianBackend;
use crate::data::MetadataTable;
use crate::error::{GuardianError, Result};
use crate::resolver::{NameResolver, ResolvedTicker};
use crate::session::TokenStore;

/// Keeps the local favorites list in step with the backend.
///
/// The list is published as an immutable snapshot: readers clone the `Arc`
/// and never observe a half-applied change. At most one add or remove per
/// name is in flight at a time.
pub struct FavoritesSync {
    backend: Arc<dyn GuardianBackend>,
    tokens: Arc<dyn TokenStore>,
    resolver: Arc<NameResolver>,
    metadata: Arc<MetadataTable>,
    snapshot: RwLock<Arc<[FavoriteTicker]>>,
    in_flight: Mutex<HashSet<String>>,
}

/// Releases the in-flight slot for a name when dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<String>>,
    key: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set.remove(&self.key);
    }
}

impl FavoritesSync {
    pub fn new(
        backend: Arc<dyn GuardianBackend>,
        tokens: Arc<dyn TokenStore>,
        resolver: Arc<NameResolver>,
        metadata: Arc<MetadataTable>,
    ) -> Self {
        FavoritesSync {
            backend,
            tokens,
            resolver,
            metadata,
            snapshot: RwLock::new(Arc::from(Vec::new())),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// Current published list, in server order with local additions appended.
    pub async fn snapshot(&self) -> Arc<[FavoriteTicker]> {
        self.snapshot.read().await.clone()
    }

    /// Drops the local list, e.g. on logout.
    pub async fn clear(&self) {
        *self.snapshot.write().await = Arc::from(Vec::new());
    }

    /// Stored token, or `Unauthenticated` without issuing any request.
    pub async fn require_token(&self) -> Result<SessionToken> {
        self.tokens.load().await?.ok_or(GuardianError::Unauthenticated)
    }

    /// Raw server list. Does not touch the published snapshot.
    pub async fn list(&self) -> Result<Vec<FavoriteRecord>> {
        let token = self.require_token().await?;
        self.backend
            .list_favorites(&token)
            .await
            .map_err(GuardianError::into_fetch_error)
    }

    /// Fetches the server list, enriches it and publishes it as the new snapshot.
    /// On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<[FavoriteTicker]>> {
        let records = match self.list().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load favorites");
                return Err(e);
            }
        };

        let mut seen = HashSet::new();
        let rows: Vec<FavoriteTicker> = records
            .iter()
            .filter(|r| {
                let fresh = seen.insert(r.corp_code.clone());
                if !fresh {
                    tracing::warn!(code = %r.corp_code, name = %r.corp_name, "Duplicate favorite code from server, keeping first");
                }
                fresh
            })
            .map(|r| self.metadata.favorite(&r.corp_code, &r.corp_name))
            .collect();

        let published: Arc<[FavoriteTicker]> = rows.into();
        *self.snapshot.write().await = published.clone();
        tracing::info!(count = published.len(), "Favorites loaded");
        Ok(published)
    }

    /// Refresh ahead of an add or remove.
    ///
    /// A failing list endpoint does not block the edit: `FetchFailed` is logged
    /// and the current snapshot is returned as is. Auth and transport errors
    /// still propagate.
    pub async fn sync_before_edit(&self) -> Result<Arc<[FavoriteTicker]>> {
        match self.refresh().await {
            Err(GuardianError::FetchFailed(reason)) => {
                tracing::warn!(reason = %reason, "Favorites list unavailable, editing against local list");
                Ok(self.snapshot().await)
            }
            other => other,
        }
    }

    /// Single POST for one exact `(code, name)` pair.
    ///
    /// A non-2xx reply is `AddRejected` except 401/403, which expire the session.
    /// Connectivity errors pass through so resolution can stop early.
    pub async fn add_remote(&self, token: &SessionToken, candidate: &ResolvedTicker) -> Result<()> {
        let record = FavoriteRecord { corp_code: candidate.code.clone(), corp_name: candidate.name.clone() };
        match self.backend.add_favorite(token, &record).await {
            Ok(()) => Ok(()),
            Err(GuardianError::Http { status: 401 | 403, .. }) => Err(GuardianError::SessionExpired),
            Err(GuardianError::Http { .. } | GuardianError::Decode(_)) => {
                Err(GuardianError::AddRejected { code: record.corp_code, name: record.corp_name })
            }
            Err(e) => Err(e),
        }
    }

    /// Adds an already resolved `(code, name)` without trying other casings.
    pub async fn add_exact(&self, code: &str, name: &str) -> Result<FavoriteTicker> {
        let token = self.require_token().await?;
        let _guard = self.begin(name)?;
        let candidate = ResolvedTicker { code: code.to_string(), name: name.to_string() };
        self.add_remote(&token, &candidate).await?;
        Ok(self.publish_added(&candidate).await)
    }

    /// Resolves free-text input against the server and appends the accepted ticker.
    ///
    /// Candidates are tried in order until the server accepts one; the local
    /// snapshot changes only after that acceptance.
    pub async fn add(&self, input: &str) -> Result<FavoriteTicker> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(GuardianError::EmptyInput);
        }
        let token = self.require_token().await?;
        let _guard = self.begin(trimmed)?;

        let resolved = self
            .resolver
            .resolve(trimmed, |candidate| {
                let token = token.clone();
                async move { self.add_remote(&token, &candidate).await }
            })
            .await?;

        Ok(self.publish_added(&resolved).await)
    }

    /// Removes a favorite by name.
    ///
    /// The entry leaves the snapshot immediately; if the server refuses, it is
    /// put back at its original position and `RemoveRejected` is returned.
    pub async fn remove(&self, name: &str) -> Result<Arc<[FavoriteTicker]>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GuardianError::EmptyInput);
        }
        let token = self.require_token().await?;
        let _guard = self.begin(name)?;

        let removed = {
            let mut snapshot = self.snapshot.write().await;
            let mut rows = snapshot.to_vec();
            let taken = rows.iter().position(|r| r.name == name).map(|pos| (pos, rows.remove(pos)));
            *snapshot = rows.into();
            taken
        };

        match self.backend.remove_favorite(&token, name).await {
            Ok(()) => {
                tracing::info!(name = %name, "Favorite removed");
                Ok(self.snapshot().await)
            }
            Err(e) => {
                if let Some((pos, row)) = removed {
                    let mut snapshot = self.snapshot.write().await;
                    let mut rows = snapshot.to_vec();
                    if !rows.iter().any(|r| r.code == row.code) {
                        rows.insert(pos.min(rows.len()), row);
                    }
                    *snapshot = rows.into();
                }
                tracing::warn!(name = %name, error = %e, "Favorite removal failed, restored local entry");
                Err(match e {
                    GuardianError::Http { status: 401 | 403, .. } => GuardianError::SessionExpired,
                    GuardianError::Http { .. } | GuardianError::Decode(_) => {
                        GuardianError::RemoveRejected(name.to_string())
                    }
                    other => other,
                })
            }
        }
    }

    fn begin(&self, name: &str) -> Result<InFlight<'_>> {
        let key = name.trim().to_lowercase();
        let mut set = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !set.insert(key.clone()) {
            tracing::debug!(name = %name, "Rejected overlapping favorites request");
            return Err(GuardianError::AlreadyInFlight(name.to_string()));
        }
        Ok(InFlight { set: &self.in_flight, key })
    }

    // An accepted row replaces any local row with the same code, else it is appended.
    async fn publish_added(&self, resolved: &ResolvedTicker) -> FavoriteTicker {
        let row = self.metadata.favorite(&resolved.code, &resolved.name);
        let mut snapshot = self.snapshot.write().await;
        let mut rows = snapshot.to_vec();
        match rows.iter().position(|r| r.code == row.code) {
            Some(pos) => rows[pos] = row.clone(),
            None => rows.push(row.clone()),
        }
        *snapshot = rows.into();
        tracing::info!(code = %row.code, name = %row.name, "Favorite added");
        row
    }
}
