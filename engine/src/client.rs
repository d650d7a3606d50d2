// Wires settings, token store, reference data and services into one client handle
use std::sync::Arc;

use crate::config::ClientSettings;
use crate::data::{MetadataTable, ReferenceTable};
use crate::error::{GuardianError, Result};
use crate::resolver::NameResolver;
use crate::services::{
    AnalysisService, FavoritesSync, GuardianBackend, HttpBackend, NewsFeed, SessionService, TermExplainer,
};
use crate::session::{FileTokenStore, TokenStore};

pub struct GuardianClient {
    pub session: SessionService,
    pub favorites: FavoritesSync,
    pub news: NewsFeed,
    pub analysis: AnalysisService,
    pub terms: TermExplainer,
    pub metadata: Arc<MetadataTable>,
    settings: ClientSettings,
}

impl GuardianClient {
    /// Client against the configured HTTP backend, with the token kept under `data_dir`.
    pub fn from_settings(settings: ClientSettings) -> Result<Self> {
        settings.validate()?;
        let backend: Arc<dyn GuardianBackend> = Arc::new(HttpBackend::new(&settings)?);
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(settings.token_path()));
        Self::with_parts(settings, backend, tokens)
    }

    pub fn with_parts(
        settings: ClientSettings,
        backend: Arc<dyn GuardianBackend>,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        let mut table = ReferenceTable::builtin();
        if let Some(path) = &settings.reference_table_path {
            let extra = ReferenceTable::load_csv(path)?;
            tracing::info!(path = %path.display(), entries = extra.len(), "Merged reference table");
            table.merge(extra);
        }
        let resolver = Arc::new(NameResolver::new(Arc::new(table), &settings));
        let metadata = Arc::new(MetadataTable::builtin());

        Ok(GuardianClient {
            session: SessionService::new(backend.clone(), tokens.clone()),
            favorites: FavoritesSync::new(backend.clone(), tokens.clone(), resolver, metadata.clone()),
            news: NewsFeed::new(backend.clone(), tokens.clone()),
            analysis: AnalysisService::new(backend.clone(), tokens.clone()),
            terms: TermExplainer::new(backend, tokens),
            metadata,
            settings,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Forgets the token and the local favorites list.
    pub async fn logout(&self) -> Result<()> {
        self.session.logout().await?;
        self.favorites.clear().await;
        Ok(())
    }

    /// Returns `err` unchanged, logging the user out first when it is an auth failure.
    pub async fn settle(&self, err: GuardianError) -> GuardianError {
        if err.is_auth_failure() {
            tracing::warn!(error = %err, "Auth failure, clearing stored session");
            if let Err(clear_err) = self.logout().await {
                tracing::error!(error = %clear_err, "Failed to clear session");
            }
        }
        err
    }
}
