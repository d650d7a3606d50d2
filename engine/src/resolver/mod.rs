// Name resolution: maps free-text ticker input to the exact (code, name) the backend accepts
pub mod variants;

use std::future::Future;
use std::sync::Arc;

use shared::models::ReferenceTicker;

use crate::config::ClientSettings;
use crate::data::ReferenceTable;
use crate::error::{GuardianError, Result};

pub use variants::{candidate_plan, case_variants, synthetic_code, CaseVariants};

/// A `(code, name)` pair to submit; `name` has the exact casing that will be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTicker {
    pub code: String,
    pub name: String,
}

pub struct NameResolver {
    table: Arc<ReferenceTable>,
    suggestion_limit: usize,
    max_enumerated_letters: u32,
}

impl NameResolver {
    pub fn new(table: Arc<ReferenceTable>, settings: &ClientSettings) -> Self {
        Self::with_limits(table, settings.suggestion_limit, settings.max_enumerated_letters)
    }

    pub fn with_limits(table: Arc<ReferenceTable>, suggestion_limit: usize, max_enumerated_letters: u32) -> Self {
        NameResolver { table, suggestion_limit, max_enumerated_letters }
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Autocomplete over the reference table. Never touches the network.
    ///
    /// Case-insensitive substring match; names starting with the input come
    /// before names that merely contain it, table order is kept within each
    /// group, and at most `suggestion_limit` entries are returned.
    pub fn suggest(&self, input: &str) -> Vec<&ReferenceTicker> {
        let query = input.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let mut matches: Vec<(bool, &ReferenceTicker)> = self
            .table
            .entries()
            .iter()
            .filter_map(|t| {
                let name = t.canonical_name.to_lowercase();
                name.contains(&query).then(|| (name.starts_with(&query), t))
            })
            .collect();
        // sort_by_key is stable, so table order survives inside each group.
        matches.sort_by_key(|(is_prefix, _)| !is_prefix);
        matches.into_iter().take(self.suggestion_limit).map(|(_, t)| t).collect()
    }

    /// Candidates in attempt order, each paired with its reference or synthetic code.
    pub fn candidates(&self, input: &str) -> Result<Vec<ResolvedTicker>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(GuardianError::EmptyInput);
        }
        Ok(candidate_plan(trimmed, self.max_enumerated_letters)
            .into_iter()
            .map(|name| {
                let code = match self.table.find_exact(&name) {
                    Some(reference) => reference.code.clone(),
                    None => synthetic_code(&name),
                };
                ResolvedTicker { code, name }
            })
            .collect())
    }

    /// Submits candidates through `attempt` until one is accepted.
    ///
    /// `AddRejected` moves on to the next candidate; any other error (lost
    /// connectivity, expired session) aborts resolution and is returned as is.
    pub async fn resolve<F, Fut>(&self, input: &str, mut attempt: F) -> Result<ResolvedTicker>
    where
        F: FnMut(ResolvedTicker) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let candidates = self.candidates(input)?;
        let total = candidates.len();
        for (tried, candidate) in candidates.into_iter().enumerate() {
            match attempt(candidate.clone()).await {
                Ok(()) => {
                    tracing::info!(
                        name = %candidate.name,
                        code = %candidate.code,
                        attempts = tried + 1,
                        "Resolved ticker name"
                    );
                    return Ok(candidate);
                }
                Err(GuardianError::AddRejected { .. }) => {
                    tracing::debug!(name = %candidate.name, "Candidate rejected, trying next casing");
                }
                Err(e) => return Err(e),
            }
        }
        tracing::warn!(input = %input.trim(), candidates = total, "No casing accepted by the server");
        Err(GuardianError::NoAcceptedVariant(input.trim().to_string()))
    }
}
