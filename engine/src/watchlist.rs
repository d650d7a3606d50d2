// Local watchlist: pin/unpin tickers, most recently pinned first. Never synced to the backend.
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use shared::models::WatchlistEntry;
use shared::utils::text::contains_ignore_case;

use crate::data::MetadataTable;
use crate::error::Result;

// Never pinned in the seeded list.
const SEED_UNPINNED: &str = "SK하이닉스";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn new(entries: Vec<WatchlistEntry>) -> Self {
        Watchlist { entries }
    }

    /// Every known ticker, with the second half of the table pinned one second
    /// apart so the most recent pin is the last row.
    pub fn seeded(metadata: &MetadataTable, now: DateTime<Utc>) -> Self {
        let names: Vec<&str> = metadata.names().collect();
        let half = names.len() / 2;
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let meta = metadata.enrich(name);
                let pinned = i >= half && *name != SEED_UNPINNED;
                WatchlistEntry {
                    id: (i + 1).to_string(),
                    name: name.to_string(),
                    category: meta.category,
                    logo_domains: meta.logo_domains,
                    glyph: meta.glyph,
                    pinned,
                    pinned_at: pinned.then(|| now - Duration::seconds((names.len() - i) as i64)),
                }
            })
            .collect();
        Watchlist { entries }
    }

    /// Reads a saved watchlist, or seeds a fresh one when the file does not exist.
    pub fn load_or_seed(path: &Path, metadata: &MetadataTable, now: DateTime<Utc>) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                let entries: Vec<WatchlistEntry> = serde_json::from_str(&raw)?;
                tracing::debug!(path = %path.display(), count = entries.len(), "Watchlist loaded");
                Ok(Watchlist { entries })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::seeded(metadata, now)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    /// Flips the pin on `id`. Returns the new pin state, or `None` for an unknown id.
    pub fn toggle(&mut self, id: &str, now: DateTime<Utc>) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        entry.pinned = !entry.pinned;
        entry.pinned_at = entry.pinned.then_some(now);
        tracing::debug!(id = %id, name = %entry.name, pinned = entry.pinned, "Watchlist pin toggled");
        Some(entry.pinned)
    }

    /// Entries matching `query` on name or category, pinned first.
    pub fn view(&self, query: &str) -> Vec<&WatchlistEntry> {
        let needle = query.trim().to_lowercase();
        let mut rows: Vec<&WatchlistEntry> = self
            .entries
            .iter()
            .filter(|e| {
                needle.is_empty()
                    || contains_ignore_case(&e.name, &needle)
                    || contains_ignore_case(&e.category, &needle)
            })
            .collect();
        rows.sort_by(|a, b| pinned_order(a, b));
        rows
    }
}

/// Pinned before unpinned; among pinned, latest pin first. Unpinned rows compare
/// equal, so a stable sort keeps their list order.
pub fn pinned_order(a: &WatchlistEntry, b: &WatchlistEntry) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a.pinned, b.pinned) {
        (true, true) => b.pinned_at.cmp(&a.pinned_at),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}
