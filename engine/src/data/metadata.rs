// Display metadata (category, logo domains, placeholder glyph) keyed by exact ticker name
use std::collections::HashMap;

use shared::models::{FavoriteTicker, DEFAULT_CATEGORY, DEFAULT_GLYPH};

struct MetadataRow {
    name: &'static str,
    category: &'static str,
    domains: &'static [&'static str],
    glyph: &'static str,
}

const BUILTIN: &[MetadataRow] = &[
    MetadataRow { name: "삼성전자", category: "반도체", domains: &["samsung.com"], glyph: "💻" },
    MetadataRow { name: "현대차", category: "자동차", domains: &["hyundai.com"], glyph: "🚗" },
    MetadataRow { name: "카카오", category: "IT/플랫폼", domains: &["kakaocorp.com"], glyph: "📱" },
    MetadataRow { name: "LG에너지솔루션", category: "2차전지", domains: &["lgensol.com"], glyph: "🔋" },
    MetadataRow { name: "포스코홀딩스", category: "소재/철강", domains: &["posco.com"], glyph: "🏗️" },
    MetadataRow { name: "셀트리온", category: "바이오", domains: &["celltrion.com"], glyph: "💊" },
    MetadataRow { name: "NAVER", category: "IT/포털", domains: &["naver.com"], glyph: "🌐" },
    MetadataRow { name: "하이브", category: "엔터테인먼트", domains: &["hybecorp.com"], glyph: "🎵" },
    MetadataRow { name: "삼성SDI", category: "2차전지", domains: &["samsungsdi.com"], glyph: "🔋" },
    MetadataRow { name: "기아", category: "자동차", domains: &["kia.com", "kia.co.kr", "kiamotors.com"], glyph: "🏎️" },
    MetadataRow { name: "SK하이닉스", category: "반도체", domains: &["skhynix.com"], glyph: "💾" },
    MetadataRow { name: "롯데케미칼", category: "화학", domains: &["lottechem.com"], glyph: "⚗️" },
    MetadataRow { name: "신한지주", category: "금융", domains: &["shinhan.com"], glyph: "🏦" },
    MetadataRow { name: "롯데쇼핑", category: "유통", domains: &["lotte.com"], glyph: "🛍️" },
    MetadataRow { name: "KT&G", category: "담배/생활", domains: &["ktng.com"], glyph: "🏭" },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerMetadata {
    pub category: String,
    pub logo_domains: Vec<String>,
    pub glyph: String,
}

impl Default for TickerMetadata {
    fn default() -> Self {
        TickerMetadata {
            category: DEFAULT_CATEGORY.to_string(),
            logo_domains: Vec::new(),
            glyph: DEFAULT_GLYPH.to_string(),
        }
    }
}

pub struct MetadataTable {
    by_name: HashMap<String, TickerMetadata>,
    // Table order, for callers that list every known ticker.
    order: Vec<String>,
}

impl MetadataTable {
    pub fn builtin() -> Self {
        let mut by_name = HashMap::with_capacity(BUILTIN.len());
        let mut order = Vec::with_capacity(BUILTIN.len());
        for row in BUILTIN {
            by_name.insert(
                row.name.to_string(),
                TickerMetadata {
                    category: row.category.to_string(),
                    logo_domains: row.domains.iter().map(|d| d.to_string()).collect(),
                    glyph: row.glyph.to_string(),
                },
            );
            order.push(row.name.to_string());
        }
        MetadataTable { by_name, order }
    }

    /// Exact-name lookup; unknown names get the "기타" defaults.
    pub fn enrich(&self, name: &str) -> TickerMetadata {
        self.by_name.get(name).cloned().unwrap_or_default()
    }

    /// Builds the list row for a `(code, name)` pair the server accepted.
    pub fn favorite(&self, code: &str, name: &str) -> FavoriteTicker {
        let meta = self.enrich(name);
        FavoriteTicker {
            code: code.to_string(),
            name: name.to_string(),
            category: meta.category,
            logo_domains: meta.logo_domains,
            glyph: meta.glyph,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// What to show for a ticker's logo at this point of the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    Url(String),
    Glyph(String),
}

/// Linear fallback over a ticker's logo domains, ending at its glyph.
/// No retries and no caching.
#[derive(Debug, Clone)]
pub struct LogoChain {
    urls: Vec<String>,
    glyph: String,
    idx: usize,
}

impl LogoChain {
    pub fn new(template: &str, domains: &[String], glyph: &str) -> Self {
        LogoChain {
            urls: domains.iter().map(|d| template.replace("{domain}", d)).collect(),
            glyph: glyph.to_string(),
            idx: 0,
        }
    }

    pub fn for_favorite(template: &str, favorite: &FavoriteTicker) -> Self {
        Self::new(template, &favorite.logo_domains, &favorite.glyph)
    }

    pub fn current(&self) -> LogoSource {
        match self.urls.get(self.idx) {
            Some(url) => LogoSource::Url(url.clone()),
            None => LogoSource::Glyph(self.glyph.clone()),
        }
    }

    /// Records that the current URL failed to load and returns the next source.
    pub fn advance(&mut self) -> LogoSource {
        if self.idx < self.urls.len() {
            self.idx += 1;
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "https://logo.clearbit.com/{domain}";

    #[test]
    fn test_enrich_known_name() {
        let table = MetadataTable::builtin();
        let meta = table.enrich("기아");
        assert_eq!(meta.category, "자동차");
        assert_eq!(meta.logo_domains, vec!["kia.com", "kia.co.kr", "kiamotors.com"]);
    }

    #[test]
    fn test_enrich_unknown_name_defaults() {
        let table = MetadataTable::builtin();
        let meta = table.enrich("naver"); // exact match only
        assert_eq!(meta.category, "기타");
        assert!(meta.logo_domains.is_empty());
    }

    #[test]
    fn test_enrich_is_idempotent() {
        let table = MetadataTable::builtin();
        assert_eq!(table.enrich("NAVER"), table.enrich("NAVER"));
        assert_eq!(table.enrich("없는종목"), table.enrich("없는종목"));
    }

    #[test]
    fn test_logo_chain_walks_domains_then_glyph() {
        let table = MetadataTable::builtin();
        let fav = table.favorite("000270", "기아");
        let mut chain = LogoChain::for_favorite(TEMPLATE, &fav);
        assert_eq!(chain.current(), LogoSource::Url("https://logo.clearbit.com/kia.com".into()));
        assert_eq!(chain.advance(), LogoSource::Url("https://logo.clearbit.com/kia.co.kr".into()));
        assert_eq!(chain.advance(), LogoSource::Url("https://logo.clearbit.com/kiamotors.com".into()));
        assert_eq!(chain.advance(), LogoSource::Glyph("🏎️".into()));
        assert_eq!(chain.advance(), LogoSource::Glyph("🏎️".into()));
    }

    #[test]
    fn test_logo_chain_without_domains() {
        let chain = LogoChain::new(TEMPLATE, &[], "📈");
        assert_eq!(chain.current(), LogoSource::Glyph("📈".into()));
    }
}
