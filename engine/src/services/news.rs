// Aggregated news feed: flatten per-company articles, decode, sort, filter
use std::cmp::Reverse;
use std::sync::Arc;

use shared::models::{NewsItem, NewsResponse};
use shared::utils::korean_format::parse_timestamp;
use shared::utils::text::{contains_ignore_case, html_decode};

use super::backend::GuardianBackend;
use crate::error::{GuardianError, Result};
use crate::session::TokenStore;

pub struct NewsFeed {
    backend: Arc<dyn GuardianBackend>,
    tokens: Arc<dyn TokenStore>,
}

impl NewsFeed {
    pub fn new(backend: Arc<dyn GuardianBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        NewsFeed { backend, tokens }
    }

    pub async fn fetch_raw(&self) -> Result<NewsResponse> {
        let token = self.tokens.load().await?.ok_or(GuardianError::Unauthenticated)?;
        self.backend.news(&token).await.map_err(GuardianError::into_fetch_error)
    }

    /// Every article, newest first.
    pub async fn fetch(&self) -> Result<Vec<NewsItem>> {
        let response = self.fetch_raw().await?;
        let items = flatten(&response);
        tracing::info!(companies = response.results.len(), articles = items.len(), "News loaded");
        Ok(items)
    }

    /// Articles of one company, newest first.
    pub async fn for_company(&self, company: &str) -> Result<Vec<NewsItem>> {
        let response = self.fetch_raw().await?;
        Ok(for_company(&response, company))
    }
}

/// Flattens the per-company response into display items.
///
/// Companies without articles contribute nothing; a reported `error` is only
/// logged, so partial crawl results are still shown. Ids are `{company}-{index}`
/// with the index local to the company. Sorted newest first; articles whose
/// date does not parse keep their relative order at the end.
pub fn flatten(response: &NewsResponse) -> Vec<NewsItem> {
    let mut items: Vec<NewsItem> = response
        .results
        .iter()
        .filter(|company| {
            if let Some(err) = &company.error {
                tracing::debug!(company = %company.company, error = %err, articles = company.news.len(), "Company reported a news error");
            }
            !company.news.is_empty()
        })
        .flat_map(|company| {
            company.news.iter().enumerate().map(move |(idx, article)| NewsItem {
                id: format!("{}-{}", company.company, idx),
                company: company.company.clone(),
                title: html_decode(&article.title),
                content: html_decode(&article.content),
                date: article.date.clone(),
                link: article.link.clone(),
                image: article.image.clone().filter(|url| !url.trim().is_empty()),
            })
        })
        .collect();
    sort_newest_first(&mut items);
    items
}

pub fn sort_newest_first(items: &mut [NewsItem]) {
    // None sorts below every Some, so Reverse puts unparseable dates last.
    items.sort_by_key(|item| Reverse(parse_timestamp(&item.date)));
}

/// Case-insensitive match on title, content or company. A blank query keeps everything.
pub fn filter<'a>(items: &'a [NewsItem], query: &str) -> Vec<&'a NewsItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            contains_ignore_case(&item.title, &needle)
                || contains_ignore_case(&item.content, &needle)
                || contains_ignore_case(&item.company, &needle)
        })
        .collect()
}

pub fn for_company(response: &NewsResponse, company: &str) -> Vec<NewsItem> {
    let company = company.trim();
    flatten(response)
        .into_iter()
        .filter(|item| item.company.trim() == company)
        .collect()
}
