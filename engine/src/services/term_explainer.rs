// AI explainer for financial terms, with the server-kept conversation history
use std::sync::Arc;

use shared::models::{ChatMessage, ChatRole, HistoryEntry};

use super::backend::GuardianBackend;
use crate::error::{GuardianError, Result};
use crate::session::TokenStore;

pub const NO_RESULT: &str = "결과 없음";

pub struct TermExplainer {
    backend: Arc<dyn GuardianBackend>,
    tokens: Arc<dyn TokenStore>,
}

impl TermExplainer {
    pub fn new(backend: Arc<dyn GuardianBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        TermExplainer { backend, tokens }
    }

    /// Asks for an explanation of `term` and returns the bot's reply.
    pub async fn ask(&self, term: &str) -> Result<ChatMessage> {
        let term = term.trim();
        if term.is_empty() {
            return Err(GuardianError::EmptyInput);
        }
        let token = self.tokens.load().await?.ok_or(GuardianError::Unauthenticated)?;
        let reply = self
            .backend
            .describe_term(&token, term)
            .await
            .map_err(GuardianError::into_fetch_error)?;

        let title = extract_term(reply.description.as_deref().unwrap_or(""), term);
        let content = reply
            .content
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| NO_RESULT.to_string());
        tracing::info!(term = %term, title = %title, "Term explained");
        Ok(ChatMessage { role: ChatRole::Bot, title: Some(title), content, created_at: None })
    }

    /// Earlier questions and answers, oldest first as the server returns them.
    pub async fn history(&self) -> Result<Vec<ChatMessage>> {
        let token = self.tokens.load().await?.ok_or(GuardianError::Unauthenticated)?;
        let entries = self
            .backend
            .description_history(&token)
            .await
            .map_err(GuardianError::into_fetch_error)?;
        Ok(entries.into_iter().map(to_message).collect())
    }
}

fn to_message(entry: HistoryEntry) -> ChatMessage {
    let title = match entry.role {
        ChatRole::Bot => Some(extract_term(&entry.content, "")).filter(|t| !t.is_empty()),
        ChatRole::User => None,
    };
    ChatMessage { role: entry.role, title, content: entry.content, created_at: entry.created_at }
}

/// Picks the term a reply is about.
///
/// The first non-empty single-quoted span wins. Otherwise the first
/// space-separated word, keeping only Hangul syllables and ASCII letters and
/// digits. If that leaves nothing, `fallback` is returned.
pub fn extract_term(content: &str, fallback: &str) -> String {
    if let Some(quoted) = first_quoted(content) {
        return quoted.to_string();
    }
    let word: String = content
        .split(' ')
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || ('가'..='힣').contains(c))
        .collect();
    if word.is_empty() {
        fallback.to_string()
    } else {
        word
    }
}

fn first_quoted(content: &str) -> Option<&str> {
    let mut rest = content;
    while let Some(open) = rest.find('\'') {
        let after = &rest[open + 1..];
        let close = after.find('\'')?;
        if close > 0 {
            return Some(&after[..close]);
        }
        // Empty pair: the closing quote may open the next span.
        rest = after;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{logged_in_store, logged_out_store, FakeBackend};
    use shared::models::TermReply;

    #[test]
    fn test_extract_term_prefers_quoted_span() {
        assert_eq!(extract_term("'PER'은 주가수익비율입니다.", "x"), "PER");
        assert_eq!(extract_term("용어 ''공매도'' 설명", "x"), "공매도");
    }

    #[test]
    fn test_extract_term_first_word_cleaned() {
        assert_eq!(extract_term("배당락이란, 배당을 받을 권리가", "x"), "배당락이란");
        assert_eq!(extract_term("ETF(상장지수펀드)는", "x"), "ETF상장지수펀드는");
    }

    #[test]
    fn test_extract_term_fallback() {
        assert_eq!(extract_term("", "PBR"), "PBR");
        assert_eq!(extract_term("!!! 설명", "PBR"), "PBR");
        assert_eq!(extract_term("it's", "x"), "its");
    }

    #[tokio::test]
    async fn test_ask_builds_bot_message() {
        let fake = FakeBackend::new();
        fake.state().term_reply = Some(TermReply {
            description: Some("'공매도'란 주식을 빌려 파는 것".into()),
            content: Some("주가 하락에 베팅하는 거래입니다.".into()),
        });
        let explainer = TermExplainer::new(Arc::new(fake.clone()), logged_in_store());
        let message = explainer.ask(" 공매도 ").await.unwrap();
        assert_eq!(message.role, ChatRole::Bot);
        assert_eq!(message.title.as_deref(), Some("공매도"));
        assert_eq!(message.content, "주가 하락에 베팅하는 거래입니다.");
    }

    #[tokio::test]
    async fn test_ask_defaults_when_reply_empty() {
        let fake = FakeBackend::new();
        let explainer = TermExplainer::new(Arc::new(fake.clone()), logged_in_store());
        let message = explainer.ask("PER").await.unwrap();
        assert_eq!(message.title.as_deref(), Some("PER"));
        assert_eq!(message.content, NO_RESULT);
    }

    #[tokio::test]
    async fn test_ask_validates_before_request() {
        let fake = FakeBackend::new();
        let explainer = TermExplainer::new(Arc::new(fake.clone()), logged_out_store());
        assert!(matches!(explainer.ask("  ").await, Err(GuardianError::EmptyInput)));
        assert!(matches!(explainer.ask("PER").await, Err(GuardianError::Unauthenticated)));
        assert_eq!(fake.state().requests, 0);
    }

    #[tokio::test]
    async fn test_history_titles_bot_entries() {
        let fake = FakeBackend::new();
        fake.state().history = vec![
            HistoryEntry { role: ChatRole::User, content: "PER".into(), created_at: None },
            HistoryEntry { role: ChatRole::Bot, content: "'PER'은 ...".into(), created_at: Some("2025-11-20".into()) },
        ];
        let explainer = TermExplainer::new(Arc::new(fake.clone()), logged_in_store());
        let history = explainer.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].title, None);
        assert_eq!(history[1].title.as_deref(), Some("PER"));
        assert_eq!(history[1].created_at.as_deref(), Some("2025-11-20"));
    }
}
