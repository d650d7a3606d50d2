// Login, signup and logout against the backend, with the token kept in a TokenStore
use std::sync::Arc;

use shared::models::{Credentials, SessionToken};

use super::backend::GuardianBackend;
use crate::error::{GuardianError, Result};
use crate::session::TokenStore;

const LOGIN_REJECTED_FALLBACK: &str = "아이디 또는 비밀번호를 확인해주세요.";
const SIGNUP_REJECTED_FALLBACK: &str = "회원가입에 실패했습니다.";

pub struct SessionService {
    backend: Arc<dyn GuardianBackend>,
    tokens: Arc<dyn TokenStore>,
}

impl SessionService {
    pub fn new(backend: Arc<dyn GuardianBackend>, tokens: Arc<dyn TokenStore>) -> Self {
        SessionService { backend, tokens }
    }

    fn credentials(username: &str, password: &str) -> Result<Credentials> {
        let (username, password) = (username.trim(), password.trim());
        if username.is_empty() || password.is_empty() {
            return Err(GuardianError::MissingCredentials);
        }
        Ok(Credentials { username: username.to_string(), password: password.to_string() })
    }

    fn rejection_message(message: String, fallback: &str) -> String {
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }

    /// Exchanges credentials for a token and persists it.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionToken> {
        let credentials = Self::credentials(username, password)?;
        let token = match self.backend.login(&credentials).await {
            Ok(token) => token,
            Err(GuardianError::Http { message, .. }) => {
                tracing::warn!(username = %credentials.username, "Login rejected");
                return Err(GuardianError::LoginRejected(Self::rejection_message(
                    message,
                    LOGIN_REJECTED_FALLBACK,
                )));
            }
            Err(GuardianError::Decode(_)) => {
                return Err(GuardianError::LoginRejected(LOGIN_REJECTED_FALLBACK.to_string()))
            }
            Err(e) => return Err(e),
        };
        self.tokens.save(&token).await?;
        tracing::info!(username = %credentials.username, "Logged in");
        Ok(token)
    }

    /// Creates an account. Does not log in.
    pub async fn signup(&self, username: &str, password: &str) -> Result<()> {
        let credentials = Self::credentials(username, password)?;
        match self.backend.signup(&credentials).await {
            Ok(()) => {
                tracing::info!(username = %credentials.username, "Account created");
                Ok(())
            }
            Err(GuardianError::Http { message, .. }) => Err(GuardianError::SignupRejected(
                Self::rejection_message(message, SIGNUP_REJECTED_FALLBACK),
            )),
            Err(e) => Err(e),
        }
    }

    /// Clears the stored token. Idempotent.
    pub async fn logout(&self) -> Result<()> {
        self.tokens.clear().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub async fn current_token(&self) -> Result<Option<SessionToken>> {
        self.tokens.load().await
    }

    pub async fn require_token(&self) -> Result<SessionToken> {
        self.current_token().await?.ok_or(GuardianError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;
    use crate::test_support::FakeBackend;

    fn service(fake: &FakeBackend) -> (SessionService, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::new());
        (SessionService::new(Arc::new(fake.clone()), store.clone()), store)
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let fake = FakeBackend::new();
        fake.state().login_token = Some("abc123".into());
        let (service, store) = service(&fake);

        let token = service.login(" alice ", "pw").await.unwrap();
        assert_eq!(token.as_str(), "abc123");
        assert_eq!(store.load().await.unwrap().unwrap().as_str(), "abc123");
        assert_eq!(service.require_token().await.unwrap().as_str(), "abc123");
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let fake = FakeBackend::new();
        let (service, _) = service(&fake);
        assert!(matches!(service.login("  ", "pw").await, Err(GuardianError::MissingCredentials)));
        assert!(matches!(service.login("alice", " ").await, Err(GuardianError::MissingCredentials)));
        assert_eq!(fake.state().requests, 0);
    }

    #[tokio::test]
    async fn test_login_rejected_carries_server_message() {
        let fake = FakeBackend::new();
        fake.state().login_status = Some((401, "비밀번호가 틀렸습니다".into()));
        let (service, store) = service(&fake);
        let err = service.login("alice", "bad").await.unwrap_err();
        assert!(matches!(err, GuardianError::LoginRejected(ref m) if m == "비밀번호가 틀렸습니다"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_rejected_blank_message_uses_fallback() {
        let fake = FakeBackend::new();
        fake.state().login_status = Some((400, " ".into()));
        let (service, _) = service(&fake);
        let err = service.login("alice", "bad").await.unwrap_err();
        assert!(matches!(err, GuardianError::LoginRejected(ref m) if m == LOGIN_REJECTED_FALLBACK));
    }

    #[tokio::test]
    async fn test_signup_does_not_log_in() {
        let fake = FakeBackend::new();
        let (service, store) = service(&fake);
        service.signup("bob", "pw").await.unwrap();
        assert_eq!(fake.state().signups, vec!["bob"]);
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let fake = FakeBackend::new();
        let (service, _) = service(&fake);
        service.login("alice", "pw").await.unwrap();
        service.logout().await.unwrap();
        service.logout().await.unwrap();
        assert!(matches!(service.require_token().await, Err(GuardianError::Unauthenticated)));
    }
}
