use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuardianError {
    // --- Session ---
    #[error("Authentication required: no session token stored")]
    Unauthenticated,

    #[error("Session expired: the server rejected the stored token")]
    SessionExpired,

    #[error("Username and password are both required")]
    MissingCredentials,

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Signup rejected: {0}")]
    SignupRejected(String),

    // --- Favorites workflow ---
    #[error("Input is empty")]
    EmptyInput,

    #[error("No casing of '{0}' was accepted by the server")]
    NoAcceptedVariant(String),

    #[error("Server rejected favorite '{name}' ({code})")]
    AddRejected { code: String, name: String },

    #[error("Server rejected removal of favorite '{0}'")]
    RemoveRejected(String),

    #[error("A request for '{0}' is already in flight")]
    AlreadyInFlight(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    // --- Transport ---
    #[error("Could not reach the server: {0}")]
    Connectivity(String),

    #[error("Server responded with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Unexpected response payload: {0}")]
    Decode(String),

    // --- Local ---
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reference table format error: {0}")]
    ReferenceFormat(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV parsing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl GuardianError {
    /// Errors after which the stored token must be cleared and the user sent back to login.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, GuardianError::Unauthenticated | GuardianError::SessionExpired)
    }

    /// Classifies a raw backend failure for read calls: 401/403 expire the session,
    /// any other status is a failed fetch. Transport and local errors pass through.
    pub fn into_fetch_error(self) -> GuardianError {
        match self {
            GuardianError::Http { status: 401 | 403, .. } => GuardianError::SessionExpired,
            GuardianError::Http { status, message } => {
                GuardianError::FetchFailed(format!("status {}: {}", status, message))
            }
            GuardianError::Decode(msg) => GuardianError::FetchFailed(msg),
            other => other,
        }
    }
}

impl From<reqwest::Error> for GuardianError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GuardianError::Decode(err.to_string())
        } else {
            GuardianError::Connectivity(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GuardianError>;
