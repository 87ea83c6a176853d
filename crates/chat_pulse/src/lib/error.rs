use chat_profiles::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The channel has no live broadcast, or the chat session has ended.
    #[error("no live chat session is currently available")]
    NotLive,

    #[error("failed to parse YouTube response: {0}")]
    Parse(&'static str),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("chat transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rejected client-side before any network call (Data API variant).
    #[error("message is {len} characters, the live chat limit is {max}")]
    MessageTooLong { len: usize, max: usize },

    #[error("author profile store failure: {0}")]
    ProfileStore(#[from] StoreError),
}

impl Error {
    /// Fatal errors abort the poll loop. Everything else is retried after a
    /// fixed backoff, including a permanently-dead session; indefinite retry
    /// is the accepted behavior here.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ProfileStore(_))
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Json(_) | Error::Parse(_))
    }
}
