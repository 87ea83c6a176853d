pub mod data_api;
pub mod discovery;
pub mod live_chat;

use std::future::Future;

use crate::Error;

/// One chat message as delivered by a chat source.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatItem {
    /// Opaque unique token from the source; dedup key for one run.
    pub id: String,
    pub author: String,
    pub role: AuthorRole,
    pub text: String,
}

/// Author role derived from chat badges / `authorDetails` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorRole {
    #[default]
    Viewer,
    Member,
    Moderator,
    Owner,
}

/// Opens a chat session for one live broadcast.
///
/// Each reconnect after backoff goes through `connect` again, restarting the
/// session from scratch.
pub trait ChatConnector {
    type Session: ChatSession;

    fn connect(&self) -> impl Future<Output = Result<Self::Session, Error>>;
}

/// An open chat session: an iterable batch of new items per poll plus an
/// is-this-still-alive predicate.
pub trait ChatSession {
    fn poll(&mut self) -> impl Future<Output = Result<Vec<ChatItem>, Error>>;

    fn is_alive(&self) -> bool;
}
