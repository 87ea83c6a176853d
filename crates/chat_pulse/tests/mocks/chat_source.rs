use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chat_pulse::{
    yt::{AuthorRole, ChatConnector, ChatItem, ChatSession},
    Error,
};
use tokio_util::sync::CancellationToken;

pub fn item(id: &str, author: &str, text: &str) -> ChatItem {
    ChatItem {
        id: id.to_string(),
        author: author.to_string(),
        role: AuthorRole::Viewer,
        text: text.to_string(),
    }
}

/// Scripted chat session: hands out the queued batches one per poll, then
/// reports itself dead. `fail_first` makes the first poll raise a transport
/// error instead.
pub struct MockSession {
    batches: VecDeque<Vec<ChatItem>>,
    fail_first: bool,
}

impl MockSession {
    pub fn new(batches: Vec<Vec<ChatItem>>) -> Self {
        MockSession {
            batches: batches.into(),
            fail_first: false,
        }
    }

    pub fn failing() -> Self {
        MockSession {
            batches: VecDeque::new(),
            fail_first: true,
        }
    }
}

impl ChatSession for MockSession {
    async fn poll(&mut self) -> Result<Vec<ChatItem>, Error> {
        if self.fail_first {
            self.fail_first = false;
            return Err(Error::Parse("mock transport failure"));
        }
        self.batches
            .pop_front()
            .ok_or(Error::NotLive)
    }

    fn is_alive(&self) -> bool {
        !self.batches.is_empty() || self.fail_first
    }
}

/// Scripted connector: each `connect` hands out the next session; once the
/// script is exhausted it cancels the shutdown token so poller tests
/// terminate deterministically instead of retrying forever.
pub struct MockConnector {
    sessions: Arc<Mutex<VecDeque<MockSession>>>,
    shutdown: CancellationToken,
}

impl MockConnector {
    pub fn new(sessions: Vec<MockSession>, shutdown: CancellationToken) -> Self {
        MockConnector {
            sessions: Arc::new(Mutex::new(sessions.into())),
            shutdown,
        }
    }
}

impl ChatConnector for MockConnector {
    type Session = MockSession;

    async fn connect(&self) -> Result<MockSession, Error> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.pop_front() {
            Some(session) => Ok(session),
            None => {
                self.shutdown.cancel();
                Err(Error::NotLive)
            }
        }
    }
}
