use std::time::Duration;

use chat_profiles::ProfileStore;

use crate::{
    history::HistoryBuffer, ledger::Ledger, speech::SpeechHandle, yt::ChatConnector, ChatPoller,
};

const DEFAULT_HISTORY_CAPACITY: usize = 10;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// Builder for [`ChatPoller`]; the connector is supplied last and fixes the
/// poller's type parameter.
pub struct ChatPollerBuilder<C = ()> {
    connector: C,
    profiles: ProfileStore,
    history: HistoryBuffer,
    speech: Option<SpeechHandle>,
    voices: Vec<String>,
    self_name: Option<String>,
    poll_interval: Duration,
    backoff: Duration,
}

impl ChatPollerBuilder {
    pub fn new(profiles: ProfileStore) -> Self {
        ChatPollerBuilder {
            connector: (),
            profiles,
            history: HistoryBuffer::new(DEFAULT_HISTORY_CAPACITY),
            speech: None,
            voices: Vec::new(),
            self_name: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl<C> ChatPollerBuilder<C> {
    pub fn connector<C2: ChatConnector>(self, connector: C2) -> ChatPollerBuilder<C2> {
        ChatPollerBuilder {
            connector,
            profiles: self.profiles,
            history: self.history,
            speech: self.speech,
            voices: self.voices,
            self_name: self.self_name,
            poll_interval: self.poll_interval,
            backoff: self.backoff,
        }
    }

    /// Share a history buffer with a presentation sink.
    pub fn history(mut self, history: HistoryBuffer) -> Self {
        self.history = history;
        self
    }

    /// Enable speech: a dispatcher handle plus the voice ids available at
    /// startup, which new profiles draw from.
    pub fn speech(mut self, handle: SpeechHandle, voices: Vec<String>) -> Self {
        self.speech = Some(handle);
        self.voices = voices;
        self
    }

    /// Messages from this display name are shown but never spoken.
    pub fn self_name(mut self, name: impl Into<String>) -> Self {
        self.self_name = Some(name.into());
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

impl<C: ChatConnector> ChatPollerBuilder<C> {
    pub fn build(self) -> ChatPoller<C> {
        ChatPoller {
            connector: self.connector,
            profiles: self.profiles,
            ledger: Ledger::new(),
            history: self.history,
            speech: self.speech,
            voices: self.voices,
            self_name: self.self_name,
            poll_interval: self.poll_interval,
            backoff: self.backoff,
        }
    }
}
