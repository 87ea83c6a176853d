pub mod builder;

use std::time::Duration;

use chat_profiles::{AuthorProfile, ProfileStore, ANSI_RESET};
use tokio_util::sync::CancellationToken;

use crate::{
    history::{ChatLine, HistoryBuffer},
    ledger::Ledger,
    speech::SpeechHandle,
    yt::{ChatConnector, ChatItem, ChatSession},
    Error,
};

/// The long-lived chat ingestion loop.
///
/// Runs a `Connecting -> Polling -> Backoff -> Connecting` cycle with no
/// terminal state of its own; the loop ends only through the cancellation
/// token or a fatal profile-store failure. The dedup ledger survives
/// reconnects, so ids seen before a backoff stay suppressed afterwards.
pub struct ChatPoller<C>
where
    C: ChatConnector,
{
    connector: C,
    profiles: ProfileStore,
    ledger: Ledger,
    history: HistoryBuffer,
    speech: Option<SpeechHandle>,
    voices: Vec<String>,
    self_name: Option<String>,
    poll_interval: Duration,
    backoff: Duration,
}

impl<C> ChatPoller<C>
where
    C: ChatConnector,
{
    /// Runs until cancelled. On exit the profile store is flushed one final
    /// time, though every new-author insertion has already been persisted
    /// synchronously.
    #[tracing::instrument(skip_all)]
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<(), Error> {
        while !shutdown.is_cancelled() {
            match self.connector.connect().await {
                Ok(mut session) => {
                    tracing::info!("live chat session established");
                    match self.poll_session(&mut session, &shutdown).await {
                        Ok(()) => break, // cancelled mid-session
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            tracing::warn!(error = %e, "chat session ended, will reconnect")
                        }
                    }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(Error::NotLive) => tracing::warn!("stream is not live, retrying"),
                Err(e) => tracing::warn!(error = %e, "failed to open chat session"),
            }

            if shutdown.is_cancelled() {
                break;
            }
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.backoff) => {}
            }
        }

        self.profiles.persist()?;
        Ok(())
    }

    /// Steady-state polling of one open session. Returns `Ok` only on
    /// cancellation; a dead session or transport error bubbles up for the
    /// outer loop to back off on.
    async fn poll_session(
        &mut self,
        session: &mut C::Session,
        shutdown: &CancellationToken,
    ) -> Result<(), Error> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        while session.is_alive() {
            tokio::select! {
                _ = shutdown.cancelled() => return Ok(()),
                _ = ticker.tick() => {}
            }

            let items = session.poll().await?;
            for item in items {
                self.handle_item(item)?;
            }
        }
        Err(Error::NotLive)
    }

    /// Processes one incoming item: dedup, profile resolution, console line,
    /// history append, speech submission.
    fn handle_item(&mut self, item: ChatItem) -> Result<(), Error> {
        if self.ledger.seen(&item.id) {
            return Ok(());
        }
        self.ledger.record(&item.id);

        let profile = self.profiles.get_or_create(&item.author, &self.voices)?;
        println!("{}", format_line(&profile, &item));

        self.history.push(ChatLine {
            author: item.author.clone(),
            message: item.text.clone(),
            color: profile.color,
        });

        let is_self = self.self_name.as_deref() == Some(item.author.as_str());
        if !is_self {
            if let Some(speech) = &self.speech {
                speech.enqueue(
                    format!("{} says {}", item.author, item.text),
                    profile.voice.clone(),
                );
            }
        }

        Ok(())
    }
}

/// ANSI-colored console rendering of one chat message.
pub fn format_line(profile: &AuthorProfile, item: &ChatItem) -> String {
    format!(
        "{}{}{}: {}",
        profile.color.ansi(),
        item.author,
        ANSI_RESET,
        item.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_profiles::Color;
    use crate::yt::AuthorRole;

    #[test]
    fn format_line_colors_the_author_only() {
        let profile = AuthorProfile {
            color: Color::Cyan,
            voice: None,
        };
        let item = ChatItem {
            id: "m1".into(),
            author: "Alice".into(),
            role: AuthorRole::Viewer,
            text: "hi there".into(),
        };

        assert_eq!(
            format_line(&profile, &item),
            "\x1b[36mAlice\x1b[0m: hi there"
        );
    }
}
