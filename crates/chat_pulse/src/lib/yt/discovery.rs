use crate::{parser, Error};

/// Resolves a channel handle to the video id of its current live broadcast
/// by scraping the channel's `/live` page.
#[derive(Debug, Default)]
pub struct LiveFinder {
    client: reqwest::Client,
}

impl LiveFinder {
    const BASE_URL: &'static str = "https://www.youtube.com";

    pub fn new(client: reqwest::Client) -> Self {
        LiveFinder { client }
    }

    /// Returns the 11-character live video id for `handle` (e.g.
    /// `@SomeChannel`), or `Error::NotLive` when the channel is not
    /// currently broadcasting.
    #[tracing::instrument(skip(self))]
    pub async fn find_live(&self, handle: &str) -> Result<String, Error> {
        let url = format!("{}/{}/live", Self::BASE_URL, handle);
        let html = self
            .client
            .get(&url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .text()
            .await?;

        parser::extract_live_video_id(&html).ok_or(Error::NotLive)
    }
}
