use serde_json::Value;

use crate::{
    parser,
    yt::{ChatConnector, ChatItem, ChatSession},
    Error,
};

const BASE_URL: &str = "https://www.youtube.com";
const CLIENT_VERSION: &str = "2.20240101.00.00";

/// Opens InnerTube live-chat sessions for one video.
///
/// A session starts by scraping the `live_chat` page for the API key and the
/// initial continuation token; subsequent polls go through the
/// `get_live_chat` JSON endpoint, each response handing back the next
/// continuation.
#[derive(Debug, Clone)]
pub struct InnerTubeConnector {
    client: reqwest::Client,
    video_id: String,
}

impl InnerTubeConnector {
    pub fn new(video_id: impl Into<String>) -> Self {
        InnerTubeConnector {
            client: reqwest::Client::new(),
            video_id: video_id.into(),
        }
    }
}

impl ChatConnector for InnerTubeConnector {
    type Session = InnerTubeChat;

    #[tracing::instrument(skip(self), fields(video_id = %self.video_id))]
    async fn connect(&self) -> Result<InnerTubeChat, Error> {
        let url = format!("{}/live_chat?v={}", BASE_URL, self.video_id);
        let html = self
            .client
            .get(&url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .text()
            .await?;

        let (api_key, continuation) = parser::extract_chat_session(&html)?;
        tracing::debug!("opened live chat session");

        Ok(InnerTubeChat {
            client: self.client.clone(),
            api_key,
            continuation: Some(continuation),
        })
    }
}

/// One open live-chat session.
#[derive(Debug)]
pub struct InnerTubeChat {
    client: reqwest::Client,
    api_key: String,
    continuation: Option<String>,
}

impl ChatSession for InnerTubeChat {
    async fn poll(&mut self) -> Result<Vec<ChatItem>, Error> {
        let Some(continuation) = self.continuation.clone() else {
            return Err(Error::NotLive);
        };

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "WEB",
                    "clientVersion": CLIENT_VERSION,
                }
            },
            "continuation": continuation,
        });

        let response = self
            .client
            .post(format!(
                "{}/youtubei/v1/live_chat/get_live_chat?key={}",
                BASE_URL, self.api_key
            ))
            .json(&body)
            .send()
            .await?
            .json::<Value>()
            .await?;

        match parser::parse_chat_batch(&response) {
            Ok(batch) => {
                self.continuation = batch.continuation;
                Ok(batch.items)
            }
            Err(e) => {
                if matches!(e, Error::NotLive) {
                    self.continuation = None;
                }
                Err(e)
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.continuation.is_some()
    }
}
