//! Official YouTube Data API client for live chat.
//!
//! Consumes an already-authorized OAuth access token (the interactive
//! authorization flow itself is outside this crate); exposes the three
//! operations the CLI needs: resolve a video's active live chat id, list one
//! page of chat messages, and insert a text message with the 200-character
//! limit enforced client-side before any network call.

use serde_json::Value;

use crate::{
    yt::{AuthorRole, ChatItem},
    Error,
};

/// YouTube's live chat message length limit, enforced before submission.
pub const MAX_MESSAGE_LEN: usize = 200;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

pub struct LiveChatApi {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

/// One page of listed messages.
#[derive(Debug)]
pub struct MessagePage {
    pub items: Vec<ChatItem>,
    pub next_page_token: Option<String>,
}

impl LiveChatApi {
    pub fn new(access_token: impl Into<String>) -> Self {
        LiveChatApi {
            client: reqwest::Client::new(),
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolves the active live chat id for a video, or `Error::NotLive`
    /// when the video is missing or not broadcasting.
    #[tracing::instrument(skip(self))]
    pub async fn live_chat_id(&self, video_id: &str) -> Result<String, Error> {
        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[("part", "liveStreamingDetails"), ("id", video_id)])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        response["items"][0]["liveStreamingDetails"]["activeLiveChatId"]
            .as_str()
            .map(str::to_owned)
            .ok_or(Error::NotLive)
    }

    /// Lists one page of chat messages.
    #[tracing::instrument(skip(self, page_token))]
    pub async fn list_messages(
        &self,
        live_chat_id: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage, Error> {
        let mut query = vec![
            ("liveChatId", live_chat_id),
            ("part", "snippet,authorDetails"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .client
            .get(format!("{}/liveChat/messages", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        parse_message_page(&response)
    }

    /// Inserts a text message into the live chat.
    ///
    /// Over-long messages are rejected with `Error::MessageTooLong` without
    /// touching the network; there is no retry.
    #[tracing::instrument(skip(self, text))]
    pub async fn insert_message(&self, live_chat_id: &str, text: &str) -> Result<(), Error> {
        let len = text.chars().count();
        if len > MAX_MESSAGE_LEN {
            return Err(Error::MessageTooLong {
                len,
                max: MAX_MESSAGE_LEN,
            });
        }

        let body = serde_json::json!({
            "snippet": {
                "liveChatId": live_chat_id,
                "type": "textMessageEvent",
                "textMessageDetails": { "messageText": text },
            }
        });

        self.client
            .post(format!("{}/liveChat/messages", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[("part", "snippet")])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Parses a `liveChatMessages.list` response body.
pub fn parse_message_page(json: &Value) -> Result<MessagePage, Error> {
    let items = json["items"]
        .as_array()
        .ok_or(Error::Parse("liveChatMessages response has no 'items'"))?
        .iter()
        .filter_map(|item| {
            let id = item["id"].as_str()?;
            let author = item["authorDetails"]["displayName"].as_str()?;
            let text = item["snippet"]["displayMessage"].as_str().unwrap_or("");
            Some(ChatItem {
                id: id.to_owned(),
                author: author.to_owned(),
                role: role_from_author_details(&item["authorDetails"]),
                text: text.to_owned(),
            })
        })
        .collect();

    Ok(MessagePage {
        items,
        next_page_token: json["nextPageToken"].as_str().map(str::to_owned),
    })
}

fn role_from_author_details(details: &Value) -> AuthorRole {
    if details["isChatOwner"].as_bool().unwrap_or(false) {
        AuthorRole::Owner
    } else if details["isChatModerator"].as_bool().unwrap_or(false) {
        AuthorRole::Moderator
    } else if details["isChatSponsor"].as_bool().unwrap_or(false) {
        AuthorRole::Member
    } else {
        AuthorRole::Viewer
    }
}
