//! # YouTube page and chat parsing
//!
//! Pure extraction and parsing helpers for the three YouTube surfaces the
//! poller touches: the channel's `/live` page (live-now detection and video
//! id), the `live_chat` page (InnerTube API key and initial continuation
//! token), and the `get_live_chat` JSON responses (chat items and the next
//! continuation).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::{
    yt::{AuthorRole, ChatItem},
    Error,
};

/// Marker substring present on a channel's `/live` page while broadcasting.
const LIVE_NOW_MARKER: &str = "\"isLiveNow\":true";

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""videoId":"([0-9A-Za-z_-]{11})""#).unwrap());

static INNERTUBE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""INNERTUBE_API_KEY":"([^"]+)""#).unwrap());

static CONTINUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""continuation":"([^"]+)""#).unwrap());

/// Extracts the live video id from a channel's `/live` page.
///
/// Returns `None` when the page lacks the live marker or a well-formed
/// 11-character video id token; neither case is an error, the channel is
/// simply not live right now.
pub fn extract_live_video_id(html: &str) -> Option<String> {
    if !html.contains(LIVE_NOW_MARKER) {
        return None;
    }
    VIDEO_ID_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Extracts the InnerTube API key and the initial chat continuation token
/// from the `live_chat` page for a video.
pub fn extract_chat_session(html: &str) -> Result<(String, String), Error> {
    let api_key = INNERTUBE_KEY_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_owned())
        .ok_or(Error::Parse(
            "Failed to extract INNERTUBE_API_KEY from the live_chat page",
        ))?;

    let continuation = CONTINUATION_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_owned())
        .ok_or(Error::Parse(
            "Failed to extract the initial continuation token from the live_chat page",
        ))?;

    Ok((api_key, continuation))
}

/// One page of chat items plus the continuation for the next poll.
#[derive(Debug)]
pub struct ChatBatch {
    pub items: Vec<ChatItem>,
    /// `None` once the upstream stops handing out continuations, which means
    /// the session is over.
    pub continuation: Option<String>,
}

/// Parses a `get_live_chat` response body.
///
/// Returns `Error::NotLive` when the response carries no
/// `liveChatContinuation` at all, which is how YouTube signals that the chat
/// has ended (or the continuation was rejected).
pub fn parse_chat_batch(json: &Value) -> Result<ChatBatch, Error> {
    let root = &json["continuationContents"]["liveChatContinuation"];
    if root.is_null() {
        return Err(Error::NotLive);
    }

    let continuation = root["continuations"]
        .as_array()
        .and_then(|continuations| continuations.iter().find_map(next_continuation));

    let mut items = Vec::new();
    if let Some(actions) = root["actions"].as_array() {
        for action in actions {
            let renderer = &action["addChatItemAction"]["item"]["liveChatTextMessageRenderer"];
            if renderer.is_null() {
                // Not a text message (membership events, deletions, ...)
                continue;
            }
            let Some(id) = renderer["id"].as_str() else {
                continue;
            };
            let author = renderer["authorName"]["simpleText"]
                .as_str()
                .unwrap_or("unknown");

            items.push(ChatItem {
                id: id.to_owned(),
                author: author.to_owned(),
                role: role_from_badges(&renderer["authorBadges"]),
                text: message_text(&renderer["message"]),
            });
        }
    }

    Ok(ChatBatch {
        items,
        continuation,
    })
}

/// The continuation token can hide under several renderer variants depending
/// on chat mode.
fn next_continuation(value: &Value) -> Option<String> {
    [
        "invalidationContinuationData",
        "timedContinuationData",
        "reloadContinuationData",
    ]
    .iter()
    .find_map(|key| value[key]["continuation"].as_str())
    .map(str::to_owned)
}

/// Joins a message's text runs; emoji runs fall back to their shortcut.
fn message_text(message: &Value) -> String {
    let Some(runs) = message["runs"].as_array() else {
        return String::new();
    };
    runs.iter()
        .filter_map(|run| {
            run["text"]
                .as_str()
                .or_else(|| run["emoji"]["shortcuts"][0].as_str())
        })
        .collect()
}

fn role_from_badges(badges: &Value) -> AuthorRole {
    let Some(badges) = badges.as_array() else {
        return AuthorRole::Viewer;
    };

    let mut role = AuthorRole::Viewer;
    for badge in badges {
        let renderer = &badge["liveChatAuthorBadgeRenderer"];
        match renderer["icon"]["iconType"].as_str() {
            Some("OWNER") => return AuthorRole::Owner,
            Some("MODERATOR") => role = AuthorRole::Moderator,
            _ => {
                // Membership badges carry a custom thumbnail instead of an
                // icon type.
                if !renderer["customThumbnail"].is_null() && role == AuthorRole::Viewer {
                    role = AuthorRole::Member;
                }
            }
        }
    }
    role
}
