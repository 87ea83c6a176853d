use std::time::Duration;

use anyhow::Context;
use chat_profiles::{Color, ANSI_RESET};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use chat_pulse::{
    tracing::init_tracing_subscriber,
    yt::{
        data_api::{LiveChatApi, MAX_MESSAGE_LEN},
        AuthorRole,
    },
    Error, Ledger,
};

#[derive(Parser)]
#[command(
    name = "chat-cli",
    about = "Read and post YouTube live chat via the Data API"
)]
struct Cli {
    /// Video id of the live broadcast
    #[arg(long, env = "VIDEO_ID")]
    video_id: String,

    /// OAuth access token with the youtube.force-ssl scope
    #[arg(long, env = "YT_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Seconds to wait between refreshes
    #[arg(long, default_value = "5")]
    refresh_interval: u64,
}

const BOLD: &str = "\x1b[1m";

fn role_color(role: AuthorRole, author: &str) -> String {
    match role {
        AuthorRole::Owner => format!("{BOLD}{}", Color::Red.ansi()),
        AuthorRole::Moderator => format!("{BOLD}{}", Color::Blue.ansi()),
        AuthorRole::Member => Color::Green.ansi().to_string(),
        AuthorRole::Viewer => Color::for_name(author).ansi().to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let api = LiveChatApi::new(cli.access_token);
    let live_chat_id = api
        .live_chat_id(&cli.video_id)
        .await
        .context("no active live chat for this video, is it live?")?;
    tracing::info!(%live_chat_id, "connected to live chat");

    let mut ledger = Ledger::new();
    let mut page_token: Option<String> = None;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let page = api
            .list_messages(&live_chat_id, page_token.as_deref())
            .await?;
        page_token = page.next_page_token;

        for item in page.items {
            if ledger.seen(&item.id) {
                continue;
            }
            ledger.record(&item.id);
            println!(
                "{}{}{}: {}",
                role_color(item.role, &item.author),
                item.author,
                ANSI_RESET,
                item.text
            );
        }

        println!("Type a message (max {MAX_MESSAGE_LEN} chars, blank to refresh):");
        let Some(line) = input.next_line().await? else {
            break; // stdin closed
        };
        let line = line.trim();
        if !line.is_empty() {
            match api.insert_message(&live_chat_id, line).await {
                Ok(()) => println!("{BOLD}{}Me{ANSI_RESET}: {line}", Color::Cyan.ansi()),
                Err(e @ Error::MessageTooLong { .. }) => eprintln!("{e}"),
                Err(e) => return Err(e.into()),
            }
        }

        tokio::time::sleep(Duration::from_secs(cli.refresh_interval)).await;
    }

    Ok(())
}
