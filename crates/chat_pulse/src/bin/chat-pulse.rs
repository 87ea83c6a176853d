use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use chat_profiles::ProfileStore;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use chat_pulse::{
    overlay,
    tracing::init_tracing_subscriber,
    yt::{discovery::LiveFinder, live_chat::InnerTubeConnector},
    ChatPollerBuilder, HistoryBuffer, SpeechDispatcher, SpeechEngine, SystemTts,
};

#[derive(Parser)]
#[command(
    name = "chat-pulse",
    about = "YouTube live chat in the terminal, with per-author colors and speech"
)]
struct Cli {
    /// Channel handle to watch, e.g. @SomeChannel
    #[arg(long, env = "CHANNEL_HANDLE")]
    channel: String,

    /// Seconds between chat polls
    #[arg(long, env = "REFRESH_INTERVAL", default_value = "5")]
    refresh_interval: u64,

    /// Your own display name; your messages are shown but not spoken
    #[arg(long, env = "SELF_NAME", default_value = "Me")]
    self_name: String,

    /// Path to the persisted author settings file
    #[arg(long, env = "SETTINGS_FILE", default_value = "user_settings.json")]
    settings_file: PathBuf,

    /// Disable text-to-speech
    #[arg(long)]
    no_tts: bool,

    /// Serve the browser overlay on this address, e.g. 127.0.0.1:8080
    #[arg(long, env = "OVERLAY_ADDR")]
    overlay: Option<SocketAddr>,

    /// Number of recent messages kept for the overlay
    #[arg(long, default_value = "10")]
    history_size: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    // Discovery failure is fatal at startup: report and exit non-zero.
    let finder = LiveFinder::default();
    let video_id = finder
        .find_live(&cli.channel)
        .await
        .with_context(|| format!("no live stream currently for {}", cli.channel))?;
    tracing::info!(%video_id, channel = %cli.channel, "found live stream");

    let profiles =
        ProfileStore::load(&cli.settings_file).context("failed to load author settings")?;

    let history = HistoryBuffer::new(cli.history_size);
    if let Some(addr) = cli.overlay {
        let history = history.clone();
        tokio::spawn(async move {
            if let Err(e) = overlay::serve(history, addr).await {
                tracing::error!(error = ?e, "overlay server exited");
            }
        });
    }

    let mut speech = None;
    let mut voices = Vec::new();
    if !cli.no_tts {
        match SystemTts::new() {
            Ok(engine) => {
                voices = engine.voices();
                speech = Some(SpeechDispatcher::spawn(engine));
            }
            Err(e) => {
                tracing::warn!(error = ?e, "speech engine unavailable, continuing without TTS")
            }
        }
    }

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutting down...");
                shutdown.cancel();
            }
        });
    }

    let mut builder = ChatPollerBuilder::new(profiles)
        .history(history)
        .self_name(cli.self_name)
        .poll_interval(Duration::from_secs(cli.refresh_interval));
    if let Some(dispatcher) = &speech {
        builder = builder.speech(dispatcher.handle(), voices);
    }
    let poller = builder
        .connector(InnerTubeConnector::new(video_id))
        .build();

    poller.run(shutdown).await?;

    if let Some(dispatcher) = speech {
        dispatcher.shutdown();
    }

    Ok(())
}
