mod mocks;

use std::time::Duration;

use chat_profiles::ProfileStore;
use chat_pulse::{ChatPollerBuilder, Error, HistoryBuffer, SpeechDispatcher, SpeechEngine};
use mocks::{
    chat_source::{item, MockConnector, MockSession},
    speech_engine::MockSpeechEngine,
};
use tokio_util::sync::CancellationToken;

/// Runs the poller over a scripted set of sessions until the script is
/// exhausted, then drains the speech backlog so asserts see every utterance.
async fn run_scripted(
    sessions: Vec<MockSession>,
    self_name: &str,
) -> (
    HistoryBuffer,
    MockSpeechEngine,
    tempfile::TempDir,
    Result<(), Error>,
) {
    let dir = tempfile::tempdir().unwrap();
    let profiles = ProfileStore::load(dir.path().join("user_settings.json")).unwrap();

    let engine = MockSpeechEngine::default();
    let voices = engine.voices();
    let dispatcher = SpeechDispatcher::spawn(engine.clone());

    let history = HistoryBuffer::new(10);
    let shutdown = CancellationToken::new();
    let connector = MockConnector::new(sessions, shutdown.clone());

    let poller = ChatPollerBuilder::new(profiles)
        .history(history.clone())
        .speech(dispatcher.handle(), voices)
        .self_name(self_name)
        .poll_interval(Duration::from_millis(10))
        .backoff(Duration::from_millis(10))
        .connector(connector)
        .build();

    let result = poller.run(shutdown).await;
    dispatcher.shutdown();

    (history, engine, dir, result)
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn end_to_end_dedup_profiles_and_speech() {
    // Alice says hi, the same message arrives again with the same id, then
    // Bob says yo.
    let sessions = vec![MockSession::new(vec![vec![
        item("1", "Alice", "hi"),
        item("1", "Alice", "hi"),
        item("2", "Bob", "yo"),
    ]])];

    let (history, engine, dir, result) = run_scripted(sessions, "Me").await;
    result.expect("poller should end cleanly");

    let lines = history.snapshot();
    assert_eq!(lines.len(), 2, "the duplicate id must be suppressed");
    assert_eq!(
        (lines[0].author.as_str(), lines[0].message.as_str()),
        ("Alice", "hi")
    );
    assert_eq!(
        (lines[1].author.as_str(), lines[1].message.as_str()),
        ("Bob", "yo")
    );

    assert_eq!(
        engine.spoken_texts(),
        vec!["Alice says hi", "Bob says yo"],
        "exactly one speech request per unique message, in order"
    );

    // Two distinct profiles were created and persisted.
    let mut store = ProfileStore::load(dir.path().join("user_settings.json")).unwrap();
    assert_eq!(store.len(), 2);
    let alice = store.get("Alice").cloned().unwrap();
    assert!(store.get("Bob").is_some());

    // Stable after reload, and the spoken voice is Alice's assigned voice.
    assert_eq!(store.get_or_create("Alice", &[]).unwrap(), alice);
    let calls = engine.calls.lock().unwrap();
    assert_eq!(calls[0].1, alice.voice);
}

// ─── Dedup ledger ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn seen_ids_stay_suppressed_across_polls_and_reconnects() {
    let sessions = vec![
        MockSession::new(vec![vec![item("1", "Alice", "hi")]]),
        // Reconnected session replays id 1 and repeats id 2 across polls.
        MockSession::new(vec![
            vec![item("1", "Alice", "hi"), item("2", "Bob", "yo")],
            vec![item("2", "Bob", "yo"), item("3", "Alice", "bye")],
        ]),
    ];

    let (history, engine, _dir, result) = run_scripted(sessions, "Me").await;
    result.expect("poller should end cleanly");

    let rendered: Vec<(String, String)> = history
        .snapshot()
        .into_iter()
        .map(|line| (line.author, line.message))
        .collect();
    assert_eq!(
        rendered,
        vec![
            ("Alice".to_string(), "hi".to_string()),
            ("Bob".to_string(), "yo".to_string()),
            ("Alice".to_string(), "bye".to_string()),
        ]
    );

    assert_eq!(
        engine.spoken_texts(),
        vec!["Alice says hi", "Bob says yo", "Alice says bye"]
    );
}

// ─── Self identity ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn own_messages_are_shown_but_not_spoken() {
    let sessions = vec![MockSession::new(vec![vec![
        item("1", "Alice", "hi"),
        item("2", "Me", "welcome everyone"),
    ]])];

    let (history, engine, _dir, result) = run_scripted(sessions, "Me").await;
    result.expect("poller should end cleanly");

    assert_eq!(history.len(), 2, "own messages still reach the sinks");
    assert_eq!(engine.spoken_texts(), vec!["Alice says hi"]);
}

// ─── Recovery ────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn transport_failure_backs_off_and_reconnects() {
    let sessions = vec![
        MockSession::failing(),
        MockSession::new(vec![vec![item("1", "Alice", "hi")]]),
    ];

    let (history, _engine, _dir, result) = run_scripted(sessions, "Me").await;
    result.expect("transport failures are transient");

    assert_eq!(history.len(), 1, "messages flow again after the reconnect");
}

#[tokio::test(start_paused = true)]
async fn profile_store_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    // Parent directory does not exist, so the synchronous persist on first
    // author sighting fails.
    let profiles = ProfileStore::load(dir.path().join("missing").join("settings.json")).unwrap();

    let shutdown = CancellationToken::new();
    let connector = MockConnector::new(
        vec![MockSession::new(vec![vec![item("1", "Alice", "hi")]])],
        shutdown.clone(),
    );

    let poller = ChatPollerBuilder::new(profiles)
        .poll_interval(Duration::from_millis(10))
        .backoff(Duration::from_millis(10))
        .connector(connector)
        .build();

    let result = poller.run(shutdown).await;
    match result {
        Err(e) => assert!(e.is_fatal(), "store failure must abort, got {e:?}"),
        Ok(()) => panic!("poller should not swallow a store failure"),
    }
}

// ─── History bound ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn history_keeps_only_the_most_recent_entries() {
    let batch: Vec<_> = (0..8)
        .map(|n| item(&n.to_string(), "Alice", &format!("message {n}")))
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let profiles = ProfileStore::load(dir.path().join("user_settings.json")).unwrap();

    let history = HistoryBuffer::new(3);
    let shutdown = CancellationToken::new();
    let connector = MockConnector::new(vec![MockSession::new(vec![batch])], shutdown.clone());

    let poller = ChatPollerBuilder::new(profiles)
        .history(history.clone())
        .poll_interval(Duration::from_millis(10))
        .backoff(Duration::from_millis(10))
        .connector(connector)
        .build();

    poller.run(shutdown).await.expect("poller should end cleanly");

    let messages: Vec<String> = history
        .snapshot()
        .into_iter()
        .map(|line| line.message)
        .collect();
    assert_eq!(messages, vec!["message 5", "message 6", "message 7"]);
}
