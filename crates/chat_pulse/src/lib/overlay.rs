//! Browser overlay for screen capture.
//!
//! `GET /` serves a static page whose script polls `GET /data` once a second
//! and fully replaces the rendered list with the latest history snapshot. No
//! auth, no pagination, no diffing.

use std::net::SocketAddr;

use axum::{extract::State, response::Html, routing::get, Json, Router};

use crate::history::{ChatLine, HistoryBuffer};

pub fn router(history: HistoryBuffer) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/data", get(data))
        .with_state(history)
}

pub async fn serve(history: HistoryBuffer, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(history);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "overlay listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(include_str!("overlay/index.html"))
}

async fn data(State(history): State<HistoryBuffer>) -> Json<Vec<ChatLine>> {
    Json(history.snapshot())
}
