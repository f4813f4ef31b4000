//! Dev mode endpoints.
//!
//! These endpoints are only available when running `folio dev`.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::services::FileWatcher;

/// Appended to served pages in dev mode; reloads on any site change
pub const RELOAD_SCRIPT: &str = r#"<script>
(function () {
  var events = new EventSource("/dev/events");
  events.addEventListener("file-change", function () { window.location.reload(); });
  events.addEventListener("refresh", function () { window.location.reload(); });
})();
</script>"#;

/// Dev mode application state
#[derive(Clone)]
pub struct DevState {
    pub file_watcher: Arc<FileWatcher>,
}

/// SSE endpoint for file change events
pub async fn handle_events(
    State(state): State<DevState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.file_watcher.subscribe();

    let stream = BroadcastStream::new(rx).map(|result| match result {
        Ok(event) => {
            let paths: Vec<String> = event
                .paths
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .collect();
            Ok(Event::default()
                .event("file-change")
                .data(serde_json::to_string(&paths).unwrap_or_default()))
        }
        // Lagged: a generic refresh is enough
        Err(_) => Ok(Event::default().event("refresh").data("lagged")),
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
