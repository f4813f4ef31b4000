use tokio::sync::broadcast;

/// Name of the completion event exposed to page scripts
pub const EVENT_NAME: &str = "portfolioDataLoaded";

/// `id` of the script element that raises [`EVENT_NAME`] in the browser
pub const DISPATCH_SCRIPT_ID: &str = "portfolio-data-loaded";

/// Script body that raises [`EVENT_NAME`] on `window` once the page is parsed
pub fn dispatch_script() -> String {
    format!(
        "document.addEventListener(\"DOMContentLoaded\", () => window.dispatchEvent(new Event(\"{EVENT_NAME}\")));"
    )
}

/// Fired once after a run has populated and finalized the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortfolioLoaded;

/// Broadcast channel for the completion event
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    tx: broadcast::Sender<PortfolioLoaded>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PortfolioLoaded> {
        self.tx.subscribe()
    }

    /// Notify every current subscriber, returning how many were reached
    pub fn fire(&self) -> usize {
        let listeners = self.tx.send(PortfolioLoaded).unwrap_or(0);
        tracing::debug!(event = EVENT_NAME, listeners, "Completion signal fired");
        listeners
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}
