//! Yahoo Finance cookie and crumb handling.
//!
//! `quoteSummary` rejects requests without a crumb tied to the session
//! cookie. The cookie comes from visiting the session page, the crumb from
//! `/v1/test/getcrumb`. Both are cached until Yahoo answers 401.

use crate::error::{SdkError, SdkResult};
use crate::transport::{Agent, HttpTransport};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct YahooSession {
    crumb: Mutex<Option<String>>,
}

impl YahooSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached crumb, fetching a fresh one when none is held.
    pub async fn crumb(&self, http: &HttpTransport) -> SdkResult<String> {
        let mut guard = self.crumb.lock().await;
        if let Some(crumb) = guard.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = fetch_crumb(http).await?;
        *guard = Some(crumb.clone());
        Ok(crumb)
    }

    /// Drop the cached crumb so the next call renews the session.
    pub async fn reset(&self) {
        debug!("Resetting Yahoo session crumb");
        *self.crumb.lock().await = None;
    }
}

async fn fetch_crumb(http: &HttpTransport) -> SdkResult<String> {
    let config = http.config();
    info!("Opening Yahoo Finance session");

    http.visit(config.yahoo_session_url.clone()).await?;

    let url = HttpTransport::build_url(&config.yahoo_base_url, "v1/test/getcrumb")?;
    let crumb = http.get_text(url, Agent::Browser).await?;
    let crumb = crumb.trim();

    // Yahoo answers with an HTML consent or error page when it refuses
    if crumb.is_empty() || crumb.contains('<') || crumb.contains(' ') {
        return Err(SdkError::Crumb(format!("unexpected crumb response: {:.40}", crumb)));
    }

    Ok(crumb.to_string())
}
