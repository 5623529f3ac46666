//! Monitoring collaborator for parser faults and operational notes.
//!
//! Reporting is fire-and-forget: it must never block or fail a scan.

use bazaar_core::ReportingConfig;

/// External monitoring collaborator.
///
/// `info` carries operational notes (flush summaries); `error` carries
/// faults a human should look at (parser mismatches, failed background
/// invocations).
pub trait Reporter: Send + Sync {
    /// Post an informational note about a source.
    fn info(&self, source: &str, message: &str);

    /// Post an error report.
    fn error(&self, title: &str, detail: &str);
}

/// Reporter that only logs through `tracing`.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn info(&self, source: &str, message: &str) {
        tracing::info!(%source, "{message}");
    }

    fn error(&self, title: &str, detail: &str) {
        tracing::error!(%title, "{detail}");
    }
}

/// Reporter posting to a chat webhook.
///
/// Posts are detached tasks; failures are logged and dropped.
pub struct WebhookReporter {
    client: reqwest::Client,
    webhook_url: String,
    info_channel: String,
    errors_channel: String,
    username: String,
}

impl WebhookReporter {
    /// Build a reporter from config; `None` when no webhook is configured.
    #[must_use]
    pub fn from_config(config: &ReportingConfig) -> Option<Self> {
        let webhook_url = config.webhook_url.clone()?;
        Some(Self {
            client: reqwest::Client::new(),
            webhook_url,
            info_channel: config.info_channel.clone(),
            errors_channel: config.errors_channel.clone(),
            username: config.username.clone(),
        })
    }

    fn post(&self, payload: serde_json::Value) {
        let client = self.client.clone();
        let url = self.webhook_url.clone();
        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(response) if !response.status().is_success() => {
                    tracing::warn!(status = %response.status(), "webhook refused report");
                }
                Err(e) => tracing::warn!(error = %e, "failed to post report to webhook"),
                Ok(_) => {}
            }
        });
    }
}

impl Reporter for WebhookReporter {
    fn info(&self, source: &str, message: &str) {
        tracing::info!(%source, "{message}");
        self.post(serde_json::json!({
            "channel": format!("#{}", self.info_channel),
            "username": self.username,
            "icon_emoji": ":robot_face:",
            "text": format!("{source}: {message}"),
        }));
    }

    fn error(&self, title: &str, detail: &str) {
        tracing::error!(%title, "{detail}");
        self.post(serde_json::json!({
            "channel": format!("#{}", self.errors_channel),
            "username": self.username,
            "icon_emoji": ":skull_and_crossbones:",
            "text": format!("{title}\n{detail}"),
        }));
    }
}
