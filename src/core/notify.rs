//! Remote cache invalidation
//!
//! After the stylesheet changes, the login server is asked to drop its cached
//! copy. The request is fire-and-forget: no retry, and failures are only
//! logged. A missed notification leaves the remote copy stale until it expires.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Default action name sent to the endpoint
pub const DEFAULT_ACTION: &str = "invalidatecss";

/// Upper bound on a single request, so stuck requests do not pile up
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Signals that the generated stylesheet changed
pub trait InvalidationNotifier: Send + Sync {
    /// Start a notification and return immediately
    fn notify(&self);
}

/// Notifier that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl InvalidationNotifier for NoopNotifier {
    fn notify(&self) {
        tracing::trace!("No invalidation endpoint configured");
    }
}

/// Notifier posting `{"act": <action>, ..payload}` to an HTTP endpoint
#[derive(Debug)]
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
    action: String,
    payload: Map<String, Value>,
    runtime: Option<Handle>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpNotifier {
    /// Create a notifier bound to the current tokio runtime
    ///
    /// Outside a runtime every `notify` is dropped with a warning.
    pub fn new(endpoint: impl Into<String>, action: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("HTTP client setup failed, using defaults without timeout: {}", e);
                reqwest::Client::default()
            });

        Self {
            client,
            endpoint: endpoint.into(),
            action: action.into(),
            payload: Map::new(),
            runtime: Handle::try_current().ok(),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Extra fields sent with every request
    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn body(&self) -> Value {
        let mut body = self.payload.clone();
        body.insert("act".to_string(), Value::String(self.action.clone()));
        Value::Object(body)
    }

    /// Wait for requests already started
    ///
    /// For short-lived processes that would otherwise exit mid-request.
    /// Outcomes are still only logged.
    pub async fn flush(&self) {
        let handles = std::mem::take(&mut *self.in_flight.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("Invalidation task failed: {}", e);
            }
        }
    }
}

impl InvalidationNotifier for HttpNotifier {
    fn notify(&self) {
        let Some(runtime) = &self.runtime else {
            tracing::warn!(endpoint = %self.endpoint, "No async runtime, skipping cache invalidation");
            return;
        };

        let request = self.client.post(&self.endpoint).json(&self.body());
        let endpoint = self.endpoint.clone();
        let action = self.action.clone();

        let handle = runtime.spawn(async move {
            match request.send().await {
                Ok(response) => {
                    tracing::debug!(%endpoint, %action, status = %response.status(), "Cache invalidation sent");
                }
                Err(e) => {
                    tracing::warn!(%endpoint, %action, "Cache invalidation failed: {}", e);
                }
            }
        });

        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|task| !task.is_finished());
        in_flight.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_includes_action() {
        let mut payload = Map::new();
        payload.insert("server".to_string(), Value::String("main".to_string()));
        let notifier = HttpNotifier::new("http://localhost/action.php", DEFAULT_ACTION)
            .with_payload(payload);

        let body = notifier.body();
        assert_eq!(body["act"], "invalidatecss");
        assert_eq!(body["server"], "main");
    }

    #[test]
    fn test_without_runtime_is_noop() {
        let notifier = HttpNotifier::new("http://localhost/action.php", DEFAULT_ACTION);
        notifier.notify();
        assert!(notifier.in_flight.lock().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_does_not_surface() {
        // Port 9 (discard) on localhost refuses connections
        let notifier = HttpNotifier::new("http://127.0.0.1:9/action.php", DEFAULT_ACTION);
        notifier.notify();
        notifier.flush().await;
        assert!(notifier.in_flight.lock().is_empty());
    }
}
