use crate::domain::model::{DeliveryOutcome, DeliveryReceipt, OutboundMessage};
use crate::domain::ports::{DeliveryAdapter, DeliverySettings, LinkOpener};
use crate::utils::error::{IntakeError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const DEFAULT_SIMULATED_DELAY_MS: u64 = 1500;
pub const DEFAULT_MESSAGING_BASE_URL: &str = "https://wa.me";

/// 模擬送出：等待一段時間後回報成功
#[derive(Debug, Clone)]
pub struct SimulatedDelivery {
    delay: Duration,
}

impl SimulatedDelivery {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_settings<S: DeliverySettings + ?Sized>(settings: &S) -> Self {
        Self::new(Duration::from_millis(settings.simulated_delay_ms()))
    }
}

impl Default for SimulatedDelivery {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SIMULATED_DELAY_MS))
    }
}

#[async_trait]
impl DeliveryAdapter for SimulatedDelivery {
    async fn deliver(&self, message: &OutboundMessage) -> Result<DeliveryReceipt> {
        tracing::debug!("Simulating submission for {} ({:?})", message.requester, self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(DeliveryReceipt::new(DeliveryOutcome::Accepted))
    }
}

/// Builds `<base>/<recipient>?text=<message>` with the whole message encoded
/// as a single query parameter.
pub fn build_message_link(base_url: &str, recipient_id: &str, text: &str) -> Result<Url> {
    let base = Url::parse(base_url)?;
    if base.cannot_be_a_base() {
        return Err(IntakeError::InvalidConfigValueError {
            field: "delivery.messaging_base_url".to_string(),
            value: base_url.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }

    let raw = format!(
        "{}/{}?text={}",
        base.as_str().trim_end_matches('/'),
        urlencoding::encode(recipient_id),
        urlencoding::encode(text)
    );
    Ok(Url::parse(&raw)?)
}

/// Opens the pre-filled messaging link. Fire-and-forget: the outcome only says
/// the link was handed off.
pub struct MessagingLinkDelivery {
    base_url: String,
    recipient_id: String,
    opener: Arc<dyn LinkOpener>,
}

impl MessagingLinkDelivery {
    pub fn new(
        base_url: impl Into<String>,
        recipient_id: impl Into<String>,
        opener: Arc<dyn LinkOpener>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            recipient_id: recipient_id.into(),
            opener,
        }
    }

    pub fn from_settings<S: DeliverySettings + ?Sized>(
        settings: &S,
        opener: Arc<dyn LinkOpener>,
    ) -> Result<Self> {
        let recipient = settings
            .recipient_id()
            .ok_or_else(|| IntakeError::MissingConfigError {
                field: "delivery.recipient_id".to_string(),
            })?;
        Ok(Self::new(settings.messaging_base_url(), recipient, opener))
    }
}

#[async_trait]
impl DeliveryAdapter for MessagingLinkDelivery {
    async fn deliver(&self, message: &OutboundMessage) -> Result<DeliveryReceipt> {
        let url = build_message_link(&self.base_url, &self.recipient_id, &message.text)?;
        self.opener.open(url.as_str())?;
        tracing::info!("Messaging link handed off for {}", message.requester);
        Ok(DeliveryReceipt::new(DeliveryOutcome::HandedOff {
            url: url.to_string(),
        }))
    }
}

/// Writes the link to the log instead of launching anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOpener;

impl LinkOpener for LogOpener {
    fn open(&self, url: &str) -> Result<()> {
        tracing::info!("Open this link to send the request: {}", url);
        Ok(())
    }
}

/// Keeps every opened link; handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|links| links.clone())
            .unwrap_or_default()
    }
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<()> {
        self.opened
            .lock()
            .map_err(|_| IntakeError::DeliveryError {
                message: "link recorder is poisoned".to_string(),
            })?
            .push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> OutboundMessage {
        OutboundMessage {
            requester: "Jane".to_string(),
            text: text.to_string(),
            service_count: 1,
        }
    }

    #[test]
    fn test_build_message_link_encodes_text_as_one_parameter() {
        let url = build_message_link("https://wa.me", "15551234567", "*Hi* & bye\n1. SEO").unwrap();
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/15551234567");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, vec![("text".to_string(), "*Hi* & bye\n1. SEO".to_string())]);
        assert!(url.as_str().contains("%26"));
        assert!(url.as_str().contains("%0A"));
    }

    #[test]
    fn test_build_message_link_trailing_slash_base() {
        let url = build_message_link("https://wa.me/", "123", "x").unwrap();
        assert_eq!(url.as_str(), "https://wa.me/123?text=x");
    }

    #[test]
    fn test_build_message_link_rejects_bad_base() {
        assert!(build_message_link("not a url", "123", "x").is_err());
        assert!(build_message_link("mailto:sales@example.com", "123", "x").is_err());
    }

    #[tokio::test]
    async fn test_link_delivery_hands_off() {
        let opener = Arc::new(RecordingOpener::new());
        let adapter = MessagingLinkDelivery::new("https://wa.me", "123", opener.clone());
        let receipt = adapter.deliver(&message("hello world")).await.unwrap();

        assert!(!receipt.is_confirmed());
        let opened = opener.opened();
        assert_eq!(opened, vec!["https://wa.me/123?text=hello%20world".to_string()]);
        assert_eq!(
            receipt.outcome,
            DeliveryOutcome::HandedOff {
                url: opened[0].clone()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_delivery_waits_for_delay() {
        let adapter = SimulatedDelivery::new(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();
        let receipt = adapter.deliver(&message("x")).await.unwrap();
        assert!(receipt.is_confirmed());
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
