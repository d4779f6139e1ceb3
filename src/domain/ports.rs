use crate::domain::model::{DeliveryReceipt, OutboundMessage};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DeliveryAdapter: Send + Sync {
    async fn deliver(&self, message: &OutboundMessage) -> Result<DeliveryReceipt>;
}

/// Hands a URL to whatever opens it (browser, OS handler, log). No return channel.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

pub trait DeliverySettings: Send + Sync {
    fn messaging_base_url(&self) -> &str;
    fn recipient_id(&self) -> Option<&str>;
    fn simulated_delay_ms(&self) -> u64;
}
