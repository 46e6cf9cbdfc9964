//! Email confirmation seam.
//!
//! The service that receives confirmation mail lives outside the browser;
//! scenarios plug a client in through [`Mailbox`].

use amo_probe::{PollConfig, ProbeResult};
use serde::{Deserialize, Serialize};

/// Bounds for waiting on a confirmation message (5s interval, 60s ceiling)
pub const MAIL_POLL: PollConfig = PollConfig::new(5_000, 60_000);

/// A received message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    #[serde(default)]
    pub body: String,
}

/// Lookup of the latest message delivered to an address
pub trait Mailbox: Send + Sync {
    /// Latest message for `address`, `None` while nothing has arrived
    fn latest_message(&self, address: &str) -> ProbeResult<Option<MailMessage>>;
}
