use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Event dispatch configuration
///
/// ```toml
/// [listener]
/// enabled = true
/// event_queue_size = 10000
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListenerConfig {
    /// Start the dispatcher. When disabled, publishes are dropped.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Bounded queue between the mutation path and the dispatcher.
    ///
    /// Publishes beyond this depth are dropped rather than blocking the
    /// partition worker.
    #[serde(default = "default_event_queue_size")]
    pub event_queue_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            event_queue_size: default_event_queue_size(),
        }
    }
}

impl ListenerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.event_queue_size == 0 {
            return Err(Error::InvalidConfig(
                "event_queue_size must be greater than 0 when listeners are enabled".into(),
            ));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_event_queue_size() -> usize {
    10_000
}
