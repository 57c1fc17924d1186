#[cfg(test)]
use mockall::automock;

use super::EventEnvelope;
use crate::Result;

/// Receives events for one registration.
///
/// Called on the dispatcher task. Implementations must not block; anything
/// slow belongs behind a channel.
#[cfg_attr(test, automock)]
pub trait EventListener: Send + Sync + 'static {
    /// `include_value` mirrors the registration filter.
    ///
    /// Returning an error marks a contract violation by the producer; the
    /// dispatcher reports it and moves on to the next registration.
    fn on_event(
        &self,
        event: &EventEnvelope,
        include_value: bool,
    ) -> Result<()>;
}
