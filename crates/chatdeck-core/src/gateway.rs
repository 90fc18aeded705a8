//! Completion gateway trait.
//!
//! The gateway is the network boundary: one user message in, one assistant
//! reply out. Implementations live in `chatdeck-interaction`.

use async_trait::async_trait;

use crate::error::Result;

/// A one-shot remote completion call.
///
/// Implementations make a single attempt per call and report any transport or
/// service-side problem as [`crate::ChatError::Gateway`]. Retries and timeouts
/// are the caller's policy.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Sends `message` and returns the assistant reply text.
    async fn complete(&self, message: &str) -> Result<String>;
}
