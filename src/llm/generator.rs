//! The text-generation seam.

use async_trait::async_trait;

use crate::error::GenerationError;

/// Turns a prompt into generated text.
///
/// This abstraction allows mocking the remote model in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`. Empty output is reported as
    /// [`GenerationError::EmptyResponse`], never as `Ok("")`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
