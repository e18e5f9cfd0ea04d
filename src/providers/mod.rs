//! LLM provider transports

use async_trait::async_trait;

use crate::request::{ChatRequest, ResponsePayload};

pub mod openai;

// Re-export for convenience
pub use openai::OpenAiTransport;

/// One round trip to a chat-completion endpoint.
///
/// Implementations report a provider-side rejection of the request as
/// `Error::BadRequest` carrying the provider's message, so the executor
/// can classify it.
#[async_trait]
pub trait ChatTransport: Send + Sync
{   async fn complete(
      &self
    , request: &ChatRequest
    ) -> crate::Result<ResponsePayload>;
}
