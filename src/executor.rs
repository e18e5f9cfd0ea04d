//! Performs the remote call and classifies provider failures

use log::{info, warn};

use crate::providers::ChatTransport;
use crate::request::{CallParameters, ChatRequest, ResponsePayload};

/// Marker providers put in the error body when prompt plus
/// completion overflows the context window
const CONTEXT_LENGTH_MARKER: &str = "context_length_exceeded";

#[derive(Debug)]
pub struct CallExecutor<T>
{   transport: T
  , temperature: f64
  , max_tokens: u32
}

impl<T: ChatTransport> CallExecutor<T>
{   pub fn new(transport: T, temperature: f64, max_tokens: u32) -> Self
    {   CallExecutor
        {   transport
          , temperature
          , max_tokens
        }
    }

    pub fn transport(&self) -> &T
    {   &self.transport
    }

    pub fn max_tokens(&self) -> u32
    {   self.max_tokens
    }

    /// Send `params` once. A single sample is always requested whatever
    /// `params.n` says, with the configured temperature and token budget.
    ///
    /// A context-window overflow comes back as a sentinel payload, not
    /// an error. Every other failure propagates.
    pub async fn execute(
      &self
    , params: &CallParameters
    ) -> crate::Result<ResponsePayload>
    {   let request = ChatRequest
        {   model: params.model.clone()
          , messages: params.messages.clone()
          , n: 1
          , max_tokens: Some(self.max_tokens)
          , temperature: Some(self.temperature)
          , stream: Some(false)
        };

        info!("Calling the LLM with prompt: {:?}", request.messages);

        match self.transport.complete(&request).await
        {   Ok(payload) => Ok(payload)
          , Err(crate::Error::BadRequest(message))
              if message.contains(CONTEXT_LENGTH_MARKER) => {
              warn!("Context length exceeded for model {}", params.model);
              Ok(ResponsePayload::context_length_exceeded(
                message,
                self.max_tokens
              ))
            }
          , Err(e) => Err(e)
        }
    }
}
