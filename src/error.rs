use thiserror::Error;

/// Custom error type for cache and LLM call operations
/// Implements Clone for sending across tasks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error
{   /// Prompt plus completion exceeds the model context window.
    /// Classified failure: the sentinel response is still cached.
    #[error("Request exceeds model context window: {message}")]
    ContextLengthExceeded
    {   message: String
    }
  , /// Provider rejected the request for another reason (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String)
  , /// API returned a non-success status
    #[error("API error ({status}): {message}")]
    ApiError
    {   status: u16
      , message: String
    }
  , /// HTTP request error
    #[error("HTTP error: {0}")]
    HttpError(String)
  , /// Timeout error
    #[error("Request timed out")]
    Timeout
  , /// Failed to parse API response
    #[error("Parse error: {0}")]
    ParseError(String)
  , /// API key is missing for a provider
    #[error("Missing API key for: {0}")]
    MissingApiKey(String)
  , /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String)
  , /// Invalid call argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String)
  , /// Failed to persist a cache entry
    #[error("Cache write failed: {0}")]
    CacheWrite(String)
}

impl Error
{   /// True for the one failure callers can react to by
    /// shortening the prompt and retrying.
    pub fn is_context_length_exceeded(&self) -> bool
    {   matches!(self, Error::ContextLengthExceeded { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
