use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, trace};
use reqwest::StatusCode;

use crate::request::{ChatRequest, ResponsePayload};

pub const OPENAI_API_BASE: &str
  = "https://api.openai.com/v1";
pub const DEEPSEEK_API_BASE: &str
  = "https://api.deepseek.com";

/// Chat-completions client for OpenAI-compatible endpoints
#[derive(Debug, Clone)]
pub struct OpenAiTransport
{   base_url: String
  , api_key: String
  , http_client: reqwest::Client
}

impl OpenAiTransport
{   pub fn new(
      base_url: impl Into<String>
    , api_key: impl Into<String>
    , timeout: Option<Duration>
    ) -> crate::Result<Self>
    {   let base_url = base_url.into();
        debug!("Creating OpenAiTransport for {}", base_url);
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout
        {   builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          crate::Error::InvalidConfiguration(e.to_string())
        })?;
        Ok(OpenAiTransport
        {   base_url
          , api_key: api_key.into()
          , http_client
        })
    }

    pub fn base_url(&self) -> &str
    {   &self.base_url
    }

    fn endpoint(&self) -> String
    {   format!(
          "{}/chat/completions",
          self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl super::ChatTransport for OpenAiTransport
{   async fn complete(
      &self
    , request: &ChatRequest
    ) -> crate::Result<ResponsePayload>
    {   trace!("Chat request: {:?}", request);

        let response = self.http_client
          .post(self.endpoint())
          .bearer_auth(&self.api_key)
          .json(request)
          .send()
          .await
          .map_err(|e| {
            if e.is_timeout()
            {   error!("Request timed out: {}", e);
                crate::Error::Timeout
            } else
            {   error!("HTTP error: {}", e);
                crate::Error::HttpError(e.to_string())
            }
          })?;

        let status = response.status();
        trace!("Chat response status: {}", status);

        if !status.is_success()
        {   let error_text = match response.text().await
            {   Ok(text) => text
              , Err(e) if e.is_timeout() => {
                  error!("Timed out reading error body: {}", e);
                  return Err(crate::Error::Timeout);
                }
              , Err(_) => "Unknown error".to_string()
            };
            if status == StatusCode::BAD_REQUEST
            {   debug!("Provider rejected request: {}", error_text);
                return Err(crate::Error::BadRequest(error_text));
            }
            error!("API error {}: {}", status, error_text);
            return Err(crate::Error::ApiError
            {   status: status.as_u16()
              , message: error_text
            });
        }

        response.json::<ResponsePayload>().await.map_err(|e| {
          if e.is_timeout()
          {   error!("Timed out reading response: {}", e);
              crate::Error::Timeout
          } else
          {   error!("Parse error: {}", e);
              crate::Error::ParseError(e.to_string())
          }
        })
    }
}
