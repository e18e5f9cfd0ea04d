//! Builds independent, explicitly configured clients per model

use log::debug;

use crate::client::CachingClient;
use crate::config::LlmConfig;
use crate::executor::CallExecutor;
use crate::providers::openai::{DEEPSEEK_API_BASE, OPENAI_API_BASE};
use crate::providers::{ChatTransport, OpenAiTransport};

/// Known model endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelPreset
{   /// DeepSeek-V3 (ignores multi-sample requests)
    DeepseekV3
  , Gpt4o
  , Gpt35Turbo
  , /// Model and base URL taken from the config
    Custom
}

impl ModelPreset
{   /// `(model, base_url)` for this preset
    pub fn endpoint<'a>(&self, config: &'a LlmConfig) -> (&'a str, &'a str)
    {   match self
        {   ModelPreset::DeepseekV3 => ("deepseek-chat", DEEPSEEK_API_BASE)
          , ModelPreset::Gpt4o => ("gpt-4o", OPENAI_API_BASE)
          , ModelPreset::Gpt35Turbo => ("gpt-3.5-turbo", OPENAI_API_BASE)
          , ModelPreset::Custom => (config.model.as_str(), config.base_url.as_str())
        }
    }
}

/// Factory for `CachingClient`s sharing one config
#[derive(Debug, Clone)]
pub struct ClientFactory
{   config: LlmConfig
}

impl ClientFactory
{   pub fn new(config: LlmConfig) -> Self
    {   ClientFactory
        {   config
        }
    }

    pub fn config(&self) -> &LlmConfig
    {   &self.config
    }

    /// Client for `preset` over HTTP
    pub fn build(
      &self
    , preset: ModelPreset
    ) -> crate::Result<CachingClient<OpenAiTransport>>
    {   self.config.validate()?;
        let (model, base_url) = preset.endpoint(&self.config);
        if model.is_empty() || base_url.is_empty()
        {   return Err(crate::Error::InvalidConfiguration(
              format!("{:?} preset needs both model and base-url", preset)
            ));
        }
        if self.config.api_key.is_empty()
        {   return Err(crate::Error::MissingApiKey(model.to_string()));
        }
        let transport = OpenAiTransport::new(
          base_url,
          self.config.api_key.clone(),
          self.config.timeout()
        )?;
        self.build_with(model, transport)
    }

    /// Client for `model` over any transport
    pub fn build_with<T: ChatTransport>(
      &self
    , model: &str
    , transport: T
    ) -> crate::Result<CachingClient<T>>
    {   self.config.validate()?;
        debug!("Building client for model: {}", model);
        let executor = CallExecutor::new(
          transport,
          self.config.temperature,
          self.config.max_tokens
        );
        Ok(
          CachingClient::new(model, executor, self.config.cache_root.clone())
            .with_load_from_cache(self.config.load_from_cache)
            .with_save_to_cache(self.config.save_to_cache)
        )
    }
}
