//! Configuration for cached LLM clients
//!
//! Keys follow the JSON config file layout (`api-key`, `max-tokens`,
//! `base-chat-cache-folder`, ...). Missing keys take their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_CACHE_FOLDER: &str = "cache/chat_cache";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LlmConfig
{   /// Bearer key sent to every provider
    pub api_key: String
  , /// Hard bound on completion tokens per call
    pub max_tokens: u32
  , /// Temperature sent to the provider (not part of the cache key)
    pub temperature: f64
  , /// Model name for the custom preset
    pub model: String
  , /// API base URL for the custom preset
    pub base_url: String
  , /// Cache root; entries land under `{root}/{model}/`
    #[serde(rename = "base-chat-cache-folder")]
    pub cache_root: PathBuf
  , pub load_from_cache: bool
  , pub save_to_cache: bool
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
}

impl Default for LlmConfig
{   fn default() -> Self
    {   LlmConfig
        {   api_key: String::new()
          , max_tokens: DEFAULT_MAX_TOKENS
          , temperature: 1.0
          , model: String::new()
          , base_url: String::new()
          , cache_root: PathBuf::from(DEFAULT_CACHE_FOLDER)
          , load_from_cache: true
          , save_to_cache: true
          , timeout_secs: None
        }
    }
}

impl LlmConfig
{   pub fn from_json_str(json: &str) -> crate::Result<Self>
    {   let config: LlmConfig = serde_json::from_str(json)
          .map_err(|e| crate::Error::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self>
    {   let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
          crate::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          )
        })?;
        LlmConfig::from_json_str(&json)
    }

    pub fn validate(&self) -> crate::Result<()>
    {   if self.max_tokens == 0
        {   return Err(crate::Error::InvalidConfiguration(
              "max-tokens must be at least 1".to_string()
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration>
    {   self.timeout_secs.map(Duration::from_secs)
    }
}
