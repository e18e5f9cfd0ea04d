//! Call parameters, prompts and the response payload shared by the
//! cache and the transport

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

/// Sampling temperature used when hashing. The cache key deliberately
/// ignores the runtime temperature sent to the provider.
pub const HASH_TEMPERATURE: f64 = 1.0;
/// Nucleus sampling value used when hashing
pub const HASH_TOP_P: f64 = 1.0;

// ===== Messages and prompts =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message
{   pub role: String
  , pub content: String
}

impl Message
{   pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self
    {   Message
        {   role: role.into()
          , content: content.into()
        }
    }

    pub fn user(content: impl Into<String>) -> Self
    {   Message::new("user", content)
    }

    pub fn system(content: impl Into<String>) -> Self
    {   Message::new("system", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self
    {   Message::new("assistant", content)
    }
}

/// A prompt is either a bare user text or an explicit conversation.
/// Both normalize to the conversation form before hashing and sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt
{   Text(String)
  , Turns(Vec<Message>)
}

impl Prompt
{   pub fn into_messages(self) -> Vec<Message>
    {   match self
        {   Prompt::Text(content) => vec![Message::user(content)]
          , Prompt::Turns(messages) => messages
        }
    }
}

impl From<&str> for Prompt
{   fn from(s: &str) -> Self
    {   Prompt::Text(s.to_string())
    }
}

impl From<String> for Prompt
{   fn from(s: String) -> Self
    {   Prompt::Text(s)
    }
}

impl From<Vec<Message>> for Prompt
{   fn from(messages: Vec<Message>) -> Self
    {   Prompt::Turns(messages)
    }
}

// ===== Call parameters =====

/// The call-invocation view that is hashed and stored under `call`
/// in every cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallParameters
{   pub messages: Vec<Message>
  , pub model: String
  , /// Caller-visible sample count. Part of the key only; the
    /// transport always requests a single sample.
    pub n: u32
  , pub temperature: f64
  , pub top_p: f64
}

impl CallParameters
{   /// Build the hashing view of a call. Fails when `sample_count` is 0.
    pub fn new(
      model: impl Into<String>
    , prompt: impl Into<Prompt>
    , sample_count: u32
    ) -> crate::Result<Self>
    {   if sample_count == 0
        {   return Err(crate::Error::InvalidArgument(
              "sample_count must be at least 1".to_string()
            ));
        }
        Ok(CallParameters
        {   messages: prompt.into().into_messages()
          , model: model.into()
          , n: sample_count
          , temperature: HASH_TEMPERATURE
          , top_p: HASH_TOP_P
        })
    }

    /// Structured form fed to the canonical encoder
    pub fn to_value(&self) -> Value
    {   let messages: Vec<Value> = self.messages
          .iter()
          .map(|m| json!({ "role": m.role, "content": m.content }))
          .collect();
        json!({
          "messages": messages,
          "model": self.model,
          "n": self.n,
          "temperature": self.temperature,
          "top_p": self.top_p,
        })
    }
}

// ===== Transport request =====

/// Body of a chat-completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<Message>
  , pub n: u32
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>
}

// ===== Response payload =====

/// Classified failures that are stored as response data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind
{   ContextLengthExceeded
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage
{   #[serde(default)]
    pub content: Option<String>
  , #[serde(flatten)]
    pub extra: Map<String, Value>
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice
{   pub message: ChoiceMessage
  , #[serde(flatten)]
    pub extra: Map<String, Value>
}

impl Choice
{   pub fn with_content(content: impl Into<String>) -> Self
    {   Choice
        {   message: ChoiceMessage
            {   content: Some(content.into())
              , extra: Map::new()
            }
          , extra: Map::new()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage
{   #[serde(default)]
    pub prompt_tokens: u64
  , #[serde(default)]
    pub completion_tokens: u64
  , #[serde(flatten)]
    pub extra: Map<String, Value>
}

/// Raw structured provider response, or a classified failure
/// carried as data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload
{   #[serde(default)]
    pub choices: Vec<Choice>
  , #[serde(default, deserialize_with = "null_as_default")]
    pub usage: Usage
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>
  , #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>
  , #[serde(flatten)]
    pub extra: Map<String, Value>
}

impl ResponsePayload
{   /// Payload standing in for a call that overflowed the context
    /// window, charged as if it used the whole output budget.
    pub fn context_length_exceeded(
      message: impl Into<String>
    , max_tokens: u32
    ) -> Self
    {   ResponsePayload
        {   choices: vec![]
          , usage: Usage
            {   prompt_tokens: 0
              , completion_tokens: u64::from(max_tokens)
              , extra: Map::new()
            }
          , error: Some(ErrorKind::ContextLengthExceeded)
          , error_message: Some(message.into())
          , extra: Map::new()
        }
    }

    /// Turn the payload into what the caller sees
    pub fn decode(self) -> crate::Result<CallOutput>
    {   if let Some(ErrorKind::ContextLengthExceeded) = self.error
        {   return Err(crate::Error::ContextLengthExceeded
            {   message: self.error_message.unwrap_or_default()
            });
        }
        Ok(CallOutput
        {   messages: self.choices
              .into_iter()
              .map(|c| c.message.content.unwrap_or_default())
              .collect()
          , prompt_tokens: self.usage.prompt_tokens
          , completion_tokens: self.usage.completion_tokens
        })
    }
}

/// Some OpenAI-compatible servers send `"usage": null`
fn null_as_default<'de, D>(deserializer: D) -> Result<Usage, D::Error>
where
  D: Deserializer<'de>,
{   Ok(Option::<Usage>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decoded result of a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutput
{   pub messages: Vec<String>
  , pub prompt_tokens: u64
  , pub completion_tokens: u64
}
