pub mod error;
pub mod config;
pub mod canonical;
pub mod fingerprint;
pub mod store;
pub mod providers;
pub mod request;
pub mod executor;
pub mod client;
pub mod registry;

/*

llm-cache: a deterministic-fingerprint response cache in front of
pay-per-call chat-completion APIs. Every call is reduced to the same
file on disk however its parameters are ordered, the remote API is
only hit on a miss, and context-window overflows are cached as data.

llm-cache/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports
│   ├── error.rs        # Error taxonomy
│   ├── config.rs       # LlmConfig (JSON config keys)
│   ├── canonical.rs    # Order-independent JSON encoding
│   ├── fingerprint.rs  # SHA-256 keys and cache paths
│   ├── store.rs        # Atomic JSON cache files
│   ├── request.rs      # Prompt, call parameters, response payload
│   ├── providers/      # Transports (OpenAI-compatible HTTP)
│   ├── executor.rs     # One remote call + failure classification
│   ├── client.rs       # CachingClient: lookup, execute, persist
│   └── registry.rs     # Model presets and client factory
└── tests/

Cache layout: {cache_root}/{model}/[{prefix}_]{fingerprint}.json

*/

pub use client::CachingClient;
pub use config::LlmConfig;
pub use error::{Error, Result};
pub use executor::CallExecutor;
pub use fingerprint::{Fingerprint, FingerprintHasher};
pub use providers::{ChatTransport, OpenAiTransport};
pub use registry::{ClientFactory, ModelPreset};
pub use request::{
  CallOutput, CallParameters, ChatRequest, Choice, ErrorKind, Message,
  Prompt, ResponsePayload, Usage,
};
pub use store::{CacheEntry, CacheStore, LoadOutcome};
