use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use crate::executor::CallExecutor;
use crate::fingerprint::FingerprintHasher;
use crate::providers::ChatTransport;
use crate::request::{CallOutput, CallParameters, Prompt, ResponsePayload};
use crate::store::{CacheEntry, CacheStore, LoadOutcome};

type Slot = Arc<tokio::sync::Mutex<()>>;

/// Cache-fronted client for one model.
///
/// Per call: normalize the prompt, fingerprint it, look up the cache,
/// and only on a miss execute the remote call and persist the result.
/// Concurrent misses on the same cache path within one client are
/// serialized, so the later caller reads the entry the first one wrote.
#[derive(Debug)]
pub struct CachingClient<T>
{   model: String
  , executor: CallExecutor<T>
  , hasher: FingerprintHasher
  , store: CacheStore
  , load_from_cache: bool
  , save_to_cache: bool
  , inflight: Mutex<HashMap<PathBuf, Slot>>
}

impl<T: ChatTransport> CachingClient<T>
{   pub fn new(
      model: impl Into<String>
    , executor: CallExecutor<T>
    , cache_root: impl Into<PathBuf>
    ) -> Self
    {   let model = model.into();
        debug!("Creating CachingClient for model: {}", model);
        CachingClient
        {   model
          , executor
          , hasher: FingerprintHasher::new(cache_root)
          , store: CacheStore::new()
          , load_from_cache: true
          , save_to_cache: true
          , inflight: Mutex::new(HashMap::new())
        }
    }

    pub fn with_load_from_cache(mut self, enabled: bool) -> Self
    {   self.load_from_cache = enabled;
        self
    }

    pub fn with_save_to_cache(mut self, enabled: bool) -> Self
    {   self.save_to_cache = enabled;
        self
    }

    pub fn model(&self) -> &str
    {   &self.model
    }

    pub fn executor(&self) -> &CallExecutor<T>
    {   &self.executor
    }

    /// Where the entry for this call lives (or would live)
    pub fn cache_path(
      &self
    , prompt: impl Into<Prompt>
    , sample_count: u32
    , prefix: Option<&str>
    ) -> crate::Result<PathBuf>
    {   let params = CallParameters::new(
          self.model.clone(), prompt, sample_count
        )?;
        self.hasher.path_for(&params, prefix)
    }

    /// Single-sample call with no file prefix
    pub async fn call_text(
      &self
    , prompt: impl Into<Prompt>
    ) -> crate::Result<CallOutput>
    {   self.call(prompt, 1, None).await
    }

    /// Returns the response messages with prompt and completion token
    /// usage. A context-window overflow fails with
    /// `Error::ContextLengthExceeded`, whether fresh or cached.
    pub async fn call(
      &self
    , prompt: impl Into<Prompt>
    , sample_count: u32
    , prefix: Option<&str>
    ) -> crate::Result<CallOutput>
    {   let params = CallParameters::new(
          self.model.clone(), prompt, sample_count
        )?;
        let path = self.hasher.path_for(&params, prefix)?;
        debug!("Cache path for call: {}", path.display());

        let slot = self.acquire_slot(&path);
        let response = {
          let _guard = slot.lock().await;
          self.resolve(&params, &path).await
        };
        self.release_slot(&path, slot);

        let output = response?.decode()?;
        info!(
          "Responses are fetched. Input token usage: {}, output token usage: {}",
          output.prompt_tokens,
          output.completion_tokens
        );
        Ok(output)
    }

    async fn resolve(
      &self
    , params: &CallParameters
    , path: &Path
    ) -> crate::Result<ResponsePayload>
    {   if self.load_from_cache
        {   match self.store.load(path)
            {   LoadOutcome::Hit(entry) => {
                  info!("Loading LLM's response from cache...");
                  return Ok(entry.response);
                }
              , LoadOutcome::NotFound => {
                  debug!("Cache miss: {}", path.display());
                }
              , LoadOutcome::Corrupt(reason) => {
                  warn!(
                    "Failed to load LLM's response from cache ({}), calling again",
                    reason
                  );
                }
            }
        }

        let response = self.executor.execute(params).await?;

        if self.save_to_cache
        {   let entry = CacheEntry
            {   call: params.clone()
              , response: response.clone()
            };
            if let Err(e) = self.store.save(path, &entry)
            {   warn!("Failed to save LLM's response to cache: {}", e);
            }
        }
        Ok(response)
    }

    fn acquire_slot(&self, path: &Path) -> Slot
    {   let mut inflight = self.inflight
          .lock()
          .unwrap_or_else(|poisoned| poisoned.into_inner());
        inflight
          .entry(path.to_path_buf())
          .or_default()
          .clone()
    }

    fn release_slot(&self, path: &Path, slot: Slot)
    {   let mut inflight = self.inflight
          .lock()
          .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Only the map and `slot` hold it: nobody else is waiting.
        if Arc::strong_count(&slot) == 2
        {   inflight.remove(path);
        }
    }
}
