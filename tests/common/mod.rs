#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use llm_cache::{
  CachingClient, CallExecutor, ChatRequest, ChatTransport, Choice,
  Error, ResponsePayload, Usage,
};

pub const MODEL: &str = "gpt-test";

pub fn init_logging()
{   let _ = env_logger::builder().is_test(true).try_init();
}

/// What the fake provider answers with
#[derive(Clone)]
pub enum Reply
{   Text
    {   content: String
      , prompt_tokens: u64
      , completion_tokens: u64
    }
  , Fail(Error)
}

/// In-memory transport that counts and records requests
#[derive(Clone)]
pub struct FakeTransport
{   pub calls: Arc<AtomicUsize>
  , pub requests: Arc<Mutex<Vec<ChatRequest>>>
  , reply: Reply
  , delay: Option<Duration>
}

impl FakeTransport
{   pub fn replying(content: &str, prompt_tokens: u64, completion_tokens: u64) -> Self
    {   FakeTransport::new(Reply::Text
        {   content: content.to_string()
          , prompt_tokens
          , completion_tokens
        })
    }

    pub fn failing(error: Error) -> Self
    {   FakeTransport::new(Reply::Fail(error))
    }

    fn new(reply: Reply) -> Self
    {   FakeTransport
        {   calls: Arc::new(AtomicUsize::new(0))
          , requests: Arc::new(Mutex::new(vec![]))
          , reply
          , delay: None
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self
    {   self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize
    {   self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest>
    {   self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatTransport for FakeTransport
{   async fn complete(
      &self
    , request: &ChatRequest
    ) -> llm_cache::Result<ResponsePayload>
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay
        {   tokio::time::sleep(delay).await;
        }
        match &self.reply
        {   Reply::Text { content, prompt_tokens, completion_tokens } => {
              Ok(ResponsePayload
              {   choices: vec![Choice::with_content(content.clone())]
                , usage: Usage
                  {   prompt_tokens: *prompt_tokens
                    , completion_tokens: *completion_tokens
                    , ..Default::default()
                  }
                , ..Default::default()
              })
            }
          , Reply::Fail(e) => Err(e.clone())
        }
    }
}

pub fn client_with(
  transport: FakeTransport
, cache_root: &std::path::Path
) -> CachingClient<FakeTransport>
{   CachingClient::new(
      MODEL,
      CallExecutor::new(transport, 0.3, 8192),
      cache_root
    )
}
