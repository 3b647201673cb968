use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::LlmClient;
use crate::pipeline::summary::SummaryError;

/// Scripted outcome of one mock generation.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    /// Non-retryable provider failure.
    Fail(String),
    /// Quota rejection.
    Quota,
    /// The task running the call panics.
    Panic,
}

impl MockReply {
    pub fn text(s: &str) -> Self {
        MockReply::Text(s.to_string())
    }
}

/// Mock LLM client for testing.
///
/// Replies are chosen in order: the first rule whose marker occurs in the
/// prompt, then the next queued reply, then the fallback.
pub struct MockLlmClient {
    rules: Vec<(String, MockReply)>,
    queue: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// Always answer with `response`.
    pub fn new(response: &str) -> Self {
        Self::with_fallback(MockReply::text(response))
    }

    /// Always fail with a non-retryable error.
    pub fn failing(message: &str) -> Self {
        Self::with_fallback(MockReply::Fail(message.to_string()))
    }

    pub fn with_fallback(fallback: MockReply) -> Self {
        Self {
            rules: Vec::new(),
            queue: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer prompts containing `marker` with `reply`.
    pub fn on(mut self, marker: &str, reply: MockReply) -> Self {
        self.rules.push((marker.to_string(), reply));
        self
    }

    /// Replies consumed one per call, after rules and before the fallback.
    pub fn with_queue(self, replies: Vec<MockReply>) -> Self {
        if let Ok(mut queue) = self.queue.lock() {
            queue.extend(replies);
        }
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn next_reply(&self, prompt: &str) -> MockReply {
        if let Some((_, reply)) = self.rules.iter().find(|(marker, _)| prompt.contains(marker)) {
            return reply.clone();
        }
        if let Some(reply) = self.queue.lock().ok().and_then(|mut q| q.pop_front()) {
            return reply;
        }
        self.fallback.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match self.next_reply(prompt) {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(SummaryError::LlmStatus {
                status: 500,
                body: message,
            }),
            MockReply::Quota => Err(SummaryError::QuotaExceeded("mock quota".into())),
            MockReply::Panic => panic!("mock LLM panic"),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
