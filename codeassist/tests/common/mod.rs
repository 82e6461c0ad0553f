#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use codeassist::{Capability, LlmProvider};

/// A mock provider that replays scripted responses in order.
///
/// Clones share the same response queue, so a test can keep a handle for
/// re-seeding after the builder consumes its clone.
#[derive(Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
}

impl MockProvider {
    /// Create a mock from a sequence of responses (popped in order).
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
        }
    }

    /// Queue further responses on an already-built mock.
    pub fn push_responses(&self, responses: Vec<&str>) {
        let mut queue = self.responses.lock().unwrap();
        queue.extend(responses.into_iter().map(String::from));
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn generate(
        &self,
        _instruction: &str,
        _prompt: &str,
        _capabilities: &[&dyn Capability],
    ) -> Result<String> {
        let mut queue = self.responses.lock().unwrap();
        queue
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("MockProvider: no more responses in queue"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// One recorded provider invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub instruction: String,
    pub prompt: String,
    pub capabilities: Vec<String>,
}

/// A provider that records every call it receives and replays scripted
/// responses, for asserting on prompt construction.
#[derive(Clone)]
pub struct RecordingProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingProvider {
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for RecordingProvider {
    async fn generate(
        &self,
        instruction: &str,
        prompt: &str,
        capabilities: &[&dyn Capability],
    ) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            instruction: instruction.to_string(),
            prompt: prompt.to_string(),
            capabilities: capabilities.iter().map(|c| c.name().to_string()).collect(),
        });

        let mut queue = self.responses.lock().unwrap();
        queue
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("RecordingProvider: no more responses in queue"))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// A provider that fails on the nth call (0-based), succeeding before it.
#[derive(Clone)]
pub struct FailingProvider {
    fail_at: usize,
    count: Arc<Mutex<usize>>,
}

impl FailingProvider {
    pub fn fail_at(call_index: usize) -> Self {
        Self {
            fail_at: call_index,
            count: Arc::new(Mutex::new(0)),
        }
    }
}

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn generate(
        &self,
        _instruction: &str,
        _prompt: &str,
        _capabilities: &[&dyn Capability],
    ) -> Result<String> {
        let mut count = self.count.lock().unwrap();
        let index = *count;
        *count += 1;
        if index == self.fail_at {
            anyhow::bail!("simulated provider failure at call {}", index);
        }
        Ok(format!("output {}", index))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
