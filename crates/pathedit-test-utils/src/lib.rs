//! Testing utilities for pathedit workspace
//!
//! Scripted collaborators that record every call, plus tracing setup.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use pathedit_core::{
    CollaboratorError, CommitRequest, Committer, Translator, ValidationRequest, ValidationVerdict,
    Validator,
};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// Install a fmt subscriber filtered by `RUST_LOG`; safe to call repeatedly
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub type ValidatorReply = Result<Option<ValidationVerdict>, CollaboratorError>;

/// Validator answering from a per-name script
///
/// Names without a script are accepted.
#[derive(Debug, Default)]
pub struct ScriptedValidator {
    replies: Mutex<HashMap<String, VecDeque<ValidatorReply>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<ValidationRequest>>,
}

impl ScriptedValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject `name` with `message`
    #[must_use]
    pub fn rejecting(self, name: &str, message: &str) -> Self {
        self.reply(name, Ok(Some(ValidationVerdict::rejected(message))))
    }

    /// Fail the call for `name`
    #[must_use]
    pub fn failing(self, name: &str, message: &str) -> Self {
        self.reply(name, Err(CollaboratorError::new(message)))
    }

    /// Queue a reply for `name`; the last one queued repeats
    #[must_use]
    pub fn reply(self, name: &str, reply: ValidatorReply) -> Self {
        self.replies
            .lock()
            .entry(name.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Answer for `name` only after `delay`
    #[must_use]
    pub fn delayed(self, name: &str, delay: Duration) -> Self {
        self.delays.lock().insert(name.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<ValidationRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn next_reply(&self, name: &str) -> ValidatorReply {
        let mut replies = self.replies.lock();
        match replies.get_mut(name) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Ok(None)),
            Some(queue) => queue.front().cloned().unwrap_or(Ok(None)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Validator for ScriptedValidator {
    async fn validate(&self, request: ValidationRequest) -> ValidatorReply {
        self.calls.lock().push(request.clone());
        let delay = self.delays.lock().get(&request.leaf_name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.next_reply(&request.leaf_name)
    }
}

/// Committer that records requests and fails on demand
#[derive(Debug, Default)]
pub struct RecordingCommitter {
    failures: Mutex<VecDeque<String>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<CommitRequest>>,
}

impl RecordingCommitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call with `message`
    #[must_use]
    pub fn failing_once(self, message: &str) -> Self {
        self.failures.lock().push_back(message.to_string());
        self
    }

    /// Take `delay` before answering
    #[must_use]
    pub fn delayed(self, delay: Duration) -> Self {
        *self.delay.lock() = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<CommitRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Committer for RecordingCommitter {
    async fn commit(&self, request: CommitRequest) -> Result<(), CollaboratorError> {
        self.calls.lock().push(request);
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.failures.lock().pop_front() {
            Some(message) => Err(CollaboratorError::new(message)),
            None => Ok(()),
        }
    }
}

/// Translator with fixed copy per key, recording every lookup
#[derive(Debug, Default)]
pub struct RecordingTranslator {
    copy: HashMap<String, String>,
    lookups: Mutex<Vec<String>>,
}

impl RecordingTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, text: &str) -> Self {
        self.copy.insert(key.to_string(), text.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }
}

impl Translator for RecordingTranslator {
    fn translate(&self, key: &str, default_value: &str, args: &[(&str, String)]) -> String {
        self.lookups.lock().push(key.to_string());
        let template = self.copy.get(key).map_or(default_value, String::as_str);
        pathedit_core::messages::interpolate(template, args)
    }
}
