use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use almox_core::config::AssistantConfig;
use almox_core::domain::chat::{Author, ChatMessage, MessageId};
use almox_core::inventory::ContextProvider;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::conversation::ResponseResolver;
use crate::guardrails::{InputDecision, InputPolicy};
use crate::rules::{render, RuleSet};
use crate::transcript::Transcript;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("input rejected ({reason_code}): {user_message}")]
    Rejected { reason_code: &'static str, user_message: String },
    #[error("the assistant is still answering the previous message")]
    ReplyPending,
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub typing_delay: Duration,
    pub greeting: Option<String>,
    pub input_policy: InputPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(1_500),
            greeting: None,
            input_policy: InputPolicy::default(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &AssistantConfig, rules: &RuleSet) -> Self {
        Self {
            typing_delay: Duration::from_millis(config.typing_delay_ms),
            greeting: config
                .greeting_enabled
                .then(|| rules.greeting().map(str::to_string))
                .flatten(),
            input_policy: InputPolicy::new(config.max_input_chars),
        }
    }
}

/// One chat conversation: validates input, records the transcript, and
/// delivers each reply after the typing delay.
///
/// At most one reply is in flight. Closing or dropping the session cancels it
/// before it reaches the transcript. Must be used inside a tokio runtime.
pub struct ChatSession {
    session_id: String,
    resolver: Arc<ResponseResolver>,
    provider: Arc<dyn ContextProvider>,
    input_policy: InputPolicy,
    typing_delay: Duration,
    transcript: Arc<Mutex<Transcript>>,
    pending: Option<PendingReply>,
}

impl ChatSession {
    pub fn new(
        resolver: Arc<ResponseResolver>,
        provider: Arc<dyn ContextProvider>,
        options: SessionOptions,
    ) -> Self {
        let session_id = Uuid::new_v4().to_string();
        let mut transcript = Transcript::new();
        if let Some(greeting) = options.greeting {
            transcript.append(Author::Assistant, render(&greeting, &provider.snapshot()), None);
        }

        info!(
            event_name = "assistant.session.started",
            session_id = %session_id,
            typing_delay_ms = options.typing_delay.as_millis() as u64,
            "chat session started"
        );

        Self {
            session_id,
            resolver,
            provider,
            input_policy: options.input_policy,
            typing_delay: options.typing_delay,
            transcript: Arc::new(Mutex::new(transcript)),
            pending: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_typing(&self) -> bool {
        self.pending.as_ref().is_some_and(PendingReply::is_outstanding)
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        lock_transcript(&self.transcript).messages().to_vec()
    }

    pub fn submit(&mut self, text: &str) -> Result<MessageId, SubmitError> {
        if let InputDecision::Reject { reason_code, user_message } =
            self.input_policy.evaluate(text)
        {
            debug!(
                event_name = "assistant.session.input_rejected",
                session_id = %self.session_id,
                reason_code,
                "input rejected before resolution"
            );
            return Err(SubmitError::Rejected { reason_code, user_message });
        }

        if self.is_typing() {
            return Err(SubmitError::ReplyPending);
        }

        let message = lock_transcript(&self.transcript).append(Author::User, text, None);
        info!(
            event_name = "assistant.session.message_submitted",
            session_id = %self.session_id,
            message_id = message.id.0,
            "user message appended"
        );

        self.pending = Some(self.schedule_reply(text.to_string()));
        Ok(message.id)
    }

    /// Waits for the pending reply. `None` when nothing is pending or the reply was cancelled.
    pub async fn next_reply(&mut self) -> Option<ChatMessage> {
        let handle = self.pending.as_mut()?.handle.as_mut()?;
        let outcome = handle.await;
        self.pending = None;

        match outcome {
            Ok(message) => message,
            Err(error) => {
                warn!(
                    event_name = "assistant.reply.join_failed",
                    session_id = %self.session_id,
                    error = %error,
                    "reply task did not complete"
                );
                None
            }
        }
    }

    /// Cancels a pending reply. Returns whether one was cancelled before
    /// reaching the transcript.
    pub fn close(&mut self) -> bool {
        let cancelled = self.pending.take().is_some_and(|mut pending| pending.cancel());

        if cancelled {
            info!(
                event_name = "assistant.reply.cancelled",
                session_id = %self.session_id,
                "pending reply cancelled on close"
            );
        }
        cancelled
    }

    fn schedule_reply(&self, input: String) -> PendingReply {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let resolver = Arc::clone(&self.resolver);
        let provider = Arc::clone(&self.provider);
        let transcript = Arc::clone(&self.transcript);
        let typing_delay = self.typing_delay;
        let session_id = self.session_id.clone();
        let delivered = Arc::new(AtomicBool::new(false));
        let task_delivered = Arc::clone(&delivered);

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(typing_delay) => {}
                _ = cancel_rx.changed() => {
                    debug!(session_id = %session_id, "reply cancelled during typing delay");
                    return None;
                }
            }

            let context = provider.snapshot();
            let resolution = resolver.resolve_detailed(&input, &context);

            // Cancellation is published under this lock, so a reply is either
            // appended before close() returns or not at all.
            let mut transcript = lock_transcript(&transcript);
            if *cancel_rx.borrow() {
                return None;
            }
            let message =
                transcript.append(Author::Assistant, resolution.text, resolution.rule_id.clone());
            task_delivered.store(true, Ordering::SeqCst);
            drop(transcript);

            info!(
                event_name = "assistant.reply.resolved",
                session_id = %session_id,
                message_id = message.id.0,
                rule_id = resolution.rule_id.as_deref().unwrap_or("fallback"),
                "assistant reply appended"
            );
            Some(message)
        });

        PendingReply {
            cancel_tx: Some(cancel_tx),
            handle: Some(handle),
            transcript: Arc::clone(&self.transcript),
            delivered,
        }
    }
}

struct PendingReply {
    cancel_tx: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<Option<ChatMessage>>>,
    transcript: Arc<Mutex<Transcript>>,
    /// Set by the task under the transcript lock once the reply is appended.
    delivered: Arc<AtomicBool>,
}

impl PendingReply {
    fn is_outstanding(&self) -> bool {
        !self.delivered.load(Ordering::SeqCst)
            && self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Returns true when the reply had not been appended yet.
    fn cancel(&mut self) -> bool {
        let mut cancelled = false;
        if let Some(tx) = self.cancel_tx.take() {
            let _transcript = lock_transcript(&self.transcript);
            cancelled = !self.delivered.load(Ordering::SeqCst);
            let _ = tx.send(true);
        }

        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        cancelled
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock_transcript(transcript: &Mutex<Transcript>) -> MutexGuard<'_, Transcript> {
    match transcript.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
