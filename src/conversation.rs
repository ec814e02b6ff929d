use anyhow::Result;
use tokio::task::JoinHandle;

use crate::client::GenerateClient;
use crate::prompt;

/// Text substituted when the backend answers successfully but returns no
/// usable content. Kept as a visible transcript entry rather than an error.
pub const NO_RESPONSE_PLACEHOLDER: &str = "(no response)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One conversation turn. Never mutated or removed once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub text: String,
}

/// Owns the transcript and the request lifecycle for one conversation.
///
/// The transcript is append-only and only grows on confirmed outcomes. At
/// most one completion request is outstanding at a time: new input while a
/// request is in flight is dropped, not queued. All mutation happens on the
/// event-loop task; the spawned request only ever resolves into a value that
/// `poll_completion` folds back into state here.
pub struct Conversation {
    client: GenerateClient,
    messages: Vec<Message>,
    next_id: u64,
    draft: String,
    last_error: Option<String>,
    in_flight: Option<JoinHandle<Result<String>>>,
}

impl Conversation {
    pub fn new(client: GenerateClient) -> Self {
        Self {
            client,
            messages: Vec::new(),
            next_id: 0,
            draft: String::new(),
            last_error: None,
            in_flight: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    /// Open the conversation with a programmatic first user turn.
    ///
    /// Only valid while the transcript is empty; calling again after the
    /// conversation has begun is a no-op, so a screen that fires this on
    /// mount cannot double-start.
    pub fn start(&mut self, opening: &str) -> bool {
        if !self.messages.is_empty() || self.in_flight.is_some() {
            return false;
        }
        let opening = opening.trim();
        if opening.is_empty() {
            return false;
        }
        self.push_message(Role::User, opening.to_string());
        self.request_completion();
        true
    }

    /// Append a user turn and request the coach's reply.
    ///
    /// Returns false without touching any state when the trimmed text is
    /// empty or a request is already outstanding.
    pub fn send_user_turn(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.in_flight.is_some() {
            return false;
        }
        self.push_message(Role::User, trimmed.to_string());
        self.draft.clear();
        self.request_completion();
        true
    }

    /// Submit whatever the user has typed so far.
    pub fn submit_draft(&mut self) -> bool {
        let draft = self.draft.clone();
        self.send_user_turn(&draft)
    }

    fn push_message(&mut self, role: Role, text: String) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message { id, role, text });
    }

    fn request_completion(&mut self) {
        self.last_error = None;

        // The backend is stateless; memory exists only because the full
        // transcript is resent on every turn.
        let prompt = prompt::build_prompt(&self.messages);
        let client = self.client.clone();
        self.in_flight = Some(tokio::spawn(async move {
            client.complete(&prompt).await
        }));
    }

    /// Fold a finished request back into conversation state.
    ///
    /// Called from the event loop on every tick. Returns true when an
    /// outcome was applied (reply appended or error recorded) so the caller
    /// knows to re-render/scroll. The handle is taken before the outcome is
    /// inspected, so `pending` is false afterward even on failure.
    pub async fn poll_completion(&mut self) -> bool {
        let finished = self
            .in_flight
            .as_ref()
            .map_or(false, |task| task.is_finished());
        if !finished {
            return false;
        }
        let Some(task) = self.in_flight.take() else {
            return false;
        };

        match task.await {
            Ok(Ok(text)) => {
                let text = if text.trim().is_empty() {
                    NO_RESPONSE_PLACEHOLDER.to_string()
                } else {
                    text
                };
                self.push_message(Role::Assistant, text);
            }
            Ok(Err(err)) => {
                self.last_error = Some(err.to_string());
            }
            Err(err) => {
                self.last_error = Some(format!("completion task failed: {}", err));
            }
        }
        true
    }
}
