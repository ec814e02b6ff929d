use crate::conversation::{Message, Role};

/// Build the full prompt for the generation backend from the transcript.
///
/// The backend has no memory of its own, so every turn resends the complete
/// history under a fixed persona preamble and ends with the "Coach:" cue
/// telling it to continue as the assistant.
pub fn build_prompt(history: &[Message]) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a gentle, focused coach helping someone who says they can't get started on their work. ");
    prompt.push_str("Keep responses short, concrete, and encouraging. Ask one small follow-up question at a time. ");
    prompt.push_str("Reply in plain text only - do not use Markdown formatting, *, **, _, backticks, or lists.\n\n");
    prompt.push_str("Conversation so far:\n");

    let body: Vec<String> = history
        .iter()
        .map(|m| match m.role {
            Role::User => format!("User: {}", m.text),
            Role::Assistant => format!("Coach: {}", m.text),
        })
        .collect();
    prompt.push_str(&body.join("\n"));

    prompt.push_str("\n\nCoach:");
    prompt
}
