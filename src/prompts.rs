//! Prompt Assembler

use crate::core::llm::ChatMessage;
use crate::session::ConversationTurn;

pub const SYSTEM_PROMPT: &str = "You are a friendly, professional HR assistant.

Scope:
- Human Resources topics only
- Canadian workplace best practices

Rules:
- Do NOT answer non-HR questions
- Do NOT provide legal advice
- If unsure, recommend consulting HR
- Use simple, clear language

Use the provided HR policy content when answering.";

pub fn context_block(context: &str) -> String {
    format!("Relevant HR policy context:\n{}", context)
}

pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "HR Policy Content:\n{}\n\nUser Question:\n{}\n\nAnswer in a helpful and professional tone.",
        context, question
    )
}

/// Message window: persona, policy context, prior turns, then the current question.
///
/// `history` must not contain the turn being answered.
pub fn assemble(context: &str, history: &[ConversationTurn], user_input: &str) -> Vec<ChatMessage> {
    let mut window = Vec::with_capacity(history.len() + 3);
    window.push(ChatMessage::system(SYSTEM_PROMPT));
    window.push(ChatMessage::system(context_block(context)));
    window.extend(history.iter().map(ConversationTurn::to_message));
    window.push(ChatMessage::user(build_prompt(context, user_input)));
    window
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::Role;
    use crate::session::{ConversationHistory, TurnRole};

    fn roles(window: &[ChatMessage]) -> Vec<Role> {
        window.iter().map(|m| m.role).collect()
    }

    #[test]
    fn test_empty_history_shape() {
        let window = assemble("Leave is 10 days.", &[], "How much leave?");
        assert_eq!(roles(&window), vec![Role::System, Role::System, Role::User]);
        assert_eq!(window[0].content, SYSTEM_PROMPT);
        assert_eq!(window[1].content, "Relevant HR policy context:\nLeave is 10 days.");
    }

    #[test]
    fn test_history_sits_between_system_and_question() {
        let mut history = ConversationHistory::new(6);
        history.append(TurnRole::User, "first question");
        history.append(TurnRole::Assistant, "first answer");

        let window = assemble("ctx", &history.window(), "second question");
        assert_eq!(
            roles(&window),
            vec![Role::System, Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(window[2].content, "first question");
        assert_eq!(window[3].content, "first answer");
    }

    #[test]
    fn test_final_block_combines_context_and_question() {
        let window = assemble("Policy text", &[], "Can I work remotely?");
        let last = window.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert!(last.content.starts_with("HR Policy Content:\nPolicy text"));
        assert!(last.content.contains("User Question:\nCan I work remotely?"));
        assert!(last.content.ends_with("helpful and professional tone."));
    }

    #[test]
    fn test_full_history_keeps_two_leading_system_blocks() {
        let mut history = ConversationHistory::new(6);
        for i in 0..6 {
            let role = if i % 2 == 0 { TurnRole::User } else { TurnRole::Assistant };
            history.append(role, "x");
        }
        let window = assemble("c", &history.window(), "q");
        assert_eq!(window.len(), 9);
        assert!(window[..2].iter().all(|m| m.role == Role::System));
        assert!(window[2..].iter().all(|m| m.role != Role::System));
        assert_eq!(window[8].role, Role::User);
        assert!(window[8].content.contains("User Question:\nq"));
    }
}
