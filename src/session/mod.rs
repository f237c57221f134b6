//! Per-session state owned by the caller for the lifetime of one conversation.

mod history;

pub use history::{ConversationHistory, ConversationTurn, TurnRole};

use crate::config::ConversationConfig;

#[derive(Debug, Clone)]
pub struct Session {
    history: ConversationHistory,
}

impl Session {
    pub fn new(config: &ConversationConfig) -> Self {
        Self {
            history: ConversationHistory::new(config.max_turns),
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ConversationHistory {
        &mut self.history
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_caps_history_from_config() {
        let mut session = Session::new(&ConversationConfig { max_turns: 2 });
        session.history_mut().append(TurnRole::User, "first");
        session.history_mut().append(TurnRole::Assistant, "second");
        session.history_mut().append(TurnRole::User, "third");

        let contents: Vec<String> = session
            .history()
            .window()
            .iter()
            .map(|t| t.content().to_string())
            .collect();
        assert_eq!(contents, vec!["second", "third"]);

        session.reset();
        assert!(session.history().is_empty());
    }
}
