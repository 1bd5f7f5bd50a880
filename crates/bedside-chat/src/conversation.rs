//! Conversation history with a two-phase turn commit.

use bedside_core::Message;

/// Ordered conversation history plus an explicit staging slot for the
/// pending user turn.
///
/// A user turn is staged before the provider round trip and then either
/// committed together with the assistant reply or discarded. The committed
/// history therefore never ends with an unanswered user message: after
/// every round trip it has grown by exactly two messages or not at all.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    staged: Option<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of committed messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the committed history is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a user turn is currently staged.
    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// Stage a pending user turn.
    ///
    /// Returns `false` (leaving the existing stage in place) if a turn is
    /// already staged; the caller serializes round trips per conversation.
    pub fn stage_user(&mut self, content: impl Into<String>) -> bool {
        if self.staged.is_some() {
            return false;
        }
        self.staged = Some(Message::user(content));
        true
    }

    /// The outbound message list: committed history plus the staged turn.
    ///
    /// When `augmented` is supplied it replaces the staged turn's content in
    /// the outbound copy only; the history keeps the raw user text.
    pub fn outbound(&self, augmented: Option<&str>) -> Vec<Message> {
        let mut messages = self.messages.clone();
        if let Some(staged) = &self.staged {
            messages.push(match augmented {
                Some(text) => Message::user(text),
                None => staged.clone(),
            });
        }
        messages
    }

    /// Commit the staged user turn together with the assistant reply.
    ///
    /// Returns `false` and leaves the history untouched when nothing is
    /// staged (the conversation was reset while the round trip was in
    /// flight).
    pub fn commit_assistant(&mut self, reply: impl Into<String>) -> bool {
        match self.staged.take() {
            Some(user_turn) => {
                self.messages.push(user_turn);
                self.messages.push(Message::assistant(reply));
                true
            }
            None => false,
        }
    }

    /// Discard the staged user turn, leaving the history untouched.
    pub fn discard_staged(&mut self) {
        self.staged = None;
    }

    /// Clear the conversation back to its initial state. Idempotent.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.staged = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedside_core::Role;

    #[test]
    fn test_new_conversation_is_empty() {
        let convo = Conversation::new();
        assert!(convo.is_empty());
        assert_eq!(convo.len(), 0);
        assert!(!convo.has_staged());
    }

    #[test]
    fn test_commit_grows_history_by_two() {
        let mut convo = Conversation::new();
        assert!(convo.stage_user("find a cardiologist"));
        assert!(convo.commit_assistant("Dr. Sharma is available."));

        assert_eq!(convo.len(), 2);
        assert_eq!(convo.messages()[0].role, Role::User);
        assert_eq!(convo.messages()[0].content, "find a cardiologist");
        assert_eq!(convo.messages()[1].role, Role::Assistant);
        assert!(!convo.has_staged());
    }

    #[test]
    fn test_discard_leaves_history_unchanged() {
        let mut convo = Conversation::new();
        convo.stage_user("first");
        convo.commit_assistant("reply");

        convo.stage_user("second");
        convo.discard_staged();

        assert_eq!(convo.len(), 2);
        assert!(!convo.has_staged());
    }

    #[test]
    fn test_double_stage_is_rejected() {
        let mut convo = Conversation::new();
        assert!(convo.stage_user("first"));
        assert!(!convo.stage_user("second"));

        // The original stage survives.
        let outbound = convo.outbound(None);
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].content, "first");
    }

    #[test]
    fn test_commit_without_stage_is_noop() {
        let mut convo = Conversation::new();
        assert!(!convo.commit_assistant("orphan reply"));
        assert!(convo.is_empty());
    }

    #[test]
    fn test_discard_without_stage_is_noop() {
        let mut convo = Conversation::new();
        convo.discard_staged();
        assert!(convo.is_empty());
    }

    #[test]
    fn test_outbound_includes_staged_turn() {
        let mut convo = Conversation::new();
        convo.stage_user("first");
        convo.commit_assistant("reply");
        convo.stage_user("second");

        let outbound = convo.outbound(None);
        assert_eq!(outbound.len(), 3);
        assert_eq!(outbound[2].content, "second");
    }

    #[test]
    fn test_outbound_augmentation_replaces_content_not_history() {
        let mut convo = Conversation::new();
        convo.stage_user("find a cardiologist");

        let outbound = convo.outbound(Some("Context: ... find a cardiologist"));
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].content, "Context: ... find a cardiologist");

        // The committed history keeps the raw user text.
        convo.commit_assistant("reply");
        assert_eq!(convo.messages()[0].content, "find a cardiologist");
    }

    #[test]
    fn test_history_never_ends_with_orphaned_user_turn() {
        let mut convo = Conversation::new();
        for i in 0..5 {
            convo.stage_user(format!("turn {}", i));
            if i % 2 == 0 {
                convo.commit_assistant("reply");
            } else {
                convo.discard_staged();
            }
            if let Some(last) = convo.messages().last() {
                assert_eq!(last.role, Role::Assistant);
            }
        }
        assert_eq!(convo.len(), 6); // three committed pairs
    }

    #[test]
    fn test_reset_clears_history_and_stage() {
        let mut convo = Conversation::new();
        convo.stage_user("first");
        convo.commit_assistant("reply");
        convo.stage_user("pending");

        convo.reset();
        assert!(convo.is_empty());
        assert!(!convo.has_staged());

        // Idempotent.
        convo.reset();
        assert!(convo.is_empty());
    }
}
