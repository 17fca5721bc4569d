//! Conversational memory for chat sessions.
//!
//! A bounded FIFO window of the most recent question/answer turns. This is
//! pure in-process session state: it is never persisted and resets to empty
//! on restart. Window size zero is the stateless case.

use std::collections::VecDeque;

/// One question/answer exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
}

/// Bounded, ordered sequence of the most recent conversation turns.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<ConversationTurn>,
    window: usize,
}

impl ConversationMemory {
    /// Create a memory retaining at most `window` turns.
    pub fn new(window: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Configured window size.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of retained turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Record a turn, evicting the oldest once the window is exceeded.
    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        if self.window == 0 {
            return;
        }

        self.turns.push_back(ConversationTurn {
            question: question.into(),
            answer: answer.into(),
        });

        while self.turns.len() > self.window {
            self.turns.pop_front();
        }
    }

    /// Flatten the retained history, oldest turn first, for prompt inclusion.
    ///
    /// Returns an empty string when no turns are retained.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("User: {}\nAssistant: {}", turn.question, turn.answer))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Drop all retained turns.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_within_window() {
        let mut memory = ConversationMemory::new(2);
        memory.append("q1", "a1");
        memory.append("q2", "a2");
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn test_exceeding_window_evicts_oldest() {
        let mut memory = ConversationMemory::new(2);
        memory.append("q1", "a1");
        memory.append("q2", "a2");
        memory.append("q3", "a3");

        assert_eq!(memory.len(), 2);
        let rendered = memory.render();
        assert!(!rendered.contains("q1"));
        assert!(rendered.contains("q2"));
        assert!(rendered.contains("q3"));
    }

    #[test]
    fn test_strict_cap_never_exceeded() {
        let mut memory = ConversationMemory::new(3);
        for i in 0..20 {
            memory.append(format!("q{}", i), format!("a{}", i));
            assert!(memory.len() <= 3);
        }
        assert_eq!(memory.len(), 3);
    }

    #[test]
    fn test_render_chronological_order() {
        let mut memory = ConversationMemory::new(3);
        memory.append("first question", "first answer");
        memory.append("second question", "second answer");

        let rendered = memory.render();
        let first_pos = rendered.find("first question").unwrap();
        let second_pos = rendered.find("second question").unwrap();
        assert!(first_pos < second_pos);
        assert!(rendered.starts_with("User: first question\nAssistant: first answer"));
    }

    #[test]
    fn test_zero_window_is_stateless() {
        let mut memory = ConversationMemory::new(0);
        memory.append("q1", "a1");

        assert!(memory.is_empty());
        assert_eq!(memory.render(), "");
    }

    #[test]
    fn test_clear() {
        let mut memory = ConversationMemory::new(2);
        memory.append("q1", "a1");
        memory.clear();
        assert!(memory.is_empty());
    }
}
