//! Answer generation orchestration.
//!
//! Combines retrieved context, conversation history, and the question into a
//! single prompt for the completion capability.

use crate::conversation::ConversationMemory;
use crate::index::IndexManager;
use crate::retriever::{RetrievedChunk, DEFAULT_TOP_K};
use fplscout_core::{AppError, AppResult};
use fplscout_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Fixed message returned for blank input.
pub const ASK_PROMPT_MESSAGE: &str = "Please ask a question about Fantasy Premier League.";

/// Fixed message returned when no index is available.
pub const NO_INDEX_MESSAGE: &str =
    "No player index is available yet. Run `fplscout index` to build one, then ask again.";

/// Maximum tokens requested per answer.
const MAX_ANSWER_TOKENS: u32 = 1000;

/// Outcome of an answer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// A generated answer from the completion capability
    Reply(String),

    /// A fixed user-facing message (blank input, missing index)
    Notice(String),
}

impl Answer {
    /// The text to show the caller, whichever variant this is.
    pub fn text(&self) -> &str {
        match self {
            Self::Reply(text) | Self::Notice(text) => text,
        }
    }
}

/// Tunables for the answer generator.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    /// Completion model identifier
    pub model: String,

    /// Sampling temperature (lower = more deterministic phrasing)
    pub temperature: f32,

    /// Number of chunks retrieved per question
    pub top_k: usize,

    /// Conversation turns retained between questions
    pub history_window: usize,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            top_k: DEFAULT_TOP_K,
            history_window: 2,
        }
    }
}

/// The answer generator.
///
/// Owns the index manager and the conversation memory for one session.
/// Credentials and model settings arrive through the constructor; nothing
/// here reads ambient process state.
pub struct Assistant {
    index: IndexManager,
    memory: ConversationMemory,
    client: Arc<dyn LlmClient>,
    settings: AssistantSettings,
}

impl Assistant {
    /// Create an assistant over an index manager and completion client.
    pub fn new(
        index: IndexManager,
        client: Arc<dyn LlmClient>,
        settings: AssistantSettings,
    ) -> Self {
        let memory = ConversationMemory::new(settings.history_window);
        Self {
            index,
            memory,
            client,
            settings,
        }
    }

    /// Access the index manager (for build/load/stats).
    pub fn index_manager(&self) -> &IndexManager {
        &self.index
    }

    /// Mutable access to the index manager (for build/load).
    pub fn index_manager_mut(&mut self) -> &mut IndexManager {
        &mut self.index
    }

    /// Access the conversation memory.
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Answer a question using retrieved context and conversation history.
    ///
    /// Blank input and a missing index produce fixed `Answer::Notice`
    /// messages without invoking the embedding or completion capability.
    /// A completion failure surfaces as `AppError::Generation` and is not
    /// retried.
    pub async fn answer(&mut self, question: &str) -> AppResult<Answer> {
        let question = question.trim();

        if question.is_empty() {
            return Ok(Answer::Notice(ASK_PROMPT_MESSAGE.to_string()));
        }

        if !self.index.has_index() {
            return Ok(Answer::Notice(NO_INDEX_MESSAGE.to_string()));
        }

        tracing::info!("Answering question: {}", question);

        let retrieved = self.index.retrieve(question, self.settings.top_k).await?;
        let context = build_context(&retrieved);
        let history = self.memory.render();

        let prompt = build_user_prompt(question, &context, &history);

        let request = LlmRequest::new(prompt, &self.settings.model)
            .with_system(SYSTEM_PROMPT)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(MAX_ANSWER_TOKENS);

        let response = self
            .client
            .complete(&request)
            .await
            .map_err(|e| AppError::Generation(format!("Completion request failed: {}", e)))?;

        tracing::info!(
            "Generated answer ({} tokens total)",
            response.usage.total_tokens
        );

        self.memory.append(question, response.content.clone());

        Ok(Answer::Reply(response.content))
    }
}

/// Fixed instruction template for the completion capability.
const SYSTEM_PROMPT: &str = "\
You are a Fantasy Premier League expert assistant. Use the provided player \
information to answer the question.

When answering:
1. If the context doesn't contain relevant information, say what you know \
about the topic but clarify that you don't have current FPL data on this \
specific point.
2. Cite specific stats when they're available in the context.
3. Be concise and to the point.
4. If appropriate, suggest actions the user might take based on the \
information (e.g., transfers, captain picks).";

/// Concatenate retrieved chunk texts into the context block.
fn build_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|retrieved| retrieved.chunk.text.trim())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Assemble the user prompt from context, history, and the question.
fn build_user_prompt(question: &str, context: &str, history: &str) -> String {
    let mut prompt = format!(
        "Context information from the FPL database:\n{}\n\n",
        context
    );

    if !history.is_empty() {
        prompt.push_str(&format!("Conversation so far:\n{}\n\n", history));
    }

    prompt.push_str(&format!("Question: {}", question));
    prompt
}
