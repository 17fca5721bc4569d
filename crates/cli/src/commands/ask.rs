//! Ask command handler.
//!
//! Answers a single question. Loads the persisted index, or falls back to
//! the full collect -> build -> persist path when none exists.

use clap::Args;
use fplscout_core::{config::AppConfig, AppResult};
use fplscout_knowledge::{Assistant, AssistantSettings, IndexManager};

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Number of chunks to retrieve for context
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        config.validate()?;

        let embedder = super::build_embedder(config)?;
        let mut manager = IndexManager::new(embedder);
        super::ensure_index(config, &mut manager).await?;

        let client = super::build_llm_client(config)?;
        let settings = AssistantSettings {
            model: config.model.clone(),
            temperature: config.temperature,
            top_k: self.top_k.unwrap_or(config.top_k),
            // Single-shot questions carry no conversation history
            history_window: 0,
        };

        let mut assistant = Assistant::new(manager, client, settings);
        let answer = assistant.answer(&self.question).await?;

        if self.json {
            let output = serde_json::json!({
                "question": self.question,
                "answer": answer.text(),
                "model": config.model,
                "provider": config.provider,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", answer.text());
        }

        Ok(())
    }
}
