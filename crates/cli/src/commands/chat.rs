//! Chat command handler.
//!
//! Interactive question loop with bounded conversation memory. The session
//! history lives in process memory only and is gone when the loop exits.

use clap::Args;
use fplscout_core::{config::AppConfig, AppResult};
use fplscout_knowledge::{Assistant, AssistantSettings, IndexManager};
use std::io::{BufRead, Write};

/// Interactive chat session with conversation memory
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Number of chunks to retrieve for context
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        config.validate()?;

        let embedder = super::build_embedder(config)?;
        let mut manager = IndexManager::new(embedder);
        super::ensure_index(config, &mut manager).await?;

        let client = super::build_llm_client(config)?;
        let settings = AssistantSettings {
            model: config.model.clone(),
            temperature: config.temperature,
            top_k: self.top_k.unwrap_or(config.top_k),
            history_window: config.history_window,
        };

        let mut assistant = Assistant::new(manager, client, settings);

        println!("===== FPL Assistant =====");
        println!("Ask questions about Fantasy Premier League players, teams, and strategies.");
        println!("Type 'exit' to quit.");

        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            print!("\nYour question: ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let question = line?;

            if matches!(question.trim().to_lowercase().as_str(), "exit" | "quit" | "q") {
                println!("Goodbye!");
                break;
            }

            // Each question is processed to completion before the next is
            // read; failures are reported and the session continues.
            match assistant.answer(&question).await {
                Ok(answer) => {
                    println!("\nFPL Assistant:");
                    println!("{}", answer.text());
                }
                Err(e) => {
                    println!("\nError: {}", e);
                }
            }
        }

        Ok(())
    }
}
