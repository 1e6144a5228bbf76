mod cleaning;
mod display;
mod models;
mod processing;
mod scrape;
mod utils;

use std::env;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use cleaning::clean_qa_pair;
use models::{ExtractStats, QuestionAnswers, TrainingItem};
use processing::{ReplyGraph, question_answer_pairs};
use utils::{load_chat_log, output_path, write_jsonl_file};

#[derive(Parser)]
#[command(
    name = "qa_miner",
    about = "Mine question/answer training pairs from Discord reply threads"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape guild message history into the local database
    Scrape {
        /// Path of the message database
        #[arg(long, default_value = "messages.json")]
        db: String,
        /// Guild id to scrape; prompted for interactively when omitted
        #[arg(long)]
        guild: Option<u64>,
    },
    /// Rebuild reply threads from the database and write cleaned training data
    Extract {
        /// Path of the message database
        #[arg(long, default_value = "messages.json")]
        db: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scrape { db, guild } => {
            let token =
                env::var("DISCORD_TOKEN").context("DISCORD_TOKEN not found in environment")?;
            scrape::run(&token, guild, &db).await
        }
        Command::Extract { db } => extract(&db),
    }
}

fn extract(db_path: &str) -> Result<()> {
    let log = load_chat_log(db_path)?;
    println!("📚 Total messages: {}", log.messages.len());

    let mut stats = ExtractStats::new(log.messages.len());

    let graph = ReplyGraph::build(log.messages)?;
    if graph.is_empty() {
        println!("🕸️  No reply threads in the database; nothing to write");
        return Ok(());
    }
    println!("🕸️  Connected messages: {}", graph.len());

    let qa_pairs = question_answer_pairs(&graph);
    stats.total_pairs = qa_pairs.len();
    println!("🧵 QA threads found: {}", qa_pairs.len());

    let mut training_items: Vec<TrainingItem> = Vec::new();
    let mut rejected: Vec<QuestionAnswers> = Vec::new();

    for pair in qa_pairs {
        match clean_qa_pair(&pair) {
            Some(item) => training_items.push(item),
            None => rejected.push(pair),
        }
    }
    stats.kept = training_items.len();
    stats.rejected = rejected.len();

    let completions_path = output_path("completions");
    let rejected_path = output_path("rejected");
    write_jsonl_file(&completions_path, &training_items)?;
    write_jsonl_file(&rejected_path, &rejected)?;

    stats.print_stats(&completions_path, &rejected_path);

    Ok(())
}
