mod channel;
mod select;

use std::{collections::HashSet, io::stdin, sync::Arc, time::Instant};

use anyhow::{Context as _, Result};
use futures::stream::{self, StreamExt};
use serenity::all::{ChannelType, GuildId, Http};
use tokio::signal::ctrl_c;
use tokio::sync::{Mutex, broadcast, mpsc};

use crate::display::Display;
use crate::models::{ChannelInfo, ChatLog, Message, ScrapeStats};
use crate::utils::{load_chat_log, save_chat_log};
use channel::scrape_channel;
use select::select_channels;

const SAVE_FREQUENCY: usize = 500;

pub async fn run(token: &str, guild: Option<u64>, db_path: &str) -> Result<()> {
    let http = Arc::new(Http::new(token));
    println!("🔑 Using user token mode");

    let guild_id = match guild {
        Some(id) => GuildId::new(id),
        None => {
            println!("Enter the Discord server (guild) ID:");
            let mut input = String::new();
            stdin().read_line(&mut input)?;
            GuildId::new(input.trim().parse().context("Invalid guild ID")?)
        }
    };

    match http.get_guild(guild_id).await {
        Ok(guild) => println!("✅ Successfully found server: {}", guild.name),
        Err(e) => {
            println!("❌ Failed to access server: {}", e);
            println!(
                "Please check if:\n1. The guild ID is correct\n2. You are in the server\n3. The token is valid"
            );
            return Ok(());
        }
    }

    println!("🚀 Starting message scraper for guild ID: {}", guild_id);

    let channels = guild_id.channels(&http).await?;
    println!("📊 Found {} channels in total", channels.len());

    let text_channels: Vec<ChannelInfo> = channels
        .into_values()
        .map(|c| ChannelInfo {
            id: c.id,
            name: c.name.clone(),
            kind: c.kind,
        })
        .filter(|info| info.kind == ChannelType::Text)
        .collect();
    println!("📝 Found {} text channels", text_channels.len());

    let selected = select_channels(text_channels)?;

    let log = load_chat_log(db_path)?;
    println!("🗃️  Database has {} messages from previous runs", log.messages.len());
    let checkpoints = log.checkpoints.clone();

    let (tx, rx) = mpsc::channel::<(u64, Message)>(1000);
    let (shutdown_tx, _) = broadcast::channel(1);
    let shutdown_tx = Arc::new(shutdown_tx);

    let display = Arc::new(Mutex::new(Display::new(selected.len())));
    let start_time = Instant::now();

    let shutdown_for_ctrlc = Arc::clone(&shutdown_tx);
    let display_for_ctrlc = Arc::clone(&display);
    tokio::spawn(async move {
        if ctrl_c().await.is_ok() {
            let mut display = display_for_ctrlc.lock().await;
            let _ = display.show_shutdown_message();
            let _ = shutdown_for_ctrlc.send(());
        }
    });

    let collector = tokio::spawn(collect_messages(
        rx,
        log,
        db_path.to_string(),
        Arc::clone(&display),
        start_time,
    ));

    let mut stats = ScrapeStats::new(db_path.to_string());
    let channel_count = selected.len();

    let results = stream::iter(selected)
        .map(|info| {
            let tx = tx.clone();
            let shutdown_rx = shutdown_tx.subscribe();
            let display = Arc::clone(&display);
            let http = Arc::clone(&http);
            let resume_before = checkpoints.get(&info.id.get()).copied();

            async move {
                match scrape_channel(&http, &info, tx, shutdown_rx, display, resume_before).await {
                    Ok(channel_stats) => Some(channel_stats),
                    Err(e) => {
                        eprintln!("Error scraping channel {}: {}", info.name, e);
                        None
                    }
                }
            }
        })
        .buffer_unordered(channel_count)
        .collect::<Vec<_>>()
        .await;

    // Close the channel so the collector drains and does its final save.
    drop(tx);

    for channel_stats in results.into_iter().flatten() {
        stats.add_channel_stats(channel_stats);
    }

    let (received, total) = collector.await.context("collector task panicked")??;

    println!("\n🎉 Scraping completed!");
    println!("📥 Received {} messages this run", received);
    println!("🗃️  Database now has {} messages", total);
    stats.print_stats();

    Ok(())
}

/// Single writer for the database: appends records coming off the workers,
/// keeps per-channel checkpoints, drops ids already stored by a previous
/// run, and flushes to disk every `SAVE_FREQUENCY` new messages.
async fn collect_messages(
    mut rx: mpsc::Receiver<(u64, Message)>,
    mut log: ChatLog,
    db_path: String,
    display: Arc<Mutex<Display>>,
    start_time: Instant,
) -> Result<(usize, usize)> {
    let mut seen: HashSet<u64> = log.messages.iter().map(|m| m.id).collect();
    let mut received = 0usize;
    let mut new_since_save = 0usize;

    while let Some((channel_id, message)) = rx.recv().await {
        received += 1;

        let checkpoint = log.checkpoints.entry(channel_id).or_insert(message.id);
        if message.id < *checkpoint {
            *checkpoint = message.id;
        }

        if !seen.insert(message.id) {
            continue;
        }
        log.messages.push(message);
        new_since_save += 1;

        if new_since_save >= SAVE_FREQUENCY {
            save_chat_log(&log, &db_path)?;
            new_since_save = 0;

            let mut display = display.lock().await;
            display.total_flushed = log.messages.len();
            display.elapsed = start_time.elapsed();
            if let Ok(metadata) = std::fs::metadata(&db_path) {
                display.db_size = metadata.len();
            }
            display.update()?;
        }
    }

    save_chat_log(&log, &db_path)?;
    Ok((received, log.messages.len()))
}
