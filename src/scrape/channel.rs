use std::sync::Arc;

use anyhow::Result;
use serenity::all::{Http, Message as DiscordMessage, MessageId};
use serenity::builder::GetMessages;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Duration;

use crate::display::Display;
use crate::models::{ChannelInfo, ChannelStats, Message};

/// Pages one channel's history backwards, 100 messages per request, and
/// forwards `(channel_id, message)` records to the collector. Media-only and
/// bot-authored messages are skipped at the source. `resume_before` is the
/// previous run's checkpoint.
pub async fn scrape_channel(
    http: &Http,
    channel_info: &ChannelInfo,
    tx: mpsc::Sender<(u64, Message)>,
    mut shutdown_rx: broadcast::Receiver<()>,
    display: Arc<tokio::sync::Mutex<Display>>,
    resume_before: Option<u64>,
) -> Result<ChannelStats> {
    let start_time = std::time::Instant::now();
    let mut stats = ChannelStats {
        name: channel_info.name.clone(),
        ..Default::default()
    };
    let mut last_id: Option<MessageId> = resume_before.map(MessageId::new);

    {
        let mut display = display.lock().await;
        display.update_channel(channel_info.name.clone(), 0, 0, true);
        display.update()?;
    }

    loop {
        tokio::select! {
            batch_result = fetch_messages(http, channel_info, last_id) => {
                let batch = batch_result?;
                if batch.is_empty() {
                    break;
                }

                stats.messages_seen += batch.len();

                for msg in &batch {
                    if msg.content.trim().is_empty() || msg.author.bot {
                        continue;
                    }
                    let record = Message {
                        id: msg.id.get(),
                        reply_to_id: msg
                            .message_reference
                            .as_ref()
                            .and_then(|reference| reference.message_id)
                            .map(|id| id.get()),
                        text: msg.content.clone(),
                    };
                    stats.messages_kept += 1;
                    if tx.send((channel_info.id.get(), record)).await.is_err() {
                        // Collector is gone, stop paging.
                        stats.time_taken = start_time.elapsed();
                        return Ok(stats);
                    }
                }

                {
                    let mut display = display.lock().await;
                    display.update_channel(
                        channel_info.name.clone(),
                        stats.messages_seen,
                        stats.messages_kept,
                        true,
                    );
                    display.update()?;
                }

                let new_last_id = batch.last().map(|m| m.id);
                if new_last_id == last_id {
                    break;
                }
                last_id = new_last_id;

                // Small delay to stay clear of rate limits.
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(()) = shutdown_rx.recv() => {
                break;
            }
        }
    }

    stats.time_taken = start_time.elapsed();

    {
        let mut display = display.lock().await;
        display.channels_processed += 1;
        display.update_channel(
            channel_info.name.clone(),
            stats.messages_seen,
            stats.messages_kept,
            false,
        );
        display.update()?;
    }

    Ok(stats)
}

async fn fetch_messages(
    http: &Http,
    channel_info: &ChannelInfo,
    last_id: Option<MessageId>,
) -> Result<Vec<DiscordMessage>> {
    let request = GetMessages::new().limit(100);

    let request = if let Some(id) = last_id {
        request.before(id)
    } else {
        request
    };

    channel_info
        .id
        .messages(http, request)
        .await
        .map_err(Into::into)
}
