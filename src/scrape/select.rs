use std::collections::HashSet;
use std::io::{Write, stdout};

use anyhow::Result;
use crossterm::{
    QueueableCommand,
    style::{Color, ResetColor, SetForegroundColor},
};

use crate::models::ChannelInfo;

pub fn select_channels(channels: Vec<ChannelInfo>) -> Result<Vec<ChannelInfo>> {
    let mut stdout = stdout();

    stdout.queue(SetForegroundColor(Color::Cyan))?;
    println!("\nAvailable text channels:");
    stdout.queue(ResetColor)?;

    for (i, channel) in channels.iter().enumerate() {
        println!("{}. #{}", i + 1, channel.name);
    }

    stdout.queue(SetForegroundColor(Color::Cyan))?;
    println!(
        "\nEnter channel numbers to scrape (comma-separated, e.g., '1,3,5' or 'all' for all channels):"
    );
    stdout.queue(ResetColor)?;
    stdout.flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.eq_ignore_ascii_case("all") {
        return Ok(channels);
    }

    let chosen: HashSet<usize> = input
        .split(',')
        .filter_map(|num| num.trim().parse::<usize>().ok())
        .collect();

    let selected: Vec<ChannelInfo> = channels
        .into_iter()
        .enumerate()
        .filter(|(i, _)| chosen.contains(&(i + 1)))
        .map(|(_, channel)| channel)
        .collect();

    if selected.is_empty() {
        return Err(anyhow::anyhow!("No valid channels selected"));
    }

    Ok(selected)
}
