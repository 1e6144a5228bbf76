use std::time::Duration;

#[derive(Default, Clone)]
pub struct ChannelStats {
    pub name: String,
    pub messages_seen: usize,
    pub messages_kept: usize,
    pub time_taken: Duration,
}

pub struct ScrapeStats {
    pub db_path: String,
    pub channels_processed: usize,
    pub total_seen: usize,
    pub total_kept: usize,
    pub channel_stats: Vec<ChannelStats>,
    pub start_time: std::time::Instant,
}

impl ScrapeStats {
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            channels_processed: 0,
            total_seen: 0,
            total_kept: 0,
            channel_stats: Vec::new(),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn add_channel_stats(&mut self, stats: ChannelStats) {
        self.channels_processed += 1;
        self.total_seen += stats.messages_seen;
        self.total_kept += stats.messages_kept;
        self.channel_stats.push(stats);
    }

    pub fn print_stats(&self) {
        println!("\n📊 Scraping Statistics:");
        println!("⏱️  Time taken: {:.2?}", self.start_time.elapsed());
        println!("📁 Channels processed: {}", self.channels_processed);
        println!("💬 Messages seen: {}", self.total_seen);
        println!("📝 Messages stored: {}", self.total_kept);

        if let Ok(metadata) = std::fs::metadata(&self.db_path) {
            println!("💾 Database size: {:.2} MB", metadata.len() as f64 / 1_000_000.0);
        }

        println!("\n📋 Per-channel breakdown:");
        for stats in &self.channel_stats {
            println!("\n#{}", stats.name);
            println!("  Seen: {}", stats.messages_seen);
            println!("  Stored: {}", stats.messages_kept);
            println!("  Time: {:.2?}", stats.time_taken);
        }
    }
}

pub struct ExtractStats {
    pub total_messages: usize,
    pub total_pairs: usize,
    pub kept: usize,
    pub rejected: usize,
    pub start_time: std::time::Instant,
}

impl ExtractStats {
    pub fn new(total_messages: usize) -> Self {
        Self {
            total_messages,
            total_pairs: 0,
            kept: 0,
            rejected: 0,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn print_stats(&self, completions_path: &str, rejected_path: &str) {
        println!("\n📊 Extraction Statistics:");
        println!("⏱️  Time taken: {:.2?}", self.start_time.elapsed());
        println!("💬 Messages analyzed: {}", self.total_messages);
        println!("🧵 QA threads found: {}", self.total_pairs);
        println!("✅ Training items kept: {}", self.kept);
        println!("🗑️  Pairs rejected: {}", self.rejected);
        if self.total_pairs > 0 {
            println!(
                "📈 Keep rate: {:.1}%",
                (self.kept as f64 / self.total_pairs as f64) * 100.0
            );
        }
        println!("💾 Completions saved to: {}", completions_path);
        println!("💾 Rejected pairs saved to: {}", rejected_path);
    }
}
