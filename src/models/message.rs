use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One raw chat message as stored in the scrape database. `reply_to_id` may
/// point at a message that appears later in the stream, earlier, or never
/// (deleted or outside the scraped range).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<u64>,
    pub text: String,
}

/// The on-disk scrape database: every message collected so far plus, per
/// channel, the oldest message id already fetched. A rerun resumes paging
/// backwards from that checkpoint instead of starting over.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatLog {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub checkpoints: HashMap<u64, u64>,
}
