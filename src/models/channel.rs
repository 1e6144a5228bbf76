use serenity::all::{ChannelId, ChannelType};

pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelType,
}

pub struct ChannelProgress {
    pub messages_seen: usize,
    pub messages_kept: usize,
    pub is_active: bool,
}
