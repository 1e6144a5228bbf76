mod channel;
mod message;
mod qa;
mod stats;

pub use channel::{ChannelInfo, ChannelProgress};
pub use message::{ChatLog, Message};
pub use qa::{QuestionAnswers, TrainingItem};
pub use stats::{ChannelStats, ExtractStats, ScrapeStats};
