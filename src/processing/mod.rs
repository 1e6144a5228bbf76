mod graph;
mod pairs;

pub use graph::ReplyGraph;
pub use pairs::question_answer_pairs;
