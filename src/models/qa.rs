use serde::{Deserialize, Serialize};

/// A root message and the text of every message in its reply tree, any depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswers {
    pub question: String,
    pub answers: Vec<String>,
}

/// A cleaned QA pair ready for the training set: one prompt, the surviving
/// answers joined into a single completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingItem {
    pub prompt: String,
    pub answer: String,
}
