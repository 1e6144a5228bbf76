use std::sync::LazyLock;

use regex::Regex;

use crate::models::{QuestionAnswers, TrainingItem};

/// Messages starting with these are bot-command invocations, not questions
/// or answers.
const FORBIDDEN_PREFIXES: &[&str] = &["!", "$", "/", ";;", "pls ", "owo "];

static FORBIDDEN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?mi)gave \d+ tacos? to",
        r"(?mi)^welcome to the server",
        r"(?mi)leveled up to level \d+",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("invalid forbidden pattern"))
    .collect()
});

/// An answer is only useful as a completion if it points at something: a
/// mention, a link, or a code block.
static SIGNAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(<@!?\d+>|<#\d+>|<@&\d+>|https?://\S+|```)").expect("invalid signal pattern")
});

/// Leading slash-command invocations carry no content; the words after them
/// usually do ("/search lofi bot" is still a question about lofi bots).
static QUERY_COMMAND_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(search|ask|q|question)\s+").expect("invalid command pattern"));

/// Quoted context lines repeat the question inside the answer.
static QUOTE_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^> .*$").expect("invalid quote pattern"));

static BLANK_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("invalid blank-run pattern"));

fn preprocess(item: &str) -> String {
    QUERY_COMMAND_REGEX.replace(item, "").into_owned()
}

fn postprocess(item: &str) -> String {
    let without_quotes = QUOTE_LINE_REGEX.replace_all(item, "");
    BLANK_RUN_REGEX.replace_all(&without_quotes, "\n").into_owned()
}

fn should_include_question(item: &str) -> bool {
    if item.trim().is_empty() {
        return false;
    }
    if FORBIDDEN_PATTERNS.iter().any(|pattern| pattern.is_match(item)) {
        return false;
    }
    if FORBIDDEN_PREFIXES.iter().any(|prefix| item.starts_with(prefix)) {
        return false;
    }
    true
}

fn should_include_answer(item: &str) -> bool {
    if FORBIDDEN_PREFIXES.iter().any(|prefix| item.starts_with(prefix)) {
        return false;
    }
    if FORBIDDEN_PATTERNS.iter().any(|pattern| pattern.is_match(item)) {
        return false;
    }
    SIGNAL_REGEX.is_match(item)
}

/// Filters one QA pair down to a training item, or rejects it entirely.
///
/// The question must survive the command/spam filters; answers additionally
/// have to carry a mention, link, or code block. Surviving answers are
/// joined into a single completion. `None` means the pair goes to the
/// rejected pile.
pub fn clean_qa_pair(pair: &QuestionAnswers) -> Option<TrainingItem> {
    let question = postprocess(&preprocess(&pair.question));

    if !should_include_question(&question) {
        return None;
    }

    let answers: Vec<String> = pair
        .answers
        .iter()
        .map(|answer| preprocess(answer))
        .filter(|answer| should_include_answer(answer))
        .collect();

    let completion = postprocess(&answers.join("\n"));

    if completion.trim().replace('\n', "").is_empty() {
        return None;
    }

    Some(TrainingItem {
        prompt: question,
        answer: completion,
    })
}
