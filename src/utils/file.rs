use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context as _, Result};
use chrono::Utc;
use serde::Serialize;

use crate::models::ChatLog;

/// Loads the scrape database, or starts a fresh one if the file does not
/// exist yet.
pub fn load_chat_log(path: &str) -> Result<ChatLog> {
    if !Path::new(path).exists() {
        return Ok(ChatLog::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read database at {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse database at {}", path))
}

pub fn save_chat_log(log: &ChatLog, path: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create database at {}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, log)?;
    writer.flush()?;
    Ok(())
}

/// Writes one JSON record per line.
pub fn write_jsonl<W, T>(writer: &mut W, items: &[T]) -> Result<()>
where
    W: Write,
    T: Serialize,
{
    for item in items {
        serde_json::to_writer(&mut *writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_jsonl_file<T: Serialize>(path: &str, items: &[T]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create output file {}", path))?;
    let mut writer = BufWriter::new(file);
    write_jsonl(&mut writer, items)
}

/// Picks a timestamped output path that does not clobber a previous run.
pub fn output_path(stem: &str) -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let base_path = format!("{}_{}.jsonl", stem, timestamp);

    let mut counter = 0;
    let mut path = base_path.clone();

    while Path::new(&path).exists() {
        counter += 1;
        path = format!("{}_{}_({}).jsonl", stem, timestamp, counter);
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainingItem;

    #[test]
    fn jsonl_is_one_record_per_line() {
        let items = vec![
            TrainingItem {
                prompt: "q1".to_string(),
                answer: "a1".to_string(),
            },
            TrainingItem {
                prompt: "q2".to_string(),
                answer: "line one\nline two".to_string(),
            },
        ];

        let mut buffer: Vec<u8> = Vec::new();
        write_jsonl(&mut buffer, &items).unwrap();

        let written = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: TrainingItem = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, items[0]);
        let second: TrainingItem = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second, items[1]);
    }

    #[test]
    fn empty_slice_writes_nothing() {
        let mut buffer: Vec<u8> = Vec::new();
        write_jsonl::<_, TrainingItem>(&mut buffer, &[]).unwrap();
        assert!(buffer.is_empty());
    }
}
