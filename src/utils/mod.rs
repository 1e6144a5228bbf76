mod file;

pub use file::{load_chat_log, output_path, save_chat_log, write_jsonl, write_jsonl_file};
