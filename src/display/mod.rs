mod ui;

pub use ui::Display;
