//! Display helpers for post content and timestamps.

pub mod format;

pub use format::{excerpt, format_date, read_time, truncate};
