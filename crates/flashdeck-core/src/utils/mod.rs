//! Utility functions for display formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    accuracy_percent, format_date, format_duration, format_relative_time, truncate_string,
};
