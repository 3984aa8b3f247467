pub mod config;
pub mod sanitize;
pub mod scanner;
pub mod search;
pub mod sorter;

/// The one audio container we sort and search (matched case-insensitively)
pub const SUPPORTED_EXTENSION: &str = "mp3";

/// Appended to the source folder's name to get the destination root
pub const SORTED_SUFFIX: &str = ".sorted";

/// Application name for XDG paths
pub const APP_NAME: &str = "tagsort";
