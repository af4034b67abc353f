//! Shared constants

/// Prefix under which uploaded document objects are stored.
/// Keys are `ideas/{idea_id}/{uuid}.{ext}`.
pub const DOCUMENT_KEY_PREFIX: &str = "ideas";

/// Maximum length of a sanitized display filename.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Title length limit for ideas and campaign names.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Description length limit for ideas.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
