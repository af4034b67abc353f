//! API-level constants

/// Path prefix for all versioned routes.
pub const API_PREFIX: &str = "/api/v1";

/// Lifetime of presigned download URLs handed to clients.
pub const DOWNLOAD_URL_EXPIRY_SECS: u64 = 900;
