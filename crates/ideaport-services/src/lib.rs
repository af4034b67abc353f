//! External service clients: the virus-scan collaborator and the SMTP
//! notification transport.

pub mod services;

pub use services::clamav::{ClamAvScanner, ScanError, ScanVerdict, VirusScanner};
pub use services::email::EmailService;
