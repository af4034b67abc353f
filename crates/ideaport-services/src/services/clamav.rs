use async_trait::async_trait;
use clamav_client::{clean, Tcp};
use std::str;
use std::time::{Duration, Instant};

/// Binary verdict returned by the scan collaborator for a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanVerdict {
    Clean,
    /// Infected, carrying the detected signature name.
    Infected(String),
}

/// Transport or protocol failure while scanning. These are retryable by the
/// task queue; a verdict is never synthesized from a failed scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("scan transport error: {0}")]
    Transport(String),

    #[error("scan timed out after {0} seconds")]
    Timeout(u64),

    #[error("failed to parse scanner response: {0}")]
    Protocol(String),
}

/// Virus-scan collaborator seam.
///
/// Production uses [`ClamAvScanner`]; tests script verdicts through a mock.
#[async_trait]
pub trait VirusScanner: Send + Sync {
    async fn scan_bytes(&self, data: &[u8]) -> Result<ScanVerdict, ScanError>;
}

#[derive(Clone)]
pub struct ClamAvScanner {
    host: String,
    port: u16,
    /// Timeout in seconds for each scan operation (default: 30)
    timeout_secs: u64,
}

impl ClamAvScanner {
    /// Create a new scanner against a ClamAV daemon (typically port 3310).
    pub fn new(host: String, port: u16) -> Self {
        Self::with_timeout(host, port, 30)
    }

    /// Create with a custom scan timeout (for large files or slow ClamAV instances).
    pub fn with_timeout(host: String, port: u16, timeout_secs: u64) -> Self {
        Self {
            host,
            port,
            timeout_secs,
        }
    }
}

/// Extract the signature name from a ClamAV "stream: <Name> FOUND" response.
fn parse_virus_name(response: &[u8]) -> String {
    let response_str = match str::from_utf8(response) {
        Ok(s) => s.trim(),
        Err(_) => return "unknown".to_string(),
    };
    if response_str.contains("FOUND") {
        response_str
            .split(':')
            .nth(1)
            .unwrap_or("unknown")
            .split_whitespace()
            .next()
            .unwrap_or("unknown")
            .to_string()
    } else {
        "unknown".to_string()
    }
}

#[async_trait]
impl VirusScanner for ClamAvScanner {
    /// Scan in-memory data using the sync API inside spawn_blocking to avoid
    /// !Send tokio futures.
    async fn scan_bytes(&self, data: &[u8]) -> Result<ScanVerdict, ScanError> {
        let start = Instant::now();
        tracing::debug!(host = %self.host, port = %self.port, "Starting ClamAV scan");
        let data = data.to_vec();
        let host = self.host.clone();
        let port = self.port;
        let timeout_secs = self.timeout_secs;

        let result = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            tokio::task::spawn_blocking(move || {
                let address = format!("{}:{}", host, port);
                let connection = Tcp {
                    host_address: address.as_str(),
                };
                match clamav_client::scan_buffer(data.as_slice(), connection, None) {
                    Ok(response_bytes) => match clean(&response_bytes) {
                        Ok(true) => {
                            tracing::info!(
                                duration_ms = start.elapsed().as_millis(),
                                "File scan completed: clean"
                            );
                            Ok(ScanVerdict::Clean)
                        }
                        Ok(false) => {
                            let virus_name = parse_virus_name(&response_bytes);
                            tracing::warn!(
                                duration_ms = start.elapsed().as_millis(),
                                virus = %virus_name,
                                "File scan detected virus"
                            );
                            Ok(ScanVerdict::Infected(virus_name))
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to parse ClamAV response");
                            Err(ScanError::Protocol(e.to_string()))
                        }
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "ClamAV scan failed");
                        Err(ScanError::Transport(e.to_string()))
                    }
                }
            }),
        )
        .await;

        match result {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "ClamAV scan panicked");
                Err(ScanError::Transport(format!("scan task join error: {}", e)))
            }
            Err(_) => {
                tracing::error!(timeout_secs = timeout_secs, "ClamAV scan timeout");
                Err(ScanError::Timeout(timeout_secs))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_virus_name_from_found_response() {
        assert_eq!(
            parse_virus_name(b"stream: Eicar-Test-Signature FOUND\0"),
            "Eicar-Test-Signature"
        );
    }

    #[test]
    fn parse_virus_name_falls_back_to_unknown() {
        assert_eq!(parse_virus_name(b"garbage"), "unknown");
        assert_eq!(parse_virus_name(&[0xff, 0xfe]), "unknown");
    }

    #[test]
    fn clamav_constructors() {
        let _scanner = ClamAvScanner::new("localhost".to_string(), 3310);
        let _scanner_custom = ClamAvScanner::with_timeout("localhost".to_string(), 3310, 60);
    }
}
