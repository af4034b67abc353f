//! Scripted VirusScanner for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ideaport_services::{ScanError, ScanVerdict, VirusScanner};

#[derive(Clone)]
pub enum ScriptedVerdict {
    Clean,
    Infected(String),
    TransportError,
}

pub struct MockScanner {
    verdict: Mutex<ScriptedVerdict>,
    scan_count: AtomicUsize,
}

impl MockScanner {
    pub fn new() -> Self {
        Self {
            verdict: Mutex::new(ScriptedVerdict::Clean),
            scan_count: AtomicUsize::new(0),
        }
    }

    pub fn set_verdict(&self, verdict: ScriptedVerdict) {
        *self.verdict.lock().unwrap() = verdict;
    }

    pub fn scan_count(&self) -> usize {
        self.scan_count.load(Ordering::SeqCst)
    }
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VirusScanner for MockScanner {
    async fn scan_bytes(&self, _data: &[u8]) -> Result<ScanVerdict, ScanError> {
        self.scan_count.fetch_add(1, Ordering::SeqCst);
        match self.verdict.lock().unwrap().clone() {
            ScriptedVerdict::Clean => Ok(ScanVerdict::Clean),
            ScriptedVerdict::Infected(name) => Ok(ScanVerdict::Infected(name)),
            ScriptedVerdict::TransportError => {
                Err(ScanError::Transport("scripted transport failure".to_string()))
            }
        }
    }
}
