//! Fake engines for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use super::{RenderEngine, RenderError};

/// Returns fixed bytes and counts calls
pub struct FixedEngine {
    bytes: Vec<u8>,
    calls: AtomicUsize,
}

impl FixedEngine {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RenderEngine for FixedEngine {
    fn name(&self) -> &str {
        "fixed"
    }

    fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

/// Emits one byte per input byte, so output size equals input length
pub struct EchoLengthEngine;

impl RenderEngine for EchoLengthEngine {
    fn name(&self) -> &str {
        "echo-length"
    }

    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        Ok(vec![b'x'; html.len()])
    }
}

/// Always fails with the given kind
pub struct FailingEngine {
    pub kind: &'static str,
    pub message: &'static str,
}

impl RenderEngine for FailingEngine {
    fn name(&self) -> &str {
        "failing"
    }

    fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::other(self.kind, self.message))
    }
}

/// Fails the first `failures` calls, then succeeds
pub struct FlakyEngine {
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyEngine {
    pub fn new(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RenderEngine for FlakyEngine {
    fn name(&self) -> &str {
        "flaky"
    }

    fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(RenderError::other("engine_unavailable", "engine warming up"))
        } else {
            Ok(b"%PDF-1.7 flaky".to_vec())
        }
    }
}

/// Sleeps before answering
pub struct SleepingEngine(pub Duration);

impl RenderEngine for SleepingEngine {
    fn name(&self) -> &str {
        "sleeping"
    }

    fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        std::thread::sleep(self.0);
        Ok(b"%PDF-late".to_vec())
    }
}

/// Blocks every render until the gate is opened (or dropped)
pub struct GatedEngine {
    gate: Mutex<mpsc::Receiver<()>>,
}

/// Opens a [`GatedEngine`]; dropping it releases every blocked render
pub struct Gate(mpsc::Sender<()>);

impl GatedEngine {
    pub fn new() -> (Arc<Self>, Gate) {
        let (tx, rx) = mpsc::channel();
        (Arc::new(Self { gate: Mutex::new(rx) }), Gate(tx))
    }
}

impl RenderEngine for GatedEngine {
    fn name(&self) -> &str {
        "gated"
    }

    fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        let gate = self
            .gate
            .lock()
            .map_err(|_| RenderError::other("panic", "gate poisoned"))?;
        // Err means the sender was dropped, which also releases the render
        let _ = gate.recv();
        Ok(b"%PDF-gated".to_vec())
    }
}

impl Gate {
    pub fn open(self) {
        drop(self);
    }
}
