//! Structured test logging.
#![allow(dead_code)]
//!
//! A lightweight per-test logger with phase tracking and duration
//! reporting. Output goes to stderr so it interleaves with test harness
//! output; set `TEST_LOG_LEVEL=debug` to see debug lines.

use std::time::Instant;

fn debug_enabled() -> bool {
    std::env::var("TEST_LOG_LEVEL")
        .map(|v| matches!(v.to_lowercase().as_str(), "debug" | "trace"))
        .unwrap_or(false)
}

/// Per-test logger with phase and duration tracking.
pub struct TestLogger {
    name: &'static str,
    start: Instant,
}

impl TestLogger {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        eprintln!("[{name}] start");
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Mark a test phase (setup, execute, verify).
    pub fn phase(&self, phase: &str) {
        eprintln!("[{}] phase: {phase}", self.name);
    }

    pub fn info(&self, message: &str) {
        eprintln!("[{}] {message}", self.name);
    }

    pub fn debug(&self, message: &str) {
        if debug_enabled() {
            eprintln!("[{}] DEBUG {message}", self.name);
        }
    }

    /// Mark the test as finished successfully, reporting its duration.
    pub fn finish_ok(&self) {
        eprintln!("[{}] ok in {:?}", self.name, self.start.elapsed());
    }
}
