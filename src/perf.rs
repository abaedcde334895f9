//! Lightweight performance instrumentation.
//!
//! Two opt-in channels: timing scopes printed to stderr with `--perf`, and
//! a timestamped event log written with `--render-debug-log`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOGGER: LazyLock<Mutex<DebugLogger>> =
    LazyLock::new(|| Mutex::new(DebugLogger::new()));

const LOG_HEADER: &str = "mosaic debug log start";

/// Times a region of code until dropped.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Scope {
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if is_enabled() {
            eprintln!("[perf] {}: {:.2} ms", self.name, elapsed_ms);
        }
        log_event("scope", format!("{} {elapsed_ms:.3} ms", self.name));
    }
}

#[derive(Debug)]
struct DebugLogger {
    enabled: bool,
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl DebugLogger {
    fn new() -> Self {
        Self {
            enabled: false,
            start: Instant::now(),
            writer: None,
        }
    }

    fn open(&mut self, path: &Path) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{LOG_HEADER}")?;
        writer.flush()?;
        self.enabled = true;
        self.start = Instant::now();
        self.writer = Some(writer);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
        self.enabled = false;
        self.writer = None;
    }
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Start writing events to `path`, or stop logging when `None`.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut logger = DEBUG_LOGGER.lock().expect("debug logger lock poisoned");
    match path {
        Some(path) => logger.open(path),
        None => {
            logger.close();
            Ok(())
        }
    }
}

pub fn is_debug_log_enabled() -> bool {
    DEBUG_LOGGER
        .lock()
        .expect("debug logger lock poisoned")
        .enabled
}

pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut logger = DEBUG_LOGGER.lock().expect("debug logger lock poisoned");
    if !logger.enabled {
        return;
    }
    let elapsed_ms = logger.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = logger.writer.as_mut() {
        let _ = writeln!(
            writer,
            "[{elapsed_ms:>10.3} ms] {name}: {}",
            detail.as_ref()
        );
        let _ = writer.flush();
    }
}
