use std::{
    fs::{File, OpenOptions},
    io::Write,
    sync::Mutex,
};

use crate::trace::trace::TraceEvent;

/// Appends trace events to a JSONL file. Any I/O problem disables tracing
/// with a warning; it never fails the caller.
pub struct TraceLogger {
    file: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self { file: None }
            }
        }
    }

    /// A logger that drops every event.
    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Append one tracker or gate event as a single JSON line. A failed
    /// write drops that event with a warning on stderr.
    pub fn log(&self, event: &TraceEvent) {
        let Some(file) = &self.file else {
            return;
        };

        if let Err(e) = Self::append(file, event) {
            eprintln!("Warning: dropped trace event '{}': {}", event.event, e);
        }
    }

    fn append(file: &Mutex<File>, event: &TraceEvent) -> Result<(), String> {
        let json = serde_json::to_string(event).map_err(|e| format!("serialize failed: {}", e))?;
        let mut file = file.lock().map_err(|e| format!("lock poisoned: {}", e))?;
        writeln!(file, "{}", json).map_err(|e| format!("write failed: {}", e))
    }
}

impl std::fmt::Debug for TraceLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLogger")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
