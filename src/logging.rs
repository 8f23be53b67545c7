//! Structured JSON-lines logging for the dashboard poller.
//!
//! Every record carries a timestamp, a per-process sequence number, a level
//! and a domain, so a refresh cycle can be followed from the fetch of each
//! endpoint to the surface it was drawn on.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            Ok("fatal") => Level::Fatal,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains (categories for filtering)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Http,    // Requests to the metrics API
    Chart,   // Payload mapping, loader outcomes
    Surface, // Mount, create, destroy
    Refresh, // Periodic cycles
    System,  // Startup, shutdown, config
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Http => "http",
            Domain::Chart => "chart",
            Domain::Surface => "surface",
            Domain::Refresh => "refresh",
            Domain::System => "system",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS: comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Sequence counter and optional file sink
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static EVENTS_SINK: OnceLock<Option<Mutex<BufWriter<std::fs::File>>>> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

fn events_sink() -> Option<&'static Mutex<BufWriter<std::fs::File>>> {
    EVENTS_SINK
        .get_or_init(|| {
            let base = std::env::var("LOG_DIR").ok()?;
            let dir = PathBuf::from(base);
            if let Err(err) = create_dir_all(&dir) {
                eprintln!("[log] failed to create log dir: {}", err);
                return None;
            }
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("events.jsonl"))
            {
                Ok(file) => Some(Mutex::new(BufWriter::new(file))),
                Err(err) => {
                    eprintln!("[log] failed to open events log: {}", err);
                    None
                }
            }
        })
        .as_ref()
}

fn sanitize_fields(mut fields: Map<String, Value>) -> Map<String, Value> {
    let redacted = Value::String("[REDACTED]".to_string());
    for key in ["cookie", "Cookie", "csrf_token", "X-CSRFToken", "authorization"] {
        if fields.contains_key(key) {
            fields.insert(key.to_string(), redacted.clone());
        }
    }
    fields
}

fn split_fields(mut fields: Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut top = Map::new();
    for key in ["chart", "cycle", "url", "msg"] {
        if let Some(value) = fields.remove(key) {
            top.insert(key.to_string(), value);
        }
    }
    (top, fields)
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    let line = render_record(level, domain, event, fields);
    if let Some(sink) = events_sink() {
        if let Ok(mut w) = sink.lock() {
            let _ = writeln!(w, "{}", line);
            let _ = w.flush();
        }
    }
    println!("{}", line);
}

fn render_record(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) -> String {
    let fields = sanitize_fields(fields);
    let (mut top, data) = split_fields(fields);

    let msg = top.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("pid".to_string(), json!(process::id()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(domain.as_str()));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    for (k, v) in top {
        entry.insert(k, v);
    }
    entry.insert("data".to_string(), Value::Object(data));
    Value::Object(entry).to_string()
}

// =============================================================================
// Domain-Specific Logging Helpers
// =============================================================================

pub fn log_fetch(url: &str, method: &str, status: u16, elapsed_ms: u64) {
    log(
        Level::Debug,
        Domain::Http,
        "fetch",
        obj(&[
            ("url", v_str(url)),
            ("method", v_str(method)),
            ("status", json!(status)),
            ("elapsed_ms", json!(elapsed_ms)),
        ]),
    );
}

pub fn log_load_failure(chart: &str, error: &str) {
    log(
        Level::Warn,
        Domain::Chart,
        "load_failed",
        obj(&[("chart", v_str(chart)), ("error", v_str(error))]),
    );
}

pub fn log_cycle(cycle: u64, loaded: usize, failed: usize, elapsed_ms: u64) {
    log(
        Level::Info,
        Domain::Refresh,
        "cycle_complete",
        obj(&[
            ("cycle", json!(cycle)),
            ("loaded", json!(loaded)),
            ("failed", json!(failed)),
            ("elapsed_ms", json!(elapsed_ms)),
        ]),
    );
}

// =============================================================================
// Field helpers
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Tests
// =============================================================================
