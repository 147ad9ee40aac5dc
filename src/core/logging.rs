//! File logging for the terminal console.
//!
//! The TUI owns stdout, so every record goes to a daily rolling JSON file
//! under `<data_dir>/scraper-admin/logs/`. `log` macros are bridged into
//! `tracing` so views and the gateway share one sink.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "scraper-admin.log";
const DEFAULT_FILTER: &str = "info";

/// Directory that holds the rolling log files.
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("scraper-admin").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize logging for TUI mode.
///
/// Returns a `WorkerGuard` that must be kept alive for the duration of the
/// application so buffered records are flushed on exit.
pub fn init_tui() -> WorkerGuard {
    let log_dir = log_dir();

    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter);

    // No stdout layer: ratatui is in raw/alternate-screen mode.
    let subscriber = tracing_subscriber::registry().with(file_layer);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    let log_dir_clone = log_dir.clone();
    std::thread::spawn(move || {
        compress_old_logs(&log_dir_clone);
    });

    tracing::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX)
    );

    guard
}

/// Whether a file in the log directory is a rolled-over log due for gzip.
fn should_compress(file_name: &str, today_suffix: &str) -> bool {
    match file_name.strip_prefix(LOG_FILE_PREFIX) {
        Some(rest) => {
            rest.starts_with('.') && !rest.ends_with(today_suffix) && !rest.ends_with(".gz")
        }
        None => false,
    }
}

/// Date suffix of the file the daily appender is writing to at `now`.
///
/// `tracing_appender::rolling::daily` rolls on UTC midnight, so the local
/// date must not be used here.
fn active_log_suffix(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

fn compress_old_logs(log_dir: &Path) {
    let today_suffix = active_log_suffix(Utc::now());

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    for path in entries.flatten().map(|entry| entry.path()) {
        let due = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| should_compress(name, &today_suffix));
        if !due {
            continue;
        }

        match compress_file(&path) {
            Ok(()) => log::info!("Compressed old log: {:?}", path),
            Err(e) => log::warn!("Failed to compress old log {:?}: {}", path, e),
        }
    }
}

fn compress_file(path: &Path) -> io::Result<()> {
    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?
        .join(gz_name);

    if gz_path.exists() {
        return Ok(());
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
}
