// src/log.rs
//! Run logging: tracing to stderr plus an appended `.store/debug.log`.
//! Every line is stamped with elapsed run time instead of wall-clock time.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use tracing_subscriber::{
    fmt::{format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer as _,
};

use crate::config::consts::{LOG_FILE, STORE_DIR};

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

pub fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// `[HH:MM:SS.mmm]` since the first log line of the run.
#[derive(Clone, Copy, Debug, Default)]
pub struct Elapsed;

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "[{}]", fmt_elapsed(start().elapsed().as_millis()))
    }
}

/// Install the global subscriber. Filter comes from `RUST_LOG`, default `info`.
/// If the debug log can't be opened we still log to stderr.
pub fn init() {
    start();
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_timer(Elapsed)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let file_layer = open_log_file().map(|file| {
        tracing_subscriber::fmt::layer()
            .with_timer(Elapsed)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_filter(filter())
    });

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

fn open_log_file() -> Option<fs::File> {
    fs::create_dir_all(STORE_DIR).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)
        .ok()
}
