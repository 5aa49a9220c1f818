//! Logger module
//!
//! Provides logging utilities for the dispatcher including:
//! - Server lifecycle logging
//! - Registration and routing diagnostics
//! - Access logging in combined, common or JSON format
//! - File-based logging support
//!
//! Before [`init`] runs, info goes to stdout, errors to stderr, and access
//! logging is off.

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::{Config, LoggingConfig};
use std::fmt::Display;
use std::net::SocketAddr;

/// Severity threshold; messages above the configured level are dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Parse a configured level name; unknown names mean `info`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let access_format = config
        .access_log
        .then(|| AccessLogFormat::parse(&config.access_log_format));
    writer::init(
        Level::parse(&config.level),
        access_format,
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

fn enabled(level: Level) -> bool {
    let threshold = writer::get().map_or(Level::Info, writer::LogWriter::level);
    level <= threshold
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Access log format in effect, `None` when access logging is off
pub fn access_log_format() -> Option<AccessLogFormat> {
    writer::get().and_then(writer::LogWriter::access_format)
}

pub fn log_access(entry: &AccessLogEntry) {
    if let Some(w) = writer::get() {
        if let Some(format) = w.access_format() {
            w.write_access(&entry.format(format));
        }
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    if !enabled(Level::Info) {
        return;
    }
    write_info("======================================");
    write_info("Dispatcher started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Base URL: {}", config.base_url));
    write_info(&format!(
        "Timeouts: read {:?}, write {:?}",
        config.read_timeout, config.write_timeout
    ));
    write_info("======================================\n");
}

pub fn log_shutdown(addr: &SocketAddr) {
    if enabled(Level::Info) {
        write_info(&format!("[Shutdown] Stopped accepting on {addr}"));
    }
}

pub fn log_controller_registered(key: &str, type_name: &str, actions: usize) {
    if enabled(Level::Info) {
        write_info(&format!(
            "[Route] {key}/* -> {type_name} ({actions} actions)"
        ));
    }
}

pub fn log_handler_registered(pattern: &str) {
    if enabled(Level::Info) {
        write_info(&format!("[Route] {pattern} -> handler"));
    }
}

pub fn log_routes_frozen(controller_keys: &[&str], handlers: usize) {
    if enabled(Level::Info) {
        write_info(&format!(
            "[Route] {} controllers [{}], {handlers} handlers",
            controller_keys.len(),
            controller_keys.join(", ")
        ));
    }
}

pub fn log_route_miss(path: &str, reason: &impl Display) {
    if enabled(Level::Debug) {
        write_info(&format!("[DEBUG] {path}: {reason}"));
    }
}

pub fn log_action_failed(path: &str, action: &str, err: &impl Display) {
    log_error(&format!("{path}: {action} failed: {err}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    if enabled(Level::Error) {
        write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
    }
}

pub fn log_error(message: &str) {
    if enabled(Level::Error) {
        write_error(&format!("[ERROR] {message}"));
    }
}

pub fn log_warning(message: &str) {
    if enabled(Level::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}
