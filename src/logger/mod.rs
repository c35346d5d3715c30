//! Logger module
//!
//! Provides logging utilities for the backend including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Startup checks (static roots, schema, seeding)
//! - Error and warning logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("lar backend started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info(&format!("Database: {}", config.database.path));
    write_info(&format!("CORS origins: {}", config.cors.allowed_origins));
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    write_info(&format!("[Request] {method} {uri} {version:?}"));
}

pub fn log_response(status: u16, size: usize) {
    write_info(&format!("[Response] {status} ({size} bytes)"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_api_request(method: &str, path: &str, status: u16) {
    write_info(&format!("[API] {method} {path} - {status}"));
}

pub fn log_static_root(priority: usize, root: &Path, present: bool) {
    let marker = if present { "✓" } else { "✗ (missing, skipped)" };
    write_info(&format!(
        "[Static] #{priority} {} {marker}",
        root.display()
    ));
}

pub fn log_index_located(path: &Path) {
    write_info(&format!("[Static] SPA entry document: {}", path.display()));
}

pub fn log_index_missing(index_file: &str) {
    log_error(&format!(
        "SPA entry document '{index_file}' not found in any static root"
    ));
}

pub fn log_schema_ready(path: &str) {
    write_info(&format!("[DB] Schema ready ({path})"));
}

pub fn log_seed_inserted(table: &str, count: usize) {
    write_info(&format!("[Seed] Inserted {count} row(s) into {table}"));
}

pub fn log_seed_skipped(table: &str) {
    write_info(&format!("[Seed] {table} already populated, skipping"));
}

pub fn log_shutdown(reason: &str) {
    write_info(&format!("\n[Shutdown] {reason}, no longer accepting connections"));
}
