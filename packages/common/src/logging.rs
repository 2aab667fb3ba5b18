//! Production-grade structured logging infrastructure
//!
//! Provides env_logger-based logging with secure handling of key material
//! and proper integration with the standard log crate.

use log::{debug, error, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Production logging infrastructure using `env_logger`
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (should be called once at application startup)
    ///
    /// Configure logging levels via `RUST_LOG` environment variable:
    /// - `RUST_LOG=debug` - Enable all debug logs
    /// - `RUST_LOG=info` - Enable info and above (recommended for production)
    /// - `RUST_LOG=p256jws=debug` - Module-specific levels
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("Structured logging initialized");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Safe to call from every test; later calls are ignored.
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log a failed JWT operation
    ///
    /// `error_kind` is the stable error code, `message` the rendered error.
    /// Callers must only pass messages that are free of key material.
    pub fn log_jwt_error(operation: &str, algorithm: &str, error_kind: &str, message: &str) {
        error!("JWT {operation} failed ({algorithm}, {error_kind}): {message}");
    }

    /// Log a rejected token without treating it as a system fault
    pub fn log_jwt_rejection(operation: &str, algorithm: &str, error_kind: &str) {
        warn!("JWT {operation} rejected token ({algorithm}, {error_kind})");
    }

    /// Log a key lifecycle event, identifying the key by fingerprint only
    pub fn log_key_event(operation: &str, public_key: &str) {
        let fingerprint = Self::secure_hash_key(public_key);
        info!("Key operation: {operation} (key_hash: {fingerprint})");
    }

    /// Log performance metrics and timing information
    pub fn log_performance_metric(operation: &str, duration_us: u128, success: bool) {
        if success {
            debug!("Performance: {operation} completed in {duration_us}us");
        } else {
            warn!("Performance: {operation} failed after {duration_us}us");
        }
    }

    /// Cryptographically secure key hashing for logging
    ///
    /// Returns the first 12 hex characters of the SHA-256 digest.
    pub fn secure_hash_key(key: &str) -> String {
        let hash = Sha256::digest(key.as_bytes());
        let hex_hash = format!("{hash:x}");
        format!("#{}", &hex_hash[..12])
    }
}
