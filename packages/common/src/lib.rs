//! Common infrastructure for the p256jws crates
//!
//! Currently this is the structured logging layer shared by the JWS crate
//! and by whatever host (UI bridge, CLI, test harness) drives it.

pub mod logging;

pub use logging::LoggingTransformer;
