//! Observability infrastructure for marketfeed

pub mod logging;

pub use logging::init_logging;
