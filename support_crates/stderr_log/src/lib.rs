//! A logging implementation that writes one line per record to the standard error stream

mod stderr_logger;

pub use stderr_logger::StderrLogger;
