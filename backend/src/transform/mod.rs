//! Transformation module.
//!
//! - Formatter: customers + purchase index to outbound documents
//! - Pipeline: the parse, format, validate and transmit sequence

pub mod formatter;
pub mod pipeline;

pub use formatter::format_customers;
pub use pipeline::*;
