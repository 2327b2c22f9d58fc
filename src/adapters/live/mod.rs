//! Live adapters for real external interactions.

pub mod line_source;

pub use line_source::LiveLineSource;
