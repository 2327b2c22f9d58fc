//! Replaying adapters that serve recorded interactions.

pub mod line_source;

pub use line_source::ReplayingLineSource;
