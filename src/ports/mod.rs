//! Port traits defining external boundaries.
//!
//! The only boundary is the git process itself; implementations live in
//! `src/adapters/`.

pub mod line_source;

pub use line_source::{LineSource, LineStream};
