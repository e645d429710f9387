//! Common utilities for the polyglot markup codec.
//!
//! This crate provides shared infrastructure used by the decoder and encoder:
//! - **Source positions** - line/column/offset locations attached to decode errors
//! - **Warning System** - de-duplicated terminal output for recoverable conditions

pub mod position;
pub mod warning;

pub use position::SourcePosition;
