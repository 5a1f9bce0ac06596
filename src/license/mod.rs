//! Turning an aggregated license blob into individual license bodies.
//!
//! - [`segment`] — parses the index document and slices per-library sections
//!   out of the text blob by char offsets.
//! - [`patterns`] — the ordered list of named license signatures.
//! - [`classifier`] — cuts known licenses out of a section, leaving a
//!   per-library fallback.
//! - [`canonical`] — whitespace canonicalization and content hashing.

pub mod canonical;
pub mod classifier;
pub mod patterns;
pub mod segment;
