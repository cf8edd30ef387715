//! Feed-level expansion on top of `almanac-rfc`.
//!
//! Supplies what the decoder and expander leave to their caller: a window
//! policy, exclusion assembly across overrides, one sorted occurrence list per
//! feed and an explicit expansion cache.

pub mod cache;
pub mod error;
pub mod feed;
pub mod service;
pub mod window;
