//! Linear, one-shot workflows run by the `approve` and `mint` binaries.
//!
//! Each step is awaited before the next one starts. The first failure ends the
//! workflow; nothing is retried.

pub mod approve;
pub mod mint;
