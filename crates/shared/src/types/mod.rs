//! Shared value types.

pub mod code;
