//! Common utilities for Perun.
//!
//! This crate provides the foundational pieces shared by the Perun crates:
//!
//! - [`SpanReader`] - Zero-copy binary reading from byte slices
//! - [`Error`] / [`Result`] - Common error type for binary parsing

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::SpanReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
