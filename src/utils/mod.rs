//! Browser utilities.
//!
//! Provides:
//! - [`dom`] - Window/document access, history state, listeners
//! - [`fetch_fragment`] - Uncached fragment fetch with timeout

pub mod dom;
mod fetch;

pub use fetch::{RaceResult, fetch_fragment, race_with_timeout};
