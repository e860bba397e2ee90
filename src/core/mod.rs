//! Navigation core, independent of the browser.
//!
//! - [`Router`] and [`LoadOptions`] - The view-loading routine
//! - [`ViewHost`] and [`SubtreeInit`] - The seams the router drives
//! - [`extract_view`] - Fragment parsing and extraction
//! - [`Transition`] - Fade classes and navigation generations

pub mod error;
mod fragment;
mod host;
mod router;
mod transition;

pub use fragment::{ExtractedView, ViewFooter, extract_view};
pub use host::{SubtreeInit, ViewHost};
pub use router::{LoadOptions, Router};
pub use transition::{Generation, NavigationToken, Transition, TransitionPhase};
