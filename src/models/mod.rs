//! Data models and types for the application.
//!
//! - [`ViewPath`] - Normalized fragment path carried in the location hash
//! - [`AnchorLink`] - Clicked anchor attributes and the interception rule

mod link;
mod route;

pub use link::AnchorLink;
pub use route::{ViewPath, strip_fragment};
