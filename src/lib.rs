//! Hash-routed fragment shell for static sites.
//!
//! Fetches HTML view fragments, swaps them into the shell with a fade, and
//! initializes per-view widgets (sortable tables, project gallery). The wasm
//! entry point is [`app::boot`].

pub mod app;
pub mod behaviors;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;
