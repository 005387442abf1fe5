//! Favorites and filtered-search state engine for a recipe catalog.
//!
//! The crate is organised leaves first:
//!
//! - [`filter`]: facet registry, toggle state and canonical queries
//! - [`favorites`]: persisted, deduplicated favorites store
//! - [`session`]: the live search session and the featured preview
//! - [`ui`]: MVI primitives and the filter draft dialog
//! - [`app`]: the facade a rendering layer talks to

pub mod app;
pub mod catalog;
pub mod config;
pub mod favorites;
pub mod filter;
pub mod logging;
pub mod recipe;
pub mod session;
pub mod ui;
