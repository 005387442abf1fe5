//! Remote recipe catalog collaborator.

mod client;
mod error;

pub use client::{decode_hits, CatalogClient, EdamamClient};
pub use error::CatalogError;
