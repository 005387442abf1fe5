//! Presentation-side state that is independent of any rendering toolkit.

pub mod filters;
pub mod mvi;
