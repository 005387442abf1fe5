//! Facet filters and canonical search queries.
//!
//! Maps UI toggle state ([`FilterSet`]) to the order-independent request
//! shape ([`CanonicalQuery`]) the search session compares and fetches with,
//! and back again for pre-populating a draft.

mod filter_set;
mod query;
mod registry;

pub use filter_set::FilterSet;
pub use query::{
    applied_filters_summary, from_canonical, normalize_text, to_canonical, CanonicalQuery,
};
pub use registry::{FacetDef, FacetFamily, FacetRegistry};
