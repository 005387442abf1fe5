use std::collections::BTreeSet;
use std::fmt;

use super::filter_set::FilterSet;
use super::registry::{FacetFamily, FacetRegistry};

/// Normalized, order-independent search request.
///
/// Two queries compare equal exactly when a re-fetch would be redundant:
/// same normalized text, same set of selected options per family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CanonicalQuery {
    text: String,
    dietary: BTreeSet<String>,
    cuisine: BTreeSet<String>,
}

impl CanonicalQuery {
    /// Unfiltered query for the given free text.
    pub fn new(text: &str) -> Self {
        Self {
            text: normalize_text(text),
            ..Self::default()
        }
    }

    /// Add a facet option by name. No registry check is made here.
    pub fn with_option(mut self, family: FacetFamily, option: &str) -> Self {
        self.facets_mut(family).insert(option.to_string());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Selected options of one family, sorted.
    pub fn facets(&self, family: FacetFamily) -> &BTreeSet<String> {
        match family {
            FacetFamily::Dietary => &self.dietary,
            FacetFamily::Cuisine => &self.cuisine,
        }
    }

    /// Same query with different free text.
    pub fn with_text(&self, text: &str) -> Self {
        Self {
            text: normalize_text(text),
            dietary: self.dietary.clone(),
            cuisine: self.cuisine.clone(),
        }
    }

    fn facets_mut(&mut self, family: FacetFamily) -> &mut BTreeSet<String> {
        match family {
            FacetFamily::Dietary => &mut self.dietary,
            FacetFamily::Cuisine => &mut self.cuisine,
        }
    }
}

impl fmt::Display for CanonicalQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.text)?;
        for family in FacetFamily::all() {
            let facets = self.facets(*family);
            if !facets.is_empty() {
                let joined: Vec<&str> = facets.iter().map(String::as_str).collect();
                write!(f, " {}=[{}]", family.as_str(), joined.join(","))?;
            }
        }
        Ok(())
    }
}

/// Trim and lowercase free text.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Derive the canonical query for `text` filtered by the selected options.
pub fn to_canonical(text: &str, filters: &FilterSet) -> CanonicalQuery {
    let mut query = CanonicalQuery::new(text);
    for family in FacetFamily::all() {
        for option in filters.selected(*family) {
            query = query.with_option(*family, option);
        }
    }
    query
}

/// Rebuild toggle state from a query, keeping only options the registry knows.
pub fn from_canonical(query: &CanonicalQuery, known: &FacetRegistry) -> FilterSet {
    let mut filters = FilterSet::empty(known);
    for family in FacetFamily::all() {
        for option in query.facets(*family) {
            if !filters.set(*family, option, true) {
                tracing::debug!(
                    family = family.as_str(),
                    option = %option,
                    "Dropping facet option not present in registry"
                );
            }
        }
    }
    filters
}

/// Display labels of every selected option, dietary first, or `"None"`.
pub fn applied_filters_summary(query: &CanonicalQuery, registry: &FacetRegistry) -> String {
    let labels: Vec<&str> = FacetFamily::all()
        .iter()
        .flat_map(|family| {
            query
                .facets(*family)
                .iter()
                .map(move |name| registry.label_for(*family, name).unwrap_or(name.as_str()))
        })
        .collect();

    if labels.is_empty() {
        "None".to_string()
    } else {
        labels.join(", ")
    }
}
